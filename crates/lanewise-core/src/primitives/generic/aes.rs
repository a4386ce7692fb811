//! AES rounds from byte table lookups
//!
//! SubBytes computes the GF(2^8) inverse through the tower field GF((2^4)^2):
//! a change of basis, three 16-entry inverse tables indexed by nibbles, and an
//! affine map folded into the final pair of lookups. Every step is a 16-byte
//! `table_lookup_bytes`, so the rounds run on any backend that has one and
//! never index memory with secret data.

use crate::primitives::Ops;
use crate::vector::Vector;

type V8 = Vector<u8, 16>;

const BASIS_LO: [u8; 16] = [
    0x00, 0x70, 0x2A, 0x5A, 0x98, 0xE8, 0xB2, 0xC2, 0x08, 0x78, 0x22, 0x52, 0x90, 0xE0, 0xBA, 0xCA,
];
const BASIS_HI: [u8; 16] = [
    0x00, 0x4D, 0x7C, 0x31, 0x7D, 0x30, 0x01, 0x4C, 0x81, 0xCC, 0xFD, 0xB0, 0xFC, 0xB1, 0x80, 0xCD,
];
const ZETA_INV: [u8; 16] = [0x80, 7, 11, 15, 6, 10, 4, 1, 9, 8, 5, 2, 12, 14, 13, 3];
const NIBBLE_INV: [u8; 16] = [0x80, 1, 8, 13, 15, 6, 5, 14, 2, 12, 11, 10, 9, 3, 7, 4];
const AFFINE_LO: [u8; 16] = [
    0x00, 0xC7, 0xBD, 0x6F, 0x17, 0x6D, 0xD2, 0xD0, 0x78, 0xA8, 0x02, 0xC5, 0x7A, 0xBF, 0xAA, 0x15,
];
const AFFINE_HI: [u8; 16] = [
    0x00, 0x6A, 0xBB, 0x5F, 0xA5, 0x74, 0xE4, 0xCF, 0xFA, 0x35, 0x2B, 0x41, 0xD1, 0x90, 0x1E, 0x8E,
];
const INV_AFFINE_LO: [u8; 16] = [
    0x00, 0x40, 0xF9, 0x7E, 0x53, 0xEA, 0x87, 0x13, 0x2D, 0x3E, 0x94, 0xD4, 0xB9, 0x6D, 0xAA, 0xC7,
];
const INV_AFFINE_HI: [u8; 16] = [
    0x00, 0x1D, 0x44, 0x93, 0x0F, 0x56, 0xD7, 0x12, 0x9C, 0x8E, 0xC5, 0xD8, 0x59, 0x81, 0x4B, 0xCA,
];

const SHIFT_ROWS: [u8; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];
const INV_SHIFT_ROWS: [u8; 16] = [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3];
/// Rotates each column by two bytes
const ROT_2301: [u8; 16] = [2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13];
/// Rotates each column by one byte
const ROT_1230: [u8; 16] = [1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12];
/// SubWord/RotWord layout of words 1 and 3
const KEYGEN_SHUFFLE: [u8; 16] = [4, 5, 6, 7, 5, 6, 7, 4, 12, 13, 14, 15, 13, 14, 15, 12];

#[inline(always)]
fn table(bytes: [u8; 16]) -> V8 {
    V8::from_array(bytes)
}

#[inline(always)]
fn lookup<B: Ops>(be: &B, bytes: [u8; 16], idx: V8) -> V8 {
    be.table_lookup_bytes(table(bytes), idx)
}

/// `affine(inverse(s))` for the affine map given by its two nibble tables
fn inverse_then_affine<B: Ops>(be: &B, state: V8, affine_lo: [u8; 16], affine_hi: [u8; 16]) -> V8 {
    let nibble = be.set(state.tag(), 0x0F);
    let lo = |v: V8| be.and(v, nibble);
    let hi = |v: V8| be.shift_right_same(v, 4);

    let s = be.xor(lookup(be, BASIS_LO, lo(state)), lookup(be, BASIS_HI, hi(state)));
    let s_lo = lo(s);
    let s_hi = hi(s);
    let s_x = be.xor(s_hi, s_lo);

    let inv_lo = lookup(be, ZETA_INV, s_lo);
    let inv_hi = lookup(be, NIBBLE_INV, s_hi);
    let inv_x = lookup(be, NIBBLE_INV, s_x);
    let out_lo = be.xor(s_x, lookup(be, NIBBLE_INV, be.xor(inv_lo, inv_hi)));
    let out_hi = be.xor(s_hi, lookup(be, NIBBLE_INV, be.xor(inv_lo, inv_x)));

    be.xor(lookup(be, affine_lo, out_lo), lookup(be, affine_hi, out_hi))
}

fn sub_bytes<B: Ops>(be: &B, state: V8) -> V8 {
    let s = inverse_then_affine(be, state, AFFINE_LO, AFFINE_HI);
    be.xor(s, be.set(state.tag(), 0x63))
}

fn inv_sub_bytes<B: Ops>(be: &B, state: V8) -> V8 {
    let rotl = |n: u32| be.or(be.shift_left_same(state, n), be.shift_right_same(state, 8 - n));
    let b = be.xor(be.xor3(rotl(1), rotl(3), rotl(6)), be.set(state.tag(), 0x05));
    inverse_then_affine(be, b, INV_AFFINE_LO, INV_AFFINE_HI)
}

/// Multiplication by x in GF(2^8)
#[inline(always)]
fn mul2<B: Ops>(be: &B, v: V8) -> V8 {
    let d = v.tag();
    let carry = be.gt(v, be.set(d, 0x7F));
    be.xor(be.add(v, v), be.if_then_else_zero(carry, be.set(d, 0x1B)))
}

fn mix_columns<B: Ops>(be: &B, state: V8) -> V8 {
    let doubled = mul2(be, state);
    let d_s = be.xor(doubled, lookup_vec(be, state, ROT_2301));
    let t = be.xor(state, d_s);
    be.xor(d_s, lookup_vec(be, t, ROT_1230))
}

/// Permutes the bytes of `v` by the constant pattern `perm`
#[inline(always)]
fn lookup_vec<B: Ops>(be: &B, v: V8, perm: [u8; 16]) -> V8 {
    be.table_lookup_bytes(v, table(perm))
}

pub fn aes_inv_mix_columns<B: Ops>(be: &B, state: V8) -> V8 {
    let x2 = mul2(be, state);
    let x4 = mul2(be, x2);
    let x8 = mul2(be, x4);
    let x9 = be.xor(x8, state);
    let x11 = be.xor(x9, x2);
    let x13 = be.xor(x9, x4);
    let x14 = be.xor3(x8, x4, x2);
    let a = be.xor(x13, lookup_vec(be, x9, ROT_1230));
    let b = be.xor(x14, lookup_vec(be, x11, ROT_1230));
    be.xor(b, lookup_vec(be, a, ROT_2301))
}

pub fn aes_round<B: Ops>(be: &B, state: V8, round_key: V8) -> V8 {
    let s = lookup_vec(be, sub_bytes(be, state), SHIFT_ROWS);
    be.xor(mix_columns(be, s), round_key)
}

pub fn aes_last_round<B: Ops>(be: &B, state: V8, round_key: V8) -> V8 {
    let s = lookup_vec(be, sub_bytes(be, state), SHIFT_ROWS);
    be.xor(s, round_key)
}

pub fn aes_round_inv<B: Ops>(be: &B, state: V8, round_key: V8) -> V8 {
    let s = lookup_vec(be, inv_sub_bytes(be, state), INV_SHIFT_ROWS);
    be.xor(be.aes_inv_mix_columns(s), round_key)
}

pub fn aes_last_round_inv<B: Ops>(be: &B, state: V8, round_key: V8) -> V8 {
    let s = lookup_vec(be, inv_sub_bytes(be, state), INV_SHIFT_ROWS);
    be.xor(s, round_key)
}

pub fn aes_key_gen_assist<const RCON: i32, B: Ops>(be: &B, v: V8) -> V8 {
    let rotated = lookup_vec(be, sub_bytes(be, v), KEYGEN_SHUFFLE);
    let rcon = RCON as u8;
    let mut rcon_bytes = [0u8; 16];
    rcon_bytes[4] = rcon;
    rcon_bytes[12] = rcon;
    be.xor(rotated, table(rcon_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Emu128Backend;

    fn hex(s: &str) -> V8 {
        let bytes: Vec<u8> = (0..16)
            .map(|i| u8::from_str_radix(&s[2 * i..2 * i + 2], 16).unwrap())
            .collect();
        V8::from_bytes(&bytes)
    }

    #[test]
    fn test_sub_bytes_matches_sbox() {
        let be = Emu128Backend;
        let s = sub_bytes(&be, table([0x00, 0x01, 0x19, 0x3d, 0x53, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
        assert_eq!(&s.to_array()[..6], &[0x63, 0x7c, 0xd4, 0x27, 0xed, 0x16]);
    }

    #[test]
    fn test_inv_sub_bytes_round_trip() {
        let be = Emu128Backend;
        let all: Vec<u8> = (0..=255).collect();
        for chunk in all.chunks(16) {
            let v = V8::from_bytes(chunk);
            assert_eq!(inv_sub_bytes(&be, sub_bytes(&be, v)), v);
        }
    }

    #[test]
    fn test_fips197_round() {
        let be = Emu128Backend;
        let state = hex("193de3bea0f4e22b9ac68d2ae9f84808");
        let key = hex("a0fafe1788542cb123a339392a6c7605");
        assert_eq!(aes_round(&be, state, key), hex("a49c7ff2689f352b6b5bea43026a5049"));
    }
}
