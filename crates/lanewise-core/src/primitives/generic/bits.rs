use crate::lane::{IntLane, Lane, UnsignedLane};
use crate::primitives::Ops;
use crate::vector::Vector;

use super::byte_vector;

/// Per-nibble population counts
const NIBBLE_POPCNT: [u8; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

pub fn reverse_lane_bytes<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    let size = std::mem::size_of::<T>();
    if size == 1 {
        return v;
    }
    let swap: Vector<T, N> = byte_vector(|j| ((j / size) * size + (size - 1 - j % size)) as u8);
    be.table_lookup_bytes(v, swap)
}

/// Swaps adjacent bit groups of width `shift` selected by the byte pattern `low`
#[inline(always)]
fn swap_bit_groups<B: Ops, U: UnsignedLane, const N: usize>(
    be: &B,
    u: Vector<U, N>,
    shift: u32,
    low: u8,
) -> Vector<U, N> {
    let mask = be.set(u.tag(), U::replicate_byte(low));
    be.or(
        be.and(be.shift_right_same(u, shift), mask),
        be.shift_left_same(be.and(u, mask), shift),
    )
}

pub fn reverse_bits<B: Ops, T: IntLane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    let d = v.tag();
    let mut u = be.bit_cast(d.to_unsigned(), v);
    u = swap_bit_groups(be, u, 1, 0x55);
    u = swap_bit_groups(be, u, 2, 0x33);
    u = swap_bit_groups(be, u, 4, 0x0F);
    be.bit_cast(d, be.reverse_lane_bytes(u))
}

/// Population count of each unsigned lane
fn popcnt_unsigned<B: Ops, U: UnsignedLane, const N: usize>(
    be: &B,
    u: Vector<U, N>,
) -> Vector<U, N> {
    let du = u.tag();
    let table = Vector::<u8, 16>::from_array(NIBBLE_POPCNT);
    let nibble = be.set(du, U::replicate_byte(0x0F));
    let lo = be.and(u, nibble);
    let hi = be.and(be.shift_right_same(u, 4), nibble);
    let per_byte = be.add(be.table_lookup_bytes(table, lo), be.table_lookup_bytes(table, hi));
    if U::BITS == 8 {
        return per_byte;
    }
    // the top byte of `per_byte * 0x0101..` accumulates every byte count
    let summed = be.mul(per_byte, be.set(du, U::replicate_byte(1)));
    be.shift_right_same(summed, U::BITS - 8)
}

pub fn population_count<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    be.bit_cast(d, popcnt_unsigned(be, be.bit_cast(d.to_unsigned(), v)))
}

pub fn leading_zero_count<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    let du = d.to_unsigned();
    let bits = <T::Unsigned as IntLane>::BITS;
    // smear the highest set bit into every lower position
    let mut u = be.bit_cast(du, v);
    let mut shift = 1;
    while shift < bits {
        u = be.or(u, be.shift_right_same(u, shift));
        shift <<= 1;
    }
    let width = be.set(du, <T::Unsigned as IntLane>::truncate_from(u64::from(bits)));
    be.bit_cast(d, be.sub(width, popcnt_unsigned(be, u)))
}

pub fn trailing_zero_count<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    let du = d.to_unsigned();
    let u = be.bit_cast(du, v);
    let below_lowest = be.and_not(u, be.sub(u, be.set(du, <T::Unsigned as Lane>::ONE)));
    be.bit_cast(d, popcnt_unsigned(be, below_lowest))
}

pub fn highest_set_bit_index<B: Ops, T: IntLane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    let du = d.to_unsigned();
    let top = <T::Unsigned as IntLane>::truncate_from(u64::from(T::BITS - 1));
    let lz = be.bit_cast(du, be.leading_zero_count(v));
    be.bit_cast(d, be.sub(be.set(du, top), lz))
}
