//! SSE2 backend implementation with operation-group kernels
//!
//! Full 16-byte vectors run on `core::arch` intrinsics; narrower vectors and
//! lane types SSE2 has no instruction for fall back to [`Emu128Backend`] for
//! primitives and to the generic compositions (which then reuse the native
//! primitives) for everything else. SSSE3, SSE4.1 and AES-NI paths are
//! compiled in when the build enables those target features.

mod dispatch;
mod ops;
mod utils;

use log::debug;

use self::ops::{arith, compare, convert, logical, mask, memory, permute, promote, reduce};
use super::emu128::Emu128Backend;
use crate::capabilities::Native;
use crate::lane::{
    FloatLane, IntLane, Lane, Narrow, SignedIntLane, SignedLane, UnsignedLane, Widen,
};
use crate::primitives::{generic, Backend, Ops, Primitives};
use crate::tag::Tag;
use crate::target::Target;
use crate::vector::{Mask, Vector};

/// SSE2 backend for x86-64 processors
#[derive(Clone, Copy, Debug, Default)]
pub struct Sse2Backend;

impl Sse2Backend {
    /// Create a new SSE2 backend
    pub fn new() -> Self {
        debug!(
            "Creating sse2 backend (extensions: {:?}, {} native op families)",
            Self::extensions(),
            Self::NATIVE.iter().count()
        );
        Self
    }

    /// SSE2 is part of the x86-64 baseline
    pub fn is_available() -> bool {
        true
    }

    /// Instruction set extensions compiled into this build
    pub fn extensions() -> Vec<&'static str> {
        let mut found = Vec::new();
        if cfg!(target_feature = "ssse3") {
            found.push("ssse3");
        }
        if cfg!(target_feature = "sse4.1") {
            found.push("sse4.1");
        }
        if cfg!(target_feature = "aes") {
            found.push("aes");
        }
        found
    }
}

impl Backend for Sse2Backend {
    const TARGET: Target = Target::Sse2;
    const NATIVE: Native = {
        let base = Native::LOGICAL3
            .union(Native::BITWISE_IF_THEN_ELSE)
            .union(Native::IF_THEN_ELSE)
            .union(Native::SATURATED_ADD_SUB)
            .union(Native::AVERAGE_ROUND)
            .union(Native::SHIFT_IMMEDIATE)
            .union(Native::REVERSE)
            .union(Native::INTERLEAVE)
            .union(Native::REDUCTIONS)
            .union(Native::MASK_BITS)
            .union(Native::PROMOTE_DEMOTE)
            .union(Native::SUMS_OF_8_ABS_DIFF);
        if cfg!(target_feature = "aes") {
            base.union(Native::AES)
        } else {
            base
        }
    };
}

impl Primitives for Sse2Backend {
    #[inline(always)]
    fn set<T: Lane, const N: usize>(&self, d: Tag<T, N>, value: T) -> Vector<T, N> {
        Emu128Backend.set(d, value)
    }

    #[inline(always)]
    fn and<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        logical::and(&a, &b).unwrap_or_else(|| Emu128Backend.and(a, b))
    }

    #[inline(always)]
    fn or<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        logical::or(&a, &b).unwrap_or_else(|| Emu128Backend.or(a, b))
    }

    #[inline(always)]
    fn xor<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        logical::xor(&a, &b).unwrap_or_else(|| Emu128Backend.xor(a, b))
    }

    #[inline(always)]
    fn and_not<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        logical::and_not(&a, &b).unwrap_or_else(|| Emu128Backend.and_not(a, b))
    }

    #[inline(always)]
    fn add<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::add(&a, &b).unwrap_or_else(|| Emu128Backend.add(a, b))
    }

    #[inline(always)]
    fn sub<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::sub(&a, &b).unwrap_or_else(|| Emu128Backend.sub(a, b))
    }

    #[inline(always)]
    fn mul<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::mul(&a, &b).unwrap_or_else(|| Emu128Backend.mul(a, b))
    }

    #[inline(always)]
    fn div<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::div(&a, &b).unwrap_or_else(|| Emu128Backend.div(a, b))
    }

    #[inline(always)]
    fn min<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::min(&a, &b).unwrap_or_else(|| Emu128Backend.min(a, b))
    }

    #[inline(always)]
    fn max<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        arith::max(&a, &b).unwrap_or_else(|| Emu128Backend.max(a, b))
    }

    #[inline(always)]
    fn sqrt<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        arith::sqrt(&v).unwrap_or_else(|| Emu128Backend.sqrt(v))
    }

    // SSE2 only shifts all lanes by one count
    #[inline(always)]
    fn shl<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        Emu128Backend.shl(v, counts)
    }

    #[inline(always)]
    fn shr<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        Emu128Backend.shr(v, counts)
    }

    #[inline(always)]
    fn eq<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        compare::eq(&a, &b).unwrap_or_else(|| Emu128Backend.eq(a, b))
    }

    #[inline(always)]
    fn lt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        compare::lt(&a, &b).unwrap_or_else(|| Emu128Backend.lt(a, b))
    }

    // Masks and vectors share the register layout
    #[inline(always)]
    fn mask_from_vec<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        Emu128Backend.mask_from_vec(v)
    }

    #[inline(always)]
    fn vec_from_mask<T: Lane, const N: usize>(&self, d: Tag<T, N>, m: Mask<T, N>)
        -> Vector<T, N> {
        Emu128Backend.vec_from_mask(d, m)
    }

    #[inline(always)]
    fn convert_to_int<T: FloatLane, const N: usize>(
        &self,
        d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N> {
        convert::convert_to_int(&v).unwrap_or_else(|| Emu128Backend.convert_to_int(d, v))
    }

    #[inline(always)]
    fn convert_to_float<T: FloatLane, const N: usize>(
        &self,
        d: Tag<T, N>,
        v: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        convert::convert_to_float(&v).unwrap_or_else(|| Emu128Backend.convert_to_float(d, v))
    }

    #[inline(always)]
    fn load_u<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vector<T, N> {
        memory::load_u(src).unwrap_or_else(|| Emu128Backend.load_u(d, src))
    }

    #[inline(always)]
    fn store_u<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]) {
        if !memory::store_u(&v, dst) {
            Emu128Backend.store_u(v, dst);
        }
    }

    #[inline(always)]
    fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
        &self,
        bytes: Vector<T, N>,
        indices: Vector<I, M>,
    ) -> Vector<I, M> {
        permute::table_lookup_bytes(&bytes, &indices)
            .unwrap_or_else(|| Emu128Backend.table_lookup_bytes(bytes, indices))
    }
}

impl Ops for Sse2Backend {
    // ------------------------------ Logical

    #[inline(always)]
    fn not<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        logical::not(&v).unwrap_or_else(|| generic::not(self, v))
    }

    #[inline(always)]
    fn xor3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        logical::xor(&a, &b)
            .and_then(|ab| logical::xor(&ab, &c))
            .unwrap_or_else(|| generic::xor3(self, a, b, c))
    }

    #[inline(always)]
    fn or3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        logical::or(&a, &b)
            .and_then(|ab| logical::or(&ab, &c))
            .unwrap_or_else(|| generic::or3(self, a, b, c))
    }

    #[inline(always)]
    fn or_and<T: Lane, const N: usize>(
        &self,
        o: Vector<T, N>,
        a1: Vector<T, N>,
        a2: Vector<T, N>,
    ) -> Vector<T, N> {
        logical::and(&a1, &a2)
            .and_then(|a| logical::or(&o, &a))
            .unwrap_or_else(|| generic::or_and(self, o, a1, a2))
    }

    // ------------------------------ Selection

    #[inline(always)]
    fn if_vec_then_else<T: Lane, const N: usize>(
        &self,
        mask: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        logical::if_vec_then_else(&mask, &yes, &no)
            .unwrap_or_else(|| generic::if_vec_then_else(self, mask, yes, no))
    }

    #[inline(always)]
    fn copy_sign<T: FloatLane, const N: usize>(
        &self,
        magn: Vector<T, N>,
        sign: Vector<T, N>,
    ) -> Vector<T, N> {
        let msb = self.sign_bit(magn.tag());
        logical::if_vec_then_else(&msb, &sign, &magn)
            .unwrap_or_else(|| generic::copy_sign(self, magn, sign))
    }

    #[inline(always)]
    fn copy_sign_to_abs<T: FloatLane, const N: usize>(
        &self,
        abs: Vector<T, N>,
        sign: Vector<T, N>,
    ) -> Vector<T, N> {
        let msb = self.sign_bit(abs.tag());
        logical::and(&msb, &sign)
            .and_then(|s| logical::or(&abs, &s))
            .unwrap_or_else(|| generic::copy_sign_to_abs(self, abs, sign))
    }

    #[inline(always)]
    fn if_then_else<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        logical::if_then_else(&m, &yes, &no).unwrap_or_else(|| generic::if_then_else(self, m, yes, no))
    }

    #[inline(always)]
    fn if_then_else_zero<T: Lane, const N: usize>(&self, m: Mask<T, N>, yes: Vector<T, N>)
        -> Vector<T, N> {
        logical::if_then_else_zero(&m, &yes)
            .unwrap_or_else(|| generic::if_then_else_zero(self, m, yes))
    }

    #[inline(always)]
    fn if_then_zero_else<T: Lane, const N: usize>(&self, m: Mask<T, N>, no: Vector<T, N>)
        -> Vector<T, N> {
        logical::if_then_zero_else(&m, &no)
            .unwrap_or_else(|| generic::if_then_zero_else(self, m, no))
    }

    #[inline(always)]
    fn if_negative_then_else<T: SignedLane, const N: usize>(
        &self,
        v: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        match compare::sign_mask(&v) {
            Some(m) => self.if_then_else(m, yes, no),
            None => generic::if_negative_then_else(self, v, yes, no),
        }
    }

    // ------------------------------ Arithmetic

    #[inline(always)]
    fn saturated_add<T: IntLane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        arith::saturated_add(&a, &b).unwrap_or_else(|| generic::saturated_add(self, a, b))
    }

    #[inline(always)]
    fn saturated_sub<T: IntLane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        arith::saturated_sub(&a, &b).unwrap_or_else(|| generic::saturated_sub(self, a, b))
    }

    #[inline(always)]
    fn average_round<T: UnsignedLane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T, N> {
        arith::average_round(&a, &b).unwrap_or_else(|| generic::average_round(self, a, b))
    }

    #[inline(always)]
    fn sums_of8_abs_diff<const N: usize, const M: usize>(
        &self,
        d64: Tag<u64, M>,
        a: Vector<u8, N>,
        b: Vector<u8, N>,
    ) -> Vector<u64, M> {
        promote::sums_of8_abs_diff(&a, &b)
            .unwrap_or_else(|| generic::sums_of8_abs_diff(self, d64, a, b))
    }

    // ------------------------------ Shifts

    #[inline(always)]
    fn shift_left<const K: u32, T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(K < T::BITS, "shift count exceeds lane width") }
        arith::shift_left_same(&v, K).unwrap_or_else(|| generic::shift_left::<K, _, T, N>(self, v))
    }

    #[inline(always)]
    fn shift_right<const K: u32, T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(K < T::BITS, "shift count exceeds lane width") }
        arith::shift_right_same(&v, K)
            .unwrap_or_else(|| generic::shift_right::<K, _, T, N>(self, v))
    }

    #[inline(always)]
    fn shift_left_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        arith::shift_left_same(&v, bits).unwrap_or_else(|| generic::shift_left_same(self, v, bits))
    }

    #[inline(always)]
    fn shift_right_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        arith::shift_right_same(&v, bits)
            .unwrap_or_else(|| generic::shift_right_same(self, v, bits))
    }

    #[inline(always)]
    fn broadcast_sign_bit<T: SignedIntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        compare::sign_mask(&v)
            .map(|m| self.vec_from_mask(v.tag(), m))
            .unwrap_or_else(|| generic::broadcast_sign_bit(self, v))
    }

    // ------------------------------ Permutation

    #[inline(always)]
    fn reverse<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        permute::reverse(&v).unwrap_or_else(|| generic::reverse(self, v))
    }

    #[inline(always)]
    fn interleave_lower<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        permute::interleave_lower(&a, &b).unwrap_or_else(|| generic::interleave_lower(self, a, b))
    }

    #[inline(always)]
    fn interleave_upper<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        permute::interleave_upper(&a, &b).unwrap_or_else(|| generic::interleave_upper(self, a, b))
    }

    // ------------------------------ Promotion and demotion

    #[inline(always)]
    fn promote_to<T: Widen, const N: usize>(
        &self,
        dw: Tag<T::Wide, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, N> {
        promote::promote_to(&v).unwrap_or_else(|| generic::promote_to(self, dw, v))
    }

    #[inline(always)]
    fn demote_to<T: Narrow, const N: usize>(
        &self,
        dn: Tag<T::Narrow, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Narrow, N> {
        promote::demote_to(&v).unwrap_or_else(|| generic::demote_to(self, dn, v))
    }

    #[inline(always)]
    fn ordered_demote2_to<T: Narrow, const N: usize, const M: usize>(
        &self,
        dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        const { assert!(M == 2 * N, "demoted pair fills one vector") }
        promote::ordered_demote2_to(&a, &b)
            .unwrap_or_else(|| generic::ordered_demote2_to(self, dn, a, b))
    }

    #[inline(always)]
    fn ordered_truncate2_to<T: UnsignedLane + Narrow, const N: usize, const M: usize>(
        &self,
        dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        const { assert!(M == 2 * N, "truncated pair fills one vector") }
        promote::ordered_truncate2_to(&a, &b)
            .unwrap_or_else(|| generic::ordered_truncate2_to(self, dn, a, b))
    }

    // ------------------------------ AES

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_round(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        ops::aes::aes_round(&state, &round_key)
    }

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_last_round(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        ops::aes::aes_last_round(&state, &round_key)
    }

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_round_inv(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        ops::aes::aes_round_inv(&state, &round_key)
    }

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_last_round_inv(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>)
        -> Vector<u8, 16> {
        ops::aes::aes_last_round_inv(&state, &round_key)
    }

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_inv_mix_columns(&self, state: Vector<u8, 16>) -> Vector<u8, 16> {
        ops::aes::aes_inv_mix_columns(&state)
    }

    #[cfg(target_feature = "aes")]
    #[inline(always)]
    fn aes_key_gen_assist<const RCON: i32>(&self, v: Vector<u8, 16>) -> Vector<u8, 16> {
        ops::aes::aes_key_gen_assist::<RCON>(&v)
    }

    // ------------------------------ Reductions

    #[inline(always)]
    fn sum_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        reduce::butterfly(v, |a, b| self.add(a, b))
            .unwrap_or_else(|| generic::sum_of_lanes(self, d, v))
    }

    #[inline(always)]
    fn min_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        reduce::butterfly(v, |a, b| self.min(a, b))
            .unwrap_or_else(|| generic::min_of_lanes(self, d, v))
    }

    #[inline(always)]
    fn max_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        reduce::butterfly(v, |a, b| self.max(a, b))
            .unwrap_or_else(|| generic::max_of_lanes(self, d, v))
    }

    // ------------------------------ Mask bits

    #[inline(always)]
    fn bits_from_mask<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> u64 {
        mask::bits_from_mask(&m).unwrap_or_else(|| generic::bits_from_mask(self, m))
    }

    #[inline(always)]
    fn count_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        self.bits_from_mask(m).count_ones() as usize
    }

    #[inline(always)]
    fn all_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        self.bits_from_mask(m) == (1u64 << N) - 1
    }

    #[inline(always)]
    fn all_false<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        self.bits_from_mask(m) == 0
    }

    #[inline(always)]
    fn find_first_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        let bits = self.bits_from_mask(m);
        (bits != 0).then(|| bits.trailing_zeros() as usize)
    }

    #[inline(always)]
    fn find_last_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        let bits = self.bits_from_mask(m);
        (bits != 0).then(|| 63 - bits.leading_zeros() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::active;

    fn ramp<T: Lane, const N: usize>(f: impl Fn(usize) -> T) -> Vector<T, N> {
        Vector::from_array(std::array::from_fn(f))
    }

    #[test]
    fn test_backend_identity() {
        let be = Sse2Backend::new();
        assert_eq!(be.name(), "sse2");
        assert_eq!(be.max_lanes::<u16>(), 8);
        assert!(Sse2Backend::is_available());
        assert_eq!(be.is_native(Native::AES), cfg!(target_feature = "aes"));
        assert!(be.is_native(Native::REDUCTIONS));
    }

    #[test]
    fn test_full_and_partial_agree_with_emulation() {
        let be = Sse2Backend;
        let emu = Emu128Backend;

        let a: Vector<i16, 8> = ramp(|i| (i as i16 - 4) * 3000);
        let b: Vector<i16, 8> = ramp(|i| 7 - i as i16 * 4000);
        assert_eq!(be.add(a, b), emu.add(a, b));
        assert_eq!(be.mul(a, b), emu.mul(a, b));
        assert_eq!(be.lt(a, b), emu.lt(a, b));
        assert_eq!(be.saturated_add(a, b), emu.saturated_add(a, b));
        assert_eq!(be.shift_right::<3, _, 8>(a), emu.shift_right::<3, _, 8>(a));

        let h: Vector<i16, 4> = ramp(|i| i as i16 - 2);
        assert_eq!(be.add(h, h), emu.add(h, h));
        assert_eq!(be.reverse(h), emu.reverse(h));

        let w: Vector<u64, 2> = ramp(|i| u64::MAX - i as u64);
        assert_eq!(be.lt(w, w), emu.lt(w, w));
        assert_eq!(be.mul(w, w), emu.mul(w, w));
        assert_eq!(be.shift_right::<63, _, 2>(w), emu.shift_right::<63, _, 2>(w));
    }

    #[test]
    fn test_narrow_shapes_fall_back_to_emulation() {
        let be = Sse2Backend;
        let emu = Emu128Backend;

        let a = Vector::<i32, 2>::from_array([1, -5]);
        let b = Vector::<i32, 2>::from_array([3, -7]);
        assert_eq!(be.lt(a, b).to_bools(), [true, false]);
        assert_eq!(be.eq(a, a), emu.eq(a, a));
        assert_eq!(be.min(a, b), emu.min(a, b));
        assert_eq!(be.max(a, b), emu.max(a, b));
        assert_eq!(be.reverse(a).to_array(), [-5, 1]);
        assert_eq!(be.interleave_lower(a, b), emu.interleave_lower(a, b));
        assert_eq!(be.interleave_upper(a, b), emu.interleave_upper(a, b));
        assert_eq!(be.broadcast_sign_bit(a).to_array(), [0, -1]);
        assert_eq!(be.shift_right_same(b, 1).to_array(), [1, -4]);

        let f = Vector::<f32, 2>::from_array([f32::NAN, 2.0]);
        let g = Vector::<f32, 2>::from_array([1.0, f32::NAN]);
        assert_eq!(active().min(f, g).to_array(), [1.0, 2.0]);
        assert_eq!(be.max(f, g).to_array(), [1.0, 2.0]);

        let m = Mask::<u8, 8>::from_bools([false, true, false, false, true, true, false, false]);
        assert_eq!(be.bits_from_mask(m), 0b0011_0010);
        assert_eq!(be.count_true(m), 3);
        assert_eq!(be.find_first_true(m), Some(1));
        assert_eq!(be.find_last_true(m), Some(5));
        assert_eq!(be.count_true(Mask::<u8, 8>::from_bools([true; 8])), 8);

        let bytes = Vector::<u8, 8>::from_array([250, 1, 2, 3, 4, 5, 6, 7]);
        let ten = Vector::<u8, 8>::splat(10);
        assert_eq!(be.saturated_add(bytes, ten), emu.saturated_add(bytes, ten));
        assert_eq!(be.saturated_sub(bytes, ten), emu.saturated_sub(bytes, ten));
        assert_eq!(be.average_round(bytes, ten), emu.average_round(bytes, ten));
        assert_eq!(be.compress(bytes, m), emu.compress(bytes, m));
    }

    #[test]
    fn test_float_ops_bit_identical() {
        let be = Sse2Backend;
        let emu = Emu128Backend;
        let d = Tag::<f32, 4>::new();
        let v = be.load_u(d, &[1.5, -2.5, f32::NAN, 1e30]);
        let w = be.load_u(d, &[0.25, f32::NAN, f32::NAN, -1e30]);

        assert!(be.min(v, w).bit_eq(&emu.min(v, w)));
        assert!(be.max(v, w).bit_eq(&emu.max(v, w)));
        assert!(be.round(v).bit_eq(&emu.round(v)));
        assert!(be.floor(v).bit_eq(&emu.floor(v)));
        assert!(be.sum_of_lanes(d, w).bit_eq(&emu.sum_of_lanes(d, w)));
        assert_eq!(
            be.convert_to_int(d.to_signed(), v),
            emu.convert_to_int(d.to_signed(), v)
        );
    }

    #[test]
    fn test_mask_queries() {
        let be = Sse2Backend;
        let m = Mask::<u32, 4>::from_bools([false, true, true, false]);
        assert_eq!(be.bits_from_mask(m), 0b0110);
        assert_eq!(be.count_true(m), 2);
        assert_eq!(be.find_first_true(m), Some(1));
        assert_eq!(be.find_last_true(m), Some(2));
        assert!(!be.all_true(m));
        assert!(be.all_true(Mask::<u8, 16>::from_bools([true; 16])));
        assert!(be.all_false(Mask::<u8, 8>::from_bools([false; 8])));
    }

    #[test]
    fn test_if_negative_then_else() {
        let be = Sse2Backend;
        let v = Vector::<f64, 2>::from_array([-0.0, 2.0]);
        let yes = Vector::splat(1.0);
        let no = Vector::splat(9.0);
        assert_eq!(be.if_negative_then_else(v, yes, no).to_array(), [1.0, 9.0]);
        assert_eq!(
            be.broadcast_sign_bit(Vector::<i32, 4>::from_array([-5, 5, i32::MIN, 0])).to_array(),
            [-1, 0, -1, 0]
        );
    }

    #[test]
    fn test_width_changes_match_emulation() {
        let be = Sse2Backend;
        let emu = Emu128Backend;

        let b = Vector::<i8, 16>::from_array(std::array::from_fn(|i| (i as i8 - 8) * 15));
        let dw = Tag::<i16, 8>::new();
        assert_eq!(be.promote_lower_to(dw, b), emu.promote_lower_to(dw, b));
        assert_eq!(be.promote_upper_to(dw, b), emu.promote_upper_to(dw, b));

        let w = Vector::<i16, 8>::from_array([300, -300, 0, 1, -1, 127, -128, 200]);
        let dn = Tag::<i8, 16>::new();
        assert_eq!(be.ordered_demote2_to(dn, w, w), emu.ordered_demote2_to(dn, w, w));
        assert_eq!(be.reorder_demote2_to(dn, w, w), emu.reorder_demote2_to(dn, w, w));
        let dh = Tag::<i8, 8>::new();
        assert_eq!(be.demote_to(dh, w).to_array(), [127, -128, 0, 1, -1, 127, -128, 127]);

        let u = Vector::<u16, 8>::from_array([0xFFFF, 0x8000, 0x0100, 0x00FF, 1, 2, 3, 0x7FFF]);
        let d8 = Tag::<u8, 16>::new();
        let du = Tag::<u8, 8>::new();
        assert_eq!(be.ordered_demote2_to(d8, u, u), emu.ordered_demote2_to(d8, u, u));
        assert_eq!(be.demote_to(du, u).to_array(), [255, 255, 255, 255, 1, 2, 3, 255]);
        assert_eq!(be.ordered_truncate2_to(d8, u, u), emu.ordered_truncate2_to(d8, u, u));

        let d = Vector::<f64, 2>::from_array([1e300, -0.1]);
        let df = Tag::<f32, 4>::new();
        assert!(be.ordered_demote2_to(df, d, d).bit_eq(&emu.ordered_demote2_to(df, d, d)));

        let x = Vector::<u8, 16>::from_array(std::array::from_fn(|i| (i * 37) as u8));
        let y = Vector::<u8, 16>::splat(128);
        let d64 = Tag::<u64, 2>::new();
        assert_eq!(be.sums_of8_abs_diff(d64, x, y), emu.sums_of8_abs_diff(d64, x, y));
    }

    #[test]
    fn test_blended_store_keeps_false_lanes() {
        let be = Sse2Backend;
        let v = Vector::<u32, 4>::from_array([1, 2, 3, 4]);
        let m = Mask::from_bools([true, false, true, false]);
        let mut dst = [9u32; 6];
        be.blended_store(v, m, &mut dst);
        assert_eq!(dst, [1, 9, 3, 9, 9, 9]);

        let mut short = [7u32; 3];
        be.blended_store(v, Mask::from_bools([false, false, true, true]), &mut short);
        assert_eq!(short, [7, 7, 3]);
    }
}
