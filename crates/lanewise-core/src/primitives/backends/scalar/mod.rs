//! Scalar backend implementation
//!
//! Vectors of exactly one lane. Every operation is the per-lane reference
//! semantics applied to that lane, which makes this backend the oracle the
//! wider backends are checked against. Shapes with more than one lane fail to
//! compile.

use log::debug;

use super::emu128::{bits_map, map, mask_where, zip_map};
use crate::capabilities::Native;
use crate::lane::{FloatLane, IntLane, Lane};
use crate::primitives::{Backend, Ops, Primitives};
use crate::tag::Tag;
use crate::target::Target;
use crate::vector::{Indices, Mask, Vector};

/// Single-lane backend
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        debug!("Creating scalar backend");
        Self
    }
}

#[inline(always)]
const fn single<const N: usize>() {
    const { assert!(N == 1, "the scalar backend has exactly one lane") }
}

impl Backend for ScalarBackend {
    const TARGET: Target = Target::Scalar;
    const NATIVE: Native = Native::IOTA
        .union(Native::FIRST_N)
        .union(Native::LANE_ACCESS)
        .union(Native::BROADCAST)
        .union(Native::TABLE_LOOKUP_LANES)
        .union(Native::REVERSE)
        .union(Native::ODD_EVEN)
        .union(Native::SLIDE)
        .union(Native::COMPRESS)
        .union(Native::EXPAND)
        .union(Native::REDUCTIONS)
        .union(Native::MASK_BITS);
    const MAX_BYTES: usize = 8;

    fn max_lanes<T: Lane>(&self) -> usize {
        1
    }
}

impl Primitives for ScalarBackend {
    #[inline(always)]
    fn set<T: Lane, const N: usize>(&self, _d: Tag<T, N>, value: T) -> Vector<T, N> {
        single::<N>();
        Vector::splat(value)
    }

    #[inline(always)]
    fn and<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        bits_map(a, b, |x, y| x & y)
    }

    #[inline(always)]
    fn or<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        bits_map(a, b, |x, y| x | y)
    }

    #[inline(always)]
    fn xor<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        bits_map(a, b, |x, y| x ^ y)
    }

    #[inline(always)]
    fn and_not<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        bits_map(a, b, |x, y| !x & y)
    }

    #[inline(always)]
    fn add<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_add)
    }

    #[inline(always)]
    fn sub<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_sub)
    }

    #[inline(always)]
    fn mul<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_mul)
    }

    #[inline(always)]
    fn div<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_div)
    }

    #[inline(always)]
    fn min<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_min)
    }

    #[inline(always)]
    fn max<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        zip_map(a, b, T::lane_max)
    }

    #[inline(always)]
    fn sqrt<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        map(v, T::lane_sqrt)
    }

    #[inline(always)]
    fn shl<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        zip_map(v, counts, |x, c| x.lane_shl(c.bits_u64() as u32))
    }

    #[inline(always)]
    fn shr<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        zip_map(v, counts, |x, c| x.lane_shr(c.bits_u64() as u32))
    }

    #[inline(always)]
    fn eq<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        single::<N>();
        mask_where(|i| a.raw[i] == b.raw[i])
    }

    #[inline(always)]
    fn lt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        single::<N>();
        mask_where(|i| a.raw[i] < b.raw[i])
    }

    #[inline(always)]
    fn mask_from_vec<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        single::<N>();
        Mask::from_words(v.raw.map(T::to_bits))
    }

    #[inline(always)]
    fn vec_from_mask<T: Lane, const N: usize>(&self, _d: Tag<T, N>, m: Mask<T, N>)
        -> Vector<T, N> {
        single::<N>();
        Vector::from_array(m.bits.map(T::from_bits))
    }

    #[inline(always)]
    fn convert_to_int<T: FloatLane, const N: usize>(
        &self,
        _d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N> {
        single::<N>();
        Vector::from_array(v.raw.map(T::to_int_saturating))
    }

    #[inline(always)]
    fn convert_to_float<T: FloatLane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        v: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        single::<N>();
        Vector::from_array(v.raw.map(T::from_int))
    }

    #[inline(always)]
    fn load_u<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T]) -> Vector<T, N> {
        single::<N>();
        Vector::splat(src[0])
    }

    #[inline(always)]
    fn store_u<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]) {
        single::<N>();
        dst[0] = v.raw[0];
    }

    // Byte tables may be wider than one lane (nibble tables for popcount)
    fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
        &self,
        bytes: Vector<T, N>,
        indices: Vector<I, M>,
    ) -> Vector<I, M> {
        single::<M>();
        let table = bytes.as_bytes();
        let wrap = table.len() - 1;
        let idx = indices.as_bytes();
        let mut out = [0u8; 16];
        for (o, &i) in out.iter_mut().zip(idx) {
            *o = if i & 0x80 != 0 { 0 } else { table[usize::from(i) & wrap] };
        }
        Vector::from_bytes(&out[..idx.len()])
    }
}

// With one lane most permutations are the identity.
impl Ops for ScalarBackend {
    #[inline(always)]
    fn iota<T: Lane, const N: usize>(&self, d: Tag<T, N>, first: T) -> Vector<T, N> {
        self.set(d, first)
    }

    #[inline(always)]
    fn first_n<T: Lane, const N: usize>(&self, _d: Tag<T, N>, n: usize) -> Mask<T, N> {
        single::<N>();
        mask_where(|_| n > 0)
    }

    #[inline(always)]
    fn extract_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>, i: usize) -> T {
        v.raw[i]
    }

    #[inline(always)]
    fn insert_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>, i: usize, value: T)
        -> Vector<T, N> {
        let mut raw = v.raw;
        raw[i] = value;
        Vector::from_array(raw)
    }

    #[inline(always)]
    fn get_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> T {
        v.raw[0]
    }

    #[inline(always)]
    fn broadcast<const LANE: usize, T: Lane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(LANE < N, "broadcast lane out of range") }
        v
    }

    #[inline(always)]
    fn table_lookup_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, _idx: Indices<T, N>)
        -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn two_tables_lookup_lanes<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        idx: Indices<T, N>,
    ) -> Vector<T, N> {
        single::<N>();
        if idx.raw[0].bits_u64() & 1 == 0 { a } else { b }
    }

    #[inline(always)]
    fn reverse<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn odd_even<T: Lane, const N: usize>(&self, _odd: Vector<T, N>, even: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        even
    }

    #[inline(always)]
    fn dup_even<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn dup_odd<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn slide_up_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize) -> Vector<T, N> {
        single::<N>();
        if amt == 0 { v } else { Vector::default() }
    }

    #[inline(always)]
    fn slide_down_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize)
        -> Vector<T, N> {
        single::<N>();
        if amt == 0 { v } else { Vector::default() }
    }

    #[inline(always)]
    fn compress<T: Lane, const N: usize>(&self, v: Vector<T, N>, _m: Mask<T, N>) -> Vector<T, N> {
        single::<N>();
        v
    }

    fn compress_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        single::<N>();
        if let Some(slot) = dst.first_mut() {
            *slot = v.raw[0];
        }
        self.count_true(m)
    }

    fn compress_blended_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        single::<N>();
        if !m.is_set(0) {
            return 0;
        }
        if let Some(slot) = dst.first_mut() {
            *slot = v.raw[0];
        }
        1
    }

    #[inline(always)]
    fn expand<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>) -> Vector<T, N> {
        single::<N>();
        if m.is_set(0) { v } else { Vector::default() }
    }

    #[inline(always)]
    fn load_expand<T: Lane, const N: usize>(&self, m: Mask<T, N>, _d: Tag<T, N>, src: &[T])
        -> Vector<T, N> {
        single::<N>();
        match src.first() {
            Some(&x) if m.is_set(0) => Vector::splat(x),
            _ => Vector::default(),
        }
    }

    #[inline(always)]
    fn sum_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn min_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn max_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        single::<N>();
        v
    }

    #[inline(always)]
    fn bits_from_mask<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> u64 {
        single::<N>();
        u64::from(m.is_set(0))
    }

    fn store_mask_bits<T: Lane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        m: Mask<T, N>,
        dst: &mut [u8],
    ) -> usize {
        single::<N>();
        match dst.first_mut() {
            Some(byte) => {
                *byte = u8::from(m.is_set(0));
                1
            }
            None => 0,
        }
    }

    fn load_mask_bits<T: Lane, const N: usize>(&self, _d: Tag<T, N>, bits: &[u8]) -> Mask<T, N> {
        single::<N>();
        mask_where(|_| bits.first().is_some_and(|b| b & 1 == 1))
    }

    #[inline(always)]
    fn count_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        single::<N>();
        usize::from(m.is_set(0))
    }

    #[inline(always)]
    fn find_first_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        single::<N>();
        m.is_set(0).then_some(0)
    }

    #[inline(always)]
    fn find_last_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        single::<N>();
        m.is_set(0).then_some(0)
    }

    #[inline(always)]
    fn all_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        single::<N>();
        m.is_set(0)
    }

    #[inline(always)]
    fn all_false<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        single::<N>();
        !m.is_set(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::generic;

    #[test]
    fn test_backend_identity() {
        let be = ScalarBackend::new();
        assert_eq!(be.name(), "scalar");
        assert_eq!(be.max_lanes::<u8>(), 1);
        assert_eq!(be.max_lanes::<f64>(), 1);
        assert!(be.is_native(Native::COMPRESS));
        assert!(!be.is_native(Native::AES));
    }

    #[test]
    fn test_single_lane_arithmetic() {
        let be = ScalarBackend;
        let d = Tag::<i32, 1>::new();
        let a = be.set(d, i32::MAX);
        assert_eq!(be.add(a, be.set(d, 1)).to_array(), [i32::MIN]);
        assert_eq!(be.div(a, be.zero(d)).to_array(), [0]);
        assert_eq!(be.saturated_add(a, be.set(d, 1)).to_array(), [i32::MAX]);
        assert_eq!(be.reduce_sum(d, a), i32::MAX);

        let df = Tag::<f64, 1>::new();
        let x = be.set(df, -2.5);
        assert_eq!(be.round(x).to_array(), [-2.0]);
        assert_eq!(be.floor(x).to_array(), [-3.0]);
        assert_eq!(be.abs(x).to_array(), [2.5]);
    }

    #[test]
    fn test_degenerate_permutations_match_generic() {
        let be = ScalarBackend;
        let d = Tag::<u16, 1>::new();
        let v = be.set(d, 0xBEEF);
        let w = be.set(d, 7);
        let idx = be.set_table_indices(d, &[1]);

        assert_eq!(be.reverse(v), generic::reverse(&be, v));
        assert_eq!(be.table_lookup_lanes(v, idx), generic::table_lookup_lanes(&be, v, idx));
        assert_eq!(be.two_tables_lookup_lanes(v, w, idx).to_array(), [7]);
        assert_eq!(
            be.two_tables_lookup_lanes(v, w, idx),
            generic::two_tables_lookup_lanes(&be, v, w, idx)
        );
        assert_eq!(be.slide_up_lanes(v, 1).to_array(), [0]);
        assert_eq!(be.broadcast::<0, _, 1>(v), v);
    }

    #[test]
    fn test_masks() {
        let be = ScalarBackend;
        let d = Tag::<f32, 1>::new();
        let yes = be.first_n(d, 3);
        let no = be.first_n(d, 0);
        assert!(be.all_true(yes));
        assert!(be.all_false(no));
        assert_eq!(be.find_first_true(yes), Some(0));
        assert_eq!(be.find_last_true(no), None);
        assert_eq!(be.bits_from_mask(yes), generic::bits_from_mask(&be, yes));

        let mut byte = [0xF0u8];
        assert_eq!(be.store_mask_bits(d, yes, &mut byte), 1);
        assert_eq!(byte, [1]);
        assert_eq!(be.load_mask_bits(d, &byte), yes);
        assert_eq!(be.load_mask_bits(d, &[]), no);

        let v = be.set(d, 4.0);
        let mut out = [0.0f32; 1];
        assert_eq!(be.compress_blended_store(v, no, &mut out), 0);
        assert_eq!(out, [0.0]);
        assert_eq!(be.compress_store(v, yes, &mut out), 1);
        assert_eq!(out, [4.0]);
    }

    #[test]
    fn test_blended_store_writes_only_true_lane() {
        let be = ScalarBackend;
        let d = Tag::<u64, 1>::new();
        let v = be.set(d, 5);
        let mut dst = [1u64, 2];
        be.blended_store(v, be.first_n(d, 0), &mut dst);
        assert_eq!(dst, [1, 2]);
        be.blended_store(v, be.first_n(d, 1), &mut dst);
        assert_eq!(dst, [5, 2]);
        be.blended_store(v, be.first_n(d, 1), &mut []);
    }

    #[test]
    fn test_single_lane_width_changes_and_gather() {
        let be = ScalarBackend;
        let d = Tag::<i8, 1>::new();
        let w = be.promote_to(Tag::<i16, 1>::new(), be.set(d, -3));
        assert_eq!(w.to_array(), [-3]);
        let n = be.demote_to(d, be.set(Tag::<i16, 1>::new(), -1000));
        assert_eq!(n.to_array(), [i8::MIN]);

        let df = Tag::<f32, 1>::new();
        let table = [0.5f32, 1.5, 2.5];
        let idx = be.set(Tag::<i32, 1>::new(), 2);
        assert_eq!(be.gather_index(df, &table, idx).to_array(), [2.5]);
        assert_eq!(be.masked_gather_index(be.first_n(df, 0), df, &table, idx).to_array(), [0.0]);

        let mut out = [0.0f32; 3];
        be.scatter_index(be.set(df, 9.0), df, &mut out, idx);
        assert_eq!(out, [0.0, 0.0, 9.0]);
    }
}
