//! Native lane-loop overrides for the emulated backend

use std::array;

use num_traits::PrimInt;

use super::{bits_map, map, mask_where, zip_map, Emu128Backend};
use crate::lane::{
    FloatLane, IntLane, Lane, Narrow, SignedIntLane, SignedLane, UnsignedLane, Widen,
};
use crate::primitives::generic::is_float;
use crate::primitives::{Ops, Primitives};
use crate::tag::Tag;
use crate::tuple::{Vec2, Vec3, Vec4};
use crate::vector::{Indices, Mask, Vector};

#[inline(always)]
fn msb_bits<T: Lane>() -> T::Unsigned {
    <T::Unsigned as Lane>::ONE.lane_shl(<T::Unsigned as IntLane>::BITS - 1)
}

#[inline(always)]
fn negate_lane<T: Lane>(x: T) -> T {
    if is_float::<T>() {
        T::from_bits(x.to_bits() ^ msb_bits::<T>())
    } else {
        T::ZERO.lane_sub(x)
    }
}

#[inline(always)]
fn lookup<T: Lane, const N: usize>(v: &Vector<T, N>, idx: impl Fn(usize) -> usize) -> Vector<T, N> {
    Vector::from_array(array::from_fn(|i| v.raw[idx(i)]))
}

#[inline(always)]
fn index<T: Lane>(word: T::Unsigned) -> usize {
    word.bits_u64() as usize
}

/// Negative indices map past any slice
#[inline(always)]
fn slot<I: IntLane>(i: I) -> usize {
    i.to_usize().unwrap_or(usize::MAX)
}

#[inline(always)]
fn mask_words<T: Lane, const N: usize>(
    a: Mask<T, N>,
    b: Mask<T, N>,
    f: impl Fn(T::Unsigned, T::Unsigned) -> T::Unsigned,
) -> Mask<T, N> {
    Mask::from_words(array::from_fn(|i| f(a.bits[i], b.bits[i])))
}

/// Butterfly on lane arrays, same pairing as the generic reduction
#[inline(always)]
fn butterfly<T: Lane, const N: usize>(v: Vector<T, N>, op: impl Fn(T, T) -> T) -> Vector<T, N> {
    let mut lanes = v.raw;
    let mut k = 1;
    while k < N {
        lanes = array::from_fn(|i| op(lanes[i], lanes[i ^ k]));
        k <<= 1;
    }
    Vector::from_array(lanes)
}

#[inline(always)]
fn mask_bits<T: Lane, const N: usize>(m: &Mask<T, N>) -> u64 {
    (0..N).filter(|&i| m.is_set(i)).fold(0, |bits, i| bits | (1 << i))
}

/// Output block `out` of an interleaved store; `src` maps a flat position to (part, lane)
#[inline(always)]
fn pick_lanes<T: Lane, const N: usize>(
    parts: &[Vector<T, N>],
    out: usize,
    src: impl Fn(usize) -> (usize, usize),
) -> Vector<T, N> {
    Vector::from_array(array::from_fn(|i| {
        let (part, lane) = src(out * N + i);
        parts[part].raw[lane]
    }))
}

impl Ops for Emu128Backend {
    #[inline(always)]
    fn iota<T: Lane, const N: usize>(&self, _d: Tag<T, N>, first: T) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| first.offset(i)))
    }

    #[inline(always)]
    fn first_n<T: Lane, const N: usize>(&self, _d: Tag<T, N>, n: usize) -> Mask<T, N> {
        mask_where(|i| i < n)
    }

    // ------------------------------ Logical

    #[inline(always)]
    fn not<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, |x| T::from_bits(!x.to_bits()))
    }

    #[inline(always)]
    fn xor3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        bits_map(bits_map(a, b, |x, y| x ^ y), c, |x, y| x ^ y)
    }

    #[inline(always)]
    fn or3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        bits_map(bits_map(a, b, |x, y| x | y), c, |x, y| x | y)
    }

    #[inline(always)]
    fn or_and<T: Lane, const N: usize>(
        &self,
        o: Vector<T, N>,
        a1: Vector<T, N>,
        a2: Vector<T, N>,
    ) -> Vector<T, N> {
        bits_map(o, bits_map(a1, a2, |x, y| x & y), |x, y| x | y)
    }

    #[inline(always)]
    fn if_vec_then_else<T: Lane, const N: usize>(
        &self,
        mask: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| {
            let m = mask.raw[i].to_bits();
            T::from_bits((m & yes.raw[i].to_bits()) | (!m & no.raw[i].to_bits()))
        }))
    }

    // ------------------------------ Selection

    #[inline(always)]
    fn if_then_else<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| if m.is_set(i) { yes.raw[i] } else { no.raw[i] }))
    }

    #[inline(always)]
    fn if_then_else_zero<T: Lane, const N: usize>(&self, m: Mask<T, N>, yes: Vector<T, N>)
        -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| if m.is_set(i) { yes.raw[i] } else { T::ZERO }))
    }

    #[inline(always)]
    fn if_then_zero_else<T: Lane, const N: usize>(&self, m: Mask<T, N>, no: Vector<T, N>)
        -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| if m.is_set(i) { T::ZERO } else { no.raw[i] }))
    }

    #[inline(always)]
    fn if_negative_then_else<T: SignedLane, const N: usize>(
        &self,
        v: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        let msb = msb_bits::<T>();
        Vector::from_array(array::from_fn(|i| {
            if v.raw[i].to_bits() & msb != <T::Unsigned as Lane>::ZERO {
                yes.raw[i]
            } else {
                no.raw[i]
            }
        }))
    }

    #[inline(always)]
    fn mask_not<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        Mask::from_words(m.bits.map(|w| !w))
    }

    #[inline(always)]
    fn mask_and<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        mask_words(a, b, |x, y| x & y)
    }

    #[inline(always)]
    fn mask_or<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        mask_words(a, b, |x, y| x | y)
    }

    #[inline(always)]
    fn mask_xor<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        mask_words(a, b, |x, y| x ^ y)
    }

    #[inline(always)]
    fn mask_and_not<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        mask_words(a, b, |x, y| !x & y)
    }

    #[inline(always)]
    fn exclusive_neither<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>)
        -> Mask<T, N> {
        mask_words(a, b, |x, y| !(x | y))
    }

    // ------------------------------ Arithmetic

    #[inline(always)]
    fn neg<T: SignedLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_neg)
    }

    #[inline(always)]
    fn abs<T: SignedLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_abs)
    }

    #[inline(always)]
    fn abs_diff<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        zip_map(a, b, |x, y| {
            if is_float::<T>() {
                T::from_bits(x.lane_sub(y).to_bits() & !msb_bits::<T>())
            } else {
                x.lane_max(y).lane_sub(x.lane_min(y))
            }
        })
    }

    #[inline(always)]
    fn sums_of8_abs_diff<const N: usize, const M: usize>(
        &self,
        _d64: Tag<u64, M>,
        a: Vector<u8, N>,
        b: Vector<u8, N>,
    ) -> Vector<u64, M> {
        const { assert!(N == 8 * M, "eight bytes per u64 lane") }
        Vector::from_array(array::from_fn(|i| {
            (8 * i..8 * i + 8).map(|j| u64::from(a.raw[j].abs_diff(b.raw[j]))).sum()
        }))
    }

    #[inline(always)]
    fn mul_add<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        add: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| mul.raw[i].lane_mul(x.raw[i]).lane_add(add.raw[i])))
    }

    #[inline(always)]
    fn neg_mul_add<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        add: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| add.raw[i].lane_sub(mul.raw[i].lane_mul(x.raw[i]))))
    }

    #[inline(always)]
    fn mul_sub<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        sub: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| mul.raw[i].lane_mul(x.raw[i]).lane_sub(sub.raw[i])))
    }

    #[inline(always)]
    fn neg_mul_sub<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        sub: Vector<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| {
            negate_lane(mul.raw[i].lane_mul(x.raw[i])).lane_sub(sub.raw[i])
        }))
    }

    #[inline(always)]
    fn saturated_add<T: IntLane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        zip_map(a, b, T::lane_saturated_add)
    }

    #[inline(always)]
    fn saturated_sub<T: IntLane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        zip_map(a, b, T::lane_saturated_sub)
    }

    #[inline(always)]
    fn average_round<T: UnsignedLane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T, N> {
        zip_map(a, b, T::lane_average_round)
    }

    // ------------------------------ Shifts

    #[inline(always)]
    fn shift_left<const K: u32, T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(K < T::BITS, "shift count exceeds lane width") }
        map(v, |x| x.lane_shl(K))
    }

    #[inline(always)]
    fn shift_right<const K: u32, T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(K < T::BITS, "shift count exceeds lane width") }
        map(v, |x| x.lane_shr(K))
    }

    #[inline(always)]
    fn rotate_right<const K: u32, T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(K < T::BITS, "rotate count exceeds lane width") }
        map(v, |x| T::from_bits(x.to_bits().rotate_right(K)))
    }

    #[inline(always)]
    fn shift_left_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        map(v, |x| x.lane_shl(bits))
    }

    #[inline(always)]
    fn shift_right_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        map(v, |x| x.lane_shr(bits))
    }

    #[inline(always)]
    fn broadcast_sign_bit<T: SignedIntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        map(v, |x| x.lane_shr(T::BITS - 1))
    }

    // ------------------------------ Compare

    #[inline(always)]
    fn ne<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] != b.raw[i])
    }

    #[inline(always)]
    fn gt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] > b.raw[i])
    }

    #[inline(always)]
    fn le<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] <= b.raw[i])
    }

    #[inline(always)]
    fn ge<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] >= b.raw[i])
    }

    // ------------------------------ Rounding and classification

    #[inline(always)]
    fn round<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_round)
    }

    #[inline(always)]
    fn trunc<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_trunc)
    }

    #[inline(always)]
    fn ceil<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_ceil)
    }

    #[inline(always)]
    fn floor<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_floor)
    }

    #[inline(always)]
    fn nearest_int<T: FloatLane, const N: usize>(
        &self,
        _d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N> {
        Vector::from_array(v.raw.map(|x| x.lane_round().to_int_saturating()))
    }

    #[inline(always)]
    fn is_nan<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| v.raw[i].is_nan())
    }

    #[inline(always)]
    fn is_inf<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| v.raw[i].is_infinite())
    }

    #[inline(always)]
    fn is_finite<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| v.raw[i].is_finite())
    }

    // ------------------------------ Memory

    #[inline(always)]
    fn load_n<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T], max_lanes: usize)
        -> Vector<T, N> {
        let n = max_lanes.min(N).min(src.len());
        let mut raw = [T::ZERO; N];
        raw[..n].copy_from_slice(&src[..n]);
        Vector::from_array(raw)
    }

    #[inline(always)]
    fn load_n_or<T: Lane, const N: usize>(
        &self,
        no: Vector<T, N>,
        _d: Tag<T, N>,
        src: &[T],
        max_lanes: usize,
    ) -> Vector<T, N> {
        let n = max_lanes.min(N).min(src.len());
        let mut raw = no.raw;
        raw[..n].copy_from_slice(&src[..n]);
        Vector::from_array(raw)
    }

    #[inline(always)]
    fn store_n<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T], max_lanes: usize) {
        let n = max_lanes.min(N).min(dst.len());
        dst[..n].copy_from_slice(&v.raw[..n]);
    }

    #[inline(always)]
    fn blended_store<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>, dst: &mut [T]) {
        for (i, slot) in dst.iter_mut().take(N).enumerate() {
            if m.is_set(i) {
                *slot = v.raw[i];
            }
        }
    }

    fn gather_index<T: Lane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        base: &[T],
        index: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| base[slot(index.raw[i])]))
    }

    fn masked_gather_index<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        _d: Tag<T, N>,
        base: &[T],
        index: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| {
            if m.is_set(i) { base[slot(index.raw[i])] } else { T::ZERO }
        }))
    }

    fn scatter_index<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        _d: Tag<T, N>,
        base: &mut [T],
        index: Vector<T::Signed, N>,
    ) {
        for (&lane, &i) in v.raw.iter().zip(&index.raw) {
            base[slot(i)] = lane;
        }
    }

    fn masked_scatter_index<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        _d: Tag<T, N>,
        base: &mut [T],
        index: Vector<T::Signed, N>,
    ) {
        for i in (0..N).filter(|&i| m.is_set(i)) {
            base[slot(index.raw[i])] = v.raw[i];
        }
    }

    // ------------------------------ Lane access

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

    // ------------------------------ Permutation

    #[inline(always)]
    fn broadcast<const LANE: usize, T: Lane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        const { assert!(LANE < N, "broadcast lane out of range") }
        Vector::splat(v.raw[LANE])
    }

    #[inline(always)]
    fn table_lookup_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, idx: Indices<T, N>)
        -> Vector<T, N> {
        lookup(&v, |i| index::<T>(idx.raw[i]) & (N - 1))
    }

    #[inline(always)]
    fn two_tables_lookup_lanes<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        idx: Indices<T, N>,
    ) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| {
            let j = index::<T>(idx.raw[i]) & (2 * N - 1);
            if j < N { a.raw[j] } else { b.raw[j - N] }
        }))
    }

    #[inline(always)]
    fn reverse<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        lookup(&v, |i| N - 1 - i)
    }

    #[inline(always)]
    fn reverse2<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        assert!(N >= 2, "reverse2 needs at least 2 lanes");
        lookup(&v, |i| i ^ 1)
    }

    #[inline(always)]
    fn reverse4<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        assert!(N >= 4, "reverse4 needs at least 4 lanes");
        lookup(&v, |i| i ^ 3)
    }

    #[inline(always)]
    fn reverse8<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        assert!(N >= 8, "reverse8 needs at least 8 lanes");
        lookup(&v, |i| i ^ 7)
    }

    #[inline(always)]
    fn reverse_lane_bytes<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::swap_bytes)
    }

    #[inline(always)]
    fn reverse_bits<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::reverse_bits)
    }

    #[inline(always)]
    fn interleave_lower<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        if N == 1 {
            return a;
        }
        Vector::from_array(array::from_fn(|i| if i % 2 == 0 { a.raw[i / 2] } else { b.raw[i / 2] }))
    }

    #[inline(always)]
    fn interleave_upper<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        assert!(N >= 2, "interleave_upper needs at least 2 lanes");
        let half = N / 2;
        Vector::from_array(array::from_fn(|i| {
            if i % 2 == 0 { a.raw[half + i / 2] } else { b.raw[half + i / 2] }
        }))
    }

    #[inline(always)]
    fn odd_even<T: Lane, const N: usize>(&self, odd: Vector<T, N>, even: Vector<T, N>)
        -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| if i % 2 == 1 { odd.raw[i] } else { even.raw[i] }))
    }

    #[inline(always)]
    fn dup_even<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        lookup(&v, |i| i & !1)
    }

    #[inline(always)]
    fn dup_odd<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        lookup(&v, |i| (i | 1) & (N - 1))
    }

    #[inline(always)]
    fn concat_even<T: Lane, const N: usize>(&self, hi: Vector<T, N>, lo: Vector<T, N>)
        -> Vector<T, N> {
        assert!(N >= 2, "concat_even needs at least 2 lanes");
        let half = N / 2;
        Vector::from_array(array::from_fn(|i| {
            if i < half { lo.raw[2 * i] } else { hi.raw[2 * (i - half)] }
        }))
    }

    #[inline(always)]
    fn concat_odd<T: Lane, const N: usize>(&self, hi: Vector<T, N>, lo: Vector<T, N>)
        -> Vector<T, N> {
        assert!(N >= 2, "concat_odd needs at least 2 lanes");
        let half = N / 2;
        Vector::from_array(array::from_fn(|i| {
            if i < half { lo.raw[2 * i + 1] } else { hi.raw[2 * (i - half) + 1] }
        }))
    }

    #[inline(always)]
    fn lower_half<T: Lane, const N: usize, const H: usize>(
        &self,
        _dh: Tag<T, H>,
        v: Vector<T, N>,
    ) -> Vector<T, H> {
        const { assert!(2 * H == N, "half tag must have half the lanes") }
        Vector::from_array(array::from_fn(|i| v.raw[i]))
    }

    #[inline(always)]
    fn upper_half<T: Lane, const N: usize, const H: usize>(
        &self,
        _dh: Tag<T, H>,
        v: Vector<T, N>,
    ) -> Vector<T, H> {
        const { assert!(2 * H == N, "half tag must have half the lanes") }
        Vector::from_array(array::from_fn(|i| v.raw[H + i]))
    }

    #[inline(always)]
    fn combine<T: Lane, const N: usize, const H: usize>(
        &self,
        _d: Tag<T, N>,
        hi: Vector<T, H>,
        lo: Vector<T, H>,
    ) -> Vector<T, N> {
        const { assert!(2 * H == N, "halves must have half the lanes") }
        Vector::from_array(array::from_fn(|i| if i < H { lo.raw[i] } else { hi.raw[i - H] }))
    }

    #[inline(always)]
    fn slide_up_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize) -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| if i >= amt { v.raw[i - amt] } else { T::ZERO }))
    }

    #[inline(always)]
    fn slide_down_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize)
        -> Vector<T, N> {
        Vector::from_array(array::from_fn(|i| {
            if amt < N && i + amt < N { v.raw[i + amt] } else { T::ZERO }
        }))
    }

    #[inline(always)]
    fn slide1_up<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>) -> Vector<T, N> {
        self.slide_up_lanes(v, 1)
    }

    #[inline(always)]
    fn slide1_down<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        self.slide_down_lanes(v, 1)
    }

    #[inline(always)]
    fn combine_shift_right_lanes<const K: usize, T: Lane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        hi: Vector<T, N>,
        lo: Vector<T, N>,
    ) -> Vector<T, N> {
        const { assert!(K < N, "shift must be below the lane count") }
        Vector::from_array(array::from_fn(|i| {
            if i + K < N { lo.raw[i + K] } else { hi.raw[i + K - N] }
        }))
    }

    // ------------------------------ Promotion and demotion

    #[inline(always)]
    fn promote_to<T: Widen, const N: usize>(
        &self,
        _dw: Tag<T::Wide, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, N> {
        Vector::from_array(v.raw.map(T::lane_promote))
    }

    #[inline(always)]
    fn promote_lower_to<T: Widen, const N: usize, const H: usize>(
        &self,
        _dw: Tag<T::Wide, H>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, H> {
        const { assert!(2 * H == N, "half tag must have half the lanes") }
        Vector::from_array(array::from_fn(|i| v.raw[i].lane_promote()))
    }

    #[inline(always)]
    fn promote_upper_to<T: Widen, const N: usize, const H: usize>(
        &self,
        _dw: Tag<T::Wide, H>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, H> {
        const { assert!(2 * H == N, "half tag must have half the lanes") }
        Vector::from_array(array::from_fn(|i| v.raw[H + i].lane_promote()))
    }

    #[inline(always)]
    fn demote_to<T: Narrow, const N: usize>(
        &self,
        _dn: Tag<T::Narrow, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Narrow, N> {
        Vector::from_array(v.raw.map(T::lane_demote))
    }

    #[inline(always)]
    fn ordered_demote2_to<T: Narrow, const N: usize, const M: usize>(
        &self,
        _dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        const { assert!(M == 2 * N, "demoted pair fills one vector") }
        Vector::from_array(array::from_fn(|i| {
            if i < N { a.raw[i].lane_demote() } else { b.raw[i - N].lane_demote() }
        }))
    }

    #[inline(always)]
    fn ordered_truncate2_to<T: UnsignedLane + Narrow, const N: usize, const M: usize>(
        &self,
        _dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        const { assert!(M == 2 * N, "truncated pair fills one vector") }
        Vector::from_array(array::from_fn(|i| {
            if i < N { a.raw[i].lane_truncate() } else { b.raw[i - N].lane_truncate() }
        }))
    }

    // ------------------------------ Compress and expand

    fn compress<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>) -> Vector<T, N> {
        let mut raw = [T::ZERO; N];
        let kept = (0..N).filter(|&i| m.is_set(i));
        let dropped = (0..N).filter(|&i| !m.is_set(i));
        for (slot, i) in raw.iter_mut().zip(kept.chain(dropped)) {
            *slot = v.raw[i];
        }
        Vector::from_array(raw)
    }

    fn compress_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        self.store_n(self.compress(v, m), dst, N);
        self.count_true(m)
    }

    fn compress_blended_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        let mut count = 0;
        for i in (0..N).filter(|&i| m.is_set(i)) {
            if let Some(slot) = dst.get_mut(count) {
                *slot = v.raw[i];
            }
            count += 1;
        }
        count
    }

    fn expand<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>) -> Vector<T, N> {
        let mut raw = [T::ZERO; N];
        let mut next = 0;
        for (i, slot) in raw.iter_mut().enumerate() {
            if m.is_set(i) {
                *slot = v.raw[next];
                next += 1;
            }
        }
        Vector::from_array(raw)
    }

    fn load_expand<T: Lane, const N: usize>(&self, m: Mask<T, N>, _d: Tag<T, N>, src: &[T])
        -> Vector<T, N> {
        let mut raw = [T::ZERO; N];
        let mut next = 0;
        for (i, slot) in raw.iter_mut().enumerate() {
            if m.is_set(i) {
                if let Some(&x) = src.get(next) {
                    *slot = x;
                }
                next += 1;
            }
        }
        Vector::from_array(raw)
    }

    // ------------------------------ Interleaved memory

    fn load_interleaved2<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T]) -> Vec2<T, N> {
        let src = &src[..2 * N];
        Vec2::new(
            Vector::from_array(array::from_fn(|i| src[2 * i])),
            Vector::from_array(array::from_fn(|i| src[2 * i + 1])),
        )
    }

    fn load_interleaved3<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T]) -> Vec3<T, N> {
        let src = &src[..3 * N];
        Vec3::new(
            Vector::from_array(array::from_fn(|i| src[3 * i])),
            Vector::from_array(array::from_fn(|i| src[3 * i + 1])),
            Vector::from_array(array::from_fn(|i| src[3 * i + 2])),
        )
    }

    fn load_interleaved4<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T]) -> Vec4<T, N> {
        let src = &src[..4 * N];
        Vec4::new(
            Vector::from_array(array::from_fn(|i| src[4 * i])),
            Vector::from_array(array::from_fn(|i| src[4 * i + 1])),
            Vector::from_array(array::from_fn(|i| src[4 * i + 2])),
            Vector::from_array(array::from_fn(|i| src[4 * i + 3])),
        )
    }

    fn store_interleaved2<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        dst: &mut [T],
    ) {
        let parts = [v0, v1];
        for out in 0..2 {
            let v = pick_lanes(&parts, out, |p| (p % 2, p / 2));
            dst[out * N..(out + 1) * N].copy_from_slice(&v.raw);
        }
    }

    fn store_interleaved3<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        v2: Vector<T, N>,
        dst: &mut [T],
    ) {
        let parts = [v0, v1, v2];
        for out in 0..3 {
            let v = pick_lanes(&parts, out, |p| (p % 3, p / 3));
            dst[out * N..(out + 1) * N].copy_from_slice(&v.raw);
        }
    }

    fn store_interleaved4<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        v2: Vector<T, N>,
        v3: Vector<T, N>,
        dst: &mut [T],
    ) {
        let parts = [v0, v1, v2, v3];
        for out in 0..4 {
            let v = pick_lanes(&parts, out, |p| (p % 4, p / 4));
            dst[out * N..(out + 1) * N].copy_from_slice(&v.raw);
        }
    }

    // ------------------------------ Bit counting

    #[inline(always)]
    fn population_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, |x| T::truncate_from(u64::from(x.count_ones())))
    }

    #[inline(always)]
    fn leading_zero_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, |x| T::truncate_from(u64::from(x.leading_zeros())))
    }

    #[inline(always)]
    fn trailing_zero_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, |x| T::truncate_from(u64::from(x.trailing_zeros())))
    }

    #[inline(always)]
    fn highest_set_bit_index<T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        map(v, |x| {
            let top = u64::from(T::BITS - 1);
            T::truncate_from(top.wrapping_sub(u64::from(x.leading_zeros())))
        })
    }

    // ------------------------------ Reductions

    #[inline(always)]
    fn sum_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        butterfly(v, T::lane_add)
    }

    #[inline(always)]
    fn min_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        butterfly(v, T::lane_min)
    }

    #[inline(always)]
    fn max_of_lanes<T: Lane, const N: usize>(&self, _d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        butterfly(v, T::lane_max)
    }

    // ------------------------------ Mask bits

    #[inline(always)]
    fn bits_from_mask<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> u64 {
        mask_bits(&m)
    }

    fn store_mask_bits<T: Lane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        m: Mask<T, N>,
        dst: &mut [u8],
    ) -> usize {
        let bits = mask_bits(&m);
        let num_bytes = N.div_ceil(8).min(dst.len());
        for (i, byte) in dst[..num_bytes].iter_mut().enumerate() {
            *byte = (bits >> (8 * i)) as u8;
        }
        num_bytes
    }

    fn load_mask_bits<T: Lane, const N: usize>(&self, _d: Tag<T, N>, bits: &[u8]) -> Mask<T, N> {
        mask_where(|i| bits.get(i / 8).is_some_and(|b| (b >> (i % 8)) & 1 == 1))
    }

    #[inline(always)]
    fn count_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        (0..N).filter(|&i| m.is_set(i)).count()
    }

    #[inline(always)]
    fn find_first_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        (0..N).find(|&i| m.is_set(i))
    }

    #[inline(always)]
    fn find_last_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        (0..N).rev().find(|&i| m.is_set(i))
    }

    #[inline(always)]
    fn all_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        (0..N).all(|i| m.is_set(i))
    }

    #[inline(always)]
    fn all_false<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        !(0..N).any(|i| m.is_set(i))
    }

    fn set_before_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        let first = self.find_first_true(m).unwrap_or(N);
        mask_where(|i| i < first)
    }

    fn set_at_or_before_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        let first = self.find_first_true(m).unwrap_or(N);
        mask_where(|i| i <= first)
    }

    fn set_only_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        let first = self.find_first_true(m);
        mask_where(|i| Some(i) == first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::generic;

    #[test]
    fn test_compress_partition() {
        let be = Emu128Backend;
        let v = Vector::<u32, 4>::from_array([10, 20, 30, 40]);
        let m = Mask::from_bools([false, true, false, true]);
        assert_eq!(be.compress(v, m).to_array(), [20, 40, 10, 30]);
        assert_eq!(generic::compress(&be, v, m).to_array(), [20, 40, 10, 30]);
        assert!(be.compress_is_partition::<u32>());

        let mut out = [0u32; 4];
        assert_eq!(be.compress_blended_store(v, m, &mut out), 2);
        assert_eq!(out, [20, 40, 0, 0]);
    }

    #[test]
    fn test_expand_round_trip() {
        let be = Emu128Backend;
        let v = Vector::<i16, 8>::from_array([1, 2, 3, 4, 5, 6, 7, 8]);
        let m = Mask::from_bools([true, false, false, true, true, false, true, false]);
        let e = be.expand(v, m);
        assert_eq!(e.to_array(), [1, 0, 0, 2, 3, 0, 4, 0]);
        assert_eq!(generic::expand(&be, v, m), e);
        assert_eq!(be.load_expand(m, v.tag(), &[1, 2, 3, 4]), e);
    }

    #[test]
    fn test_interleaved_matches_generic() {
        let be = Emu128Backend;
        let d = Tag::<u8, 8>::new();
        let src: Vec<u8> = (0..32).collect();
        assert_eq!(be.load_interleaved3(d, &src), generic::load_interleaved3(&be, d, &src));
        assert_eq!(be.load_interleaved4(d, &src), generic::load_interleaved4(&be, d, &src));

        let parts = be.load_interleaved2(d, &src);
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        be.store_interleaved2(parts.get::<0>(), parts.get::<1>(), &mut a);
        generic::store_interleaved2(&be, parts.get::<0>(), parts.get::<1>(), &mut b);
        assert_eq!(a, b);
        assert_eq!(&a[..], &src[..16]);
    }

    #[test]
    fn test_bit_counts() {
        let be = Emu128Backend;
        let v = Vector::<u16, 8>::from_array([0, 1, 0x8000, 0xFFFF, 0x00F0, 3, 0x1000, 2]);
        assert_eq!(be.population_count(v).to_array(), [0, 1, 1, 16, 4, 2, 1, 1]);
        assert_eq!(be.leading_zero_count(v).to_array(), [16, 15, 0, 0, 8, 14, 3, 14]);
        assert_eq!(be.trailing_zero_count(v).to_array(), [16, 0, 15, 0, 4, 0, 12, 1]);
        assert_eq!(be.highest_set_bit_index(v).to_array(), [0xFFFF, 0, 15, 15, 7, 1, 12, 1]);
        assert_eq!(generic::population_count(&be, v), be.population_count(v));
        assert_eq!(generic::leading_zero_count(&be, v), be.leading_zero_count(v));
        assert_eq!(generic::trailing_zero_count(&be, v), be.trailing_zero_count(v));
    }

    #[test]
    fn test_width_changes_match_generic() {
        let be = Emu128Backend;
        let v = Vector::<u8, 16>::from_array(std::array::from_fn(|i| (i * 17) as u8));
        let dw = Tag::<u16, 8>::new();
        assert_eq!(be.promote_lower_to(dw, v), generic::promote_lower_to(&be, dw, v));
        assert_eq!(be.promote_upper_to(dw, v).to_array()[0], 136);

        let w = Vector::<i32, 4>::from_array([70_000, -70_000, -1, 40]);
        let dn = Tag::<i16, 8>::new();
        let pair = be.ordered_demote2_to(dn, w, be.neg(w));
        assert_eq!(pair.to_array(), [i16::MAX, i16::MIN, -1, 40, i16::MIN, i16::MAX, 1, -40]);
        assert_eq!(pair, generic::ordered_demote2_to(&be, dn, w, be.neg(w)));

        let u = Vector::<u32, 4>::from_array([0x1_0002, 3, 0xFFFF_0004, 5]);
        let du = Tag::<u16, 8>::new();
        let t = be.ordered_truncate2_to(du, u, u);
        assert_eq!(t.to_array(), [2, 3, 4, 5, 2, 3, 4, 5]);
        assert_eq!(t, generic::ordered_truncate2_to(&be, du, u, u));
    }

    #[test]
    fn test_gather_scatter() {
        let be = Emu128Backend;
        let d = Tag::<u32, 4>::new();
        let table: Vec<u32> = (100..110).collect();
        let idx = Vector::<i32, 4>::from_array([9, 0, 3, 3]);
        let g = be.gather_index(d, &table, idx);
        assert_eq!(g.to_array(), [109, 100, 103, 103]);
        assert_eq!(g, generic::gather_index(&be, d, &table, idx));

        let m = Mask::from_bools([true, false, false, true]);
        assert_eq!(be.masked_gather_index(m, d, &table, idx).to_array(), [109, 0, 0, 103]);

        let v = Vector::<u32, 4>::from_array([1, 2, 3, 4]);
        let mut out = [0u32; 10];
        be.scatter_index(v, d, &mut out, idx);
        assert_eq!((out[9], out[0], out[3]), (1, 2, 4));
        let mut masked = [0u32; 10];
        be.masked_scatter_index(v, m, d, &mut masked, idx);
        let mut via_generic = [0u32; 10];
        generic::masked_scatter_index(&be, v, m, d, &mut via_generic, idx);
        assert_eq!(masked, via_generic);
        assert_eq!(masked[3], 4);
        assert_eq!(masked.iter().filter(|&&x| x != 0).count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_negative_gather_index_panics() {
        let be = Emu128Backend;
        let idx = Vector::<i32, 4>::from_array([0, -1, 0, 0]);
        let _ = be.gather_index(Tag::<f32, 4>::new(), &[1.0; 8], idx);
    }

    #[test]
    fn test_slides_and_abs_diff_sums() {
        let be = Emu128Backend;
        let d = Tag::<i16, 8>::new();
        let v = be.iota(d, 1);
        assert_eq!(be.slide1_up(d, v).to_array(), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(be.slide1_down(d, v).to_array(), [2, 3, 4, 5, 6, 7, 8, 0]);
        let hi = be.iota(d, 11);
        let shifted = be.combine_shift_right_lanes::<3, _, 8>(d, hi, v);
        assert_eq!(shifted.to_array(), [4, 5, 6, 7, 8, 11, 12, 13]);
        assert_eq!(shifted, generic::combine_shift_right_lanes::<3, _, _, 8>(&be, d, hi, v));

        let a: Vector<u8, 16> =
            Vector::from_array(std::array::from_fn(|i| if i < 8 { 255 } else { i as u8 }));
        let b = Vector::<u8, 16>::splat(0);
        let d64 = Tag::<u64, 2>::new();
        let sums = be.sums_of8_abs_diff(d64, a, b);
        assert_eq!(sums.to_array(), [8 * 255, 8 + 9 + 10 + 11 + 12 + 13 + 14 + 15]);
        assert_eq!(sums, generic::sums_of8_abs_diff(&be, d64, a, b));
    }
}
