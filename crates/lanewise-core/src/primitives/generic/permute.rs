use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Indices, Vector};

use super::{byte_vector, lane_indices, lane_mask};

pub fn broadcast<const LANE: usize, B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
) -> Vector<T, N> {
    const { assert!(LANE < N, "broadcast lane out of range") }
    be.set(v.tag(), be.extract_lane(v, LANE))
}

pub fn indices_from_vec<B: Ops, T: Lane, I: IntLane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    v: Vector<I, N>,
) -> Indices<T, N> {
    let du = d.to_unsigned();
    let mut words = [<T::Unsigned as Lane>::ZERO; N];
    be.store_u(be.bit_cast(du, v), &mut words);
    Indices::from_words(words)
}

/// Panics if `idx` holds fewer than `N` entries
pub fn set_table_indices<B: Ops, T: Lane, const N: usize>(
    _be: &B,
    _d: Tag<T, N>,
    idx: &[usize],
) -> Indices<T, N> {
    assert!(idx.len() >= N, "need {N} table indices, got {}", idx.len());
    lane_indices(|i| idx[i])
}

pub fn table_lookup_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    idx: Indices<T, N>,
) -> Vector<T, N> {
    let d = v.tag();
    let du = d.to_unsigned();
    let size = std::mem::size_of::<T>();
    let lane = be.and(
        be.load_u(du, &idx.raw),
        be.set(du, <T::Unsigned as IntLane>::truncate_from(N as u64 - 1)),
    );
    if size == 1 {
        return be.bit_cast(d, be.table_lookup_bytes(v, lane));
    }
    // byte offset of each lane's first byte, copied to all of its bytes, plus 0..size
    let first = be.mul(lane, be.set(du, <T::Unsigned as IntLane>::truncate_from(size as u64)));
    let spread: Vector<T::Unsigned, N> = byte_vector(|j| ((j / size) * size) as u8);
    let within: Vector<T::Unsigned, N> = byte_vector(|j| (j % size) as u8);
    let byte_idx = be.add(be.table_lookup_bytes(first, spread), within);
    be.bit_cast(d, be.table_lookup_bytes(v, byte_idx))
}

pub fn two_tables_lookup_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
    idx: Indices<T, N>,
) -> Vector<T, N> {
    let d = a.tag();
    let du = d.to_unsigned();
    let wrapped = be.and(
        be.load_u(du, &idx.raw),
        be.set(du, <T::Unsigned as IntLane>::truncate_from(2 * N as u64 - 1)),
    );
    let in_a = be.lt(wrapped, be.set(du, <T::Unsigned as IntLane>::truncate_from(N as u64)));
    let from_a = be.table_lookup_lanes(a, idx);
    let from_b = be.table_lookup_lanes(b, idx);
    be.if_then_else(be.rebind_mask(d, in_a), from_a, from_b)
}

pub fn reverse<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    be.table_lookup_lanes(v, lane_indices(|i| N - 1 - i))
}

pub fn reverse2<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    assert!(N >= 2, "reverse2 needs at least 2 lanes");
    be.table_lookup_lanes(v, lane_indices(|i| i ^ 1))
}

pub fn reverse4<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    assert!(N >= 4, "reverse4 needs at least 4 lanes");
    be.table_lookup_lanes(v, lane_indices(|i| i ^ 3))
}

pub fn reverse8<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    assert!(N >= 8, "reverse8 needs at least 8 lanes");
    be.table_lookup_lanes(v, lane_indices(|i| i ^ 7))
}

pub fn interleave_lower<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    if N == 1 {
        return a;
    }
    let idx = lane_indices(|i| if i % 2 == 0 { i / 2 } else { N + i / 2 });
    be.two_tables_lookup_lanes(a, b, idx)
}

pub fn interleave_upper<B: Ops, T: Lane, const N: usize>(
    be: &B,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<T, N> {
    assert!(N >= 2, "interleave_upper needs at least 2 lanes");
    let half = N / 2;
    let idx = lane_indices(|i| if i % 2 == 0 { half + i / 2 } else { N + half + i / 2 });
    be.two_tables_lookup_lanes(a, b, idx)
}

pub fn zip_lower<B: Ops, T: Lane, W: Lane, const N: usize, const M: usize>(
    be: &B,
    dw: Tag<W, M>,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<W, M> {
    const { assert!(std::mem::size_of::<W>() == 2 * std::mem::size_of::<T>()) }
    be.bit_cast(dw, be.interleave_lower(a, b))
}

pub fn zip_upper<B: Ops, T: Lane, W: Lane, const N: usize, const M: usize>(
    be: &B,
    dw: Tag<W, M>,
    a: Vector<T, N>,
    b: Vector<T, N>,
) -> Vector<W, M> {
    const { assert!(std::mem::size_of::<W>() == 2 * std::mem::size_of::<T>()) }
    be.bit_cast(dw, be.interleave_upper(a, b))
}

pub fn odd_even<B: Ops, T: Lane, const N: usize>(
    be: &B,
    odd: Vector<T, N>,
    even: Vector<T, N>,
) -> Vector<T, N> {
    be.if_then_else(lane_mask(|i| i % 2 == 1), odd, even)
}

pub fn dup_even<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    be.table_lookup_lanes(v, lane_indices(|i| i & !1))
}

pub fn dup_odd<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> Vector<T, N> {
    be.table_lookup_lanes(v, lane_indices(|i| i | 1))
}

pub fn concat_even<B: Ops, T: Lane, const N: usize>(
    be: &B,
    hi: Vector<T, N>,
    lo: Vector<T, N>,
) -> Vector<T, N> {
    assert!(N >= 2, "concat_even needs at least 2 lanes");
    let half = N / 2;
    let idx = lane_indices(|i| if i < half { 2 * i } else { N + 2 * (i - half) });
    be.two_tables_lookup_lanes(lo, hi, idx)
}

pub fn concat_odd<B: Ops, T: Lane, const N: usize>(
    be: &B,
    hi: Vector<T, N>,
    lo: Vector<T, N>,
) -> Vector<T, N> {
    assert!(N >= 2, "concat_odd needs at least 2 lanes");
    let half = N / 2;
    let idx = lane_indices(|i| if i < half { 2 * i + 1 } else { N + 2 * (i - half) + 1 });
    be.two_tables_lookup_lanes(lo, hi, idx)
}

pub fn lower_half<B: Ops, T: Lane, const N: usize, const H: usize>(
    be: &B,
    dh: Tag<T, H>,
    v: Vector<T, N>,
) -> Vector<T, H> {
    const { assert!(2 * H == N, "half tag must have half the lanes") }
    be.resize_bit_cast(dh, v)
}

pub fn upper_half<B: Ops, T: Lane, const N: usize, const H: usize>(
    be: &B,
    dh: Tag<T, H>,
    v: Vector<T, N>,
) -> Vector<T, H> {
    const { assert!(2 * H == N, "half tag must have half the lanes") }
    be.resize_bit_cast(dh, be.slide_down_lanes(v, H))
}

pub fn combine<B: Ops, T: Lane, const N: usize, const H: usize>(
    be: &B,
    d: Tag<T, N>,
    hi: Vector<T, H>,
    lo: Vector<T, H>,
) -> Vector<T, N> {
    const { assert!(2 * H == N, "halves must have half the lanes") }
    let lo = be.resize_bit_cast(d, lo);
    let hi = be.slide_up_lanes(be.resize_bit_cast(d, hi), H);
    be.or(lo, hi)
}

pub fn slide_up_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    amt: usize,
) -> Vector<T, N> {
    if amt >= N {
        return be.zero(v.tag());
    }
    let moved = be.table_lookup_lanes(v, lane_indices(|i| i.wrapping_sub(amt)));
    be.if_then_else_zero(lane_mask(|i| i >= amt), moved)
}

pub fn slide1_up<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    v: Vector<T, N>,
) -> Vector<T, N> {
    be.slide_up_lanes(v, 1)
}

pub fn slide1_down<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    v: Vector<T, N>,
) -> Vector<T, N> {
    be.slide_down_lanes(v, 1)
}

/// Lanes `K..K + N` of the `2N`-lane concatenation `hi:lo`
pub fn combine_shift_right_lanes<const K: usize, B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    hi: Vector<T, N>,
    lo: Vector<T, N>,
) -> Vector<T, N> {
    const { assert!(K < N, "shift must be below the lane count") }
    be.two_tables_lookup_lanes(lo, hi, lane_indices(|i| i + K))
}

pub fn slide_down_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    amt: usize,
) -> Vector<T, N> {
    if amt >= N {
        return be.zero(v.tag());
    }
    let moved = be.table_lookup_lanes(v, lane_indices(|i| i + amt));
    be.if_then_else_zero(lane_mask(|i| i + amt < N), moved)
}
