use crate::lane::Lane;
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

use super::lanes_of;

pub fn load<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>, src: &[T]) -> Vector<T, N> {
    be.load_u(d, src)
}

pub fn store<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>, dst: &mut [T]) {
    be.store_u(v, dst)
}

/// One past the last true lane, or zero
#[inline(always)]
fn mask_extent<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> usize {
    be.find_last_true(m).map_or(0, |i| i + 1)
}

pub fn masked_load<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    d: Tag<T, N>,
    src: &[T],
) -> Vector<T, N> {
    let v = be.load_n(d, src, mask_extent(be, m));
    be.if_then_else_zero(m, v)
}

pub fn masked_load_or<B: Ops, T: Lane, const N: usize>(
    be: &B,
    no: Vector<T, N>,
    m: Mask<T, N>,
    d: Tag<T, N>,
    src: &[T],
) -> Vector<T, N> {
    let v = be.load_n(d, src, mask_extent(be, m));
    be.if_then_else(m, v, no)
}

pub fn load_n<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    src: &[T],
    max_lanes: usize,
) -> Vector<T, N> {
    let n = max_lanes.min(N).min(src.len());
    if n == N {
        return be.load_u(d, src);
    }
    let mut lanes = [T::ZERO; N];
    lanes[..n].copy_from_slice(&src[..n]);
    be.load_u(d, &lanes)
}

pub fn load_n_or<B: Ops, T: Lane, const N: usize>(
    be: &B,
    no: Vector<T, N>,
    d: Tag<T, N>,
    src: &[T],
    max_lanes: usize,
) -> Vector<T, N> {
    let n = max_lanes.min(src.len());
    be.if_then_else(be.first_n(d, n), be.load_n(d, src, n), no)
}

pub fn store_n<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    dst: &mut [T],
    max_lanes: usize,
) {
    let n = max_lanes.min(N).min(dst.len());
    if n == N {
        return be.store_u(v, dst);
    }
    let mut lanes = [T::ZERO; N];
    be.store_u(v, &mut lanes);
    dst[..n].copy_from_slice(&lanes[..n]);
}

pub fn blended_store<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
    dst: &mut [T],
) {
    let bits = be.bits_from_mask(m);
    for (i, (slot, lane)) in dst.iter_mut().zip(lanes_of(be, v)).enumerate() {
        if (bits >> i) & 1 != 0 {
            *slot = lane;
        }
    }
}

pub fn safe_fill_n<B: Ops, T: Lane, const N: usize>(
    be: &B,
    num: usize,
    value: T,
    d: Tag<T, N>,
    dst: &mut [T],
) {
    let num = num.min(dst.len());
    let v = be.set(d, value);
    let mut i = 0;
    while i + N <= num {
        be.store_u(v, &mut dst[i..]);
        i += N;
    }
    be.store_n(v, &mut dst[i..], num - i);
}

pub fn safe_copy_n<B: Ops, T: Lane, const N: usize>(
    be: &B,
    num: usize,
    d: Tag<T, N>,
    from: &[T],
    to: &mut [T],
) {
    let num = num.min(from.len()).min(to.len());
    let mut i = 0;
    while i + N <= num {
        be.store_u(be.load_u(d, &from[i..]), &mut to[i..]);
        i += N;
    }
    let rest = num - i;
    be.store_n(be.load_n(d, &from[i..], rest), &mut to[i..], rest);
}

pub fn extract_lane<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>, i: usize) -> T {
    let mut lanes = [T::ZERO; N];
    be.store_u(v, &mut lanes);
    lanes[i]
}

pub fn insert_lane<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    i: usize,
    value: T,
) -> Vector<T, N> {
    let mut lanes = [T::ZERO; N];
    be.store_u(v, &mut lanes);
    lanes[i] = value;
    be.load_u(v.tag(), &lanes)
}
