use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

use super::lanes_of;

/// Negative indices map past any slice and panic like an out-of-bounds index
#[inline(always)]
fn slot<I: IntLane>(i: I) -> usize {
    i.to_usize().unwrap_or(usize::MAX)
}

/// `r[i] = base[index[i]]`; panics if an index is outside `base`
pub fn gather_index<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    base: &[T],
    index: Vector<T::Signed, N>,
) -> Vector<T, N> {
    let index = lanes_of(be, index);
    let lanes: [T; N] = std::array::from_fn(|i| base[slot(index[i])]);
    be.load_u(d, &lanes)
}

/// Like `gather_index` but false lanes are zero and their indices are not read
pub fn masked_gather_index<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    d: Tag<T, N>,
    base: &[T],
    index: Vector<T::Signed, N>,
) -> Vector<T, N> {
    let bits = be.bits_from_mask(m);
    let index = lanes_of(be, index);
    let lanes: [T; N] = std::array::from_fn(|i| {
        if (bits >> i) & 1 != 0 {
            base[slot(index[i])]
        } else {
            T::ZERO
        }
    });
    be.load_u(d, &lanes)
}

/// `base[index[i]] = v[i]` in lane order, so the highest lane wins a repeated index
pub fn scatter_index<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    _d: Tag<T, N>,
    base: &mut [T],
    index: Vector<T::Signed, N>,
) {
    let index = lanes_of(be, index);
    for (lane, i) in lanes_of(be, v).into_iter().zip(index) {
        base[slot(i)] = lane;
    }
}

/// Like `scatter_index` but only true lanes are written
pub fn masked_scatter_index<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
    _d: Tag<T, N>,
    base: &mut [T],
    index: Vector<T::Signed, N>,
) {
    let bits = be.bits_from_mask(m);
    let index = lanes_of(be, index);
    for (n, (lane, i)) in lanes_of(be, v).into_iter().zip(index).enumerate() {
        if (bits >> n) & 1 != 0 {
            base[slot(i)] = lane;
        }
    }
}
