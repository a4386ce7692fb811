//! Horizontal reductions
//!
//! All three use the same butterfly: at step `k = 1, 2, 4, ...` every lane
//! combines with lane `i ^ k`. Each lane ends up with the full reduction, and
//! because the pairing is fixed a float sum is bit-identical on every backend.

use crate::lane::Lane;
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::Vector;

use super::lane_indices;

#[inline(always)]
fn butterfly<B: Ops, T: Lane, const N: usize>(
    be: &B,
    mut v: Vector<T, N>,
    op: impl Fn(Vector<T, N>, Vector<T, N>) -> Vector<T, N>,
) -> Vector<T, N> {
    let mut k = 1;
    while k < N {
        let partner = be.table_lookup_lanes(v, lane_indices(|i| i ^ k));
        v = op(v, partner);
        k <<= 1;
    }
    v
}

pub fn sum_of_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    v: Vector<T, N>,
) -> Vector<T, N> {
    butterfly(be, v, |a, b| be.add(a, b))
}

pub fn min_of_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    v: Vector<T, N>,
) -> Vector<T, N> {
    butterfly(be, v, |a, b| be.min(a, b))
}

pub fn max_of_lanes<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    v: Vector<T, N>,
) -> Vector<T, N> {
    butterfly(be, v, |a, b| be.max(a, b))
}
