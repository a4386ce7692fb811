use crate::lane::{IntLane, Lane, SignedLane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

use super::{lanes_from, msb_only};

pub fn iota<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>, first: T) -> Vector<T, N> {
    lanes_from(be, d, |i| first.offset(i))
}

pub fn sign_bit<B: Ops, T: SignedLane, const N: usize>(be: &B, d: Tag<T, N>) -> Vector<T, N> {
    msb_only(be, d)
}

pub fn first_n<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>, n: usize) -> Mask<T, N> {
    let du = d.to_unsigned();
    let limit = <T::Unsigned as IntLane>::truncate_from(n.min(N) as u64);
    let below = be.lt(be.iota(du, <T::Unsigned as Lane>::ZERO), be.set(du, limit));
    be.rebind_mask(d, below)
}

pub fn bit_cast<B: Ops, T: Lane, U: Lane, const N: usize, const M: usize>(
    _be: &B,
    _d: Tag<U, M>,
    v: Vector<T, N>,
) -> Vector<U, M> {
    const {
        assert!(
            N * std::mem::size_of::<T>() == M * std::mem::size_of::<U>(),
            "bit_cast between vectors of different widths"
        );
    }
    Vector::from_bytes(v.as_bytes())
}

pub fn resize_bit_cast<B: Ops, T: Lane, U: Lane, const N: usize, const M: usize>(
    _be: &B,
    _d: Tag<U, M>,
    v: Vector<T, N>,
) -> Vector<U, M> {
    Vector::from_bytes_resized(v.as_bytes())
}

pub fn rebind_mask<B: Ops, T: Lane, U: Lane, const N: usize>(
    be: &B,
    d: Tag<U, N>,
    m: Mask<T, N>,
) -> Mask<U, N> {
    let as_vec = be.vec_from_mask(Tag::<T, N>::new(), m);
    be.mask_from_vec(be.bit_cast(d, as_vec))
}
