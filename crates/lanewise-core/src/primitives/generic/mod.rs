//! Backend-independent compositions
//!
//! Every function here is written only in terms of other operations of the
//! backend it is handed, so any backend that implements [`Primitives`] gets a
//! working version of every operation. The [`Ops`] defaults call these
//! functions; backends with a native version override the trait method and
//! may still call the function here for shapes they do not handle.
//!
//! Constant vectors (index patterns, byte tables) are built from small arrays
//! and handed to the backend through `load_u`, the same way a hand-written
//! kernel would materialize them.
//!
//! [`Primitives`]: crate::primitives::Primitives
//! [`Ops`]: crate::primitives::Ops

mod aes;
mod arith;
mod bits;
mod compress;
mod construct;
mod float;
mod gather;
mod interleaved;
mod logical;
mod mask_bits;
mod memory;
mod permute;
mod promote;
mod reduce;

pub use aes::*;
pub use arith::*;
pub use bits::*;
pub use compress::*;
pub use construct::*;
pub use float::*;
pub use gather::*;
pub use interleaved::*;
pub use logical::*;
pub use mask_bits::*;
pub use memory::*;
pub use permute::*;
pub use promote::*;
pub use reduce::*;

use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Indices, Mask, Vector};

/// Vector whose lane `i` is `f(i)`
#[inline(always)]
pub fn lanes_from<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    f: impl Fn(usize) -> T,
) -> Vector<T, N> {
    let lanes: [T; N] = std::array::from_fn(f);
    be.load_u(d, &lanes)
}

/// Lanes of `v` as an array, read back through the backend
#[inline(always)]
pub(crate) fn lanes_of<B: Ops, T: Lane, const N: usize>(be: &B, v: Vector<T, N>) -> [T; N] {
    let mut out = [T::ZERO; N];
    be.store_u(v, &mut out);
    out
}

/// Vector whose byte `j` is `f(j)`
#[inline(always)]
pub fn byte_vector<T: Lane, const N: usize>(f: impl Fn(usize) -> u8) -> Vector<T, N> {
    let bytes: [u8; 16] = std::array::from_fn(f);
    Vector::from_bytes(&bytes[..N * std::mem::size_of::<T>()])
}

/// Lane offsets `f(i)`, truncated to the lane width
#[inline(always)]
pub fn lane_indices<T: Lane, const N: usize>(f: impl Fn(usize) -> usize) -> Indices<T, N> {
    Indices::from_words(std::array::from_fn(|i| {
        <T::Unsigned as IntLane>::truncate_from(f(i) as u64)
    }))
}

/// Mask whose lane `i` is `f(i)`
#[inline(always)]
pub fn lane_mask<T: Lane, const N: usize>(f: impl Fn(usize) -> bool) -> Mask<T, N> {
    Mask::from_bools(std::array::from_fn(f))
}

/// Only the most significant bit of each lane
#[inline(always)]
pub(crate) fn msb_only<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>) -> Vector<T, N> {
    let one = <T::Unsigned as Lane>::ONE;
    let msb = one.lane_shl(<T::Unsigned as IntLane>::BITS - 1);
    be.set(d, T::from_bits(msb))
}

/// All bits set in every lane
#[inline(always)]
pub(crate) fn all_ones<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>) -> Vector<T, N> {
    be.set(d, T::from_bits(<T::Unsigned as Lane>::HIGHEST))
}

#[inline(always)]
pub(crate) fn is_float<T: Lane>() -> bool {
    T::TYPE.kind() == crate::lane::LaneKind::Float
}

#[inline(always)]
pub(crate) fn is_signed_int<T: Lane>() -> bool {
    T::TYPE.kind() == crate::lane::LaneKind::Signed
}
