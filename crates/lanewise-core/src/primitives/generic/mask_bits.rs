use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::Mask;

use super::lanes_from;

pub fn bits_from_mask<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> u64 {
    let d = Tag::<T, N>::new();
    let mut lanes = [T::ZERO; N];
    be.store_u(be.vec_from_mask(d, m), &mut lanes);
    lanes
        .iter()
        .enumerate()
        .filter(|(_, lane)| lane.to_bits() != <T::Unsigned as Lane>::ZERO)
        .fold(0u64, |bits, (i, _)| bits | (1 << i))
}

/// Writes at most `dst.len()` of the `ceil(N / 8)` bytes
pub fn store_mask_bits<B: Ops, T: Lane, const N: usize>(
    be: &B,
    _d: Tag<T, N>,
    m: Mask<T, N>,
    dst: &mut [u8],
) -> usize {
    let bits = be.bits_from_mask(m);
    let num_bytes = N.div_ceil(8).min(dst.len());
    for (i, byte) in dst[..num_bytes].iter_mut().enumerate() {
        *byte = (bits >> (8 * i)) as u8;
    }
    num_bytes
}

/// Missing bytes read as zero
pub fn load_mask_bits<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    bits: &[u8],
) -> Mask<T, N> {
    let du = d.to_unsigned();
    let word = |x: u64| <T::Unsigned as IntLane>::truncate_from(x);
    // every lane sees the byte holding its bit, then tests its own bit
    let bytes = lanes_from(be, du, |i| word(u64::from(bits.get(i / 8).copied().unwrap_or(0))));
    let lane_bit = lanes_from(be, du, |i| word(1 << (i % 8)));
    let set = be.ne(be.and(bytes, lane_bit), be.zero(du));
    be.rebind_mask(d, set)
}

pub fn find_first_true<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> Option<usize> {
    let bits = be.bits_from_mask(m);
    (bits != 0).then(|| bits.trailing_zeros() as usize)
}

pub fn find_known_first_true<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> usize {
    let bits = be.bits_from_mask(m);
    debug_assert!(bits != 0, "mask has no true lane");
    bits.trailing_zeros() as usize
}

pub fn find_last_true<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> Option<usize> {
    let bits = be.bits_from_mask(m);
    (bits != 0).then(|| 63 - bits.leading_zeros() as usize)
}

pub fn find_known_last_true<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> usize {
    let bits = be.bits_from_mask(m);
    debug_assert!(bits != 0, "mask has no true lane");
    63 - bits.leading_zeros() as usize
}

pub fn all_true<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> bool {
    be.bits_from_mask(m) == (1u64 << N) - 1
}

pub fn set_before_first<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> Mask<T, N> {
    let d = Tag::<T, N>::new();
    be.first_n(d, be.find_first_true(m).unwrap_or(N))
}

pub fn set_at_or_before_first<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>)
    -> Mask<T, N> {
    let d = Tag::<T, N>::new();
    be.first_n(d, be.find_first_true(m).map_or(N, |i| i + 1))
}

pub fn set_only_first<B: Ops, T: Lane, const N: usize>(be: &B, m: Mask<T, N>) -> Mask<T, N> {
    let d = Tag::<T, N>::new();
    match be.find_first_true(m) {
        Some(i) => be.mask_and_not(be.first_n(d, i), be.first_n(d, i + 1)),
        None => be.first_n(d, 0),
    }
}
