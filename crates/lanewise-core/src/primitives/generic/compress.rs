use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Indices, Mask, Vector};

/// Stable partition order: true lanes ascending, then false lanes ascending
fn partition_indices<T: Lane, const N: usize>(bits: u64) -> Indices<T, N> {
    let mut words = [<T::Unsigned as Lane>::ZERO; N];
    let mut next = 0;
    for want in [true, false] {
        for i in 0..N {
            if (bits >> i) & 1 == u64::from(want) {
                words[next] = <T::Unsigned as IntLane>::truncate_from(i as u64);
                next += 1;
            }
        }
    }
    Indices::from_words(words)
}

pub fn compress<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
) -> Vector<T, N> {
    be.table_lookup_lanes(v, partition_indices(be.bits_from_mask(m)))
}

pub fn compress_store<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
    dst: &mut [T],
) -> usize {
    be.store_n(be.compress(v, m), dst, N);
    be.count_true(m)
}

pub fn compress_blended_store<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
    dst: &mut [T],
) -> usize {
    let count = be.count_true(m);
    be.store_n(be.compress(v, m), dst, count);
    count
}

pub fn compress_bits<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    bits: &[u8],
) -> Vector<T, N> {
    be.compress(v, be.load_mask_bits(v.tag(), bits))
}

pub fn compress_bits_store<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    bits: &[u8],
    dst: &mut [T],
) -> usize {
    be.compress_store(v, be.load_mask_bits(v.tag(), bits), dst)
}

pub fn expand<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v: Vector<T, N>,
    m: Mask<T, N>,
) -> Vector<T, N> {
    let bits = be.bits_from_mask(m);
    let mut words = [<T::Unsigned as Lane>::ZERO; N];
    let mut next = 0u64;
    for (i, word) in words.iter_mut().enumerate() {
        if (bits >> i) & 1 == 1 {
            *word = <T::Unsigned as IntLane>::truncate_from(next);
            next += 1;
        }
    }
    be.if_then_else_zero(m, be.table_lookup_lanes(v, Indices::from_words(words)))
}

pub fn load_expand<B: Ops, T: Lane, const N: usize>(
    be: &B,
    m: Mask<T, N>,
    d: Tag<T, N>,
    src: &[T],
) -> Vector<T, N> {
    be.expand(be.load_n(d, src, be.count_true(m)), m)
}
