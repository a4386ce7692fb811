use crate::lane::Lane;
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::tuple::{Vec2, Vec3, Vec4};
use crate::vector::Vector;

use super::{lane_indices, lane_mask};

/// Lane `i` of the result is lane `pick(i).1` of `sources[pick(i).0]`.
///
/// Sources are consumed in pairs with `two_tables_lookup_lanes`, each pair's
/// result blended in where the picked source belongs to that pair.
fn gather<B: Ops, T: Lane, const N: usize>(
    be: &B,
    sources: &[Vector<T, N>],
    pick: impl Fn(usize) -> (usize, usize),
) -> Vector<T, N> {
    let mut out = be.zero(Tag::<T, N>::new());
    for (pair, chunk) in sources.chunks(2).enumerate() {
        let first = chunk[0];
        let second = *chunk.get(1).unwrap_or(&first);
        let idx = lane_indices(|i| {
            let (src, lane) = pick(i);
            if src / 2 == pair {
                (src % 2) * N + lane
            } else {
                0
            }
        });
        let picked = be.two_tables_lookup_lanes(first, second, idx);
        out = be.if_then_else(lane_mask(|i| pick(i).0 / 2 == pair), picked, out);
    }
    out
}

/// `K` consecutive vectors from `src`, which must hold `K * N` lanes
fn load_block<B: Ops, T: Lane, const N: usize, const K: usize>(
    be: &B,
    d: Tag<T, N>,
    src: &[T],
) -> [Vector<T, N>; K] {
    assert!(src.len() >= K * N, "interleaved load needs {} lanes, got {}", K * N, src.len());
    std::array::from_fn(|k| be.load_u(d, &src[k * N..]))
}

/// Vector `k` of the result holds lanes `k, k + K, k + 2K, ...` of `block`
fn deinterleave<B: Ops, T: Lane, const N: usize, const K: usize>(
    be: &B,
    block: &[Vector<T, N>; K],
) -> [Vector<T, N>; K] {
    std::array::from_fn(|k| {
        gather(be, block, |i| {
            let p = i * K + k;
            (p / N, p % N)
        })
    })
}

fn interleave_store<B: Ops, T: Lane, const N: usize, const K: usize>(
    be: &B,
    parts: &[Vector<T, N>; K],
    dst: &mut [T],
) {
    assert!(dst.len() >= K * N, "interleaved store needs {} lanes, got {}", K * N, dst.len());
    for j in 0..K {
        let out = gather(be, parts, |i| {
            let p = j * N + i;
            (p % K, p / K)
        });
        be.store_u(out, &mut dst[j * N..]);
    }
}

pub fn load_interleaved2<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    src: &[T],
) -> Vec2<T, N> {
    let block = load_block::<B, T, N, 2>(be, d, src);
    let [v0, v1] = deinterleave(be, &block);
    Vec2::new(v0, v1)
}

pub fn load_interleaved3<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    src: &[T],
) -> Vec3<T, N> {
    let block = load_block::<B, T, N, 3>(be, d, src);
    let [v0, v1, v2] = deinterleave(be, &block);
    Vec3::new(v0, v1, v2)
}

pub fn load_interleaved4<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    src: &[T],
) -> Vec4<T, N> {
    let block = load_block::<B, T, N, 4>(be, d, src);
    let [v0, v1, v2, v3] = deinterleave(be, &block);
    Vec4::new(v0, v1, v2, v3)
}

pub fn store_interleaved2<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v0: Vector<T, N>,
    v1: Vector<T, N>,
    dst: &mut [T],
) {
    interleave_store(be, &[v0, v1], dst)
}

pub fn store_interleaved3<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v0: Vector<T, N>,
    v1: Vector<T, N>,
    v2: Vector<T, N>,
    dst: &mut [T],
) {
    interleave_store(be, &[v0, v1, v2], dst)
}

pub fn store_interleaved4<B: Ops, T: Lane, const N: usize>(
    be: &B,
    v0: Vector<T, N>,
    v1: Vector<T, N>,
    v2: Vector<T, N>,
    v3: Vector<T, N>,
    dst: &mut [T],
) {
    interleave_store(be, &[v0, v1, v2, v3], dst)
}
