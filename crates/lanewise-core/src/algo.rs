//! Slice algorithms built on whole-vector loads and stores
//!
//! Every function walks the slice in full vectors of `N` lanes and finishes
//! with at most one partial vector through `load_n`/`store_n`, so no memory
//! past the end of a slice is read or written. Lanes of the partial vector
//! beyond the slice are excluded from every mask a predicate returns.
//!
//! ```rust
//! use lanewise_core::{algo, primitives::{active, Ops}, Tag};
//!
//! let be = active();
//! let d = Tag::<i32, 4>::new();
//! let mut data = [1, -2, 3, -4, 5, -6, 7];
//! algo::transform(&be, d, &mut data, |v| be.abs(v));
//! assert_eq!(data, [1, 2, 3, 4, 5, 6, 7]);
//! assert_eq!(algo::find(&be, d, 6, &data), Some(5));
//! ```

use log::trace;

use crate::error::{Error, Result};
use crate::lane::{IntLane, Lane};
use crate::primitives::Ops;
use crate::tag::Tag;
use crate::vector::{Mask, Vector};

/// Sets every element of `to` to `value`
pub fn fill<B: Ops, T: Lane, const N: usize>(be: &B, d: Tag<T, N>, value: T, to: &mut [T]) {
    let v = be.set(d, value);
    let full = to.len() - to.len() % N;
    for chunk in to[..full].chunks_exact_mut(N) {
        be.store_u(v, chunk);
    }
    if full < to.len() {
        trace!("fill: {} remainder lanes", to.len() - full);
        be.store_n(v, &mut to[full..], N);
    }
}

/// Copies `from` into the front of `to`; `to` must be at least as long
pub fn copy<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    from: &[T],
    to: &mut [T],
) -> Result<()> {
    if to.len() < from.len() {
        return Err(Error::size_mismatch(from.len(), to.len(), "copy"));
    }
    let full = from.len() - from.len() % N;
    for (src, dst) in from[..full].chunks_exact(N).zip(to.chunks_exact_mut(N)) {
        be.store_u(be.load_u(d, src), dst);
    }
    let rest = from.len() - full;
    if rest > 0 {
        trace!("copy: {rest} remainder lanes");
        be.store_n(be.load_n(d, &from[full..], rest), &mut to[full..], rest);
    }
    Ok(())
}

/// Appends the elements of `from` for which `pred` is true to `to`, keeping
/// their order; returns how many were written
///
/// `to` must be at least as long as `from`. Elements of `to` past the
/// returned count are left untouched.
pub fn copy_if<B, T, F, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    from: &[T],
    to: &mut [T],
    pred: F,
) -> Result<usize>
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>) -> Mask<T, N>,
{
    if to.len() < from.len() {
        return Err(Error::size_mismatch(from.len(), to.len(), "copy_if"));
    }
    let mut written = 0;
    let full = from.len() - from.len() % N;
    for src in from[..full].chunks_exact(N) {
        let v = be.load_u(d, src);
        written += be.compress_blended_store(v, pred(v), &mut to[written..]);
    }
    let rest = from.len() - full;
    if rest > 0 {
        trace!("copy_if: {rest} remainder lanes");
        let v = be.load_n(d, &from[full..], rest);
        let m = be.mask_and(pred(v), be.first_n(d, rest));
        written += be.compress_blended_store(v, m, &mut to[written..]);
    }
    Ok(written)
}

/// Fills `to` with `make(indices)`, where `indices` holds the element index of
/// each lane (truncated to the lane width)
pub fn generate<B, T, F, const N: usize>(be: &B, d: Tag<T, N>, to: &mut [T], make: F)
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T::Unsigned, N>) -> Vector<T, N>,
{
    let du = d.to_unsigned();
    let index_at = |i: usize| be.iota(du, <T::Unsigned as IntLane>::truncate_from(i as u64));
    let full = to.len() - to.len() % N;
    for (k, chunk) in to[..full].chunks_exact_mut(N).enumerate() {
        be.store_u(make(index_at(k * N)), chunk);
    }
    if full < to.len() {
        trace!("generate: {} remainder lanes", to.len() - full);
        let rest = to.len() - full;
        be.store_n(make(index_at(full)), &mut to[full..], rest);
    }
}

/// Replaces every element of `data` with `f(element)`
pub fn transform<B, T, F, const N: usize>(be: &B, d: Tag<T, N>, data: &mut [T], f: F)
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>) -> Vector<T, N>,
{
    let full = data.len() - data.len() % N;
    for chunk in data[..full].chunks_exact_mut(N) {
        let v = be.load_u(d, chunk);
        be.store_u(f(v), chunk);
    }
    let rest = data.len() - full;
    if rest > 0 {
        trace!("transform: {rest} remainder lanes");
        let tail = &mut data[full..];
        let v = be.load_n(d, tail, rest);
        be.store_n(f(v), tail, rest);
    }
}

/// Replaces every element of `data` with `f(element, in1[i])`
pub fn transform1<B, T, F, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    data: &mut [T],
    in1: &[T],
    f: F,
) -> Result<()>
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>, Vector<T, N>) -> Vector<T, N>,
{
    if in1.len() != data.len() {
        return Err(Error::size_mismatch(data.len(), in1.len(), "transform1"));
    }
    let full = data.len() - data.len() % N;
    for (chunk, a) in data[..full].chunks_exact_mut(N).zip(in1.chunks_exact(N)) {
        let v = be.load_u(d, chunk);
        be.store_u(f(v, be.load_u(d, a)), chunk);
    }
    let rest = data.len() - full;
    if rest > 0 {
        trace!("transform1: {rest} remainder lanes");
        let tail = &mut data[full..];
        let v = be.load_n(d, tail, rest);
        let a = be.load_n(d, &in1[full..], rest);
        be.store_n(f(v, a), tail, rest);
    }
    Ok(())
}

/// Replaces every element of `data` with `f(element, in1[i], in2[i])`
pub fn transform2<B, T, F, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    data: &mut [T],
    in1: &[T],
    in2: &[T],
    f: F,
) -> Result<()>
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>, Vector<T, N>, Vector<T, N>) -> Vector<T, N>,
{
    if in1.len() != data.len() {
        return Err(Error::size_mismatch(data.len(), in1.len(), "transform2"));
    }
    if in2.len() != data.len() {
        return Err(Error::size_mismatch(data.len(), in2.len(), "transform2"));
    }
    let full = data.len() - data.len() % N;
    let inputs = in1.chunks_exact(N).zip(in2.chunks_exact(N));
    for (chunk, (a, b)) in data[..full].chunks_exact_mut(N).zip(inputs) {
        let v = be.load_u(d, chunk);
        be.store_u(f(v, be.load_u(d, a), be.load_u(d, b)), chunk);
    }
    let rest = data.len() - full;
    if rest > 0 {
        trace!("transform2: {rest} remainder lanes");
        let tail = &mut data[full..];
        let v = be.load_n(d, tail, rest);
        let a = be.load_n(d, &in1[full..], rest);
        let b = be.load_n(d, &in2[full..], rest);
        be.store_n(f(v, a, b), tail, rest);
    }
    Ok(())
}

/// Replaces every element equal to `old` with `new`
pub fn replace<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    data: &mut [T],
    old: T,
    new: T,
) {
    let old = be.set(d, old);
    replace_if(be, d, data, |v| be.eq(v, old), new);
}

/// Replaces every element for which `pred` is true with `new`
pub fn replace_if<B, T, F, const N: usize>(be: &B, d: Tag<T, N>, data: &mut [T], pred: F, new: T)
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>) -> Mask<T, N>,
{
    let new = be.set(d, new);
    let full = data.len() - data.len() % N;
    for chunk in data[..full].chunks_exact_mut(N) {
        let v = be.load_u(d, chunk);
        be.blended_store(new, pred(v), chunk);
    }
    let rest = data.len() - full;
    if rest > 0 {
        trace!("replace_if: {rest} remainder lanes");
        let tail = &mut data[full..];
        let v = be.load_n(d, tail, rest);
        let m = be.mask_and(pred(v), be.first_n(d, rest));
        be.blended_store(new, m, tail);
    }
}

/// Index of the first element equal to `value`
pub fn find<B: Ops, T: Lane, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    value: T,
    data: &[T],
) -> Option<usize> {
    let value = be.set(d, value);
    find_if(be, d, data, |v| be.eq(v, value))
}

/// Index of the first element for which `pred` is true
pub fn find_if<B, T, F, const N: usize>(
    be: &B,
    d: Tag<T, N>,
    data: &[T],
    pred: F,
) -> Option<usize>
where
    B: Ops,
    T: Lane,
    F: Fn(Vector<T, N>) -> Mask<T, N>,
{
    let full = data.len() - data.len() % N;
    for (k, chunk) in data[..full].chunks_exact(N).enumerate() {
        if let Some(lane) = be.find_first_true(pred(be.load_u(d, chunk))) {
            return Some(k * N + lane);
        }
    }
    let rest = data.len() - full;
    if rest == 0 {
        return None;
    }
    trace!("find_if: {rest} remainder lanes");
    let v = be.load_n(d, &data[full..], rest);
    be.find_first_true(be.mask_and(pred(v), be.first_n(d, rest)))
        .map(|lane| full + lane)
}

/// Elements per rayon task; a multiple of every lane count
#[cfg(feature = "parallel")]
const PAR_CHUNK: usize = 16 * 1024;

/// [`transform`] with vector-aligned chunks processed in parallel
#[cfg(feature = "parallel")]
pub fn par_transform<B, T, F, const N: usize>(be: &B, d: Tag<T, N>, data: &mut [T], f: F)
where
    B: Ops + Sync,
    T: Lane,
    F: Fn(Vector<T, N>) -> Vector<T, N> + Sync,
{
    use rayon::prelude::*;

    trace!("par_transform: {} elements in chunks of {PAR_CHUNK}", data.len());
    data.par_chunks_mut(PAR_CHUNK)
        .for_each(|chunk| transform(be, d, chunk, &f));
}

/// [`fill`] with vector-aligned chunks processed in parallel
#[cfg(feature = "parallel")]
pub fn par_fill<B, T, const N: usize>(be: &B, d: Tag<T, N>, value: T, to: &mut [T])
where
    B: Ops + Sync,
    T: Lane,
{
    use rayon::prelude::*;

    trace!("par_fill: {} elements in chunks of {PAR_CHUNK}", to.len());
    to.par_chunks_mut(PAR_CHUNK)
        .for_each(|chunk| fill(be, d, value, chunk));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Emu128Backend, Primitives, ScalarBackend};

    #[test]
    fn test_fill_and_copy_remainders() {
        let be = Emu128Backend;
        let d = Tag::<u16, 8>::new();
        let mut buf = [0u16; 13];
        fill(&be, d, 7, &mut buf[..11]);
        assert_eq!(&buf[..11], &[7; 11]);
        assert_eq!(&buf[11..], &[0, 0]);

        let from: Vec<u16> = (0..11).collect();
        let mut to = [99u16; 12];
        copy(&be, d, &from, &mut to).unwrap();
        assert_eq!(&to[..11], from.as_slice());
        assert_eq!(to[11], 99);

        assert!(copy(&be, d, &from, &mut to[..5]).is_err());
    }

    #[test]
    fn test_copy_if_keeps_order() {
        let be = Emu128Backend;
        let d = Tag::<i32, 4>::new();
        let from = [5, -1, 8, -3, 0, 2, -7, 9, 4];
        let mut to = [0; 9];
        let zero = be.zero(d);
        let n = copy_if(&be, d, &from, &mut to, |v| be.gt(v, zero)).unwrap();
        assert_eq!(&to[..n], &[5, 8, 2, 9, 4]);
    }

    #[test]
    fn test_copy_if_ignores_lanes_past_the_end() {
        let be = Emu128Backend;
        let d = Tag::<u8, 16>::new();
        let from = [0u8, 1, 0];
        let mut to = [42u8; 3];
        let zero = be.zero(d);
        // zero-filled tail lanes would match too
        let n = copy_if(&be, d, &from, &mut to, |v| be.eq(v, zero)).unwrap();
        assert_eq!(n, 2);
        assert_eq!(to, [0, 0, 42]);
    }

    #[test]
    fn test_generate_and_transform() {
        let be = Emu128Backend;
        let d = Tag::<f32, 4>::new();
        let mut out = [0.0f32; 6];
        generate(&be, d, &mut out, |idx| be.convert_to_float(d, be.bit_cast(d.to_signed(), idx)));
        assert_eq!(out, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        let two = be.set(d, 2.0);
        transform(&be, d, &mut out, |v| be.mul(v, two));
        assert_eq!(out, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let ones = [1.0f32; 6];
        let tens = [10.0f32; 6];
        transform2(&be, d, &mut out, &ones, &tens, |v, a, b| be.mul_add(v, b, a)).unwrap();
        assert_eq!(out, [1.0, 21.0, 41.0, 61.0, 81.0, 101.0]);
        assert!(transform1(&be, d, &mut out, &ones[..5], |v, _| v).is_err());
    }

    #[test]
    fn test_replace_and_find() {
        let be = Emu128Backend;
        let d = Tag::<i16, 8>::new();
        let mut data: Vec<i16> = (0..20).map(|i| i % 4).collect();
        replace(&be, d, &mut data, 3, -1);
        assert_eq!(data.iter().filter(|&&x| x == -1).count(), 5);
        assert_eq!(find(&be, d, -1, &data), Some(3));
        assert_eq!(find(&be, d, 3, &data), None);

        let limit = be.set(d, 1);
        replace_if(&be, d, &mut data, |v| be.gt(v, limit), 9);
        assert_eq!(&data[..4], &[0, 1, 9, -1]);
        assert_eq!(find_if(&be, d, &data[..3], |v| be.gt(v, limit)), Some(2));
        // zeroed tail lanes must not produce a hit
        assert_eq!(find(&be, d, 0, &data[1..2]), None);
    }

    #[test]
    fn test_single_lane_backend() {
        let be = ScalarBackend;
        let d = Tag::<f64, 1>::new();
        let mut data = [1.0, 4.0, 9.0];
        transform(&be, d, &mut data, |v| be.sqrt(v));
        assert_eq!(data, [1.0, 2.0, 3.0]);
        assert_eq!(find(&be, d, 3.0, &data), Some(2));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let be = Emu128Backend;
        let d = Tag::<u32, 4>::new();
        let mut a: Vec<u32> = (0..50_001).collect();
        let mut b = a.clone();
        let three = be.set(d, 3);
        par_transform(&be, d, &mut a, |v| be.mul(v, three));
        transform(&be, d, &mut b, |v| be.mul(v, three));
        assert_eq!(a, b);

        par_fill(&be, d, 5, &mut a);
        assert!(a.iter().all(|&x| x == 5));
    }
}
