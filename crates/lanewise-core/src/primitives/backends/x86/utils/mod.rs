//! Shared utilities for the SSE2 implementations
//!
//! Conversions between the lane-array value types and `__m128*` registers.
//! They are only sound for full vectors (16 bytes); callers go through
//! [`super::dispatch::full`] first.

use std::arch::x86_64::*;

use crate::lane::Lane;
use crate::vector::{Mask, Vector};

#[inline(always)]
fn check_full<T: Lane, const N: usize>() {
    debug_assert_eq!(N * std::mem::size_of::<T>(), 16, "not a full 16-byte vector");
}

/// Load a full vector into an integer register
#[inline(always)]
pub unsafe fn to_si<T: Lane, const N: usize>(v: &Vector<T, N>) -> __m128i {
    check_full::<T, N>();
    // Vector is 16-byte aligned and its lanes start at offset 0
    _mm_load_si128(v.raw.as_ptr().cast())
}

#[inline(always)]
pub unsafe fn from_si<T: Lane, const N: usize>(x: __m128i) -> Vector<T, N> {
    check_full::<T, N>();
    let mut out = Vector::<T, N>::default();
    _mm_store_si128(out.raw.as_mut_ptr().cast(), x);
    out
}

#[inline(always)]
pub unsafe fn to_ps<T: Lane, const N: usize>(v: &Vector<T, N>) -> __m128 {
    _mm_castsi128_ps(to_si(v))
}

#[inline(always)]
pub unsafe fn from_ps<T: Lane, const N: usize>(x: __m128) -> Vector<T, N> {
    from_si(_mm_castps_si128(x))
}

#[inline(always)]
pub unsafe fn to_pd<T: Lane, const N: usize>(v: &Vector<T, N>) -> __m128d {
    _mm_castsi128_pd(to_si(v))
}

#[inline(always)]
pub unsafe fn from_pd<T: Lane, const N: usize>(x: __m128d) -> Vector<T, N> {
    from_si(_mm_castpd_si128(x))
}

/// Load a full mask into an integer register
#[inline(always)]
pub unsafe fn mask_si<T: Lane, const N: usize>(m: &Mask<T, N>) -> __m128i {
    check_full::<T, N>();
    _mm_load_si128(m.bits.as_ptr().cast())
}

#[inline(always)]
pub unsafe fn mask_from_si<T: Lane, const N: usize>(x: __m128i) -> Mask<T, N> {
    check_full::<T, N>();
    let mut out = Mask::<T, N>::from_bools([false; N]);
    _mm_store_si128(out.bits.as_mut_ptr().cast(), x);
    out
}

/// `mask ? yes : no`, bytewise
#[inline(always)]
pub unsafe fn select_si(mask: __m128i, yes: __m128i, no: __m128i) -> __m128i {
    #[cfg(target_feature = "sse4.1")]
    {
        _mm_blendv_epi8(no, yes, mask)
    }
    #[cfg(not(target_feature = "sse4.1"))]
    {
        _mm_or_si128(_mm_and_si128(mask, yes), _mm_andnot_si128(mask, no))
    }
}

#[inline(always)]
pub unsafe fn all_ones() -> __m128i {
    _mm_set1_epi32(-1)
}

/// Shift count register for `_mm_sll_*`/`_mm_srl_*`/`_mm_sra_*`
#[inline(always)]
pub unsafe fn count(bits: u32) -> __m128i {
    _mm_cvtsi32_si128(bits as i32)
}
