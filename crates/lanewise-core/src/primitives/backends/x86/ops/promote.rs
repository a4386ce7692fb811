//! Width changes: promotion from a half register, demotion by packing
//!
//! SSE2 packs only from signed inputs, so unsigned demotions and 64-bit
//! demotions are declined.

use std::arch::x86_64::*;

use crate::lane::{Lane, LaneType, Narrow, UnsignedLane, Widen};
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

/// Low eight bytes of `v`, upper half zero
#[inline(always)]
unsafe fn load_half<T: Lane, const N: usize>(v: &Vector<T, N>) -> __m128i {
    debug_assert_eq!(N * std::mem::size_of::<T>(), 8, "not a half vector");
    _mm_loadl_epi64(v.raw.as_ptr().cast())
}

#[inline(always)]
unsafe fn store_half<T: Lane, const N: usize>(x: __m128i) -> Vector<T, N> {
    debug_assert_eq!(N * std::mem::size_of::<T>(), 8, "not a half vector");
    let mut out = Vector::<T, N>::default();
    _mm_storel_epi64(out.raw.as_mut_ptr().cast(), x);
    out
}

pub fn promote_to<T: Widen, const N: usize>(v: &Vector<T, N>) -> Option<Vector<T::Wide, N>> {
    full::<T::Wide, N>()?;
    // Safety: the wide result fills the register, so `v` is eight bytes
    unsafe {
        let x = load_half(v);
        let zero = _mm_setzero_si128();
        let r = match T::TYPE {
            LaneType::U8 => _mm_unpacklo_epi8(x, zero),
            LaneType::I8 => _mm_unpacklo_epi8(x, _mm_cmplt_epi8(x, zero)),
            LaneType::U16 => _mm_unpacklo_epi16(x, zero),
            LaneType::I16 => _mm_unpacklo_epi16(x, _mm_srai_epi16::<15>(x)),
            LaneType::U32 => _mm_unpacklo_epi32(x, zero),
            LaneType::I32 => _mm_unpacklo_epi32(x, _mm_srai_epi32::<31>(x)),
            LaneType::F32 => _mm_castpd_si128(_mm_cvtps_pd(_mm_castsi128_ps(x))),
            _ => return None,
        };
        Some(from_si(r))
    }
}

/// Saturating pack of `a` and `b`, `a` in the low half
#[inline(always)]
unsafe fn pack<T: Lane>(a: __m128i, b: __m128i) -> Option<__m128i> {
    match T::TYPE {
        LaneType::I16 => Some(_mm_packs_epi16(a, b)),
        LaneType::I32 => Some(_mm_packs_epi32(a, b)),
        LaneType::F64 => Some(_mm_castps_si128(_mm_movelh_ps(
            _mm_cvtpd_ps(_mm_castsi128_pd(a)),
            _mm_cvtpd_ps(_mm_castsi128_pd(b)),
        ))),
        _ => None,
    }
}

pub fn demote_to<T: Narrow, const N: usize>(v: &Vector<T, N>) -> Option<Vector<T::Narrow, N>> {
    full::<T, N>()?;
    // Safety: `v` fills the register and the narrow result is eight bytes
    unsafe {
        let x = to_si(v);
        pack::<T>(x, x).map(|r| store_half(r))
    }
}

pub fn ordered_demote2_to<T: Narrow, const N: usize, const M: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T::Narrow, M>> {
    full::<T, N>()?;
    // Safety: both inputs fill the register and so does the packed pair
    unsafe { pack::<T>(to_si(a), to_si(b)).map(|r| from_si(r)) }
}

pub fn ordered_truncate2_to<T: UnsignedLane + Narrow, const N: usize, const M: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T::Narrow, M>> {
    full::<T, N>()?;
    // Safety: both inputs fill the register and so does the packed pair
    unsafe {
        let (x, y) = (to_si(a), to_si(b));
        let r = match T::TYPE {
            LaneType::U16 => {
                let low = _mm_set1_epi16(0xFF);
                _mm_packus_epi16(_mm_and_si128(x, low), _mm_and_si128(y, low))
            }
            // sign-extend the low half so the signed pack keeps it exactly
            LaneType::U32 => _mm_packs_epi32(
                _mm_srai_epi32::<16>(_mm_slli_epi32::<16>(x)),
                _mm_srai_epi32::<16>(_mm_slli_epi32::<16>(y)),
            ),
            LaneType::U64 => _mm_castps_si128(_mm_shuffle_ps::<0b10_00_10_00>(
                _mm_castsi128_ps(x),
                _mm_castsi128_ps(y),
            )),
            _ => return None,
        };
        Some(from_si(r))
    }
}

pub fn sums_of8_abs_diff<const N: usize, const M: usize>(
    a: &Vector<u8, N>,
    b: &Vector<u8, N>,
) -> Option<Vector<u64, M>> {
    full::<u8, N>()?;
    // Safety: sixteen bytes in, two u64 sums out
    unsafe { Some(from_si(_mm_sad_epu8(to_si(a), to_si(b)))) }
}
