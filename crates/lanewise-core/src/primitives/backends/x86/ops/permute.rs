//! Shuffles with fixed patterns

use std::arch::x86_64::*;

use crate::lane::{Lane, LaneType};
use crate::primitives::backends::x86::dispatch::{by_width, full};
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

#[cfg(target_feature = "ssse3")]
#[inline(always)]
unsafe fn reverse_bytes(x: __m128i) -> __m128i {
    _mm_shuffle_epi8(x, _mm_setr_epi8(15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0))
}

#[cfg(not(target_feature = "ssse3"))]
#[inline(always)]
unsafe fn reverse_bytes(x: __m128i) -> __m128i {
    // reverse the 16-bit lanes, then swap the bytes inside each
    let words = _mm_shuffle_epi32::<0x1B>(_mm_shufflehi_epi16::<0xB1>(_mm_shufflelo_epi16::<0xB1>(x)));
    _mm_or_si128(_mm_slli_epi16::<8>(words), _mm_srli_epi16::<8>(words))
}

pub fn reverse<T: Lane, const N: usize>(v: &Vector<T, N>) -> Option<Vector<T, N>> {
    // Safety: full vectors only
    unsafe {
        let ty = full::<T, N>()?;
        let x = to_si(v);
        let r = match ty {
            LaneType::U8 | LaneType::I8 => reverse_bytes(x),
            LaneType::U16 | LaneType::I16 => _mm_shuffle_epi32::<0x4E>(_mm_shufflehi_epi16::<0x1B>(
                _mm_shufflelo_epi16::<0x1B>(x),
            )),
            LaneType::U32 | LaneType::I32 | LaneType::F32 => _mm_shuffle_epi32::<0x1B>(x),
            LaneType::U64 | LaneType::I64 | LaneType::F64 => _mm_shuffle_epi32::<0x4E>(x),
        };
        Some(from_si(r))
    }
}

pub fn interleave_lower<T: Lane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    // Safety: full vectors only
    unsafe {
        full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        by_width!(T, N;
            Some(from_si(_mm_unpacklo_epi8(x, y))),
            Some(from_si(_mm_unpacklo_epi16(x, y))),
            Some(from_si(_mm_unpacklo_epi32(x, y))),
            Some(from_si(_mm_unpacklo_epi64(x, y))),
            Some(from_si(_mm_unpacklo_epi32(x, y))),
            Some(from_si(_mm_unpacklo_epi64(x, y))),
        )
    }
}

pub fn interleave_upper<T: Lane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    // Safety: full vectors only
    unsafe {
        full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        by_width!(T, N;
            Some(from_si(_mm_unpackhi_epi8(x, y))),
            Some(from_si(_mm_unpackhi_epi16(x, y))),
            Some(from_si(_mm_unpackhi_epi32(x, y))),
            Some(from_si(_mm_unpackhi_epi64(x, y))),
            Some(from_si(_mm_unpackhi_epi32(x, y))),
            Some(from_si(_mm_unpackhi_epi64(x, y))),
        )
    }
}

/// Byte gather with `pshufb` semantics, which are exactly those of
/// `table_lookup_bytes` for a 16-byte table
#[cfg(target_feature = "ssse3")]
pub fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
    bytes: &Vector<T, N>,
    indices: &Vector<I, M>,
) -> Option<Vector<I, M>> {
    full::<T, N>()?;
    full::<I, M>()?;
    // Safety: both operands fill a register
    unsafe { Some(from_si(_mm_shuffle_epi8(to_si(bytes), to_si(indices)))) }
}

#[cfg(not(target_feature = "ssse3"))]
pub fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
    _bytes: &Vector<T, N>,
    _indices: &Vector<I, M>,
) -> Option<Vector<I, M>> {
    None
}
