//! Lane arithmetic on full registers

use std::arch::x86_64::*;

use crate::lane::{IntLane, Lane, LaneType};
use crate::primitives::backends::x86::dispatch::{by_width, full};
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

// Safety for every function here: `by_width`/`full` only pick an intrinsic
// arm for 16-byte vectors, and SSE2 is part of the x86-64 baseline.

pub fn add<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        by_width!(T, N;
            Some(from_si(_mm_add_epi8(to_si(a), to_si(b)))),
            Some(from_si(_mm_add_epi16(to_si(a), to_si(b)))),
            Some(from_si(_mm_add_epi32(to_si(a), to_si(b)))),
            Some(from_si(_mm_add_epi64(to_si(a), to_si(b)))),
            Some(from_ps(_mm_add_ps(to_ps(a), to_ps(b)))),
            Some(from_pd(_mm_add_pd(to_pd(a), to_pd(b)))),
        )
    }
}

pub fn sub<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        by_width!(T, N;
            Some(from_si(_mm_sub_epi8(to_si(a), to_si(b)))),
            Some(from_si(_mm_sub_epi16(to_si(a), to_si(b)))),
            Some(from_si(_mm_sub_epi32(to_si(a), to_si(b)))),
            Some(from_si(_mm_sub_epi64(to_si(a), to_si(b)))),
            Some(from_ps(_mm_sub_ps(to_ps(a), to_ps(b)))),
            Some(from_pd(_mm_sub_pd(to_pd(a), to_pd(b)))),
        )
    }
}

#[inline(always)]
unsafe fn mullo_epi32(a: __m128i, b: __m128i) -> Option<__m128i> {
    #[cfg(target_feature = "sse4.1")]
    {
        Some(_mm_mullo_epi32(a, b))
    }
    #[cfg(not(target_feature = "sse4.1"))]
    {
        let _ = (a, b);
        None
    }
}

pub fn mul<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        by_width!(T, N;
            None,
            Some(from_si(_mm_mullo_epi16(to_si(a), to_si(b)))),
            mullo_epi32(to_si(a), to_si(b)).map(|x| from_si(x)),
            None,
            Some(from_ps(_mm_mul_ps(to_ps(a), to_ps(b)))),
            Some(from_pd(_mm_mul_pd(to_pd(a), to_pd(b)))),
        )
    }
}

pub fn div<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        match full::<T, N>()? {
            LaneType::F32 => Some(from_ps(_mm_div_ps(to_ps(a), to_ps(b)))),
            LaneType::F64 => Some(from_pd(_mm_div_pd(to_pd(a), to_pd(b)))),
            _ => None,
        }
    }
}

pub fn sqrt<T: Lane, const N: usize>(v: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        match full::<T, N>()? {
            LaneType::F32 => Some(from_ps(_mm_sqrt_ps(to_ps(v)))),
            LaneType::F64 => Some(from_pd(_mm_sqrt_pd(to_pd(v)))),
            _ => None,
        }
    }
}

// `minps`/`maxps` return the second operand when either is NaN. Lane
// semantics want the other operand when exactly `b` is NaN.

#[inline(always)]
unsafe fn fix_nan_ps(r: __m128, a: __m128, b: __m128) -> __m128 {
    let only_b_nan = _mm_andnot_ps(_mm_cmpunord_ps(a, a), _mm_cmpunord_ps(b, b));
    _mm_or_ps(_mm_and_ps(only_b_nan, a), _mm_andnot_ps(only_b_nan, r))
}

#[inline(always)]
unsafe fn fix_nan_pd(r: __m128d, a: __m128d, b: __m128d) -> __m128d {
    let only_b_nan = _mm_andnot_pd(_mm_cmpunord_pd(a, a), _mm_cmpunord_pd(b, b));
    _mm_or_pd(_mm_and_pd(only_b_nan, a), _mm_andnot_pd(only_b_nan, r))
}

pub fn min<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        match ty {
            LaneType::U8 => Some(from_si(_mm_min_epu8(x, y))),
            LaneType::I16 => Some(from_si(_mm_min_epi16(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::I8 => Some(from_si(_mm_min_epi8(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::U16 => Some(from_si(_mm_min_epu16(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::I32 => Some(from_si(_mm_min_epi32(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::U32 => Some(from_si(_mm_min_epu32(x, y))),
            LaneType::F32 => {
                let (a, b) = (to_ps(a), to_ps(b));
                Some(from_ps(fix_nan_ps(_mm_min_ps(a, b), a, b)))
            }
            LaneType::F64 => {
                let (a, b) = (to_pd(a), to_pd(b));
                Some(from_pd(fix_nan_pd(_mm_min_pd(a, b), a, b)))
            }
            _ => None,
        }
    }
}

pub fn max<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        match ty {
            LaneType::U8 => Some(from_si(_mm_max_epu8(x, y))),
            LaneType::I16 => Some(from_si(_mm_max_epi16(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::I8 => Some(from_si(_mm_max_epi8(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::U16 => Some(from_si(_mm_max_epu16(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::I32 => Some(from_si(_mm_max_epi32(x, y))),
            #[cfg(target_feature = "sse4.1")]
            LaneType::U32 => Some(from_si(_mm_max_epu32(x, y))),
            LaneType::F32 => {
                let (a, b) = (to_ps(a), to_ps(b));
                Some(from_ps(fix_nan_ps(_mm_max_ps(a, b), a, b)))
            }
            LaneType::F64 => {
                let (a, b) = (to_pd(a), to_pd(b));
                Some(from_pd(fix_nan_pd(_mm_max_pd(a, b), a, b)))
            }
            _ => None,
        }
    }
}

pub fn saturated_add<T: IntLane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        match ty {
            LaneType::U8 => Some(from_si(_mm_adds_epu8(x, y))),
            LaneType::I8 => Some(from_si(_mm_adds_epi8(x, y))),
            LaneType::U16 => Some(from_si(_mm_adds_epu16(x, y))),
            LaneType::I16 => Some(from_si(_mm_adds_epi16(x, y))),
            _ => None,
        }
    }
}

pub fn saturated_sub<T: IntLane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        match ty {
            LaneType::U8 => Some(from_si(_mm_subs_epu8(x, y))),
            LaneType::I8 => Some(from_si(_mm_subs_epi8(x, y))),
            LaneType::U16 => Some(from_si(_mm_subs_epu16(x, y))),
            LaneType::I16 => Some(from_si(_mm_subs_epi16(x, y))),
            _ => None,
        }
    }
}

pub fn average_round<T: IntLane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        match ty {
            LaneType::U8 => Some(from_si(_mm_avg_epu8(x, y))),
            LaneType::U16 => Some(from_si(_mm_avg_epu16(x, y))),
            _ => None,
        }
    }
}

/// Same count for every lane, taken modulo the lane width
pub fn shift_left_same<T: IntLane, const N: usize>(
    v: &Vector<T, N>,
    bits: u32,
) -> Option<Vector<T, N>> {
    unsafe {
        let c = count(bits & (T::BITS - 1));
        by_width!(T, N;
            None,
            Some(from_si(_mm_sll_epi16(to_si(v), c))),
            Some(from_si(_mm_sll_epi32(to_si(v), c))),
            Some(from_si(_mm_sll_epi64(to_si(v), c))),
            None,
            None,
        )
    }
}

/// Logical for unsigned lanes, arithmetic for signed; no 64-bit arithmetic shift in SSE2
pub fn shift_right_same<T: IntLane, const N: usize>(
    v: &Vector<T, N>,
    bits: u32,
) -> Option<Vector<T, N>> {
    unsafe {
        let c = count(bits & (T::BITS - 1));
        let ty = full::<T, N>()?;
        let x = to_si(v);
        match ty {
            LaneType::U16 => Some(from_si(_mm_srl_epi16(x, c))),
            LaneType::U32 => Some(from_si(_mm_srl_epi32(x, c))),
            LaneType::U64 => Some(from_si(_mm_srl_epi64(x, c))),
            LaneType::I16 => Some(from_si(_mm_sra_epi16(x, c))),
            LaneType::I32 => Some(from_si(_mm_sra_epi32(x, c))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_vectors_are_declined() {
        let a = Vector::<u32, 2>::from_array([1, 2]);
        assert!(add(&a, &a).is_none());
        let b = Vector::<u32, 4>::from_array([1, 2, 3, u32::MAX]);
        assert_eq!(add(&b, &b).map(|v| v.to_array()), Some([2, 4, 6, u32::MAX - 1]));
        let f = Vector::<f32, 2>::from_array([1.0, 2.0]);
        assert!(min(&f, &f).is_none());
        assert!(max(&f, &f).is_none());
        let h = Vector::<u8, 8>::splat(3);
        assert!(saturated_add(&h, &h).is_none());
        assert!(average_round(&h, &h).is_none());
        assert!(shift_right_same(&Vector::<i16, 4>::splat(-2), 1).is_none());
    }

    #[test]
    fn test_float_min_max_nan() {
        let a = Vector::<f32, 4>::from_array([f32::NAN, 1.0, f32::NAN, -0.0]);
        let b = Vector::<f32, 4>::from_array([2.0, f32::NAN, f32::NAN, 0.0]);
        let lo = min(&a, &b).unwrap_or_default().to_array();
        assert_eq!(lo[0], 2.0);
        assert_eq!(lo[1], 1.0);
        assert!(lo[2].is_nan());
        assert_eq!(lo[3].to_bits(), 0.0f32.to_bits());

        let hi = max(&a, &b).unwrap_or_default().to_array();
        assert_eq!(hi[0], 2.0);
        assert_eq!(hi[1], 1.0);
        assert_eq!(hi[3].to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_saturating_bytes() {
        let a = Vector::<i8, 16>::splat(120);
        let b = Vector::<i8, 16>::splat(10);
        assert_eq!(saturated_add(&a, &b).map(|v| v.to_array()), Some([127; 16]));
        let u = Vector::<u8, 16>::splat(3);
        assert_eq!(saturated_sub(&u, &Vector::splat(9)).map(|v| v.to_array()), Some([0; 16]));
        assert_eq!(average_round(&u, &Vector::splat(4)).map(|v| v.to_array()), Some([4; 16]));
    }

    #[test]
    fn test_shift_counts_wrap() {
        let v = Vector::<u16, 8>::splat(1);
        assert_eq!(shift_left_same(&v, 17).map(|v| v.to_array()), Some([2; 8]));
        let s = Vector::<i32, 4>::splat(-64);
        assert_eq!(shift_right_same(&s, 3).map(|v| v.to_array()), Some([-8; 4]));
        assert!(shift_right_same(&Vector::<i64, 2>::splat(-1), 1).is_none());
    }
}
