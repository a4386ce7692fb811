//! Comparisons producing full-register masks

use std::arch::x86_64::*;

use crate::lane::{Lane, LaneType};
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::{Mask, Vector};

pub fn eq<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Mask<T, N>> {
    // Safety: full vectors only
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        let m = match ty {
            LaneType::U8 | LaneType::I8 => _mm_cmpeq_epi8(x, y),
            LaneType::U16 | LaneType::I16 => _mm_cmpeq_epi16(x, y),
            LaneType::U32 | LaneType::I32 => _mm_cmpeq_epi32(x, y),
            #[cfg(target_feature = "sse4.1")]
            LaneType::U64 | LaneType::I64 => _mm_cmpeq_epi64(x, y),
            #[cfg(not(target_feature = "sse4.1"))]
            LaneType::U64 | LaneType::I64 => {
                // both 32-bit halves equal
                let halves = _mm_cmpeq_epi32(x, y);
                _mm_and_si128(halves, _mm_shuffle_epi32::<0xB1>(halves))
            }
            LaneType::F32 => _mm_castps_si128(_mm_cmpeq_ps(to_ps(a), to_ps(b))),
            LaneType::F64 => _mm_castpd_si128(_mm_cmpeq_pd(to_pd(a), to_pd(b))),
        };
        Some(mask_from_si(m))
    }
}

pub fn lt<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Mask<T, N>> {
    // Safety: full vectors only
    unsafe {
        let ty = full::<T, N>()?;
        let (x, y) = (to_si(a), to_si(b));
        let m = match ty {
            LaneType::I8 => _mm_cmplt_epi8(x, y),
            LaneType::I16 => _mm_cmplt_epi16(x, y),
            LaneType::I32 => _mm_cmplt_epi32(x, y),
            // flipping the sign bit maps unsigned order onto signed order
            LaneType::U8 => {
                let flip = _mm_set1_epi8(i8::MIN);
                _mm_cmplt_epi8(_mm_xor_si128(x, flip), _mm_xor_si128(y, flip))
            }
            LaneType::U16 => {
                let flip = _mm_set1_epi16(i16::MIN);
                _mm_cmplt_epi16(_mm_xor_si128(x, flip), _mm_xor_si128(y, flip))
            }
            LaneType::U32 => {
                let flip = _mm_set1_epi32(i32::MIN);
                _mm_cmplt_epi32(_mm_xor_si128(x, flip), _mm_xor_si128(y, flip))
            }
            LaneType::F32 => _mm_castps_si128(_mm_cmplt_ps(to_ps(a), to_ps(b))),
            LaneType::F64 => _mm_castpd_si128(_mm_cmplt_pd(to_pd(a), to_pd(b))),
            LaneType::U64 | LaneType::I64 => return None,
        };
        Some(mask_from_si(m))
    }
}

/// Sign bit of every lane smeared across the lane
pub fn sign_mask<T: Lane, const N: usize>(v: &Vector<T, N>) -> Option<Mask<T, N>> {
    // Safety: full vectors only
    unsafe {
        let ty = full::<T, N>()?;
        let x = to_si(v);
        let m = match ty {
            LaneType::U8 | LaneType::I8 => _mm_cmplt_epi8(x, _mm_setzero_si128()),
            LaneType::U16 | LaneType::I16 => _mm_srai_epi16::<15>(x),
            LaneType::U32 | LaneType::I32 | LaneType::F32 => _mm_srai_epi32::<31>(x),
            // copy the smeared high dword over the low one
            LaneType::U64 | LaneType::I64 | LaneType::F64 => {
                _mm_shuffle_epi32::<0xF5>(_mm_srai_epi32::<31>(x))
            }
        };
        Some(mask_from_si(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_order() {
        let a = Vector::<u8, 16>::from_array([0, 1, 200, 255, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9]);
        let b = Vector::<u8, 16>::splat(100);
        let m = lt(&a, &b).map(Mask::to_bools);
        let mut want = [true; 16];
        want[2] = false;
        want[3] = false;
        assert_eq!(m, Some(want));
    }

    #[test]
    fn test_eq_64_and_floats() {
        let a = Vector::<u64, 2>::from_array([1 << 40, 5]);
        let b = Vector::<u64, 2>::from_array([1 << 40, 5 | (1 << 32)]);
        assert_eq!(eq(&a, &b).map(Mask::to_bools), Some([true, false]));

        let f = Vector::<f64, 2>::from_array([f64::NAN, 0.0]);
        let g = Vector::<f64, 2>::from_array([f64::NAN, -0.0]);
        assert_eq!(eq(&f, &g).map(Mask::to_bools), Some([false, true]));
        assert!(lt(&a, &b).is_none());
    }

    #[test]
    fn test_half_width_is_declined() {
        let a = Vector::<i32, 2>::from_array([1, 5]);
        let b = Vector::<i32, 2>::from_array([2, 2]);
        assert!(lt(&a, &b).is_none());
        assert!(eq(&a, &b).is_none());
        assert!(sign_mask(&Vector::<f32, 2>::splat(-1.0)).is_none());
    }

    #[test]
    fn test_sign_mask() {
        let v = Vector::<f64, 2>::from_array([-0.0, 1.0]);
        assert_eq!(sign_mask(&v).map(Mask::to_bools), Some([true, false]));
        let w = Vector::<i16, 8>::from_array([-1, 0, i16::MIN, i16::MAX, 3, -3, 0, 0]);
        assert_eq!(
            sign_mask(&w).map(Mask::to_bools),
            Some([true, false, true, false, false, true, false, false])
        );
    }
}
