//! Float/integer conversion for 32-bit lanes
//!
//! SSE2 has no packed 64-bit conversions; those shapes are declined.

use std::arch::x86_64::*;

use crate::lane::{FloatLane, LaneType};
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

/// Truncating, with out-of-range lanes saturated by sign
pub fn convert_to_int<T: FloatLane, const N: usize>(
    v: &Vector<T, N>,
) -> Option<Vector<T::Signed, N>> {
    if full::<T, N>()? != LaneType::F32 {
        return None;
    }
    // Safety: four f32 lanes fill the register
    unsafe {
        let x = to_ps(v);
        let r = _mm_cvttps_epi32(x);
        // cvttps yields i32::MIN for NaN and out of range; lanes without the
        // sign bit set become i32::MAX
        let overflow = _mm_cmpeq_epi32(r, _mm_set1_epi32(i32::MIN));
        let negative = _mm_srai_epi32::<31>(_mm_castps_si128(x));
        Some(from_si(_mm_xor_si128(r, _mm_andnot_si128(negative, overflow))))
    }
}

/// Round-to-nearest-even
pub fn convert_to_float<T: FloatLane, const N: usize>(
    v: &Vector<T::Signed, N>,
) -> Option<Vector<T, N>> {
    if full::<T, N>()? != LaneType::F32 {
        return None;
    }
    // Safety: four i32 lanes fill the register
    unsafe { Some(from_ps(_mm_cvtepi32_ps(to_si(v)))) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation() {
        let v = Vector::<f32, 4>::from_array([3.9, -1e20, f32::NAN, -f32::NAN]);
        let r = convert_to_int(&v).map(|v| v.to_array());
        assert_eq!(r, Some([3, i32::MIN, i32::MAX, i32::MIN]));

        let inf = Vector::<f32, 4>::from_array([f32::INFINITY, 2147483648.0, -2147483648.0, -0.5]);
        let r = convert_to_int(&inf).map(|v| v.to_array());
        assert_eq!(r, Some([i32::MAX, i32::MAX, i32::MIN, 0]));
    }

    #[test]
    fn test_back_to_float() {
        let v = Vector::<i32, 4>::from_array([1, -7, 16_777_217, i32::MIN]);
        let f = convert_to_float::<f32, 4>(&v).map(|v| v.to_array());
        assert_eq!(f, Some([1.0, -7.0, 16_777_216.0, -2147483648.0]));
        assert!(convert_to_float::<f64, 2>(&Vector::from_array([1i64, 2])).is_none());
    }
}
