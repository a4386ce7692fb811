//! Mask bit extraction with `movemask`

use std::arch::x86_64::*;

use crate::lane::{Lane, LaneType};
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::Mask;

/// Bit `i` set iff lane `i` is true
pub fn bits_from_mask<T: Lane, const N: usize>(m: &Mask<T, N>) -> Option<u64> {
    // Safety: full masks only
    unsafe {
        let ty = full::<T, N>()?;
        let x = mask_si(m);
        let bits = match ty {
            LaneType::U8 | LaneType::I8 => _mm_movemask_epi8(x),
            // lanes are 0 or -1, so signed saturation keeps them intact
            LaneType::U16 | LaneType::I16 => {
                _mm_movemask_epi8(_mm_packs_epi16(x, _mm_setzero_si128()))
            }
            LaneType::U32 | LaneType::I32 | LaneType::F32 => {
                _mm_movemask_ps(_mm_castsi128_ps(x))
            }
            LaneType::U64 | LaneType::I64 | LaneType::F64 => {
                _mm_movemask_pd(_mm_castsi128_pd(x))
            }
        };
        Some(bits as u32 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_width() {
        let m8 = Mask::<u8, 16>::from_bools(std::array::from_fn(|i| i % 3 == 0));
        assert_eq!(bits_from_mask(&m8), Some(0b1001_0010_0100_1001));

        let m16 = Mask::<i16, 8>::from_bools([false, true, true, false, false, false, false, true]);
        assert_eq!(bits_from_mask(&m16), Some(0b1000_0110));

        let m32 = Mask::<f32, 4>::from_bools([true, false, false, true]);
        assert_eq!(bits_from_mask(&m32), Some(0b1001));

        let m64 = Mask::<u64, 2>::from_bools([false, true]);
        assert_eq!(bits_from_mask(&m64), Some(0b10));

        assert_eq!(bits_from_mask(&Mask::<u8, 8>::from_bools([true; 8])), None);
    }
}
