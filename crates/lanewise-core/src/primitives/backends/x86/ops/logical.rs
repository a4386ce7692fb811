//! Bitwise operations and selection; lane type only decides whether the
//! vector fills a register

use std::arch::x86_64::*;

use crate::lane::Lane;
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::{Mask, Vector};

#[inline(always)]
fn bitwise<T: Lane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
    op: impl Fn(__m128i, __m128i) -> __m128i,
) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe { Some(from_si(op(to_si(a), to_si(b)))) }
}

pub fn and<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    // Safety: SSE2 is part of the x86-64 baseline
    bitwise(a, b, |x, y| unsafe { _mm_and_si128(x, y) })
}

pub fn or<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    // Safety: SSE2 is part of the x86-64 baseline
    bitwise(a, b, |x, y| unsafe { _mm_or_si128(x, y) })
}

pub fn xor<T: Lane, const N: usize>(a: &Vector<T, N>, b: &Vector<T, N>) -> Option<Vector<T, N>> {
    // Safety: SSE2 is part of the x86-64 baseline
    bitwise(a, b, |x, y| unsafe { _mm_xor_si128(x, y) })
}

/// `!a & b`
pub fn and_not<T: Lane, const N: usize>(
    a: &Vector<T, N>,
    b: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    // Safety: SSE2 is part of the x86-64 baseline
    bitwise(a, b, |x, y| unsafe { _mm_andnot_si128(x, y) })
}

pub fn not<T: Lane, const N: usize>(v: &Vector<T, N>) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe { Some(from_si(_mm_xor_si128(to_si(v), all_ones()))) }
}

/// Bitwise select: bits of `yes` where `mask` is set, of `no` elsewhere
pub fn if_vec_then_else<T: Lane, const N: usize>(
    mask: &Vector<T, N>,
    yes: &Vector<T, N>,
    no: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe {
        let m = to_si(mask);
        Some(from_si(_mm_or_si128(
            _mm_and_si128(m, to_si(yes)),
            _mm_andnot_si128(m, to_si(no)),
        )))
    }
}

pub fn if_then_else<T: Lane, const N: usize>(
    m: &Mask<T, N>,
    yes: &Vector<T, N>,
    no: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe { Some(from_si(select_si(mask_si(m), to_si(yes), to_si(no)))) }
}

pub fn if_then_else_zero<T: Lane, const N: usize>(
    m: &Mask<T, N>,
    yes: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe { Some(from_si(_mm_and_si128(mask_si(m), to_si(yes)))) }
}

pub fn if_then_zero_else<T: Lane, const N: usize>(
    m: &Mask<T, N>,
    no: &Vector<T, N>,
) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    // Safety: checked full width above
    unsafe { Some(from_si(_mm_andnot_si128(mask_si(m), to_si(no)))) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitwise_select() {
        let m = Vector::<u32, 4>::from_array([0xFFFF_0000, 0, u32::MAX, 0x0F0F_0F0F]);
        let yes = Vector::<u32, 4>::splat(0xAAAA_AAAA);
        let no = Vector::<u32, 4>::splat(0x5555_5555);
        let r = if_vec_then_else(&m, &yes, &no).map(|v| v.to_array());
        assert_eq!(r, Some([0xAAAA_5555, 0x5555_5555, 0xAAAA_AAAA, 0x5A5A_5A5A]));
    }

    #[test]
    fn test_mask_select() {
        let m = Mask::<i16, 8>::from_bools([true, false, true, false, true, false, true, false]);
        let yes = Vector::<i16, 8>::splat(1);
        let no = Vector::<i16, 8>::splat(-1);
        assert_eq!(
            if_then_else(&m, &yes, &no).map(|v| v.to_array()),
            Some([1, -1, 1, -1, 1, -1, 1, -1])
        );
        assert_eq!(
            if_then_zero_else(&m, &no).map(|v| v.to_array()),
            Some([0, -1, 0, -1, 0, -1, 0, -1])
        );
        assert!(if_then_else_zero(&Mask::<i16, 4>::from_bools([true; 4]), &Vector::splat(1)).is_none());
    }
}
