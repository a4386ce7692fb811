//! Unaligned full-register loads and stores

use std::arch::x86_64::*;

use crate::lane::Lane;
use crate::primitives::backends::x86::dispatch::full;
use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

/// Panics when `src` holds fewer than `N` lanes
pub fn load_u<T: Lane, const N: usize>(src: &[T]) -> Option<Vector<T, N>> {
    full::<T, N>()?;
    let src = &src[..N];
    // Safety: `src` spans exactly 16 bytes
    unsafe { Some(from_si(_mm_loadu_si128(src.as_ptr().cast()))) }
}

/// Returns false, without writing, for partial vectors
pub fn store_u<T: Lane, const N: usize>(v: &Vector<T, N>, dst: &mut [T]) -> bool {
    if full::<T, N>().is_none() {
        return false;
    }
    let dst = &mut dst[..N];
    // Safety: `dst` spans exactly 16 bytes
    unsafe { _mm_storeu_si128(dst.as_mut_ptr().cast(), to_si(v)) };
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unaligned_round_trip() {
        let buf: Vec<u16> = (0..9).collect();
        let v = load_u::<u16, 8>(&buf[1..]).unwrap_or_default();
        assert_eq!(v.to_array(), [1, 2, 3, 4, 5, 6, 7, 8]);

        let mut out = [0u16; 9];
        assert!(store_u(&v, &mut out[1..]));
        assert_eq!(&out[1..], &buf[1..]);
        assert!(!store_u(&Vector::<u16, 4>::splat(1), &mut out));
    }
}
