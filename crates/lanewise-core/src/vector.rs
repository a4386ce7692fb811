//! Vector, mask and index value types
//!
//! [`Vector<T, N>`] is a plain 16-byte-aligned lane array. Backends that map it
//! onto hardware registers load and store it whole; the array layout is also
//! the byte view used for bit reinterpretation.
//!
//! [`Mask<T, N>`] keeps one word of `T`'s width per lane, every word all-zero
//! or all-one. [`Indices<T, N>`] holds lane offsets for table lookups.
//!
//! The arithmetic and bitwise operators on [`Vector`] are sugar for the
//! active backend's operations; `a += b` rebinds `a` to `a + b`.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Sub, SubAssign,
};

use crate::error::{Error, Result};
use crate::lane::{IntLane, Lane, SignedLane};
use crate::primitives::backends::{active, ActiveBackend};
use crate::primitives::{Ops, Primitives};
use crate::tag::{Tag, MAX_VECTOR_BYTES};

#[inline(always)]
pub(crate) const fn assert_shape<T: Lane, const N: usize>() {
    const {
        assert!(N.is_power_of_two(), "lane count must be a power of two");
        assert!(
            N * std::mem::size_of::<T>() <= MAX_VECTOR_BYTES,
            "vector exceeds 16 bytes"
        );
    }
}

/// `N` lanes of `T`
#[derive(Clone, Copy, PartialEq)]
#[repr(C, align(16))]
pub struct Vector<T: Lane, const N: usize> {
    pub(crate) raw: [T; N],
}

impl<T: Lane, const N: usize> Vector<T, N> {
    pub const LANES: usize = N;

    #[inline(always)]
    pub fn from_array(raw: [T; N]) -> Self {
        assert_shape::<T, N>();
        Self { raw }
    }

    /// Every lane set to `value`
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_array([value; N])
    }

    #[inline(always)]
    pub fn tag(&self) -> Tag<T, N> {
        Tag::new()
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.raw
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; N] {
        &self.raw
    }

    /// Lane `i`; panics when `i >= N`
    #[inline(always)]
    pub fn lane(&self, i: usize) -> T {
        self.raw[i]
    }

    /// First `N` lanes of `src`
    pub fn try_from_slice(src: &[T]) -> Result<Self> {
        if src.len() < N {
            return Err(Error::size_mismatch(N, src.len(), "vector from slice"));
        }
        let mut raw = [T::ZERO; N];
        raw.copy_from_slice(&src[..N]);
        Ok(Self::from_array(raw))
    }

    /// The lanes' bytes in memory order
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.raw)
    }

    /// Builds a vector from exactly `N * size_of::<T>()` bytes
    #[inline(always)]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_shape::<T, N>();
        let mut raw = [T::ZERO; N];
        bytemuck::cast_slice_mut::<T, u8>(&mut raw).copy_from_slice(bytes);
        Self { raw }
    }

    /// Copies as many bytes as both sides have, zero-filling the rest
    #[inline(always)]
    pub(crate) fn from_bytes_resized(bytes: &[u8]) -> Self {
        assert_shape::<T, N>();
        let mut raw = [T::ZERO; N];
        let dst = bytemuck::cast_slice_mut::<T, u8>(&mut raw);
        let n = dst.len().min(bytes.len());
        dst[..n].copy_from_slice(&bytes[..n]);
        Self { raw }
    }

    /// Bitwise equality; unlike `==`, NaN lanes with equal payloads compare equal
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<T: Lane, const N: usize> Default for Vector<T, N> {
    #[inline(always)]
    fn default() -> Self {
        Self::from_array([T::ZERO; N])
    }
}

impl<T: Lane, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline(always)]
    fn from(raw: [T; N]) -> Self {
        Self::from_array(raw)
    }
}

impl<T: Lane, const N: usize> fmt::Debug for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector<{}, {}>", T::TYPE.name(), N)?;
        f.debug_list().entries(self.raw.iter()).finish()
    }
}

/// One all-0 or all-1 word per lane
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Mask<T: Lane, const N: usize> {
    pub(crate) bits: [T::Unsigned; N],
}

impl<T: Lane, const N: usize> Mask<T, N> {
    #[inline(always)]
    pub(crate) fn from_words(bits: [T::Unsigned; N]) -> Self {
        assert_shape::<T, N>();
        Self { bits }
    }

    pub fn from_bools(lanes: [bool; N]) -> Self {
        let mut bits = [T::Unsigned::ZERO; N];
        for (word, set) in bits.iter_mut().zip(lanes) {
            if set {
                *word = T::Unsigned::HIGHEST;
            }
        }
        Self::from_words(bits)
    }

    pub fn to_bools(self) -> [bool; N] {
        let mut out = [false; N];
        for (o, word) in out.iter_mut().zip(self.bits) {
            *o = word != T::Unsigned::ZERO;
        }
        out
    }

    #[inline(always)]
    pub fn is_set(&self, i: usize) -> bool {
        self.bits[i] != T::Unsigned::ZERO
    }

    /// Reads `ceil(N / 8)` bytes, bit `i` (LSB first) selecting lane `i`
    pub fn try_from_bits(bytes: &[u8]) -> Result<Self> {
        let needed = N.div_ceil(8);
        if bytes.len() < needed {
            return Err(Error::size_mismatch(needed, bytes.len(), "mask bits"));
        }
        let mut lanes = [false; N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = (bytes[i / 8] >> (i % 8)) & 1 != 0;
        }
        Ok(Self::from_bools(lanes))
    }
}

impl<T: Lane, const N: usize> PartialEq for Mask<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T: Lane, const N: usize> Eq for Mask<T, N> {}

impl<T: Lane, const N: usize> fmt::Debug for Mask<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask<{}, {}>", T::TYPE.name(), N)?;
        f.debug_list().entries(self.to_bools()).finish()
    }
}

/// Lane offsets for `table_lookup_lanes`: `[0, N)` for one table, `[0, 2N)` for two
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Indices<T: Lane, const N: usize> {
    pub(crate) raw: [T::Unsigned; N],
}

impl<T: Lane, const N: usize> Indices<T, N> {
    #[inline(always)]
    pub(crate) fn from_words(raw: [T::Unsigned; N]) -> Self {
        assert_shape::<T, N>();
        Self { raw }
    }

    /// The offsets as `usize`
    pub fn to_array(self) -> [usize; N] {
        let mut out = [0usize; N];
        for (o, &w) in out.iter_mut().zip(self.raw.iter()) {
            *o = w.bits_u64() as usize;
        }
        out
    }
}

impl<T: Lane, const N: usize> PartialEq for Indices<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: Lane, const N: usize> fmt::Debug for Indices<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_array()).finish()
    }
}

macro_rules! impl_binary_sugar {
    ($($trait:ident::$method:ident, $assign:ident::$assign_method:ident => $op:ident;)*) => {$(
        impl<T: Lane, const N: usize> $trait for Vector<T, N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                <ActiveBackend as Primitives>::$op(&active(), self, rhs)
            }
        }

        impl<T: Lane, const N: usize> $assign for Vector<T, N> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = <ActiveBackend as Primitives>::$op(&active(), *self, rhs);
            }
        }
    )*};
}

impl_binary_sugar! {
    Add::add, AddAssign::add_assign => add;
    Sub::sub, SubAssign::sub_assign => sub;
    Mul::mul, MulAssign::mul_assign => mul;
    Div::div, DivAssign::div_assign => div;
    BitAnd::bitand, BitAndAssign::bitand_assign => and;
    BitOr::bitor, BitOrAssign::bitor_assign => or;
    BitXor::bitxor, BitXorAssign::bitxor_assign => xor;
}

impl<T: SignedLane, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        active().neg(self)
    }
}

impl<T: Lane, const N: usize> Not for Vector<T, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        active().not(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::align_of::<Vector<u8, 4>>(), 16);
        assert!(std::mem::size_of::<Vector<u32, 4>>() >= 16);
        assert!(std::mem::size_of::<Vector<f64, 1>>() >= 8);
    }

    #[test]
    fn test_slice_and_bytes() {
        let v = Vector::<u16, 4>::try_from_slice(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(v.to_array(), [1, 2, 3, 4]);
        assert_eq!(v.as_bytes(), &[1, 0, 2, 0, 3, 0, 4, 0]);
        assert_eq!(Vector::<u16, 4>::from_bytes(v.as_bytes()), v);

        let err = Vector::<u32, 4>::try_from_slice(&[1, 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in vector from slice: expected 4, got 2"
        );
    }

    #[test]
    fn test_resized_bytes() {
        let v = Vector::<u8, 4>::from_array([1, 2, 3, 4]);
        let wide = Vector::<u8, 8>::from_bytes_resized(v.as_bytes());
        assert_eq!(wide.to_array(), [1, 2, 3, 4, 0, 0, 0, 0]);
        let narrow = Vector::<u8, 2>::from_bytes_resized(v.as_bytes());
        assert_eq!(narrow.to_array(), [1, 2]);
    }

    #[test]
    fn test_mask_bits() {
        let m = Mask::<f32, 4>::from_bools([true, false, true, true]);
        assert_eq!(m.bits, [u32::MAX, 0, u32::MAX, u32::MAX]);
        assert_eq!(m.to_bools(), [true, false, true, true]);
        assert_eq!(Mask::<f32, 4>::try_from_bits(&[0b1101]).unwrap(), m);
        assert!(Mask::<u8, 16>::try_from_bits(&[0xFF]).is_err());
    }

    #[test]
    fn test_bit_eq_with_nan() {
        let a = Vector::<f32, 4>::splat(f32::NAN);
        assert_ne!(a, a);
        assert!(a.bit_eq(&a));
    }

    #[test]
    fn test_operator_sugar() {
        let a = Vector::<i32, 4>::from_array([1, -2, 3, i32::MAX]);
        let b = Vector::<i32, 4>::splat(1);
        assert_eq!((a + b).to_array(), [2, -1, 4, i32::MIN]);
        assert_eq!((-a).to_array(), [-1, 2, -3, -i32::MAX]);
        assert_eq!((!b).to_array(), [-2; 4]);

        let mut c = a;
        c *= Vector::splat(2);
        c -= b;
        assert_eq!(c.to_array(), [1, -5, 5, -3]);
    }
}
