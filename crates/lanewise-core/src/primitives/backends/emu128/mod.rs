//! Portable 16-byte backend over lane arrays
//!
//! Every primitive is a loop over the lanes using the per-lane semantics in
//! [`crate::lane`]. The loops are simple enough that the optimizer usually
//! turns them into whatever vector instructions the build target has.
//!
//! Besides the primitives, most composite operations are overridden with
//! direct lane loops (see [`ops`]); they produce bit-identical results to the
//! generic compositions.

mod ops;

use log::debug;

use crate::capabilities::Native;
use crate::lane::{FloatLane, IntLane, Lane};
use crate::primitives::{Backend, Primitives};
use crate::tag::Tag;
use crate::target::Target;
use crate::vector::{Mask, Vector};

/// Emulated 16-byte vectors; always available
#[derive(Clone, Copy, Debug, Default)]
pub struct Emu128Backend;

impl Emu128Backend {
    /// Create a new emulated backend
    pub fn new() -> Self {
        debug!(
            "Creating emu128 backend ({} native op families)",
            Self::NATIVE.iter().count()
        );
        Self
    }

    /// Always true
    pub fn is_available() -> bool {
        true
    }
}

#[inline(always)]
pub(crate) fn map<T: Lane, const N: usize>(v: Vector<T, N>, f: impl Fn(T) -> T) -> Vector<T, N> {
    Vector::from_array(v.raw.map(f))
}

#[inline(always)]
pub(crate) fn zip_map<T: Lane, const N: usize>(
    a: Vector<T, N>,
    b: Vector<T, N>,
    f: impl Fn(T, T) -> T,
) -> Vector<T, N> {
    Vector::from_array(std::array::from_fn(|i| f(a.raw[i], b.raw[i])))
}

/// Lane-wise function of the lanes' bit patterns
#[inline(always)]
pub(crate) fn bits_map<T: Lane, const N: usize>(
    a: Vector<T, N>,
    b: Vector<T, N>,
    f: impl Fn(T::Unsigned, T::Unsigned) -> T::Unsigned,
) -> Vector<T, N> {
    zip_map(a, b, |x, y| T::from_bits(f(x.to_bits(), y.to_bits())))
}

#[inline(always)]
pub(crate) fn mask_where<T: Lane, const N: usize>(f: impl Fn(usize) -> bool) -> Mask<T, N> {
    Mask::from_bools(std::array::from_fn(f))
}

impl Backend for Emu128Backend {
    const TARGET: Target = Target::Emu128;
    const NATIVE: Native = Native::IOTA
        .union(Native::LOGICAL3)
        .union(Native::BITWISE_IF_THEN_ELSE)
        .union(Native::IF_THEN_ELSE)
        .union(Native::MASK_LOGICAL)
        .union(Native::NEG_ABS)
        .union(Native::MUL_ADD)
        .union(Native::SATURATED_ADD_SUB)
        .union(Native::AVERAGE_ROUND)
        .union(Native::SHIFT_IMMEDIATE)
        .union(Native::ROTATE)
        .union(Native::COMPARE_DERIVED)
        .union(Native::ROUND)
        .union(Native::NEAREST_INT)
        .union(Native::FLOAT_CLASSIFY)
        .union(Native::LOAD_STORE_N)
        .union(Native::BLENDED_STORE)
        .union(Native::LANE_ACCESS)
        .union(Native::BROADCAST)
        .union(Native::TABLE_LOOKUP_LANES)
        .union(Native::REVERSE)
        .union(Native::REVERSE2_8)
        .union(Native::REVERSE_LANE_BYTES)
        .union(Native::REVERSE_BITS)
        .union(Native::INTERLEAVE)
        .union(Native::ODD_EVEN)
        .union(Native::CONCAT)
        .union(Native::SLIDE)
        .union(Native::COMPRESS)
        .union(Native::EXPAND)
        .union(Native::LOAD_STORE_INTERLEAVED)
        .union(Native::POPCNT)
        .union(Native::LEADING_ZERO_COUNT)
        .union(Native::REDUCTIONS)
        .union(Native::MASK_BITS)
        .union(Native::FIRST_N)
        .union(Native::PROMOTE_DEMOTE)
        .union(Native::GATHER_SCATTER)
        .union(Native::SUMS_OF_8_ABS_DIFF);
}

impl Primitives for Emu128Backend {
    #[inline(always)]
    fn set<T: Lane, const N: usize>(&self, _d: Tag<T, N>, value: T) -> Vector<T, N> {
        Vector::splat(value)
    }

    #[inline(always)]
    fn and<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        bits_map(a, b, |x, y| x & y)
    }

    #[inline(always)]
    fn or<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        bits_map(a, b, |x, y| x | y)
    }

    #[inline(always)]
    fn xor<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        bits_map(a, b, |x, y| x ^ y)
    }

    #[inline(always)]
    fn and_not<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        bits_map(a, b, |x, y| !x & y)
    }

    #[inline(always)]
    fn add<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_add)
    }

    #[inline(always)]
    fn sub<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_sub)
    }

    #[inline(always)]
    fn mul<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_mul)
    }

    #[inline(always)]
    fn div<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_div)
    }

    #[inline(always)]
    fn min<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_min)
    }

    #[inline(always)]
    fn max<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        zip_map(a, b, T::lane_max)
    }

    #[inline(always)]
    fn sqrt<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        map(v, T::lane_sqrt)
    }

    #[inline(always)]
    fn shl<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        zip_map(v, counts, |x, c| x.lane_shl(c.bits_u64() as u32))
    }

    #[inline(always)]
    fn shr<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N> {
        zip_map(v, counts, |x, c| x.lane_shr(c.bits_u64() as u32))
    }

    #[inline(always)]
    fn eq<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] == b.raw[i])
    }

    #[inline(always)]
    fn lt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        mask_where(|i| a.raw[i] < b.raw[i])
    }

    #[inline(always)]
    fn mask_from_vec<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        Mask::from_words(v.raw.map(T::to_bits))
    }

    #[inline(always)]
    fn vec_from_mask<T: Lane, const N: usize>(&self, _d: Tag<T, N>, m: Mask<T, N>)
        -> Vector<T, N> {
        Vector::from_array(m.bits.map(T::from_bits))
    }

    #[inline(always)]
    fn convert_to_int<T: FloatLane, const N: usize>(
        &self,
        _d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N> {
        Vector::from_array(v.raw.map(T::to_int_saturating))
    }

    #[inline(always)]
    fn convert_to_float<T: FloatLane, const N: usize>(
        &self,
        _d: Tag<T, N>,
        v: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        Vector::from_array(v.raw.map(T::from_int))
    }

    #[inline(always)]
    fn load_u<T: Lane, const N: usize>(&self, _d: Tag<T, N>, src: &[T]) -> Vector<T, N> {
        let mut raw = [T::ZERO; N];
        raw.copy_from_slice(&src[..N]);
        Vector::from_array(raw)
    }

    #[inline(always)]
    fn store_u<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]) {
        dst[..N].copy_from_slice(&v.raw);
    }

    #[inline(always)]
    fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
        &self,
        bytes: Vector<T, N>,
        indices: Vector<I, M>,
    ) -> Vector<I, M> {
        let table = bytes.as_bytes();
        let wrap = table.len() - 1;
        let idx = indices.as_bytes();
        let mut out = [0u8; 16];
        for (o, &i) in out.iter_mut().zip(idx) {
            *o = if i & 0x80 != 0 { 0 } else { table[usize::from(i) & wrap] };
        }
        Vector::from_bytes(&out[..idx.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{generic, Ops};

    #[test]
    fn test_backend_identity() {
        let be = Emu128Backend::new();
        assert_eq!(be.name(), "emu128");
        assert!(Emu128Backend::is_available());
        assert_eq!(be.max_lanes::<u8>(), 16);
        assert_eq!(be.max_lanes::<f64>(), 2);
        assert!(be.is_native(Native::COMPRESS));
        assert!(!be.is_native(Native::AES));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let be = Emu128Backend;
        let a = Vector::<u8, 16>::splat(250);
        let b = Vector::splat(10);
        assert_eq!(be.add(a, b).to_array(), [4; 16]);
        assert_eq!(be.sub(b, a).to_array(), [16; 16]);

        let x = Vector::<i32, 4>::from_array([7, -7, i32::MIN, 5]);
        let y = Vector::from_array([0, 2, -1, -2]);
        assert_eq!(be.div(x, y).to_array(), [0, -3, i32::MIN, -2]);
    }

    #[test]
    fn test_table_lookup_bytes() {
        let be = Emu128Backend;
        let table = Vector::<u8, 16>::from_array(std::array::from_fn(|i| 100 + i as u8));
        let idx = Vector::<u8, 16>::from_array([0, 15, 16, 31, 0x80, 0xFF, 3, 2, 1, 0, 5, 5, 5, 5, 5, 5]);
        let r = be.table_lookup_bytes(table, idx).to_array();
        assert_eq!(&r[..8], &[100, 115, 100, 115, 0, 0, 103, 102]);

        // 8-byte table: indices wrap modulo 8
        let small = Vector::<u16, 4>::from_array([0x0100, 0x0302, 0x0504, 0x0706]);
        let idx = Vector::<u8, 8>::from_array([8, 9, 0, 1, 7, 6, 0x90, 2]);
        assert_eq!(be.table_lookup_bytes(small, idx).to_array(), [0, 1, 0, 1, 7, 6, 0, 2]);
    }

    #[test]
    fn test_float_conversion() {
        let be = Emu128Backend;
        let d = Tag::<f32, 4>::new();
        let v = Vector::from_array([1.9f32, -1.9, f32::NAN, 3e10]);
        let i = be.convert_to_int(d.to_signed(), v);
        assert_eq!(i.to_array(), [1, -1, i32::MAX, i32::MAX]);
        let back = be.convert_to_float(d, i);
        assert_eq!(back.to_array()[..2], [1.0, -1.0]);
    }

    #[test]
    fn test_generic_matches_native_for_masks() {
        let be = Emu128Backend;
        let a = Mask::<u16, 8>::from_bools([true, false, true, false, true, true, false, false]);
        let b = Mask::<u16, 8>::from_bools([true, true, false, false, false, true, true, false]);
        assert_eq!(be.mask_and(a, b), generic::mask_and(&be, a, b));
        assert_eq!(be.mask_and_not(a, b), generic::mask_and_not(&be, a, b));
        assert_eq!(be.exclusive_neither(a, b), generic::exclusive_neither(&be, a, b));
        assert_eq!(be.set_only_first(b), generic::set_only_first(&be, b));
    }
}
