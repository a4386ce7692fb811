//! Backend traits
//!
//! [`Primitives`] is the narrow set every backend must implement itself: the
//! operations that touch the vector representation or a hardware instruction.
//! [`Ops`] is everything else. Each of its methods has a default that runs the
//! backend-independent composition in [`generic`], built only from other
//! operations; a backend overrides a method to supply a native version and
//! lists the method's family in [`Backend::NATIVE`].
//!
//! Trait coherence gives exactly one definition per backend and operation: a
//! second override of the same method does not compile, and a method that is
//! not overridden falls back to the generic one.

use std::fmt;

use crate::capabilities::Native;
use crate::lane::{
    FloatLane, IntLane, Lane, Narrow, SignedIntLane, SignedLane, UnsignedLane, Widen,
};
use crate::primitives::generic;
use crate::tag::Tag;
use crate::target::Target;
use crate::tuple::{Vec2, Vec3, Vec4};
use crate::vector::{Indices, Mask, Vector};

/// Identity of a backend
pub trait Backend: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Which member of the sealed target set this is
    const TARGET: Target;
    /// Operation families this backend implements natively
    const NATIVE: Native;
    /// Widest vector, in bytes
    const MAX_BYTES: usize = crate::tag::MAX_VECTOR_BYTES;

    /// Get the name of this backend
    fn name(&self) -> &'static str {
        Self::TARGET.name()
    }

    /// Most lanes of `T` one vector can hold
    fn max_lanes<T: Lane>(&self) -> usize {
        (Self::MAX_BYTES / std::mem::size_of::<T>()).max(1)
    }

    /// Whether `family` runs native code rather than the generic composition
    fn is_native(&self, family: Native) -> bool {
        Self::NATIVE.contains(family)
    }
}

/// Operations each backend must provide
pub trait Primitives: Backend {
    /// Every lane set to `value`
    fn set<T: Lane, const N: usize>(&self, d: Tag<T, N>, value: T) -> Vector<T, N>;

    fn and<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    fn or<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    fn xor<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// `!a & b`
    fn and_not<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N>;

    /// Wrapping for integers
    fn add<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// Wrapping for integers
    fn sub<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// Wrapping for integers
    fn mul<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// Integer division by zero yields zero
    fn div<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// For floats, a NaN operand loses to the other operand
    fn min<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    /// For floats, a NaN operand loses to the other operand
    fn max<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N>;
    fn sqrt<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N>;

    /// Per-lane left shift, counts taken modulo the lane width
    fn shl<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N>;
    /// Per-lane right shift (arithmetic for signed lanes), counts taken modulo the lane width
    fn shr<T: IntLane, const N: usize>(&self, v: Vector<T, N>, counts: Vector<T, N>)
        -> Vector<T, N>;

    /// IEEE equality: NaN is unequal to everything
    fn eq<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N>;
    /// IEEE ordering: false when either operand is NaN
    fn lt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N>;

    /// Every lane of `v` must already be all-0 or all-1
    fn mask_from_vec<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N>;
    fn vec_from_mask<T: Lane, const N: usize>(&self, d: Tag<T, N>, m: Mask<T, N>)
        -> Vector<T, N>;

    /// Truncating conversion; out-of-range lanes saturate, NaN clamps by its sign bit
    fn convert_to_int<T: FloatLane, const N: usize>(
        &self,
        d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N>;
    fn convert_to_float<T: FloatLane, const N: usize>(
        &self,
        d: Tag<T, N>,
        v: Vector<T::Signed, N>,
    ) -> Vector<T, N>;

    /// Loads `N` lanes; `src` must hold at least `N`
    fn load_u<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vector<T, N>;
    /// Stores `N` lanes; `dst` must hold at least `N`
    fn store_u<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]);

    /// Gathers bytes of `bytes` at the byte offsets held in `indices`.
    ///
    /// An index byte with bit 7 set yields 0; otherwise it is taken modulo the
    /// byte width of `bytes`. The result has the type of `indices`.
    fn table_lookup_bytes<T: Lane, I: Lane, const N: usize, const M: usize>(
        &self,
        bytes: Vector<T, N>,
        indices: Vector<I, M>,
    ) -> Vector<I, M>;
}

/// Every operation beyond [`Primitives`], with generic defaults
pub trait Ops: Primitives {
    // ------------------------------ Construction

    fn zero<T: Lane, const N: usize>(&self, d: Tag<T, N>) -> Vector<T, N> {
        self.set(d, T::ZERO)
    }

    /// Contents unspecified; this crate returns zero
    fn undefined<T: Lane, const N: usize>(&self, d: Tag<T, N>) -> Vector<T, N> {
        self.zero(d)
    }

    /// Lane `i` is `first + i`, wrapping per lane width
    fn iota<T: Lane, const N: usize>(&self, d: Tag<T, N>, first: T) -> Vector<T, N> {
        generic::iota(self, d, first)
    }

    /// Only the sign bit set in every lane
    fn sign_bit<T: SignedLane, const N: usize>(&self, d: Tag<T, N>) -> Vector<T, N> {
        generic::sign_bit(self, d)
    }

    fn nan<T: FloatLane, const N: usize>(&self, d: Tag<T, N>) -> Vector<T, N> {
        self.set(d, T::nan())
    }

    fn inf<T: FloatLane, const N: usize>(&self, d: Tag<T, N>) -> Vector<T, N> {
        self.set(d, T::infinity())
    }

    /// Lanes `[0, min(n, N))` true
    fn first_n<T: Lane, const N: usize>(&self, d: Tag<T, N>, n: usize) -> Mask<T, N> {
        generic::first_n(self, d, n)
    }

    // ------------------------------ Bit reinterpretation

    /// Same bits, other lane type; total widths must match
    fn bit_cast<T: Lane, U: Lane, const N: usize, const M: usize>(
        &self,
        d: Tag<U, M>,
        v: Vector<T, N>,
    ) -> Vector<U, M> {
        generic::bit_cast(self, d, v)
    }

    /// Same bits, truncated or zero-extended to the width of `d`
    fn resize_bit_cast<T: Lane, U: Lane, const N: usize, const M: usize>(
        &self,
        d: Tag<U, M>,
        v: Vector<T, N>,
    ) -> Vector<U, M> {
        generic::resize_bit_cast(self, d, v)
    }

    /// Reinterprets a mask for a same-width lane type
    fn rebind_mask<T: Lane, U: Lane, const N: usize>(
        &self,
        d: Tag<U, N>,
        m: Mask<T, N>,
    ) -> Mask<U, N> {
        generic::rebind_mask(self, d, m)
    }

    // ------------------------------ Logical

    fn not<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::not(self, v)
    }

    fn xor3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::xor3(self, a, b, c)
    }

    fn or3<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        c: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::or3(self, a, b, c)
    }

    /// `o | (a1 & a2)`
    fn or_and<T: Lane, const N: usize>(
        &self,
        o: Vector<T, N>,
        a1: Vector<T, N>,
        a2: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::or_and(self, o, a1, a2)
    }

    /// Bitwise select: bits of `yes` where `mask` bits are set, else bits of `no`
    fn if_vec_then_else<T: Lane, const N: usize>(
        &self,
        mask: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::if_vec_then_else(self, mask, yes, no)
    }

    /// Magnitude of `magn`, sign of `sign`
    fn copy_sign<T: FloatLane, const N: usize>(
        &self,
        magn: Vector<T, N>,
        sign: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::copy_sign(self, magn, sign)
    }

    /// Like `copy_sign` when `abs` is known to have a clear sign bit
    fn copy_sign_to_abs<T: FloatLane, const N: usize>(
        &self,
        abs: Vector<T, N>,
        sign: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::copy_sign_to_abs(self, abs, sign)
    }

    // ------------------------------ Selection

    fn if_then_else<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::if_then_else(self, m, yes, no)
    }

    fn if_then_else_zero<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        yes: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::if_then_else_zero(self, m, yes)
    }

    fn if_then_zero_else<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::if_then_zero_else(self, m, no)
    }

    /// Selects by the sign bit of each lane of `v`
    fn if_negative_then_else<T: SignedLane, const N: usize>(
        &self,
        v: Vector<T, N>,
        yes: Vector<T, N>,
        no: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::if_negative_then_else(self, v, yes, no)
    }

    fn zero_if_negative<T: SignedLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::zero_if_negative(self, v)
    }

    fn mask_not<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        generic::mask_not(self, m)
    }

    fn mask_and<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        generic::mask_and(self, a, b)
    }

    fn mask_or<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        generic::mask_or(self, a, b)
    }

    fn mask_xor<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        generic::mask_xor(self, a, b)
    }

    /// `!a & b`
    fn mask_and_not<T: Lane, const N: usize>(&self, a: Mask<T, N>, b: Mask<T, N>) -> Mask<T, N> {
        generic::mask_and_not(self, a, b)
    }

    /// `!(a | b)`
    fn exclusive_neither<T: Lane, const N: usize>(
        &self,
        a: Mask<T, N>,
        b: Mask<T, N>,
    ) -> Mask<T, N> {
        generic::exclusive_neither(self, a, b)
    }

    // ------------------------------ Arithmetic

    /// Wrapping for integers; flips the sign bit for floats
    fn neg<T: SignedLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::neg(self, v)
    }

    /// The signed minimum maps to itself
    fn abs<T: SignedLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::abs(self, v)
    }

    /// `|a - b|`; for integers `max - min`, wrapping
    fn abs_diff<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Vector<T, N> {
        generic::abs_diff(self, a, b)
    }

    /// Per group of eight bytes, the sum of their absolute differences
    fn sums_of8_abs_diff<const N: usize, const M: usize>(
        &self,
        d64: Tag<u64, M>,
        a: Vector<u8, N>,
        b: Vector<u8, N>,
    ) -> Vector<u64, M> {
        generic::sums_of8_abs_diff(self, d64, a, b)
    }

    /// `min(max(v, lo), hi)`
    fn clamp<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        lo: Vector<T, N>,
        hi: Vector<T, N>,
    ) -> Vector<T, N> {
        self.min(self.max(v, lo), hi)
    }

    /// `mul * x + add`
    fn mul_add<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        add: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::mul_add(self, mul, x, add)
    }

    /// `add - mul * x`
    fn neg_mul_add<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        add: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::neg_mul_add(self, mul, x, add)
    }

    /// `mul * x - sub`
    fn mul_sub<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        sub: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::mul_sub(self, mul, x, sub)
    }

    /// `-(mul * x) - sub`
    fn neg_mul_sub<T: Lane, const N: usize>(
        &self,
        mul: Vector<T, N>,
        x: Vector<T, N>,
        sub: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::neg_mul_sub(self, mul, x, sub)
    }

    fn saturated_add<T: IntLane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::saturated_add(self, a, b)
    }

    fn saturated_sub<T: IntLane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::saturated_sub(self, a, b)
    }

    /// `(a + b + 1) / 2` without overflow
    fn average_round<T: UnsignedLane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::average_round(self, a, b)
    }

    // ------------------------------ Shifts

    /// `K` must be below the lane width
    fn shift_left<const K: u32, T: IntLane, const N: usize>(
        &self,
        v: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::shift_left::<K, _, T, N>(self, v)
    }

    /// Arithmetic for signed lanes; `K` must be below the lane width
    fn shift_right<const K: u32, T: IntLane, const N: usize>(
        &self,
        v: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::shift_right::<K, _, T, N>(self, v)
    }

    /// Bitwise rotation; `K` must be below the lane width
    fn rotate_right<const K: u32, T: IntLane, const N: usize>(
        &self,
        v: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::rotate_right::<K, _, T, N>(self, v)
    }

    /// Same runtime count for all lanes, taken modulo the lane width
    fn shift_left_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        generic::shift_left_same(self, v, bits)
    }

    /// Same runtime count for all lanes, taken modulo the lane width
    fn shift_right_same<T: IntLane, const N: usize>(&self, v: Vector<T, N>, bits: u32)
        -> Vector<T, N> {
        generic::shift_right_same(self, v, bits)
    }

    /// All-ones for negative lanes, zero otherwise
    fn broadcast_sign_bit<T: SignedIntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::broadcast_sign_bit(self, v)
    }

    // ------------------------------ Compare

    fn ne<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        generic::ne(self, a, b)
    }

    fn gt<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        generic::gt(self, a, b)
    }

    fn le<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        generic::le(self, a, b)
    }

    fn ge<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>) -> Mask<T, N> {
        generic::ge(self, a, b)
    }

    // ------------------------------ Rounding and classification

    /// Round half to even
    fn round<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::round(self, v)
    }

    fn trunc<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::trunc(self, v)
    }

    fn ceil<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::ceil(self, v)
    }

    fn floor<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::floor(self, v)
    }

    /// Round half to even, then saturating conversion
    fn nearest_int<T: FloatLane, const N: usize>(
        &self,
        d: Tag<T::Signed, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Signed, N> {
        generic::nearest_int(self, d, v)
    }

    fn is_nan<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        generic::is_nan(self, v)
    }

    fn is_inf<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        generic::is_inf(self, v)
    }

    fn is_finite<T: FloatLane, const N: usize>(&self, v: Vector<T, N>) -> Mask<T, N> {
        generic::is_finite(self, v)
    }

    // ------------------------------ Memory

    /// Like `load_u`; `src` should be aligned to the vector width
    fn load<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vector<T, N> {
        generic::load(self, d, src)
    }

    /// Like `store_u`; `dst` should be aligned to the vector width
    fn store<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]) {
        generic::store(self, v, dst)
    }

    /// Reads lanes up to the last true lane of `m`; false lanes are zero
    fn masked_load<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        d: Tag<T, N>,
        src: &[T],
    ) -> Vector<T, N> {
        generic::masked_load(self, m, d, src)
    }

    /// Like `masked_load` with false lanes taken from `no`
    fn masked_load_or<T: Lane, const N: usize>(
        &self,
        no: Vector<T, N>,
        m: Mask<T, N>,
        d: Tag<T, N>,
        src: &[T],
    ) -> Vector<T, N> {
        generic::masked_load_or(self, no, m, d, src)
    }

    /// Reads `min(max_lanes, N, src.len())` lanes, zeroing the rest
    fn load_n<T: Lane, const N: usize>(
        &self,
        d: Tag<T, N>,
        src: &[T],
        max_lanes: usize,
    ) -> Vector<T, N> {
        generic::load_n(self, d, src, max_lanes)
    }

    /// Like `load_n` with unread lanes taken from `no`
    fn load_n_or<T: Lane, const N: usize>(
        &self,
        no: Vector<T, N>,
        d: Tag<T, N>,
        src: &[T],
        max_lanes: usize,
    ) -> Vector<T, N> {
        generic::load_n_or(self, no, d, src, max_lanes)
    }

    /// Writes `min(max_lanes, N, dst.len())` lanes and nothing else
    fn store_n<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T], max_lanes: usize) {
        generic::store_n(self, v, dst, max_lanes)
    }

    /// Writes only the lanes where `m` is true
    fn blended_store<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>, dst: &mut [T]) {
        generic::blended_store(self, v, m, dst)
    }

    /// Non-temporal hint; same effect as `store`
    fn stream<T: Lane, const N: usize>(&self, v: Vector<T, N>, dst: &mut [T]) {
        self.store(v, dst)
    }

    /// Writes `value` to the first `min(num, dst.len())` lanes of `dst`
    fn safe_fill_n<T: Lane, const N: usize>(&self, num: usize, value: T, d: Tag<T, N>, dst: &mut [T]) {
        generic::safe_fill_n(self, num, value, d, dst)
    }

    /// Copies the first `min(num, from.len(), to.len())` lanes
    fn safe_copy_n<T: Lane, const N: usize>(&self, num: usize, d: Tag<T, N>, from: &[T], to: &mut [T]) {
        generic::safe_copy_n(self, num, d, from, to)
    }

    /// `r[i] = base[index[i]]`; panics if an index is outside `base`
    fn gather_index<T: Lane, const N: usize>(
        &self,
        d: Tag<T, N>,
        base: &[T],
        index: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        generic::gather_index(self, d, base, index)
    }

    /// Like `gather_index`; false lanes are zero and their indices are ignored
    fn masked_gather_index<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        d: Tag<T, N>,
        base: &[T],
        index: Vector<T::Signed, N>,
    ) -> Vector<T, N> {
        generic::masked_gather_index(self, m, d, base, index)
    }

    /// `base[index[i]] = v[i]`; for a repeated index the highest lane wins
    fn scatter_index<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        d: Tag<T, N>,
        base: &mut [T],
        index: Vector<T::Signed, N>,
    ) {
        generic::scatter_index(self, v, d, base, index)
    }

    /// Like `scatter_index`, writing only the true lanes
    fn masked_scatter_index<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        d: Tag<T, N>,
        base: &mut [T],
        index: Vector<T::Signed, N>,
    ) {
        generic::masked_scatter_index(self, v, m, d, base, index)
    }

    // ------------------------------ Lane access

    /// Lane `i`; `i` must be below `N`
    fn extract_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>, i: usize) -> T {
        generic::extract_lane(self, v, i)
    }

    /// `v` with lane `i` replaced by `value`
    fn insert_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>, i: usize, value: T)
        -> Vector<T, N> {
        generic::insert_lane(self, v, i, value)
    }

    /// Lane 0
    fn get_lane<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> T {
        self.extract_lane(v, 0)
    }

    // ------------------------------ Permutation

    /// Lane `LANE` copied to every lane
    fn broadcast<const LANE: usize, T: Lane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::broadcast::<LANE, _, T, N>(self, v)
    }

    /// Identical to `table_lookup_bytes`: index bytes with bit 7 set yield 0
    fn table_lookup_bytes_or0<T: Lane, I: Lane, const N: usize, const M: usize>(
        &self,
        bytes: Vector<T, N>,
        indices: Vector<I, M>,
    ) -> Vector<I, M> {
        self.table_lookup_bytes(bytes, indices)
    }

    /// Lane offsets from a same-width integer vector
    fn indices_from_vec<T: Lane, I: IntLane, const N: usize>(
        &self,
        d: Tag<T, N>,
        v: Vector<I, N>,
    ) -> Indices<T, N> {
        generic::indices_from_vec(self, d, v)
    }

    /// Lane offsets from the first `N` entries of `idx`
    fn set_table_indices<T: Lane, const N: usize>(&self, d: Tag<T, N>, idx: &[usize])
        -> Indices<T, N> {
        generic::set_table_indices(self, d, idx)
    }

    /// `v[idx[i] & (N - 1)]`
    fn table_lookup_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, idx: Indices<T, N>)
        -> Vector<T, N> {
        generic::table_lookup_lanes(self, v, idx)
    }

    /// Lanes of `a` for offsets below `N`, of `b` for offsets in `[N, 2N)`
    fn two_tables_lookup_lanes<T: Lane, const N: usize>(
        &self,
        a: Vector<T, N>,
        b: Vector<T, N>,
        idx: Indices<T, N>,
    ) -> Vector<T, N> {
        generic::two_tables_lookup_lanes(self, a, b, idx)
    }

    /// Lane `i` becomes lane `N - 1 - i`
    fn reverse<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse(self, v)
    }

    /// Reverses each pair of lanes; needs `N >= 2`
    fn reverse2<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse2(self, v)
    }

    /// Reverses each group of four lanes; needs `N >= 4`
    fn reverse4<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse4(self, v)
    }

    /// Reverses each group of eight lanes; needs `N >= 8`
    fn reverse8<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse8(self, v)
    }

    /// Byte order reversed within each lane
    fn reverse_lane_bytes<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse_lane_bytes(self, v)
    }

    /// Bit order reversed within each lane
    fn reverse_bits<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::reverse_bits(self, v)
    }

    /// `r[2i] = a[i]`, `r[2i + 1] = b[i]` for the lower half; `a` when `N == 1`
    fn interleave_lower<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        generic::interleave_lower(self, a, b)
    }

    /// `r[2i] = a[N/2 + i]`, `r[2i + 1] = b[N/2 + i]`; needs `N >= 2`
    fn interleave_upper<T: Lane, const N: usize>(&self, a: Vector<T, N>, b: Vector<T, N>)
        -> Vector<T, N> {
        generic::interleave_upper(self, a, b)
    }

    /// `interleave_lower` reinterpreted as lanes of twice the width
    fn zip_lower<T: Lane, W: Lane, const N: usize, const M: usize>(
        &self,
        dw: Tag<W, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<W, M> {
        generic::zip_lower(self, dw, a, b)
    }

    /// `interleave_upper` reinterpreted as lanes of twice the width
    fn zip_upper<T: Lane, W: Lane, const N: usize, const M: usize>(
        &self,
        dw: Tag<W, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<W, M> {
        generic::zip_upper(self, dw, a, b)
    }

    /// Odd lanes from `odd`, even lanes from `even`
    fn odd_even<T: Lane, const N: usize>(&self, odd: Vector<T, N>, even: Vector<T, N>)
        -> Vector<T, N> {
        generic::odd_even(self, odd, even)
    }

    /// `r[i] = v[i & !1]`
    fn dup_even<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::dup_even(self, v)
    }

    /// `r[i] = v[i | 1]`
    fn dup_odd<T: Lane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::dup_odd(self, v)
    }

    /// Even lanes of `lo` then even lanes of `hi`
    fn concat_even<T: Lane, const N: usize>(&self, hi: Vector<T, N>, lo: Vector<T, N>)
        -> Vector<T, N> {
        generic::concat_even(self, hi, lo)
    }

    /// Odd lanes of `lo` then odd lanes of `hi`
    fn concat_odd<T: Lane, const N: usize>(&self, hi: Vector<T, N>, lo: Vector<T, N>)
        -> Vector<T, N> {
        generic::concat_odd(self, hi, lo)
    }

    fn lower_half<T: Lane, const N: usize, const H: usize>(
        &self,
        dh: Tag<T, H>,
        v: Vector<T, N>,
    ) -> Vector<T, H> {
        generic::lower_half(self, dh, v)
    }

    fn upper_half<T: Lane, const N: usize, const H: usize>(
        &self,
        dh: Tag<T, H>,
        v: Vector<T, N>,
    ) -> Vector<T, H> {
        generic::upper_half(self, dh, v)
    }

    /// `lo` in the lower half, `hi` in the upper half
    fn combine<T: Lane, const N: usize, const H: usize>(
        &self,
        d: Tag<T, N>,
        hi: Vector<T, H>,
        lo: Vector<T, H>,
    ) -> Vector<T, N> {
        generic::combine(self, d, hi, lo)
    }

    /// `r[i] = v[i - amt]`, zero below `amt`
    fn slide_up_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize) -> Vector<T, N> {
        generic::slide_up_lanes(self, v, amt)
    }

    /// `r[i] = v[i + amt]`, zero from `N - amt`
    fn slide_down_lanes<T: Lane, const N: usize>(&self, v: Vector<T, N>, amt: usize)
        -> Vector<T, N> {
        generic::slide_down_lanes(self, v, amt)
    }

    fn slide1_up<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>) -> Vector<T, N> {
        generic::slide1_up(self, d, v)
    }

    fn slide1_down<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::slide1_down(self, d, v)
    }

    /// Lanes `K..K + N` of the concatenation with `lo` in the lower half
    fn combine_shift_right_lanes<const K: usize, T: Lane, const N: usize>(
        &self,
        d: Tag<T, N>,
        hi: Vector<T, N>,
        lo: Vector<T, N>,
    ) -> Vector<T, N> {
        generic::combine_shift_right_lanes::<K, _, T, N>(self, d, hi, lo)
    }

    // ------------------------------ Promotion and demotion

    /// Each lane converted exactly to the twice-as-wide type of the same kind
    fn promote_to<T: Widen, const N: usize>(
        &self,
        dw: Tag<T::Wide, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, N> {
        generic::promote_to(self, dw, v)
    }

    fn promote_lower_to<T: Widen, const N: usize, const H: usize>(
        &self,
        dw: Tag<T::Wide, H>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, H> {
        generic::promote_lower_to(self, dw, v)
    }

    fn promote_upper_to<T: Widen, const N: usize, const H: usize>(
        &self,
        dw: Tag<T::Wide, H>,
        v: Vector<T, N>,
    ) -> Vector<T::Wide, H> {
        generic::promote_upper_to(self, dw, v)
    }

    /// Integers saturate to the narrow range; `f64` rounds to nearest
    fn demote_to<T: Narrow, const N: usize>(
        &self,
        dn: Tag<T::Narrow, N>,
        v: Vector<T, N>,
    ) -> Vector<T::Narrow, N> {
        generic::demote_to(self, dn, v)
    }

    /// Both inputs demoted into one vector, lane order unspecified
    fn reorder_demote2_to<T: Narrow, const N: usize, const M: usize>(
        &self,
        dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        self.ordered_demote2_to(dn, a, b)
    }

    /// Demoted `a` in the lower half, demoted `b` in the upper half
    fn ordered_demote2_to<T: Narrow, const N: usize, const M: usize>(
        &self,
        dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        generic::ordered_demote2_to(self, dn, a, b)
    }

    /// Low half of each lane of `a`, then of `b`
    fn ordered_truncate2_to<T: UnsignedLane + Narrow, const N: usize, const M: usize>(
        &self,
        dn: Tag<T::Narrow, M>,
        a: Vector<T, N>,
        b: Vector<T, N>,
    ) -> Vector<T::Narrow, M> {
        generic::ordered_truncate2_to(self, dn, a, b)
    }

    // ------------------------------ Compress and expand

    /// Whether `compress` keeps the false lanes in order too
    fn compress_is_partition<T: Lane>(&self) -> bool {
        true
    }

    /// True lanes first in order, then the false lanes
    fn compress<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>) -> Vector<T, N> {
        generic::compress(self, v, m)
    }

    fn compress_not<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>)
        -> Vector<T, N> {
        self.compress(v, self.mask_not(m))
    }

    /// Stores all `N` lanes of `compress(v, m)`; returns the number of true lanes
    fn compress_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        generic::compress_store(self, v, m, dst)
    }

    /// Stores only the true lanes; returns their count
    fn compress_blended_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        m: Mask<T, N>,
        dst: &mut [T],
    ) -> usize {
        generic::compress_blended_store(self, v, m, dst)
    }

    /// `compress` with the mask given as packed bits
    fn compress_bits<T: Lane, const N: usize>(&self, v: Vector<T, N>, bits: &[u8]) -> Vector<T, N> {
        generic::compress_bits(self, v, bits)
    }

    fn compress_bits_store<T: Lane, const N: usize>(
        &self,
        v: Vector<T, N>,
        bits: &[u8],
        dst: &mut [T],
    ) -> usize {
        generic::compress_bits_store(self, v, bits, dst)
    }

    /// Consecutive lanes of `v` scattered to the true lanes of `m`, zero elsewhere
    fn expand<T: Lane, const N: usize>(&self, v: Vector<T, N>, m: Mask<T, N>) -> Vector<T, N> {
        generic::expand(self, v, m)
    }

    /// Reads `count_true(m)` lanes and expands them
    fn load_expand<T: Lane, const N: usize>(
        &self,
        m: Mask<T, N>,
        d: Tag<T, N>,
        src: &[T],
    ) -> Vector<T, N> {
        generic::load_expand(self, m, d, src)
    }

    // ------------------------------ Interleaved memory

    fn load_interleaved2<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vec2<T, N> {
        generic::load_interleaved2(self, d, src)
    }

    fn load_interleaved3<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vec3<T, N> {
        generic::load_interleaved3(self, d, src)
    }

    fn load_interleaved4<T: Lane, const N: usize>(&self, d: Tag<T, N>, src: &[T]) -> Vec4<T, N> {
        generic::load_interleaved4(self, d, src)
    }

    fn store_interleaved2<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        dst: &mut [T],
    ) {
        generic::store_interleaved2(self, v0, v1, dst)
    }

    fn store_interleaved3<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        v2: Vector<T, N>,
        dst: &mut [T],
    ) {
        generic::store_interleaved3(self, v0, v1, v2, dst)
    }

    fn store_interleaved4<T: Lane, const N: usize>(
        &self,
        v0: Vector<T, N>,
        v1: Vector<T, N>,
        v2: Vector<T, N>,
        v3: Vector<T, N>,
        dst: &mut [T],
    ) {
        generic::store_interleaved4(self, v0, v1, v2, v3, dst)
    }

    // ------------------------------ Bit counting

    fn population_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::population_count(self, v)
    }

    /// Lane width for zero lanes
    fn leading_zero_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::leading_zero_count(self, v)
    }

    /// Lane width for zero lanes
    fn trailing_zero_count<T: IntLane, const N: usize>(&self, v: Vector<T, N>) -> Vector<T, N> {
        generic::trailing_zero_count(self, v)
    }

    /// `BITS - 1 - leading_zero_count`; all-ones for zero lanes
    fn highest_set_bit_index<T: IntLane, const N: usize>(&self, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::highest_set_bit_index(self, v)
    }

    // ------------------------------ AES

    /// SubBytes, ShiftRows, MixColumns, AddRoundKey
    fn aes_round(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        generic::aes_round(self, state, round_key)
    }

    /// SubBytes, ShiftRows, AddRoundKey
    fn aes_last_round(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        generic::aes_last_round(self, state, round_key)
    }

    /// InvSubBytes, InvShiftRows, InvMixColumns, AddRoundKey
    fn aes_round_inv(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>) -> Vector<u8, 16> {
        generic::aes_round_inv(self, state, round_key)
    }

    /// InvSubBytes, InvShiftRows, AddRoundKey
    fn aes_last_round_inv(&self, state: Vector<u8, 16>, round_key: Vector<u8, 16>)
        -> Vector<u8, 16> {
        generic::aes_last_round_inv(self, state, round_key)
    }

    fn aes_inv_mix_columns(&self, state: Vector<u8, 16>) -> Vector<u8, 16> {
        generic::aes_inv_mix_columns(self, state)
    }

    /// Key-expansion helper: SubWord and RotWord of words 1 and 3, `RCON` xored in
    fn aes_key_gen_assist<const RCON: i32>(&self, v: Vector<u8, 16>) -> Vector<u8, 16> {
        generic::aes_key_gen_assist::<RCON, _>(self, v)
    }

    // ------------------------------ Reductions

    /// Sum broadcast to every lane
    fn sum_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::sum_of_lanes(self, d, v)
    }

    fn reduce_sum<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>) -> T {
        self.get_lane(self.sum_of_lanes(d, v))
    }

    fn min_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::min_of_lanes(self, d, v)
    }

    fn max_of_lanes<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>)
        -> Vector<T, N> {
        generic::max_of_lanes(self, d, v)
    }

    fn reduce_min<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>) -> T {
        self.get_lane(self.min_of_lanes(d, v))
    }

    fn reduce_max<T: Lane, const N: usize>(&self, d: Tag<T, N>, v: Vector<T, N>) -> T {
        self.get_lane(self.max_of_lanes(d, v))
    }

    // ------------------------------ Mask bits

    /// Bit `i` set iff lane `i` is true
    fn bits_from_mask<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> u64 {
        generic::bits_from_mask(self, m)
    }

    /// Writes `ceil(N / 8)` bytes, least significant bit first; returns the byte count
    fn store_mask_bits<T: Lane, const N: usize>(
        &self,
        d: Tag<T, N>,
        m: Mask<T, N>,
        dst: &mut [u8],
    ) -> usize {
        generic::store_mask_bits(self, d, m, dst)
    }

    /// Reads `ceil(N / 8)` bytes, least significant bit first
    fn load_mask_bits<T: Lane, const N: usize>(&self, d: Tag<T, N>, bits: &[u8]) -> Mask<T, N> {
        generic::load_mask_bits(self, d, bits)
    }

    fn count_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        self.bits_from_mask(m).count_ones() as usize
    }

    fn find_first_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        generic::find_first_true(self, m)
    }

    /// `m` must have a true lane
    fn find_known_first_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        generic::find_known_first_true(self, m)
    }

    fn find_last_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Option<usize> {
        generic::find_last_true(self, m)
    }

    /// `m` must have a true lane
    fn find_known_last_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> usize {
        generic::find_known_last_true(self, m)
    }

    fn all_true<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        generic::all_true(self, m)
    }

    fn all_false<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> bool {
        self.bits_from_mask(m) == 0
    }

    /// True for the lanes before the first true lane of `m`; all true if none
    fn set_before_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        generic::set_before_first(self, m)
    }

    /// True from the first true lane of `m` on
    fn set_at_or_after_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        self.mask_not(self.set_before_first(m))
    }

    /// True up to and including the first true lane of `m`; all true if none
    fn set_at_or_before_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        generic::set_at_or_before_first(self, m)
    }

    /// Only the first true lane of `m`
    fn set_only_first<T: Lane, const N: usize>(&self, m: Mask<T, N>) -> Mask<T, N> {
        generic::set_only_first(self, m)
    }
}
