//! Lane type hierarchy
//!
//! Every vector holds `N` lanes of one of ten primitive types. The traits here
//! describe what a lane is (its width, its unsigned/signed twins, its kind) and
//! carry the per-lane reference semantics that the array-based backends apply
//! lane by lane:
//!
//! - integer `add`/`sub`/`mul` wrap, integer division by zero yields zero
//! - signed `abs` maps the minimum value to itself
//! - float `min`/`max` return the non-NaN operand when exactly one is NaN
//! - shift counts are reduced modulo the lane bit width
//! - float-to-int conversion saturates, NaN clamps by its sign bit
//!
//! # Design
//!
//! - **Sealed**: only the ten primitive types implement [`Lane`]
//! - **Bit views**: every lane converts to and from its same-width unsigned twin
//! - **Capability split**: [`IntLane`], [`UnsignedLane`], [`SignedLane`] and
//!   [`FloatLane`] gate the operations that only make sense for those kinds

use bytemuck::Pod;
use num_traits::{Bounded, Float, PrimInt};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::tag::{LaneWidth, W16, W32, W64, W8};

mod sealed {
    pub trait Sealed {}
}

/// Interpretation of a lane's bits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    Unsigned,
    Signed,
    Float,
}

/// The concrete lane type, available as a constant for type dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl LaneType {
    pub const fn kind(self) -> LaneKind {
        match self {
            LaneType::U8 | LaneType::U16 | LaneType::U32 | LaneType::U64 => LaneKind::Unsigned,
            LaneType::I8 | LaneType::I16 | LaneType::I32 | LaneType::I64 => LaneKind::Signed,
            LaneType::F32 | LaneType::F64 => LaneKind::Float,
        }
    }

    /// Lane size in bytes
    pub const fn size(self) -> usize {
        match self {
            LaneType::U8 | LaneType::I8 => 1,
            LaneType::U16 | LaneType::I16 => 2,
            LaneType::U32 | LaneType::I32 | LaneType::F32 => 4,
            LaneType::U64 | LaneType::I64 | LaneType::F64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LaneType::U8 => "u8",
            LaneType::U16 => "u16",
            LaneType::U32 => "u32",
            LaneType::U64 => "u64",
            LaneType::I8 => "i8",
            LaneType::I16 => "i16",
            LaneType::I32 => "i32",
            LaneType::I64 => "i64",
            LaneType::F32 => "f32",
            LaneType::F64 => "f64",
        }
    }
}

/// A primitive type that can occupy one vector lane
pub trait Lane:
    sealed::Sealed + Pod + Default + Debug + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// Same-width unsigned integer; also the storage word of a mask lane
    type Unsigned: UnsignedLane;
    /// Same-width signed integer
    type Signed: SignedIntLane;
    /// Width marker used by repartitioning
    type Width: LaneWidth;

    const TYPE: LaneType;
    const ZERO: Self;
    const ONE: Self;
    /// Smallest representable value (most negative for floats)
    const LOWEST: Self;
    /// Largest representable value
    const HIGHEST: Self;

    #[inline(always)]
    fn to_bits(self) -> Self::Unsigned {
        bytemuck::cast(self)
    }

    #[inline(always)]
    fn from_bits(bits: Self::Unsigned) -> Self {
        bytemuck::cast(bits)
    }

    /// `self + i`, wrapping for integers
    fn offset(self, i: usize) -> Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    /// Integer division by zero yields zero
    fn lane_div(self, rhs: Self) -> Self;
    fn lane_min(self, rhs: Self) -> Self;
    fn lane_max(self, rhs: Self) -> Self;
}

/// Integer lanes
pub trait IntLane: Lane + PrimInt + Bounded {
    const BITS: u32;

    /// Left shift with the count taken modulo the bit width
    fn lane_shl(self, count: u32) -> Self;
    /// Right shift (arithmetic for signed lanes) with the count taken modulo the bit width
    fn lane_shr(self, count: u32) -> Self;
    fn lane_saturated_add(self, rhs: Self) -> Self;
    fn lane_saturated_sub(self, rhs: Self) -> Self;
    /// Keeps the low bits of `x`
    fn truncate_from(x: u64) -> Self;
    /// Zero-extends the lane's bits
    fn bits_u64(self) -> u64;
}

/// Unsigned integer lanes
pub trait UnsignedLane: IntLane + Eq + std::hash::Hash {
    /// `(a + b + 1) / 2` without intermediate overflow
    fn lane_average_round(self, rhs: Self) -> Self;
    /// `b` copied into every byte
    fn replicate_byte(b: u8) -> Self;
}

/// Lanes with a sign: signed integers and floats
pub trait SignedLane: Lane {
    fn lane_neg(self) -> Self;
    /// For integers the minimum maps to itself
    fn lane_abs(self) -> Self;
}

pub trait SignedIntLane: IntLane + SignedLane {}

/// IEEE binary32/binary64 lanes
pub trait FloatLane: SignedLane + Float {
    const MANTISSA_BITS: u32;
    const EXPONENT_BITS: u32;
    /// `2^MANTISSA_BITS`: from here on every value is an integer
    const MANTISSA_END: Self;

    /// Round half to even
    fn lane_round(self) -> Self;
    fn lane_trunc(self) -> Self;
    fn lane_ceil(self) -> Self;
    fn lane_floor(self) -> Self;
    fn lane_sqrt(self) -> Self;
    /// Truncating conversion; out of range saturates, NaN clamps by sign bit
    fn to_int_saturating(self) -> Self::Signed;
    /// Round-to-nearest-even conversion from the same-width integer
    fn from_int(i: Self::Signed) -> Self;
}

/// Lane types with a twice-as-wide counterpart of the same kind
pub trait Widen: Lane {
    type Wide: Lane;

    /// Exact conversion to the wide type
    fn lane_promote(self) -> Self::Wide;
}

/// Lane types with a half-as-wide counterpart of the same kind
pub trait Narrow: Lane {
    type Narrow: Lane;

    /// Integers saturate to the narrow range; `f64` rounds to nearest
    fn lane_demote(self) -> Self::Narrow;
    /// Integers keep their low half; `f64` rounds like [`lane_demote`](Self::lane_demote)
    fn lane_truncate(self) -> Self::Narrow;
}

/// Lane types with a same-width float counterpart
pub trait HasFloat: Lane {
    type Float: FloatLane;
}

macro_rules! impl_unsigned_lane {
    ($($t:ty => $s:ty, $w:ty, $variant:ident;)*) => {$(
        impl sealed::Sealed for $t {}

        impl Lane for $t {
            type Unsigned = $t;
            type Signed = $s;
            type Width = $w;

            const TYPE: LaneType = LaneType::$variant;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            #[inline(always)]
            fn offset(self, i: usize) -> Self {
                self.wrapping_add(i as $t)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                if rhs == 0 { 0 } else { self / rhs }
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                std::cmp::min(self, rhs)
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                std::cmp::max(self, rhs)
            }
        }

        impl IntLane for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline(always)]
            fn lane_shl(self, count: u32) -> Self {
                self.wrapping_shl(count)
            }

            #[inline(always)]
            fn lane_shr(self, count: u32) -> Self {
                self.wrapping_shr(count)
            }

            #[inline(always)]
            fn lane_saturated_add(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            #[inline(always)]
            fn lane_saturated_sub(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }

            #[inline(always)]
            fn truncate_from(x: u64) -> Self {
                x as $t
            }

            #[inline(always)]
            fn bits_u64(self) -> u64 {
                self as u64
            }
        }

        impl UnsignedLane for $t {
            #[inline(always)]
            fn lane_average_round(self, rhs: Self) -> Self {
                (self | rhs) - ((self ^ rhs) >> 1)
            }

            #[inline(always)]
            fn replicate_byte(b: u8) -> Self {
                (<$t>::MAX / 0xFF).wrapping_mul(b as $t)
            }
        }
    )*};
}

macro_rules! impl_signed_lane {
    ($($t:ty => $u:ty, $w:ty, $variant:ident;)*) => {$(
        impl sealed::Sealed for $t {}

        impl Lane for $t {
            type Unsigned = $u;
            type Signed = $t;
            type Width = $w;

            const TYPE: LaneType = LaneType::$variant;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            #[inline(always)]
            fn offset(self, i: usize) -> Self {
                self.wrapping_add(i as $t)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                if rhs == 0 { 0 } else { self.wrapping_div(rhs) }
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                std::cmp::min(self, rhs)
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                std::cmp::max(self, rhs)
            }
        }

        impl IntLane for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline(always)]
            fn lane_shl(self, count: u32) -> Self {
                self.wrapping_shl(count)
            }

            #[inline(always)]
            fn lane_shr(self, count: u32) -> Self {
                self.wrapping_shr(count)
            }

            #[inline(always)]
            fn lane_saturated_add(self, rhs: Self) -> Self {
                self.saturating_add(rhs)
            }

            #[inline(always)]
            fn lane_saturated_sub(self, rhs: Self) -> Self {
                self.saturating_sub(rhs)
            }

            #[inline(always)]
            fn truncate_from(x: u64) -> Self {
                x as $t
            }

            #[inline(always)]
            fn bits_u64(self) -> u64 {
                self as $u as u64
            }
        }

        impl SignedLane for $t {
            #[inline(always)]
            fn lane_neg(self) -> Self {
                self.wrapping_neg()
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                self.wrapping_abs()
            }
        }

        impl SignedIntLane for $t {}
    )*};
}

macro_rules! impl_float_lane {
    ($($t:ty => $u:ty, $s:ty, $w:ty, $variant:ident, $mant:expr, $exp:expr;)*) => {$(
        impl sealed::Sealed for $t {}

        impl Lane for $t {
            type Unsigned = $u;
            type Signed = $s;
            type Width = $w;

            const TYPE: LaneType = LaneType::$variant;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            #[inline(always)]
            fn offset(self, i: usize) -> Self {
                self + i as $t
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self.is_nan() {
                    rhs
                } else if rhs.is_nan() {
                    self
                } else if self < rhs {
                    self
                } else {
                    rhs
                }
            }

            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self.is_nan() {
                    rhs
                } else if rhs.is_nan() {
                    self
                } else if self > rhs {
                    self
                } else {
                    rhs
                }
            }
        }

        impl SignedLane for $t {
            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn lane_abs(self) -> Self {
                <$t>::abs(self)
            }
        }

        impl FloatLane for $t {
            const MANTISSA_BITS: u32 = $mant;
            const EXPONENT_BITS: u32 = $exp;
            const MANTISSA_END: Self = (1u64 << $mant) as $t;

            #[inline(always)]
            fn lane_round(self) -> Self {
                self.round_ties_even()
            }

            #[inline(always)]
            fn lane_trunc(self) -> Self {
                <$t>::trunc(self)
            }

            #[inline(always)]
            fn lane_ceil(self) -> Self {
                <$t>::ceil(self)
            }

            #[inline(always)]
            fn lane_floor(self) -> Self {
                <$t>::floor(self)
            }

            #[inline(always)]
            fn lane_sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline(always)]
            fn to_int_saturating(self) -> $s {
                if self.is_nan() {
                    if self.is_sign_negative() { <$s>::MIN } else { <$s>::MAX }
                } else {
                    // `as` saturates out-of-range values
                    self as $s
                }
            }

            #[inline(always)]
            fn from_int(i: $s) -> Self {
                i as $t
            }
        }
    )*};
}

impl_unsigned_lane! {
    u8 => i8, W8, U8;
    u16 => i16, W16, U16;
    u32 => i32, W32, U32;
    u64 => i64, W64, U64;
}

impl_signed_lane! {
    i8 => u8, W8, I8;
    i16 => u16, W16, I16;
    i32 => u32, W32, I32;
    i64 => u64, W64, I64;
}

impl_float_lane! {
    f32 => u32, i32, W32, F32, 23, 8;
    f64 => u64, i64, W64, F64, 52, 11;
}

macro_rules! impl_widen {
    ($($narrow:ty => $wide:ty;)*) => {$(
        impl Widen for $narrow {
            type Wide = $wide;

            #[inline(always)]
            fn lane_promote(self) -> $wide {
                <$wide>::from(self)
            }
        }

        impl Narrow for $wide {
            type Narrow = $narrow;

            #[inline(always)]
            fn lane_demote(self) -> $narrow {
                let lo = <$narrow>::MIN as $wide;
                let hi = <$narrow>::MAX as $wide;
                std::cmp::min(std::cmp::max(self, lo), hi) as $narrow
            }

            #[inline(always)]
            fn lane_truncate(self) -> $narrow {
                self as $narrow
            }
        }
    )*};
}

impl_widen! {
    u8 => u16;
    u16 => u32;
    u32 => u64;
    i8 => i16;
    i16 => i32;
    i32 => i64;
}

impl Widen for f32 {
    type Wide = f64;

    #[inline(always)]
    fn lane_promote(self) -> f64 {
        f64::from(self)
    }
}

impl Narrow for f64 {
    type Narrow = f32;

    #[inline(always)]
    fn lane_demote(self) -> f32 {
        self as f32
    }

    #[inline(always)]
    fn lane_truncate(self) -> f32 {
        self as f32
    }
}

macro_rules! impl_has_float {
    ($($t:ty => $f:ty;)*) => {$(
        impl HasFloat for $t {
            type Float = $f;
        }
    )*};
}

impl_has_float! {
    u32 => f32;
    i32 => f32;
    f32 => f32;
    u64 => f64;
    i64 => f64;
    f64 => f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_types() {
        assert_eq!(<u8 as Lane>::TYPE.size(), 1);
        assert_eq!(<i64 as Lane>::TYPE.size(), 8);
        assert_eq!(<f32 as Lane>::TYPE.kind(), LaneKind::Float);
        assert_eq!(<i16 as Lane>::TYPE.kind(), LaneKind::Signed);
        assert_eq!(<u32 as Lane>::TYPE.name(), "u32");
    }

    #[test]
    fn test_wrapping_and_division() {
        assert_eq!(255u8.lane_add(1), 0);
        assert_eq!(0u16.lane_sub(1), u16::MAX);
        assert_eq!(i32::MIN.lane_div(-1), i32::MIN);
        assert_eq!(7u32.lane_div(0), 0);
        assert_eq!((-7i8).lane_div(0), 0);
        assert_eq!(250u8.offset(10), 4);
    }

    #[test]
    fn test_abs_of_minimum() {
        assert_eq!(i8::MIN.lane_abs(), i8::MIN);
        assert_eq!((-5i64).lane_abs(), 5);
        assert_eq!((-0.0f32).lane_abs().to_bits(), 0);
    }

    #[test]
    fn test_float_min_max_nan() {
        assert_eq!(f32::NAN.lane_min(1.0), 1.0);
        assert_eq!(1.0f32.lane_min(f32::NAN), 1.0);
        assert_eq!(f64::NAN.lane_max(-3.0), -3.0);
        assert_eq!((-3.0f64).lane_max(f64::NAN), -3.0);
        assert!(f32::NAN.lane_min(f32::NAN).is_nan());
    }

    #[test]
    fn test_shift_counts_wrap() {
        assert_eq!(1u8.lane_shl(9), 2);
        assert_eq!((-128i8).lane_shr(7), -1);
        assert_eq!(0x80u8.lane_shr(7), 1);
        assert_eq!(1u64.lane_shl(64), 1);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(250u8.lane_saturated_add(10), 255);
        assert_eq!(5u8.lane_saturated_sub(10), 0);
        assert_eq!(i16::MAX.lane_saturated_add(1), i16::MAX);
        assert_eq!(i16::MIN.lane_saturated_sub(1), i16::MIN);
    }

    #[test]
    fn test_average_round() {
        assert_eq!(1u8.lane_average_round(2), 2);
        assert_eq!(255u8.lane_average_round(255), 255);
        assert_eq!(u64::MAX.lane_average_round(0), 1 << 63);
    }

    #[test]
    fn test_float_conversion_saturates() {
        assert_eq!(3.9f32.to_int_saturating(), 3);
        assert_eq!((-3.9f32).to_int_saturating(), -3);
        assert_eq!(1e20f32.to_int_saturating(), i32::MAX);
        assert_eq!((-1e20f64).to_int_saturating(), i64::MIN);
        assert_eq!(f32::NAN.to_int_saturating(), i32::MAX);
        assert_eq!((-f64::NAN).to_int_saturating(), i64::MIN);
    }

    #[test]
    fn test_round_ties_even() {
        assert_eq!(2.5f32.lane_round(), 2.0);
        assert_eq!(3.5f32.lane_round(), 4.0);
        assert_eq!((-2.5f64).lane_round(), -2.0);
        assert!((-0.4f32).lane_round().is_sign_negative());
    }

    #[test]
    fn test_bit_views() {
        assert_eq!(1.0f32.to_bits(), 0x3F80_0000);
        assert_eq!(<f64 as Lane>::from_bits(0), 0.0);
        assert_eq!((-1i16).to_bits(), 0xFFFF);
        assert_eq!((-1i8).bits_u64(), 0xFF);
        assert_eq!(u32::replicate_byte(0x5A), 0x5A5A_5A5A);
        assert_eq!(f32::MANTISSA_END, 8_388_608.0);
    }

    #[test]
    fn test_promote_demote() {
        assert_eq!((-1i8).lane_promote(), -1i16);
        assert_eq!(0xFFu8.lane_promote(), 255u16);
        assert_eq!(1.5f32.lane_promote(), 1.5f64);
        assert_eq!(300i16.lane_demote(), 127i8);
        assert_eq!((-300i16).lane_demote(), -128i8);
        assert_eq!(70_000u32.lane_demote(), u16::MAX);
        assert_eq!(0x1234u16.lane_truncate(), 0x34u8);
        assert_eq!((-1i64).lane_truncate(), -1i32);
        assert_eq!(1e300f64.lane_demote(), f32::INFINITY);
    }
}
