//! Compile-time dispatch for SSE2 type-specific implementations
//!
//! `T::TYPE` and the vector width are constants, so a `match` on [`full`]
//! folds to a single arm in every monomorphized copy. Shapes narrower than a
//! register return `None` and the caller falls back to the emulated backend.

use crate::lane::{Lane, LaneType};

/// `T::TYPE` when `N` lanes of `T` fill one 128-bit register
#[inline(always)]
pub fn full<T: Lane, const N: usize>() -> Option<LaneType> {
    (N * std::mem::size_of::<T>() == 16).then_some(T::TYPE)
}

/// Applies the integer intrinsic matching the lane width, or the float one
/// for float lanes. Yields `None` for partial vectors.
macro_rules! by_width {
    (
        $t:ty, $n:expr;
        $x8:expr, $x16:expr, $x32:expr, $x64:expr, $ps:expr, $pd:expr $(,)?
    ) => {{
        use $crate::lane::LaneType::*;
        match $crate::primitives::backends::x86::dispatch::full::<$t, { $n }>() {
            Some(U8 | I8) => $x8,
            Some(U16 | I16) => $x16,
            Some(U32 | I32) => $x32,
            Some(U64 | I64) => $x64,
            Some(F32) => $ps,
            Some(F64) => $pd,
            None => None,
        }
    }};
}

pub(crate) use by_width;
