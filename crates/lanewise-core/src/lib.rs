//! Core types and backends for portable fixed-width SIMD
//!
//! Code is written once against a zero-sized [`Tag`] describing the lane type
//! and lane count, and a backend that supplies the operations. The backend is
//! chosen at build time, so every call monomorphizes to straight-line code
//! with no runtime dispatch.
//!
//! # Architecture Overview
//!
//! The crate is organized into three layers:
//!
//! 1. **Descriptors and values**: [`Tag`], [`Vector`], [`Mask`], [`Indices`]
//!    and the lane traits in [`lane`]
//! 2. **Primitives**: the small operation set each backend implements
//!    ([`Primitives`])
//! 3. **Generic composition**: every other operation as a default method of
//!    [`Ops`] built from the primitives in [`primitives::generic`]; backends
//!    override what they can do natively and list it in [`Backend::NATIVE`]
//!
//! Slice algorithms in [`algo`] sit on top of all three.
//!
//! # Example
//!
//! ```rust
//! use lanewise_core::prelude::*;
//!
//! let be = active();
//! let d = Tag::<u8, 16>::new();
//! let a = be.set(d, 200);
//! let b = be.set(d, 100);
//!
//! // Saturating arithmetic clamps instead of wrapping
//! assert_eq!(be.get_lane(be.saturated_add(a, b)), 255);
//!
//! // Masks come from comparisons and feed selection
//! let m = be.lt(b, a);
//! assert!(be.all_true(m));
//! ```

#[cfg(target_endian = "big")]
compile_error!("lanewise assumes little-endian lane byte order");

pub mod algo;
pub mod capabilities;
pub mod error;
pub mod lane;
pub mod primitives;
pub mod tag;
pub mod target;
pub mod tuple;
pub mod vector;

// Re-export core types
pub use capabilities::Native;
pub use error::{Error, Result};
pub use lane::{
    FloatLane, HasFloat, IntLane, Lane, LaneKind, LaneType, Narrow, SignedIntLane, SignedLane,
    UnsignedLane, Widen,
};
pub use tag::{
    Descriptor, Full128, Full64, Half, MFromD, Rebind, RebindToFloat, RebindToSigned,
    RebindToUnsigned, Repartition, RepartitionToNarrow, RepartitionToWide, TFromD, Tag, Twice,
    VFromD, MAX_VECTOR_BYTES,
};
pub use target::{Target, TargetInfo};
pub use tuple::{create2, create3, create4, Vec2, Vec3, Vec4};
pub use vector::{Indices, Mask, Vector};

pub use primitives::{
    active, best_backend_name, emu128_backend, generic, scalar_backend, ActiveBackend, Backend,
    Emu128Backend, Ops, Primitives, ScalarBackend,
};
#[cfg(target_arch = "x86_64")]
pub use primitives::{sse2_backend, Sse2Backend};

/// Version of this crate, reported by [`TargetInfo`]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::lane::{FloatLane, IntLane, Lane, SignedLane, UnsignedLane};
    pub use crate::primitives::{active, Backend, Ops, Primitives};
    pub use crate::tag::Tag;
    pub use crate::vector::{Mask, Vector};
    pub use crate::{Error, Result};
}
