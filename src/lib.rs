//! Portable fixed-width SIMD
//!
//! `lanewise` lets numeric kernels be written once against a lane-type and
//! lane-count descriptor and compiled for whichever backend the build selects:
//! SSE2 intrinsics on x86-64, an emulated 16-byte backend everywhere else, and
//! a single-lane backend for degenerate shapes.
//!
//! This crate re-exports [`lanewise_core`]; see its documentation for the
//! architecture.
//!
//! # Example
//!
//! ```rust
//! use lanewise::prelude::*;
//!
//! let be = active();
//! let d = Tag::<f32, 4>::new();
//! let v = be.load_u(d, &[1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(be.reduce_sum(d, be.mul(v, v)), 30.0);
//! ```

pub use lanewise_core::*;

/// Prelude for common imports
pub mod prelude {
    pub use lanewise_core::prelude::*;
    pub use lanewise_core::{algo, Target, TargetInfo};
}
