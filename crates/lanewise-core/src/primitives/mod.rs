//! Vector operations with compile-time backend dispatch
//!
//! # Architecture
//!
//! - [`Primitives`]: the small set each backend implements directly
//! - [`Ops`]: every other operation, with a default built in [`generic`] from
//!   the primitives; backends override what they can do natively
//! - Concrete backend types: [`Emu128Backend`], [`ScalarBackend`] and, on
//!   x86-64, [`Sse2Backend`]
//! - [`ActiveBackend`] is chosen at build time; there is no runtime dispatch,
//!   no heap allocation and no `dyn`
//!
//! # Usage
//!
//! ```rust
//! use lanewise_core::primitives::{active, Ops, Primitives};
//! use lanewise_core::Tag;
//!
//! let be = active();
//! let d = Tag::<f32, 4>::new();
//! let v = be.iota(d, 1.0);
//! assert_eq!(be.reduce_sum(d, v), 10.0);
//! ```

pub mod backends;
pub mod generic;
pub mod traits;

pub use backends::{active, ActiveBackend, Emu128Backend, ScalarBackend};
#[cfg(target_arch = "x86_64")]
pub use backends::Sse2Backend;
pub use traits::{Backend, Ops, Primitives};

/// Create an emulated 16-byte backend (always available)
pub fn emu128_backend() -> Emu128Backend {
    Emu128Backend::new()
}

/// Create a single-lane backend (always available)
pub fn scalar_backend() -> ScalarBackend {
    ScalarBackend::new()
}

/// Create an SSE2 backend
#[cfg(target_arch = "x86_64")]
pub fn sse2_backend() -> Sse2Backend {
    Sse2Backend::new()
}

/// Get the name of the backend behind [`active`]
pub fn best_backend_name() -> &'static str {
    active().name()
}
