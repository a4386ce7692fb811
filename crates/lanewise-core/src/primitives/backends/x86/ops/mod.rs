//! SSE2 operation kernels, one module per operation group
//!
//! Each kernel returns `None` (or `false`) for shapes it does not accelerate;
//! the backend then falls back to the emulated primitive or the generic
//! composition.

#[cfg(target_feature = "aes")]
pub mod aes;
pub mod arith;
pub mod compare;
pub mod convert;
pub mod logical;
pub mod mask;
pub mod memory;
pub mod permute;
pub mod promote;
pub mod reduce;
