//! Backend implementations
//!
//! Plain unit structs with compile-time dispatch. The active backend is a type
//! alias so that generic code monomorphizes straight to it.

pub mod emu128;
pub mod scalar;
#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use emu128::Emu128Backend;
pub use scalar::ScalarBackend;
#[cfg(target_arch = "x86_64")]
pub use x86::Sse2Backend;

/// The backend used by operator sugar and the slice algorithms
#[cfg(all(target_arch = "x86_64", not(feature = "emu128")))]
pub type ActiveBackend = Sse2Backend;

/// The backend used by operator sugar and the slice algorithms
#[cfg(not(all(target_arch = "x86_64", not(feature = "emu128"))))]
pub type ActiveBackend = Emu128Backend;

/// An instance of [`ActiveBackend`]
#[inline(always)]
pub fn active() -> ActiveBackend {
    ActiveBackend::default()
}
