//! Backend implementations
//!
//! Concrete backend types with direct implementations, selected at compile
//! time by the kernel that embeds them.

pub mod scalar;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub mod avx2;

pub use scalar::ScalarBackend;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use avx2::Avx2Backend;
