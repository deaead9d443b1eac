//! Operation-centric modules for AVX2 compute primitives
//!
//! Each operation is organized in its own module with type-specific implementations

pub mod axpy;
pub mod dot_product;
pub mod sum;

pub use axpy::Axpy;
pub use dot_product::DotProduct;
pub use sum::Sum;
