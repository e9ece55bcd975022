//! Edwards25519 group and scalar field, as consumed by the BPV signer.
//!
//! This crate wraps curve25519-dalek behind a small typed surface: a
//! [`ScalarField`] reduced modulo the prime subgroup order, a [`Point`] kept
//! in extended coordinates, validated 32-byte encodings, the double scalar
//! multiplication used by verification, and helpers for random sampling.

mod error;
mod msm;
mod point;
mod random;
mod scalarfield;

pub use error::DecodeError;
pub use msm::double_scalar_mul_basepoint;
pub use point::{Point, POINT_BYTES};
pub use random::RandomField;
pub use scalarfield::{ScalarField, SCALAR_BYTES, WIDE_BYTES};
