use thiserror::Error;

/// Reasons an encoding fails to decode into a valid group element or scalar.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("encoding is not a point on the curve")]
    NotOnCurve,
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
    #[error("point is the identity")]
    Identity,
    #[error("scalar encoding is not reduced modulo the group order")]
    NonCanonicalScalar,
}
