//! Error types for the BPV nonce generator and Schnorr signatures.

use core::fmt;

use curve::DecodeError;
use thiserror::Error;

/// The operation that was running when an error occurred.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Generating the precomputed table.
    Precompute,
    /// Combining table entries into a nonce.
    Online,
    /// Building the challenge and response.
    Sign,
    /// Checking a signature.
    Verify,
    /// Loading or validating a table or key.
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Precompute => "precompute",
            Stage::Online => "online",
            Stage::Sign => "sign",
            Stage::Verify => "verify",
            Stage::Load => "load",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while generating nonces, signing or verifying.
///
/// An invalid signature is not an error: verification returns `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BpvError {
    /// The random source failed or was exhausted.
    #[error("{stage}: random source failed: {reason}")]
    Randomness { stage: Stage, reason: String },

    /// A scratch buffer could not be allocated.
    #[error("{stage}: failed to allocate {requested} bytes")]
    Allocation { stage: Stage, requested: usize },

    /// The challenge hash could not be computed.
    #[error("{stage}: hash failed: {reason}")]
    Hash { stage: Stage, reason: String },

    /// An encoded point does not decode to a usable group element.
    ///
    /// This rejects the input itself and is distinct from an invalid signature.
    #[error("{stage}: invalid point: {reason}")]
    InvalidPoint { stage: Stage, reason: DecodeError },

    /// An arithmetic step produced a degenerate value.
    #[error("{stage}: computation failed: {reason}")]
    Computation { stage: Stage, reason: &'static str },

    /// The table parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A table does not satisfy its structural invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    /// A signing key is zero or does not match its verifying key.
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),
}

impl BpvError {
    /// The stage the error occurred in, if it is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            BpvError::Randomness { stage, .. }
            | BpvError::Allocation { stage, .. }
            | BpvError::Hash { stage, .. }
            | BpvError::InvalidPoint { stage, .. }
            | BpvError::Computation { stage, .. } => Some(*stage),
            BpvError::InvalidParams(_) | BpvError::InvalidTable(_) | BpvError::InvalidKey(_) => {
                None
            }
        }
    }

    pub(crate) fn randomness(stage: Stage, err: impl fmt::Display) -> Self {
        BpvError::Randomness {
            stage,
            reason: err.to_string(),
        }
    }
}
