//! Signature types and challenge hashing.

use core::convert::Infallible;
use core::fmt::Display;

use curve::ScalarField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::constants::{DIGEST_SIZE, POINT_SIZE, SCALAR_SIZE, SIG_SIZE};
use crate::errors::{BpvError, Stage};

/// A Schnorr signature consisting of a challenge and a response scalar.
///
/// # Structure
///
/// The signature satisfies `H(encode(G * s + pk * e) || msg) mod l == e`
/// where `e` is the challenge and `s` the response. Both halves are stored
/// as raw 32-byte little-endian encodings, so a decoded signature can carry
/// out-of-range values; verification reports those as invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// The challenge e = H(R || msg) mod l
    pub challenge: [u8; SCALAR_SIZE],
    /// The response s = k - sk * e mod l, where k is the signing nonce
    pub response: [u8; SCALAR_SIZE],
}

impl Signature {
    /// `challenge || response`.
    pub fn to_bytes(&self) -> [u8; SIG_SIZE] {
        let mut out = [0u8; SIG_SIZE];
        out[..SCALAR_SIZE].copy_from_slice(&self.challenge);
        out[SCALAR_SIZE..].copy_from_slice(&self.response);
        out
    }

    pub fn from_bytes(bytes: &[u8; SIG_SIZE]) -> Self {
        let mut challenge = [0u8; SCALAR_SIZE];
        let mut response = [0u8; SCALAR_SIZE];
        challenge.copy_from_slice(&bytes[..SCALAR_SIZE]);
        response.copy_from_slice(&bytes[SCALAR_SIZE..]);
        Signature {
            challenge,
            response,
        }
    }
}

impl From<Signature> for [u8; SIG_SIZE] {
    fn from(sig: Signature) -> Self {
        sig.to_bytes()
    }
}

impl From<&[u8; SIG_SIZE]> for Signature {
    fn from(bytes: &[u8; SIG_SIZE]) -> Self {
        Signature::from_bytes(bytes)
    }
}

/// A hash producing the 64-byte digest the challenge is reduced from.
///
/// Backends that can fail (hardware tokens, remote services) report it
/// through `Error`; the Schnorr layer surfaces it as [`BpvError::Hash`].
pub trait ChallengeHasher {
    type Error: Display;

    fn hash_wide(&self, input: &[u8]) -> Result<[u8; DIGEST_SIZE], Self::Error>;
}

/// SHA-512, the default challenge hash.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sha512Hasher;

impl ChallengeHasher for Sha512Hasher {
    type Error = Infallible;

    fn hash_wide(&self, input: &[u8]) -> Result<[u8; DIGEST_SIZE], Self::Error> {
        let digest = Sha512::digest(input);
        let mut out = [0u8; DIGEST_SIZE];
        out.copy_from_slice(&digest);
        Ok(out)
    }
}

/// Computes the Fiat-Shamir challenge `e = H(R || msg) mod l`.
///
/// `commitment || msg` is assembled in a scratch buffer that is reserved
/// fallibly and wiped when it goes out of scope, on every path.
pub(crate) fn hash_challenge<H: ChallengeHasher + ?Sized>(
    hasher: &H,
    stage: Stage,
    commitment: &[u8; POINT_SIZE],
    msg: &[u8],
) -> Result<ScalarField, BpvError> {
    let requested = POINT_SIZE.saturating_add(msg.len());
    let mut input = Zeroizing::new(Vec::new());
    input
        .try_reserve_exact(requested)
        .map_err(|_| BpvError::Allocation { stage, requested })?;
    input.extend_from_slice(commitment);
    input.extend_from_slice(msg);

    let digest = Zeroizing::new(hasher.hash_wide(&input).map_err(|err| BpvError::Hash {
        stage,
        reason: err.to_string(),
    })?);
    Ok(ScalarField::from_wide_bytes(&digest))
}
