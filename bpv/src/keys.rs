//! Signing and verifying keys, and the BPV-Schnorr sign/verify operations.

use core::fmt;

use curve::{DecodeError, Point, RandomField, ScalarField, double_scalar_mul_basepoint};
use rand::{CryptoRng, Rng, TryCryptoRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::{PK_SIZE, SCALAR_SIZE, SIG_SIZE, SK_SIZE};
use crate::errors::{BpvError, Stage};
use crate::online::bpv_online;
use crate::signatures::{ChallengeHasher, Sha512Hasher, Signature, hash_challenge};
use crate::table::BpvTable;

/// A secret signing key for creating BPV-Schnorr signatures.
///
/// The signing key is a non-zero scalar modulo the group order. It is wiped
/// from memory when dropped and never printed.
///
/// # Example
///
/// ```
/// use bpv::SigningKey;
///
/// let mut rng = rand::rng();
/// let signing_key = SigningKey::random(&mut rng);
/// let verifying_key = signing_key.verifying_key();
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    scalar: ScalarField,
}

/// A public verifying key for checking BPV-Schnorr signatures.
///
/// The verifying key is a point of the prime-order subgroup other than the
/// identity, kept together with its 32-byte encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    point: Point,
    encoded: [u8; PK_SIZE],
}

/// A signing key and its verifying key.
#[derive(Clone, Debug)]
pub struct Keypair {
    signing: SigningKey,
    verifying: VerifyingKey,
}

impl SigningKey {
    /// Generates a random signing key using the provided random number generator.
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let scalar = ScalarField::random(rng);
            if !scalar.is_zero() {
                return SigningKey { scalar };
            }
        }
    }

    /// Parses a canonical 32-byte scalar encoding.
    pub fn from_bytes(bytes: &[u8; SK_SIZE]) -> Result<Self, BpvError> {
        let scalar = ScalarField::from_canonical_bytes(*bytes)
            .map_err(|_| BpvError::InvalidKey("signing key is not a canonical scalar"))?;
        Self::from_scalar(scalar)
    }

    pub(crate) fn from_scalar(scalar: ScalarField) -> Result<Self, BpvError> {
        if scalar.is_zero() {
            return Err(BpvError::InvalidKey("signing key is zero"));
        }
        Ok(SigningKey { scalar })
    }

    pub fn to_bytes(&self) -> [u8; SK_SIZE] {
        self.scalar.to_bytes()
    }

    /// Derives the public verifying key `G * sk`.
    ///
    /// This costs one fixed-base scalar multiplication.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from_point(Point::mul_generator(&self.scalar))
    }

    /// Signs a message with a nonce drawn from the BPV table.
    ///
    /// The signature is computed as:
    /// 1. `(k, R) = bpv_online(table)`, so `R = G * k`
    /// 2. `e = SHA-512(encode(R) || msg) mod l`
    /// 3. `s = k - e * sk mod l`
    /// 4. Return `(e, s)`
    ///
    /// # Errors
    ///
    /// Fails if the online step fails (see [`bpv_online`]) or the hash
    /// scratch buffer can not be allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use bpv::{BpvParams, BpvTable, SigningKey};
    ///
    /// let mut rng = rand::rng();
    /// let table = BpvTable::generate(BpvParams::default(), &mut rng).expect("table");
    /// let signing_key = SigningKey::random(&mut rng);
    ///
    /// let signature = signing_key.sign(&table, &mut rng, b"hello").expect("signing failed");
    /// let valid = signing_key.verifying_key().verify(b"hello", &signature).expect("verify");
    /// assert!(valid);
    /// ```
    pub fn sign<R: TryCryptoRng + ?Sized>(
        &self,
        table: &BpvTable,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Signature, BpvError> {
        self.sign_with(table, rng, msg, &Sha512Hasher)
    }

    /// Like [`SigningKey::sign`], with a custom challenge hash.
    pub fn sign_with<R, H>(
        &self,
        table: &BpvTable,
        rng: &mut R,
        msg: &[u8],
        hasher: &H,
    ) -> Result<Signature, BpvError>
    where
        R: TryCryptoRng + ?Sized,
        H: ChallengeHasher + ?Sized,
    {
        let nonce = bpv_online(table, rng)?;
        let e = hash_challenge(hasher, Stage::Sign, nonce.commitment(), msg)?;
        let response = compute_response(nonce.secret(), &self.scalar, &e);

        debug!(msg_len = msg.len(), "created bpv signature");
        Ok(Signature {
            challenge: e.to_bytes(),
            response,
        })
    }
}

/// `s = k - sk * e`. The intermediates hold secret material and are wiped
/// before returning; only the encoded response leaves.
pub(crate) fn compute_response(
    nonce: &ScalarField,
    secret: &ScalarField,
    challenge: &ScalarField,
) -> [u8; SCALAR_SIZE] {
    let mut product = Zeroizing::new(*secret);
    *product *= challenge;
    let mut s = Zeroizing::new(*nonce);
    *s -= &*product;
    s.to_bytes()
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.scalar.ct_eq(&other.scalar))
    }
}

impl Eq for SigningKey {}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

impl Serialize for SigningKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.scalar.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SigningKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let scalar = ScalarField::deserialize(deserializer)?;
        SigningKey::from_scalar(scalar).map_err(serde::de::Error::custom)
    }
}

impl VerifyingKey {
    fn from_point(point: Point) -> Self {
        VerifyingKey {
            encoded: point.encode(),
            point,
        }
    }

    fn decode(bytes: &[u8; PK_SIZE], stage: Stage) -> Result<Self, BpvError> {
        let point =
            Point::decode(bytes).map_err(|reason| BpvError::InvalidPoint { stage, reason })?;
        if point.is_identity() {
            return Err(BpvError::InvalidPoint {
                stage,
                reason: DecodeError::Identity,
            });
        }
        Ok(VerifyingKey {
            point,
            encoded: *bytes,
        })
    }

    /// Decodes a verifying key, checking that it is a curve point of the
    /// prime-order subgroup and not the identity.
    pub fn from_bytes(bytes: &[u8; PK_SIZE]) -> Result<Self, BpvError> {
        Self::decode(bytes, Stage::Load)
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; PK_SIZE] {
        self.encoded
    }

    /// Verifies a signature on a message using this verifying key.
    ///
    /// Recomputes `R' = G * s + pk * e` with one double scalar
    /// multiplication and accepts when `SHA-512(encode(R') || msg) mod l`
    /// equals `e`. The comparison runs over all 32 bytes in constant time.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the signature is valid
    /// - `Ok(false)` if it is not, including when the response is not a
    ///   canonical scalar
    /// - `Err(_)` only for operational failures (allocation, hash)
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> Result<bool, BpvError> {
        self.verify_with(msg, sig, &Sha512Hasher)
    }

    /// Like [`VerifyingKey::verify`], with a custom challenge hash.
    pub fn verify_with<H: ChallengeHasher + ?Sized>(
        &self,
        msg: &[u8],
        sig: &Signature,
        hasher: &H,
    ) -> Result<bool, BpvError> {
        let Ok(s) = ScalarField::from_canonical_bytes(sig.response) else {
            debug!("rejected signature with non-canonical response");
            return Ok(false);
        };
        let e = ScalarField::from_bytes_mod_order(sig.challenge);

        let commitment = double_scalar_mul_basepoint(&s, &e, &self.point);
        let expected = hash_challenge(hasher, Stage::Verify, &commitment.encode(), msg)?;

        let valid = bool::from(expected.to_bytes()[..].ct_eq(&sig.challenge[..]));
        debug!(msg_len = msg.len(), valid, "verified bpv signature");
        Ok(valid)
    }
}

impl From<&SigningKey> for VerifyingKey {
    /// Converts a reference to a signing key into a verifying key.
    ///
    /// This is equivalent to calling `signing_key.verifying_key()`.
    fn from(sk: &SigningKey) -> Self {
        sk.verifying_key()
    }
}

impl Serialize for VerifyingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VerifyingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; PK_SIZE]>::deserialize(deserializer)?;
        VerifyingKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Keypair {
    /// Generates a random key pair.
    pub fn generate<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    /// Derives a key pair from the table with one online step, avoiding the
    /// scalar multiplication of [`Keypair::generate`].
    pub fn generate_with_table<R: TryCryptoRng + ?Sized>(
        table: &BpvTable,
        rng: &mut R,
    ) -> Result<Self, BpvError> {
        let pair = bpv_online(table, rng)?;
        Ok(Keypair {
            signing: SigningKey::from_scalar(*pair.secret())?,
            verifying: VerifyingKey::from_point(*pair.public()),
        })
    }

    pub fn from_signing_key(signing: SigningKey) -> Self {
        let verifying = signing.verifying_key();
        Keypair { signing, verifying }
    }

    /// Pairs two halves after checking that they correspond.
    pub fn from_parts(signing: SigningKey, verifying: VerifyingKey) -> Result<Self, BpvError> {
        if signing.verifying_key() != verifying {
            return Err(BpvError::InvalidKey(
                "verifying key does not match signing key",
            ));
        }
        Ok(Keypair { signing, verifying })
    }

    #[inline]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing
    }

    #[inline]
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying
    }
}

/// Signs `message` with the key pair, taking the nonce from `table`.
pub fn bpv_schnorr_sign<R: TryCryptoRng + ?Sized>(
    table: &BpvTable,
    keypair: &Keypair,
    message: &[u8],
    rng: &mut R,
) -> Result<Signature, BpvError> {
    keypair.signing.sign(table, rng, message)
}

/// Verifies an encoded signature against an encoded public key.
///
/// # Errors
///
/// [`BpvError::InvalidPoint`] if `public_key` is not a valid key. An
/// invalid signature is `Ok(false)`.
pub fn bpv_schnorr_verify(
    public_key: &[u8; PK_SIZE],
    message: &[u8],
    signature: &[u8; SIG_SIZE],
) -> Result<bool, BpvError> {
    bpv_schnorr_verify_with(public_key, message, signature, &Sha512Hasher)
}

/// Like [`bpv_schnorr_verify`], with a custom challenge hash.
pub fn bpv_schnorr_verify_with<H: ChallengeHasher + ?Sized>(
    public_key: &[u8; PK_SIZE],
    message: &[u8],
    signature: &[u8; SIG_SIZE],
    hasher: &H,
) -> Result<bool, BpvError> {
    let key = VerifyingKey::decode(public_key, Stage::Verify)?;
    key.verify_with(message, &Signature::from_bytes(signature), hasher)
}
