//! Constants used by the BPV nonce generator and the Schnorr layer on top of it.

/// Size of a serialized scalar (secret key, challenge, response) in bytes.
pub const SCALAR_SIZE: usize = curve::SCALAR_BYTES;

/// Size of a serialized point (commitment, table entry) in bytes.
pub const POINT_SIZE: usize = curve::POINT_BYTES;

/// Size of a serialized public verifying key in bytes.
///
/// A verifying key is a compressed Edwards25519 point.
pub const PK_SIZE: usize = POINT_SIZE;

/// Size of a serialized secret signing key in bytes.
pub const SK_SIZE: usize = SCALAR_SIZE;

/// Size of a serialized signature in bytes.
///
/// A signature consists of:
/// - The challenge e (32 bytes)
/// - The response s (32 bytes)
/// Total: 64 bytes
pub const SIG_SIZE: usize = 2 * SCALAR_SIZE;

/// Size of the challenge hash digest in bytes before reduction.
pub const DIGEST_SIZE: usize = curve::WIDE_BYTES;

/// Default number of precomputed table entries.
pub const DEFAULT_TABLE_SIZE: usize = 1024;

/// Default number of table entries combined per nonce.
pub const DEFAULT_SUBSET_SIZE: usize = 16;

/// Smallest subset size the accumulation supports.
pub const MIN_SUBSET_SIZE: usize = 2;

/// Largest table the parameters accept.
pub const MAX_TABLE_SIZE: usize = 1 << 16;

/// Number of possible values of one index byte.
pub(crate) const INDEX_BUCKETS: usize = 256;

/// Number of online draws attempted before a run of zero nonces is reported
/// as a computation failure.
pub const MAX_NONCE_RESAMPLES: usize = 8;
