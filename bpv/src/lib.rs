//! BPV-accelerated Schnorr signatures over Edwards25519.
//!
//! Signing a Schnorr signature needs a fresh secret nonce `k` and its
//! commitment `G * k`. The BPV construction (Boyko, Peinado and Venkatesan)
//! moves the expensive scalar multiplication offline:
//!
//! - Offline, [`BpvTable::generate`] draws `n` random scalars and stores each
//!   with its image under the generator.
//! - Online, [`bpv_online`] picks `k` entries at random and adds them up,
//!   which costs `k - 1` point additions. The sum of the scalars is the
//!   nonce, the sum of the points is its commitment.
//!
//! On top of that nonce the crate implements the signature scheme:
//! - Challenge `e = SHA-512(R || msg) mod l`
//! - Response `s = k - sk * e mod l`
//! - Verification recomputes `R = G * s + pk * e` and compares challenges
//!
//! # Example
//!
//! ```
//! use bpv::{BpvParams, BpvTable, Keypair, bpv_schnorr_sign, bpv_schnorr_verify};
//!
//! let mut rng = rand::rng();
//!
//! // Offline: build the table once and reuse it for many signatures.
//! let table = BpvTable::generate(BpvParams::default(), &mut rng).expect("table");
//! let keypair = Keypair::generate_with_table(&table, &mut rng).expect("keypair");
//!
//! // Online: each signature combines a fresh random subset of the table.
//! let message = b"hello bpv";
//! let signature = bpv_schnorr_sign(&table, &keypair, message, &mut rng).expect("sign");
//!
//! let public_key = keypair.verifying_key().to_bytes();
//! let valid = bpv_schnorr_verify(&public_key, message, &signature.to_bytes()).expect("verify");
//! assert!(valid);
//! ```
//!
//! # Security Considerations
//!
//! - Use a cryptographically secure random number generator for both phases
//! - Keep the table secret: its scalars determine every nonce
//! - Each nonce pair is consumed by exactly one signature
//! - To re-key, publish a new table through a [`TableStore`] instead of
//!   modifying a table that is in use

mod constants;
mod errors;
mod keys;
mod online;
mod params;
mod signatures;
mod store;
mod table;


pub use constants::{
    DEFAULT_SUBSET_SIZE, DEFAULT_TABLE_SIZE, DIGEST_SIZE, MAX_NONCE_RESAMPLES, MAX_TABLE_SIZE,
    MIN_SUBSET_SIZE, PK_SIZE, POINT_SIZE, SCALAR_SIZE, SIG_SIZE, SK_SIZE,
};
pub use errors::{BpvError, Stage};
pub use keys::{
    Keypair, SigningKey, VerifyingKey, bpv_schnorr_sign, bpv_schnorr_verify,
    bpv_schnorr_verify_with,
};
pub use online::{NoncePair, bpv_online};
pub use params::{BpvParams, ZeroNoncePolicy};
pub use signatures::{ChallengeHasher, Sha512Hasher, Signature};
pub use store::TableStore;
pub use table::BpvTable;
