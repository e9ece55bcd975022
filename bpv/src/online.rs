//! The online step: combine `k` random table entries into a fresh nonce.

use core::fmt;

use curve::{Point, ScalarField};
use rand::TryCryptoRng;
use tracing::{trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::constants::{INDEX_BUCKETS, MAX_NONCE_RESAMPLES, POINT_SIZE};
use crate::errors::{BpvError, Stage};
use crate::params::ZeroNoncePolicy;
use crate::table::BpvTable;

/// An ephemeral nonce and its commitment.
///
/// `public == G * secret` holds by construction. The pair is meant to be
/// consumed by exactly one signature; it is not `Clone` and the secret is
/// wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NoncePair {
    secret: ScalarField,
    public: Point,
    commitment: [u8; POINT_SIZE],
}

impl NoncePair {
    /// The nonce scalar, the sum of the selected table secrets.
    #[inline]
    pub fn secret(&self) -> &ScalarField {
        &self.secret
    }

    /// The commitment point, the sum of the selected table points.
    #[inline]
    pub fn public(&self) -> &Point {
        &self.public
    }

    /// The normalized 32-byte encoding of [`NoncePair::public`].
    #[inline]
    pub fn commitment(&self) -> &[u8; POINT_SIZE] {
        &self.commitment
    }
}

impl fmt::Debug for NoncePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoncePair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Maps one random byte to a table index in `[0, n)`.
///
/// `n * byte / 256` buckets the byte evenly when `n` divides 256; for larger
/// tables only every `n / 256`-th entry is reachable.
#[inline]
pub(crate) fn table_index(n: usize, byte: u8) -> usize {
    n * byte as usize / INDEX_BUCKETS
}

/// Sums the table entries selected by `draws`, one byte per entry.
///
/// `draws` holds at least two bytes.
pub(crate) fn accumulate(table: &BpvTable, draws: &[u8]) -> NoncePair {
    let n = table.len();

    let (first_secret, first_public) = table.entry(table_index(n, draws[0]));
    let (second_secret, second_public) = table.entry(table_index(n, draws[1]));
    let mut public = *first_public;
    public += second_public;
    let mut secret = *first_secret + second_secret;

    for &byte in &draws[2..] {
        let (entry_secret, entry_public) = table.entry(table_index(n, byte));
        public += entry_public;
        secret += entry_secret;
    }

    let commitment = public.encode();
    NoncePair {
        secret,
        public,
        commitment,
    }
}

/// Derives a fresh nonce pair from the table.
///
/// Draws `k` random bytes, maps each to a table entry and sums the selected
/// scalars and points. A draw whose scalars sum to zero is handled according
/// to the table's [`ZeroNoncePolicy`].
///
/// # Errors
///
/// - [`BpvError::Randomness`] if the random source fails
/// - [`BpvError::Allocation`] if the index buffer can not be allocated
/// - [`BpvError::Computation`] if the selected entries sum to zero and the
///   policy rejects it, or every resample attempt produced zero
///
/// # Example
///
/// ```
/// use bpv::{BpvParams, BpvTable, bpv_online};
/// use curve::Point;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let table = BpvTable::generate(BpvParams::new(64, 8).unwrap(), &mut rng).unwrap();
///
/// let nonce = bpv_online(&table, &mut rng).unwrap();
/// assert_eq!(*nonce.public(), Point::mul_generator(nonce.secret()));
/// ```
pub fn bpv_online<R: TryCryptoRng + ?Sized>(
    table: &BpvTable,
    rng: &mut R,
) -> Result<NoncePair, BpvError> {
    let params = table.params();
    let k = params.subset_size();

    let mut draws = Zeroizing::new(Vec::new());
    draws
        .try_reserve_exact(k)
        .map_err(|_| BpvError::Allocation {
            stage: Stage::Online,
            requested: k,
        })?;
    draws.resize(k, 0u8);

    for attempt in 1..=MAX_NONCE_RESAMPLES {
        rng.try_fill_bytes(&mut draws)
            .map_err(|err| BpvError::randomness(Stage::Online, err))?;

        let pair = accumulate(table, &draws);
        if !pair.secret.is_zero() {
            trace!(n = table.len(), k, attempt, "derived bpv nonce");
            return Ok(pair);
        }

        warn!(attempt, "selected table entries sum to zero");
        if params.zero_nonce() == ZeroNoncePolicy::Reject {
            return Err(BpvError::Computation {
                stage: Stage::Online,
                reason: "nonce is zero",
            });
        }
    }

    Err(BpvError::Computation {
        stage: Stage::Online,
        reason: "every resampled nonce was zero",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BpvParams;
    use crate::tests::FixedBytes;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn sequential_table(n: usize, k: usize) -> BpvTable {
        let params = BpvParams::new(n, k).expect("valid");
        let secrets = (1..=n as u64).map(ScalarField::from_u64).collect();
        BpvTable::from_secrets(params, secrets).expect("table")
    }

    #[test]
    fn test_table_index_buckets() {
        assert_eq!(table_index(1024, 0), 0);
        assert_eq!(table_index(1024, 1), 4);
        assert_eq!(table_index(1024, 255), 1020);
        assert_eq!(table_index(256, 200), 200);
        assert_eq!(table_index(2, 127), 0);
        assert_eq!(table_index(2, 128), 1);
        assert_eq!(table_index(1, 255), 0);
        assert!((0..=255u8).all(|b| table_index(1000, b) < 1000));
    }

    #[test]
    fn test_accumulate_selected_entries() {
        // Entry i holds secret i + 1.
        let table = sequential_table(256, 4);
        let pair = accumulate(&table, &[0, 9, 9, 255]);
        assert_eq!(*pair.secret(), ScalarField::from_u64(1 + 10 + 10 + 256));
        assert_eq!(
            *pair.public(),
            Point::mul_generator(&ScalarField::from_u64(277))
        );
        assert_eq!(*pair.commitment(), pair.public().encode());
    }

    #[test]
    fn test_online_correspondence() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = BpvTable::generate(BpvParams::default(), &mut rng).expect("generate");
        for _ in 0..16 {
            let pair = bpv_online(&table, &mut rng).expect("online");
            assert_eq!(*pair.public(), Point::mul_generator(pair.secret()));
            assert_eq!(Point::decode(pair.commitment()), Ok(*pair.public()));
        }
    }

    #[test]
    fn test_online_uses_fixed_draws() {
        let table = sequential_table(256, 3);
        let mut rng = FixedBytes::new(&[3, 4, 5]);
        let pair = bpv_online(&table, &mut rng).expect("online");
        assert_eq!(*pair.secret(), ScalarField::from_u64(4 + 5 + 6));
    }

    #[test]
    fn test_successive_nonces_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = BpvTable::generate(BpvParams::default(), &mut rng).expect("generate");
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let pair = bpv_online(&table, &mut rng).expect("online");
            assert!(seen.insert(*pair.commitment()), "nonce repeated");
        }
    }

    fn cancelling_table(k: usize) -> BpvTable {
        // Entries a and -a: index bytes below 128 pick the first entry.
        let a = ScalarField::from_u64(99);
        let params = BpvParams::new(2, k).expect("valid");
        BpvTable::from_secrets(params, vec![a, -a]).expect("table")
    }

    #[test]
    fn test_zero_nonce_is_resampled() {
        let table = cancelling_table(2);
        let mut rng = FixedBytes::new(&[0, 200, 0, 0]);
        let pair = bpv_online(&table, &mut rng).expect("online");
        assert_eq!(*pair.secret(), ScalarField::from_u64(198));
    }

    #[test]
    fn test_zero_nonce_rejected_by_policy() {
        let params = BpvParams::new(2, 2)
            .expect("valid")
            .with_zero_nonce(ZeroNoncePolicy::Reject);
        let a = ScalarField::from_u64(99);
        let table = BpvTable::from_secrets(params, vec![a, -a]).expect("table");
        let mut rng = FixedBytes::new(&[0, 200, 0, 0]);
        assert_eq!(
            bpv_online(&table, &mut rng).unwrap_err(),
            BpvError::Computation {
                stage: Stage::Online,
                reason: "nonce is zero",
            }
        );
    }

    #[test]
    fn test_resampling_is_bounded() {
        let table = cancelling_table(2);
        let mut rng = FixedBytes::repeating(&[0, 200]);
        assert!(matches!(
            bpv_online(&table, &mut rng),
            Err(BpvError::Computation {
                stage: Stage::Online,
                ..
            })
        ));
    }

    #[test]
    fn test_randomness_failure_propagates() {
        let table = sequential_table(16, 4);
        let mut rng = FixedBytes::new(&[1, 2, 3]);
        let err = bpv_online(&table, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            BpvError::Randomness {
                stage: Stage::Online,
                ..
            }
        ));
    }
}
