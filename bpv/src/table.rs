//! The precomputed BPV table.

use core::fmt;
use core::mem;

use curve::{Point, RandomField, ScalarField};
use rand::TryCryptoRng;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::MAX_TABLE_SIZE;
use crate::errors::{BpvError, Stage};
use crate::params::BpvParams;

/// `n` secret scalars and their index-aligned public points.
///
/// Entry `i` always satisfies `publics[i] == G * secrets[i]`. The table is
/// immutable once built, so it can be shared between threads by reference or
/// behind an `Arc`; replace it wholesale through a [`TableStore`] to re-key.
/// Secret scalars are wiped when the table is dropped.
///
/// [`TableStore`]: crate::TableStore
pub struct BpvTable {
    params: BpvParams,
    secrets: Vec<ScalarField>,
    publics: Vec<Point>,
}

impl BpvTable {
    /// Runs the offline precomputation: `n` random non-zero scalars and their
    /// images under the generator.
    pub fn generate<R: TryCryptoRng + ?Sized>(
        params: BpvParams,
        rng: &mut R,
    ) -> Result<Self, BpvError> {
        params.validate()?;
        let n = params.table_size();

        let mut table = BpvTable {
            params,
            secrets: Vec::with_capacity(n),
            publics: Vec::with_capacity(n),
        };
        while table.secrets.len() < n {
            let secret = ScalarField::try_random(rng)
                .map_err(|err| BpvError::randomness(Stage::Precompute, err))?;
            if secret.is_zero() {
                continue;
            }
            table.publics.push(Point::mul_generator(&secret));
            table.secrets.push(secret);
        }

        debug!(n, k = params.subset_size(), "generated bpv table");
        Ok(table)
    }

    /// Builds a table from known secrets, deriving each public point.
    pub fn from_secrets(params: BpvParams, secrets: Vec<ScalarField>) -> Result<Self, BpvError> {
        let publics = secrets.iter().map(Point::mul_generator).collect();
        let table = BpvTable {
            params,
            secrets,
            publics,
        };
        table.check_shape()?;
        Ok(table)
    }

    /// Builds a table from both halves, checking that every public point is
    /// the image of its secret.
    pub fn from_parts(
        params: BpvParams,
        secrets: Vec<ScalarField>,
        publics: Vec<Point>,
    ) -> Result<Self, BpvError> {
        let table = BpvTable {
            params,
            secrets,
            publics,
        };
        table.check_shape()?;
        if let Some(i) = table
            .secrets
            .iter()
            .zip(&table.publics)
            .position(|(secret, public)| Point::mul_generator(secret) != *public)
        {
            return Err(BpvError::InvalidTable(format!(
                "entry {i} does not match its secret"
            )));
        }
        Ok(table)
    }

    // Runs on a constructed table so that its drop wipes the secrets on the
    // error paths too.
    fn check_shape(&self) -> Result<(), BpvError> {
        self.params.validate()?;
        let n = self.params.table_size();
        if self.secrets.len() != n || self.publics.len() != n {
            return Err(BpvError::InvalidTable(format!(
                "expected {n} entries, got {} secrets and {} publics",
                self.secrets.len(),
                self.publics.len()
            )));
        }
        if let Some(i) = self.secrets.iter().position(ScalarField::is_zero) {
            return Err(BpvError::InvalidTable(format!("entry {i} is zero")));
        }
        Ok(())
    }

    #[inline]
    pub fn params(&self) -> &BpvParams {
        &self.params
    }

    /// Number of entries, equal to `params().table_size()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// The public half of the table.
    #[inline]
    pub fn publics(&self) -> &[Point] {
        &self.publics
    }

    /// Secret and public point of entry `index`.
    #[inline]
    pub(crate) fn entry(&self, index: usize) -> (&ScalarField, &Point) {
        (&self.secrets[index], &self.publics[index])
    }
}

impl Drop for BpvTable {
    fn drop(&mut self) {
        self.secrets.zeroize();
    }
}

impl fmt::Debug for BpvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpvTable")
            .field("n", &self.params.table_size())
            .field("k", &self.params.subset_size())
            .finish_non_exhaustive()
    }
}

impl Serialize for BpvTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BpvTable", 3)?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("secrets", &self.secrets)?;
        state.serialize_field("publics", &self.publics)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename = "BpvTable")]
struct RawTable {
    params: BpvParams,
    secrets: SecretEntries,
    publics: Vec<Point>,
}

/// Secret scalars being loaded. Wiped on drop, so a failure in any later
/// field leaves nothing behind.
struct SecretEntries(Zeroizing<Vec<ScalarField>>);

impl<'de> Deserialize<'de> for SecretEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SecretEntriesVisitor)
    }
}

struct SecretEntriesVisitor;

impl<'de> Visitor<'de> for SecretEntriesVisitor {
    type Value = SecretEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of canonical scalars")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let hint = seq.size_hint().unwrap_or(0).min(MAX_TABLE_SIZE);
        let mut secrets: Zeroizing<Vec<ScalarField>> = Zeroizing::new(Vec::with_capacity(hint));
        while let Some(secret) = seq.next_element::<ScalarField>()? {
            if secrets.len() == secrets.capacity() {
                // Grow by copying so the old buffer is wiped, not just freed.
                let capacity = (secrets.len() * 2).max(16);
                let mut grown: Zeroizing<Vec<ScalarField>> =
                    Zeroizing::new(Vec::with_capacity(capacity));
                grown.extend_from_slice(&secrets[..]);
                secrets = grown;
            }
            secrets.push(secret);
        }
        Ok(SecretEntries(secrets))
    }
}

impl<'de> Deserialize<'de> for BpvTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawTable::deserialize(deserializer)?;
        let secrets = mem::take(&mut *raw.secrets.0);
        BpvTable::from_parts(raw.params, secrets, raw.publics).map_err(serde::de::Error::custom)
    }
}
