//! Parameters of the BPV nonce generator.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SUBSET_SIZE, DEFAULT_TABLE_SIZE, MAX_TABLE_SIZE, MIN_SUBSET_SIZE,
};
use crate::errors::BpvError;

/// What the online step does when the selected scalars sum to zero.
///
/// A zero nonce has the identity as its commitment and makes the response
/// reveal the signing key, so it can never be handed to the signer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroNoncePolicy {
    /// Discard the draw and select a fresh subset.
    #[default]
    Resample,
    /// Fail the call with a computation error.
    Reject,
}

/// Table size `n`, subset size `k` and the zero-nonce policy.
///
/// # Example
///
/// ```
/// use bpv::BpvParams;
///
/// let params = BpvParams::new(256, 12).expect("valid parameters");
/// assert_eq!(params.table_size(), 256);
/// assert_eq!(params.subset_size(), 12);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct BpvParams {
    n: usize,
    k: usize,
    #[serde(default)]
    zero_nonce: ZeroNoncePolicy,
}

#[derive(Deserialize)]
struct RawParams {
    n: usize,
    k: usize,
    #[serde(default)]
    zero_nonce: ZeroNoncePolicy,
}

impl TryFrom<RawParams> for BpvParams {
    type Error = BpvError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Self::new(raw.n, raw.k).map(|params| params.with_zero_nonce(raw.zero_nonce))
    }
}

impl Default for BpvParams {
    fn default() -> Self {
        BpvParams {
            n: DEFAULT_TABLE_SIZE,
            k: DEFAULT_SUBSET_SIZE,
            zero_nonce: ZeroNoncePolicy::default(),
        }
    }
}

impl BpvParams {
    /// Creates validated parameters with the default zero-nonce policy.
    pub fn new(n: usize, k: usize) -> Result<Self, BpvError> {
        let params = BpvParams {
            n,
            k,
            zero_nonce: ZeroNoncePolicy::default(),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_zero_nonce(mut self, policy: ZeroNoncePolicy) -> Self {
        self.zero_nonce = policy;
        self
    }

    /// Checks `1 <= n <= MAX_TABLE_SIZE` and `k >= MIN_SUBSET_SIZE`.
    pub fn validate(&self) -> Result<(), BpvError> {
        if self.n == 0 || self.n > MAX_TABLE_SIZE {
            return Err(BpvError::InvalidParams(format!(
                "table size {} outside 1..={MAX_TABLE_SIZE}",
                self.n
            )));
        }
        if self.k < MIN_SUBSET_SIZE {
            return Err(BpvError::InvalidParams(format!(
                "subset size {} below {MIN_SUBSET_SIZE}",
                self.k
            )));
        }
        Ok(())
    }

    /// Number of table entries `n`.
    #[inline]
    pub fn table_size(&self) -> usize {
        self.n
    }

    /// Number of entries combined per nonce `k`.
    #[inline]
    pub fn subset_size(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn zero_nonce(&self) -> ZeroNoncePolicy {
        self.zero_nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BpvParams::default();
        assert_eq!(params.table_size(), 1024);
        assert_eq!(params.subset_size(), 16);
        assert_eq!(params.zero_nonce(), ZeroNoncePolicy::Resample);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(BpvParams::new(0, 16), Err(BpvError::InvalidParams(_))));
        assert!(matches!(
            BpvParams::new(MAX_TABLE_SIZE + 1, 16),
            Err(BpvError::InvalidParams(_))
        ));
        assert!(matches!(BpvParams::new(1024, 1), Err(BpvError::InvalidParams(_))));
        assert!(BpvParams::new(1, 2).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let params = BpvParams::new(64, 4)
            .expect("valid")
            .with_zero_nonce(ZeroNoncePolicy::Reject);
        let bytes = bincode::serialize(&params).expect("serialize");
        let back: BpvParams = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(back, params);

        let bad = RawParamsForTest {
            n: 64,
            k: 1,
            zero_nonce: ZeroNoncePolicy::Resample,
        };
        let bytes = bincode::serialize(&bad).expect("serialize");
        assert!(bincode::deserialize::<BpvParams>(&bytes).is_err());
    }

    #[derive(Serialize)]
    struct RawParamsForTest {
        n: usize,
        k: usize,
        zero_nonce: ZeroNoncePolicy,
    }
}
