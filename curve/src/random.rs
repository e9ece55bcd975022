use rand::{Rng, TryRngCore};
use zeroize::Zeroizing;

use crate::scalarfield::WIDE_BYTES;
use crate::ScalarField;

/// Helper trait for sampling uniformly random field elements.
///
/// Scalars are sampled by reducing 64 random bytes modulo the group order,
/// which keeps the bias below 2^-250.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Sample from a source that may fail, such as the operating system.
    fn try_random<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self, R::Error>;
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut wide = Zeroizing::new([0u8; WIDE_BYTES]);
        rng.fill_bytes(&mut wide[..]);
        ScalarField::from_wide_bytes(&wide)
    }

    #[inline]
    fn try_random<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self, R::Error> {
        let mut wide = Zeroizing::new([0u8; WIDE_BYTES]);
        rng.try_fill_bytes(&mut wide[..])?;
        Ok(ScalarField::from_wide_bytes(&wide))
    }
}
