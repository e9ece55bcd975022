//! Scalar field of the curve. l = 2^252 + 0x14def9dea2f79cd65812631a5cf5d3ed
//!
//! Elements wrap the curve25519-dalek scalar, which is kept fully reduced and
//! multiplies in Montgomery form internally. The byte encoding is 32 bytes,
//! little-endian.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::DecodeError;

/// Size of an encoded scalar in bytes.
pub const SCALAR_BYTES: usize = 32;

/// Size of the wide input accepted by [`ScalarField::from_wide_bytes`].
pub const WIDE_BYTES: usize = 64;

/// Scalar field element, always reduced modulo the group order.
#[derive(Copy, Clone, Default, Eq, PartialEq, Zeroize)]
pub struct ScalarField {
    inner: Scalar,
}

impl ScalarField {
    pub const ZERO: Self = ScalarField { inner: Scalar::ZERO };

    pub const ONE: Self = ScalarField { inner: Scalar::ONE };

    #[inline]
    pub fn from_u64(val: u64) -> Self {
        ScalarField {
            inner: Scalar::from(val),
        }
    }

    /// Parse a canonical little-endian encoding (value < l).
    pub fn from_canonical_bytes(bytes: [u8; SCALAR_BYTES]) -> Result<Self, DecodeError> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes))
            .map(|inner| ScalarField { inner })
            .ok_or(DecodeError::NonCanonicalScalar)
    }

    /// Interpret 32 bytes as an integer and reduce it modulo l.
    #[inline]
    pub fn from_bytes_mod_order(bytes: [u8; SCALAR_BYTES]) -> Self {
        ScalarField {
            inner: Scalar::from_bytes_mod_order(bytes),
        }
    }

    /// Reduce a 512-bit little-endian integer modulo l.
    ///
    /// This is how a 64-byte hash digest becomes a scalar. The reduction is a
    /// pure function of its input.
    #[inline]
    pub fn from_wide_bytes(bytes: &[u8; WIDE_BYTES]) -> Self {
        ScalarField {
            inner: Scalar::from_bytes_mod_order_wide(bytes),
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; SCALAR_BYTES] {
        self.inner.to_bytes()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        bool::from(self.inner.ct_eq(&Scalar::ZERO))
    }

    #[inline]
    pub(crate) fn as_inner(&self) -> &Scalar {
        &self.inner
    }
}

impl ConstantTimeEq for ScalarField {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.inner.ct_eq(&other.inner)
    }
}

impl Debug for ScalarField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarField(0x")?;
        for byte in self.to_bytes().iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl Add for ScalarField {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        ScalarField {
            inner: self.inner + other.inner,
        }
    }
}

impl<'a> Add<&'a ScalarField> for ScalarField {
    type Output = Self;

    #[inline]
    fn add(self, other: &'a ScalarField) -> Self {
        ScalarField {
            inner: self.inner + other.inner,
        }
    }
}

impl AddAssign for ScalarField {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.inner += other.inner;
    }
}

impl<'a> AddAssign<&'a ScalarField> for ScalarField {
    #[inline]
    fn add_assign(&mut self, other: &'a ScalarField) {
        self.inner += other.inner;
    }
}

impl Sub for ScalarField {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        ScalarField {
            inner: self.inner - other.inner,
        }
    }
}

impl SubAssign for ScalarField {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.inner -= other.inner;
    }
}

impl<'a> SubAssign<&'a ScalarField> for ScalarField {
    #[inline]
    fn sub_assign(&mut self, other: &'a ScalarField) {
        self.inner -= &other.inner;
    }
}

impl Mul for ScalarField {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        ScalarField {
            inner: self.inner * other.inner,
        }
    }
}

impl MulAssign for ScalarField {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        self.inner *= other.inner;
    }
}

impl<'a> MulAssign<&'a ScalarField> for ScalarField {
    #[inline]
    fn mul_assign(&mut self, other: &'a ScalarField) {
        self.inner *= &other.inner;
    }
}

impl Neg for ScalarField {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        ScalarField { inner: -self.inner }
    }
}

impl Serialize for ScalarField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScalarField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; SCALAR_BYTES]>::deserialize(deserializer)?;
        Self::from_canonical_bytes(bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // l - 1, little-endian.
    const ORDER_MINUS_ONE: [u8; 32] = [
        0xec, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
        0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x10,
    ];

    #[test]
    fn test_add_wraps_at_order() {
        let max = ScalarField::from_canonical_bytes(ORDER_MINUS_ONE).expect("canonical");
        assert_eq!(max + ScalarField::ONE, ScalarField::ZERO);
        assert!((max + ScalarField::ONE).is_zero());
    }

    #[test]
    fn test_sub_and_neg() {
        let a = ScalarField::from_u64(5);
        let b = ScalarField::from_u64(7);
        assert_eq!(a - b, -ScalarField::from_u64(2));
        assert_eq!(ScalarField::ZERO - ScalarField::ONE, -ScalarField::ONE);
    }

    #[test]
    fn test_mul_distributes() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = ScalarField::random(&mut rng);
        let b = ScalarField::random(&mut rng);
        let c = ScalarField::random(&mut rng);
        assert_eq!(a * (b + c), a * b + a * c);
        assert_eq!(a * ScalarField::ONE, a);
        assert!((a * ScalarField::ZERO).is_zero());
    }

    #[test]
    fn test_non_canonical_rejected() {
        let mut order = ORDER_MINUS_ONE;
        order[0] += 1;
        assert_eq!(
            ScalarField::from_canonical_bytes(order),
            Err(DecodeError::NonCanonicalScalar)
        );
        assert!(ScalarField::from_bytes_mod_order(order).is_zero());
    }

    #[test]
    fn test_wide_reduction() {
        let mut wide = [0u8; WIDE_BYTES];
        wide[0] = 9;
        assert_eq!(ScalarField::from_wide_bytes(&wide), ScalarField::from_u64(9));

        // 2^256 mod l, computed independently.
        let mut two_256 = [0u8; WIDE_BYTES];
        two_256[32] = 1;
        let expected: [u8; 32] = [
            0x1d, 0x95, 0x98, 0x8d, 0x74, 0x31, 0xec, 0xd6, 0x70, 0xcf, 0x7d, 0x73, 0xf4, 0x5b,
            0xef, 0xc6, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0x0f,
        ];
        assert_eq!(ScalarField::from_wide_bytes(&two_256).to_bytes(), expected);
    }

    #[test]
    fn test_assign_by_reference() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = ScalarField::random(&mut rng);
        let b = ScalarField::random(&mut rng);

        let mut product = a;
        product *= &b;
        assert_eq!(product, a * b);

        let mut diff = a;
        diff -= &b;
        assert_eq!(diff, a - b);
        assert_eq!(diff + b, a);
    }

    #[test]
    fn test_serde_rejects_non_canonical() {
        let mut order = ORDER_MINUS_ONE;
        order[0] += 1;
        let bytes = bincode::serialize(&order).expect("serialize");
        assert!(bincode::deserialize::<ScalarField>(&bytes).is_err());

        let s = ScalarField::from_u64(1234);
        let bytes = bincode::serialize(&s).expect("serialize");
        let back: ScalarField = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(back, s);
    }
}
