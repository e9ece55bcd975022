// Edwards25519: -x^2 + y^2 = 1 + d*x^2*y^2 over GF(2^255 - 19)
// d = -121665/121666
// Prime-order subgroup: l = 2^252 + 27742317777372353535851937790883648493
// Cofactor: 8
// Generator: y = 4/5, encoded 0x5866..66

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::traits::{Identity, IsIdentity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::{DecodeError, ScalarField};

/// Size of an encoded point in bytes.
pub const POINT_BYTES: usize = 32;

/// Point on the curve, held in extended twisted Edwards coordinates.
///
/// Additions stay in extended coordinates; [`Point::encode`] normalizes to
/// affine form and compresses to 32 bytes.
#[derive(Copy, Clone, Default, Eq, PartialEq, Zeroize)]
pub struct Point {
    inner: EdwardsPoint,
}

impl Point {
    /// The identity element.
    #[inline]
    pub fn identity() -> Self {
        Point {
            inner: EdwardsPoint::identity(),
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    /// The standard Ed25519 base point.
    #[inline]
    pub fn generator() -> Self {
        Point {
            inner: ED25519_BASEPOINT_POINT,
        }
    }

    /// Compute `G * scalar` using the precomputed base point tables.
    #[inline]
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        Point {
            inner: EdwardsPoint::mul_base(scalar.as_inner()),
        }
    }

    /// Variable-base scalar multiplication.
    #[inline]
    pub fn scalar_mul(&self, scalar: &ScalarField) -> Self {
        Point {
            inner: self.inner * scalar.as_inner(),
        }
    }

    #[inline]
    pub fn double(&self) -> Self {
        Point {
            inner: self.inner + self.inner,
        }
    }

    /// Normalize to affine coordinates and compress.
    #[inline]
    pub fn encode(&self) -> [u8; POINT_BYTES] {
        self.inner.compress().to_bytes()
    }

    /// Decode a compressed point and validate it.
    ///
    /// The encoding must be canonical, decompress to a point on the curve and
    /// that point must lie in the prime-order subgroup. The identity is
    /// accepted here; callers that need a non-trivial point check
    /// [`Point::is_identity`].
    pub fn decode(bytes: &[u8; POINT_BYTES]) -> Result<Self, DecodeError> {
        let compressed = CompressedEdwardsY(*bytes);
        let inner = compressed.decompress().ok_or(DecodeError::NotOnCurve)?;
        if inner.compress() != compressed {
            return Err(DecodeError::NotOnCurve);
        }
        if !inner.is_torsion_free() {
            return Err(DecodeError::NotInSubgroup);
        }
        Ok(Point { inner })
    }

    #[inline]
    pub(crate) fn as_inner(&self) -> &EdwardsPoint {
        &self.inner
    }

    #[inline]
    pub(crate) fn from_inner(inner: EdwardsPoint) -> Self {
        Point { inner }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Point(")?;
        for byte in self.encode() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point {
            inner: self.inner + other.inner,
        }
    }
}

impl<'a> Add<&'a Point> for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: &'a Point) -> Self {
        Point {
            inner: self.inner + other.inner,
        }
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.inner += other.inner;
    }
}

impl<'a> AddAssign<&'a Point> for Point {
    #[inline]
    fn add_assign(&mut self, other: &'a Point) {
        self.inner += &other.inner;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point {
            inner: self.inner - other.inner,
        }
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.inner -= other.inner;
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point { inner: -self.inner }
    }
}

impl Mul<ScalarField> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: ScalarField) -> Self {
        self.scalar_mul(&scalar)
    }
}

impl<'a> Mul<&'a ScalarField> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: &'a ScalarField) -> Self {
        self.scalar_mul(scalar)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; POINT_BYTES]>::deserialize(deserializer)?;
        Self::decode(&bytes).map_err(serde::de::Error::custom)
    }
}
