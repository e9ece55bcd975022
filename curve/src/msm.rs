use curve25519_dalek::edwards::EdwardsPoint;

use crate::{Point, ScalarField};

/// Compute `a * G + b * P` in a single interleaved pass.
///
/// Runs in variable time; only use it with public inputs (verification).
pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Point) -> Point {
    Point::from_inner(EdwardsPoint::vartime_double_scalar_mul_basepoint(
        b.as_inner(),
        point.as_inner(),
        a.as_inner(),
    ))
}
