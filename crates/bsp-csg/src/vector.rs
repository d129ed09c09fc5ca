//! Scalar, point and vector types shared by the whole crate.
//!
//! nalgebra already provides negation, addition, subtraction, scaling, dot
//! and cross products and the Euclidean length. [`VectorExt`] adds the few
//! operations whose edge-case behavior the boolean engine depends on.

use std::fmt;

use nalgebra::{Point3, Vector3};

/// Scalar type used for all coordinates.
pub type Real = f64;

/// A position in 3D space.
pub type Point = Point3<Real>;

/// A direction or displacement in 3D space.
pub type Vector = Vector3<Real>;

/// Division, normalization and interpolation with total (non-panicking) semantics.
pub trait VectorExt {
    /// Divides every component by `divisor`.
    ///
    /// A zero divisor returns an unchanged copy instead of producing
    /// infinities or NaNs.
    fn divided_by(&self, divisor: Real) -> Self;

    /// Returns the vector scaled to unit length.
    ///
    /// Defined as `divided_by(length)`, so a zero vector stays zero. Callers
    /// that need a real direction must reject degenerate input themselves.
    fn unit(&self) -> Self;

    /// Linear interpolation `self + t * (other - self)`.
    fn lerp_to(&self, other: &Self, t: Real) -> Self;
}

impl VectorExt for Vector {
    #[inline]
    fn divided_by(&self, divisor: Real) -> Self {
        if divisor == 0.0 {
            return *self;
        }
        self / divisor
    }

    #[inline]
    fn unit(&self) -> Self {
        self.divided_by(self.norm())
    }

    #[inline]
    fn lerp_to(&self, other: &Self, t: Real) -> Self {
        self + (other - self) * t
    }
}

/// Interpolates between two points: `a + t * (b - a)`.
#[inline]
pub fn lerp(a: &Point, b: &Point, t: Real) -> Point {
    a + (b - a) * t
}

/// Writes `[x, y, z]` with three decimals, printing negative zero as `0.000`.
pub(crate) fn write_coords(f: &mut fmt::Formatter<'_>, [x, y, z]: [Real; 3]) -> fmt::Result {
    write!(f, "[{}, {}, {}]", Fixed3(x), Fixed3(y), Fixed3(z))
}

/// A scalar shown with three decimals; values that round to zero lose their sign.
pub(crate) struct Fixed3(pub Real);

impl fmt::Display for Fixed3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.3}", self.0);
        f.write_str(if text == "-0.000" { "0.000" } else { &text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divided_by_zero_is_identity() {
        let v = Vector::new(1.0, -2.0, 3.0);
        assert_eq!(v.divided_by(0.0), v);
        assert_eq!(v.divided_by(2.0), Vector::new(0.5, -1.0, 1.5));
    }

    #[test]
    fn unit_of_zero_vector_stays_zero() {
        assert_eq!(Vector::zeros().unit(), Vector::zeros());
    }

    #[test]
    fn unit_has_length_one() {
        let v = Vector::new(3.0, 0.0, 4.0).unit();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert_eq!(v, Vector::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(2.0, 4.0, -6.0);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5), Point::new(1.0, 2.0, -3.0));

        let u = Vector::new(1.0, 1.0, 1.0);
        let w = Vector::new(3.0, 1.0, -1.0);
        assert_eq!(u.lerp_to(&w, 0.5), Vector::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn fixed3_drops_sign_of_zero() {
        assert_eq!(Fixed3(-0.0).to_string(), "0.000");
        assert_eq!(Fixed3(-0.0004).to_string(), "0.000");
        assert_eq!(Fixed3(-0.0006).to_string(), "-0.001");
        assert_eq!(Fixed3(2.0 / 3.0).to_string(), "0.667");
    }
}
