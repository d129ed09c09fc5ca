//! Oriented planes and point/polygon classification against them.

use std::fmt;
use std::ops::BitOr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vector::{write_coords, Fixed3, Point, Real, Vector, VectorExt};

/// Default tolerance for plane classification.
///
/// Points within this distance of a plane are treated as lying exactly on it.
/// It is only a default: nodes and solids carry their own epsilon.
pub const PLANE_EPSILON: Real = 1e-3;

/// Which side of a plane a point lies on.
///
/// The discriminants form a two-bit encoding: OR-ing the sides of all
/// vertices of a polygon yields its [`Classification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaneSide {
    /// Within epsilon of the plane.
    Coplanar = 0,
    /// On the side the normal points to.
    Front = 1,
    /// On the side opposite to the normal.
    Back = 2,
}

impl PlaneSide {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Classification of a whole polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices lie on the plane.
    Coplanar,
    /// All vertices are in front of, or on, the plane.
    Front,
    /// All vertices are behind, or on, the plane.
    Back,
    /// Vertices lie on both sides.
    Spanning,
}

impl Classification {
    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            Classification::Coplanar => 0,
            Classification::Front => 1,
            Classification::Back => 2,
            Classification::Spanning => 3,
        }
    }

    #[inline]
    const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Classification::Coplanar,
            1 => Classification::Front,
            2 => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

impl From<PlaneSide> for Classification {
    fn from(side: PlaneSide) -> Self {
        Classification::from_bits(side.bits())
    }
}

impl BitOr<PlaneSide> for Classification {
    type Output = Classification;

    fn bitor(self, side: PlaneSide) -> Classification {
        Classification::from_bits(self.bits() | side.bits())
    }
}

/// A plane in 3D space, represented as `normal · point = offset`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    normal: Vector,
    offset: Real,
}

impl Plane {
    /// Creates a plane from a normal vector and offset.
    ///
    /// Both are rescaled so the stored normal has unit length. A zero normal
    /// is kept as-is and yields a plane that classifies every point as
    /// coplanar.
    pub fn new(normal: Vector, offset: Real) -> Self {
        let norm = normal.norm();
        Self {
            normal: normal.divided_by(norm),
            offset: if norm == 0.0 { offset } else { offset / norm },
        }
    }

    /// Creates a plane through three points.
    ///
    /// The normal follows the right-hand rule: `unit((b - a) × (c - a))`.
    /// Collinear points produce a zero normal; rejecting them is the
    /// caller's job (see [`crate::Polygon::new`]).
    pub fn from_points(a: &Point, b: &Point, c: &Point) -> Self {
        let normal = (b - a).cross(&(c - a)).unit();
        Self {
            normal,
            offset: normal.dot(&a.coords),
        }
    }

    /// Returns the unit normal.
    #[inline]
    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Returns the signed distance from the origin along the normal.
    #[inline]
    pub fn offset(&self) -> Real {
        self.offset
    }

    /// Signed distance from `point` to the plane. Positive is in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point) -> Real {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies a point with the given tolerance.
    #[inline]
    pub fn classify_point(&self, point: &Point, epsilon: Real) -> PlaneSide {
        let t = self.signed_distance(point);
        if t < -epsilon {
            PlaneSide::Back
        } else if t > epsilon {
            PlaneSide::Front
        } else {
            PlaneSide::Coplanar
        }
    }

    /// Classifies every vertex of `points` and the set as a whole.
    pub fn classify_points(&self, points: &[Point], epsilon: Real) -> (Vec<PlaneSide>, Classification) {
        let mut aggregate = Classification::Coplanar;
        let sides: Vec<PlaneSide> = points
            .iter()
            .map(|p| {
                let side = self.classify_point(p, epsilon);
                aggregate = aggregate | side;
                side
            })
            .collect();
        (sides, aggregate)
    }

    /// Reverses the orientation in place. The set of points on the plane
    /// does not change.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.offset = -self.offset;
    }

    /// Returns a copy facing the opposite direction.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Returns `true` if the plane was derived from degenerate input.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal.norm_squared() == 0.0
    }
}

/// `[nx, ny, nz], w=offset`, three decimals each.
impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = &self.normal;
        write_coords(f, [n.x, n.y, n.z])?;
        write!(f, ", w={}", Fixed3(self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_right_hand_rule() {
        let plane = Plane::from_points(
            &Point::new(0.0, 0.0, 2.0),
            &Point::new(1.0, 0.0, 2.0),
            &Point::new(0.0, 1.0, 2.0),
        );
        assert_eq!(plane.normal(), Vector::new(0.0, 0.0, 1.0));
        assert_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn collinear_points_give_degenerate_plane() {
        let plane = Plane::from_points(
            &Point::new(0.0, 0.0, 0.0),
            &Point::new(1.0, 1.0, 1.0),
            &Point::new(2.0, 2.0, 2.0),
        );
        assert!(plane.is_degenerate());
    }

    #[test]
    fn new_normalizes_normal_and_offset() {
        let plane = Plane::new(Vector::new(0.0, 2.0, 0.0), 4.0);
        assert_eq!(plane.normal(), Vector::new(0.0, 1.0, 0.0));
        assert_eq!(plane.offset(), 2.0);
    }

    #[test]
    fn flip_keeps_location() {
        let mut plane = Plane::new(Vector::new(0.0, 0.0, 1.0), 1.5);
        let on_plane = Point::new(3.0, -2.0, 1.5);
        let in_front = Point::new(0.0, 0.0, 5.0);

        plane.flip();
        assert_eq!(plane.normal(), Vector::new(0.0, 0.0, -1.0));
        assert_eq!(plane.offset(), -1.5);
        assert_eq!(plane.signed_distance(&on_plane), 0.0);
        assert_eq!(plane.classify_point(&in_front, PLANE_EPSILON), PlaneSide::Back);
        assert_eq!(plane.flipped().flipped(), plane);
    }

    #[test]
    fn classify_point_respects_epsilon() {
        let plane = Plane::new(Vector::new(0.0, 1.0, 0.0), 0.0);
        let near = Point::new(0.0, 5e-4, 0.0);
        assert_eq!(plane.classify_point(&near, PLANE_EPSILON), PlaneSide::Coplanar);
        assert_eq!(plane.classify_point(&near, 1e-5), PlaneSide::Front);
        assert_eq!(
            plane.classify_point(&Point::new(0.0, -0.01, 0.0), PLANE_EPSILON),
            PlaneSide::Back
        );
    }

    #[test]
    fn classification_is_bitwise_or_of_sides() {
        let c = Classification::Coplanar | PlaneSide::Front;
        assert_eq!(c, Classification::Front);
        assert_eq!(c | PlaneSide::Coplanar, Classification::Front);
        assert_eq!(c | PlaneSide::Back, Classification::Spanning);
        assert_eq!(Classification::from(PlaneSide::Back), Classification::Back);
    }

    #[test]
    fn classify_points_aggregates() {
        let plane = Plane::new(Vector::new(1.0, 0.0, 0.0), 0.0);
        let points = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(-1.0, 0.0, 0.0),
        ];
        let (sides, aggregate) = plane.classify_points(&points, PLANE_EPSILON);
        assert_eq!(sides, vec![PlaneSide::Coplanar, PlaneSide::Front, PlaneSide::Back]);
        assert_eq!(aggregate, Classification::Spanning);
    }

    #[test]
    fn display_rounds_to_three_decimals() {
        let plane = Plane::new(Vector::new(0.0, 0.0, 2.0), 4.0);
        assert_eq!(plane.to_string(), "[0.000, 0.000, 1.000], w=2.000");
        assert_eq!(plane.flipped().to_string(), "[0.000, 0.000, -1.000], w=-2.000");

        let negative_zero = Plane::new(Vector::new(-0.0, 1.0, -0.0), -0.0);
        assert_eq!(negative_zero.to_string(), "[0.000, 1.000, 0.000], w=0.000");
    }
}
