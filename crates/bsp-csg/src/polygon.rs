//! Convex planar polygons carrying an opaque tag.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PolygonError;
use crate::plane::{Plane, PLANE_EPSILON};
use crate::vector::{write_coords, Point, Real, Vector};

/// A convex polygon in 3D space.
///
/// Vertices are coplanar and wound counter-clockwise when viewed from the
/// front (the side the normal points to). The supporting plane is derived
/// once, from the first three vertices, when the polygon is created.
///
/// `S` is an opaque per-polygon tag (a colour, a material id, `()`...). It is
/// cloned into every fragment produced when the polygon is split and is never
/// inspected by the boolean engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon<S> {
    vertices: Vec<Point>,
    plane: Plane,
    tag: S,
}

impl<S> Polygon<S> {
    /// Creates a polygon, validating it with the default [`PLANE_EPSILON`].
    ///
    /// Convexity is a precondition and is not checked.
    pub fn new(vertices: Vec<Point>, tag: S) -> Result<Self, PolygonError> {
        Self::with_epsilon(vertices, tag, PLANE_EPSILON)
    }

    /// Creates a polygon, validating it with a caller supplied tolerance.
    ///
    /// Fails if there are fewer than three vertices, if the first three are
    /// collinear, or if any later vertex is more than `epsilon` away from the
    /// plane they span.
    pub fn with_epsilon(vertices: Vec<Point>, tag: S, epsilon: Real) -> Result<Self, PolygonError> {
        let polygon = Self::new_unchecked(vertices, tag);
        polygon.validate(epsilon)?;
        Ok(polygon)
    }

    /// Creates a polygon without any validation.
    ///
    /// The plane is taken from the first three vertices. With fewer than
    /// three vertices, or collinear ones, the plane is degenerate (zero
    /// normal) and the boolean operations give unspecified results.
    pub fn new_unchecked(vertices: Vec<Point>, tag: S) -> Self {
        let plane = match vertices.as_slice() {
            [a, b, c, ..] => Plane::from_points(a, b, c),
            _ => Plane::new(Vector::zeros(), 0.0),
        };
        Self {
            vertices,
            plane,
            tag,
        }
    }

    /// Checks the invariants [`Polygon::with_epsilon`] enforces.
    pub fn validate(&self, epsilon: Real) -> Result<(), PolygonError> {
        if self.vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices {
                count: self.vertices.len(),
            });
        }
        if self.plane.is_degenerate() {
            return Err(PolygonError::DegeneratePlane);
        }
        for (index, vertex) in self.vertices.iter().enumerate().skip(3) {
            let distance = self.plane.signed_distance(vertex);
            if distance.abs() > epsilon {
                return Err(PolygonError::NonCoplanar { index, distance });
            }
        }
        Ok(())
    }

    /// Returns the vertex loop.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Returns the supporting plane.
    #[inline]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Returns the opaque tag.
    #[inline]
    pub fn tag(&self) -> &S {
        &self.tag
    }

    #[inline]
    pub(crate) fn into_tag(self) -> S {
        self.tag
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reverses the winding and flips the plane, so the polygon faces the
    /// other way.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Signed volume of the cone between this polygon and the origin.
    ///
    /// Summed over a closed, outward-facing surface this is the enclosed
    /// volume; over an inward-facing one it is the negated volume.
    pub fn signed_volume(&self) -> Real {
        let Some((first, rest)) = self.vertices.split_first() else {
            return 0.0;
        };
        rest.windows(2)
            .map(|pair| first.coords.dot(&pair[0].coords.cross(&pair[1].coords)))
            .sum::<Real>()
            / 6.0
    }
}

impl<S: Clone> Polygon<S> {
    /// Returns a flipped copy.
    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: &Vector) -> Self {
        let vertices = self.vertices.iter().map(|v| v + offset).collect();
        Self::new_unchecked(vertices, self.tag.clone())
    }
}

/// Vertices as `[x, y, z]` triples separated by spaces. The tag is not shown.
impl<S> fmt::Display for Polygon<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, vertex) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_coords(f, [vertex.x, vertex.y, vertex.z])?;
        }
        Ok(())
    }
}
