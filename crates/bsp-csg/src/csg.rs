//! Boolean operations on polygonal solids.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bsp::Node;
use crate::error::CsgError;
use crate::plane::PLANE_EPSILON;
use crate::polygon::Polygon;
use crate::vector::{Point, Real, Vector};

/// Corner indices of the six faces of a box, wound counter-clockwise when
/// seen from outside. Corner `i` has bit 0 set for max x, bit 1 for max y and
/// bit 2 for max z.
const BOX_FACES: [[usize; 4]; 6] = [
    [4, 5, 7, 6], // +z
    [1, 0, 2, 3], // -z
    [0, 4, 6, 2], // -x
    [5, 1, 3, 7], // +x
    [6, 7, 3, 2], // +y
    [0, 1, 5, 4], // -y
];

/// A solid described by its boundary polygons.
///
/// Polygons must form a closed surface with outward-facing normals for the
/// boolean operations to be meaningful. `Csg` is a plain value: every
/// operation borrows its operands and builds its own trees from copies, so
/// the inputs are never modified.
///
/// A solid with no polygons builds a tree with no plane, which clips
/// nothing. Combining with it is therefore not the same as combining with
/// empty space: `a.intersect(&Csg::new())` returns `a` unchanged.
///
/// ```text
///     A.union(B)              A.subtract(B)           A.intersect(B)
///
///     +-------+               +-------+
///     |   A   |               |   A   |
///     |    +--+----+          |    +--+               +--+
///     +----+--+    |          +----+                  +--+
///          |   B   |
///          +-------+
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Csg<S> {
    polygons: Vec<Polygon<S>>,
    epsilon: Real,
}

impl<S> Default for Csg<S> {
    fn default() -> Self {
        Self {
            polygons: Vec::new(),
            epsilon: PLANE_EPSILON,
        }
    }
}

impl<S> From<Vec<Polygon<S>>> for Csg<S> {
    fn from(polygons: Vec<Polygon<S>>) -> Self {
        Self::from_polygons(polygons)
    }
}

/// One polygon per line, each terminated by a newline.
impl<S> fmt::Display for Csg<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for polygon in &self.polygons {
            writeln!(f, "{polygon}")?;
        }
        Ok(())
    }
}

impl<S> Csg<S> {
    /// Creates an empty solid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a list of boundary polygons.
    pub fn from_polygons(polygons: Vec<Polygon<S>>) -> Self {
        Self {
            polygons,
            epsilon: PLANE_EPSILON,
        }
    }

    /// Sets the classification tolerance used by the boolean operations
    /// invoked on this solid.
    pub fn with_epsilon(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[inline]
    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon<S>> {
        self.polygons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Enclosed volume, by the divergence theorem.
    ///
    /// Negative for an inverted solid. Only meaningful for closed surfaces.
    pub fn volume(&self) -> Real {
        self.polygons.iter().map(Polygon::signed_volume).sum()
    }

    /// Checks every polygon against the invariants of [`Polygon::new`],
    /// using this solid's epsilon for the coplanarity test.
    pub fn validate(&self) -> Result<(), CsgError> {
        for (index, polygon) in self.polygons.iter().enumerate() {
            polygon
                .validate(self.epsilon)
                .map_err(|source| CsgError::InvalidPolygon { index, source })?;
        }
        Ok(())
    }
}

impl<S: Clone> Csg<S> {
    /// Axis-aligned box spanning `min` to `min + extent`, every face tagged
    /// with `tag`.
    pub fn cuboid(min: Point, extent: Vector, tag: S) -> Self {
        let corners: Vec<Point> = (0..8)
            .map(|i| {
                Point::new(
                    if i & 1 != 0 { min.x + extent.x } else { min.x },
                    if i & 2 != 0 { min.y + extent.y } else { min.y },
                    if i & 4 != 0 { min.z + extent.z } else { min.z },
                )
            })
            .collect();

        let polygons = BOX_FACES
            .iter()
            .map(|face| Polygon::new_unchecked(face.iter().map(|&i| corners[i]).collect(), tag.clone()))
            .collect();
        Self::from_polygons(polygons)
    }

    /// Axis-aligned cube with its minimum corner at `min`.
    pub fn cube(min: Point, size: Real, tag: S) -> Self {
        Self::cuboid(min, Vector::new(size, size, size), tag)
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: &Vector) -> Self {
        Self {
            polygons: self.polygons.iter().map(|p| p.translated(offset)).collect(),
            epsilon: self.epsilon,
        }
    }

    /// Space in either `self` or `other`.
    pub fn union(&self, other: &Csg<S>) -> Csg<S> {
        debug!(lhs = self.len(), rhs = other.len(), "csg union");
        let (mut a, mut b) = self.trees(other);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.into_polygons());

        self.finish("union", a.into_polygons())
    }

    /// Space in `self` but not in `other`.
    pub fn subtract(&self, other: &Csg<S>) -> Csg<S> {
        debug!(lhs = self.len(), rhs = other.len(), "csg subtract");
        let (mut a, mut b) = self.trees(other);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.into_polygons());
        a.invert();

        self.finish("subtract", a.into_polygons())
    }

    /// Space in both `self` and `other`.
    pub fn intersect(&self, other: &Csg<S>) -> Csg<S> {
        debug!(lhs = self.len(), rhs = other.len(), "csg intersect");
        let (mut a, mut b) = self.trees(other);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(b.into_polygons());
        a.invert();

        self.finish("intersect", a.into_polygons())
    }

    /// Swaps solid and empty space by flipping every polygon. No tree is
    /// involved.
    pub fn inverse(&self) -> Csg<S> {
        let mut result = self.clone();
        for polygon in &mut result.polygons {
            polygon.flip();
        }
        result
    }

    /// Builds independent trees from copies of both operands.
    fn trees(&self, other: &Csg<S>) -> (Node<S>, Node<S>) {
        (
            Node::from_polygons(self.polygons.clone(), self.epsilon),
            Node::from_polygons(other.polygons.clone(), self.epsilon),
        )
    }

    fn finish(&self, operation: &'static str, polygons: Vec<Polygon<S>>) -> Csg<S> {
        debug!(operation, polygons = polygons.len(), "csg result");
        Self {
            polygons,
            epsilon: self.epsilon,
        }
    }
}
