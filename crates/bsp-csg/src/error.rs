//! Error types.
//!
//! The boolean operations themselves never fail. These errors come from the
//! opt-in validation done by [`crate::Polygon::new`] and
//! [`crate::Csg::validate`].

use thiserror::Error;

use crate::vector::Real;

/// Reasons a vertex loop cannot form a valid polygon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolygonError {
    /// Fewer than three vertices were supplied.
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    /// The first three vertices are collinear (or coincident), so no plane
    /// can be derived from them.
    #[error("first three vertices are collinear, polygon plane is undefined")]
    DegeneratePlane,

    /// A vertex lies off the plane spanned by the first three vertices.
    #[error("vertex {index} is {distance} away from the polygon plane")]
    NonCoplanar { index: usize, distance: Real },
}

/// Errors reported by [`crate::Csg::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsgError {
    #[error("polygon {index} is invalid: {source}")]
    InvalidPolygon {
        index: usize,
        #[source]
        source: PolygonError,
    },
}
