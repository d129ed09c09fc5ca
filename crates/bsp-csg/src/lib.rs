//! Constructive solid geometry on polygon soups, using BSP trees.
//!
//! A [`Csg`] solid is a list of convex [`Polygon`]s forming a closed surface.
//! [`Csg::union`], [`Csg::subtract`], [`Csg::intersect`] and
//! [`Csg::inverse`] combine solids without touching their operands. The
//! underlying [`bsp::Node`] tree is public for callers that want to clip
//! polygons against a solid directly.
//!
//! ```
//! use bsp_csg::{Csg, Point};
//!
//! let a = Csg::cube(Point::origin(), 1.0, ());
//! let b = Csg::cube(Point::new(0.5, 0.5, 0.5), 1.0, ());
//!
//! let union = a.union(&b);
//! assert!((union.volume() - 1.875).abs() < 1e-9);
//! ```

pub mod bsp;
mod csg;
mod error;
mod plane;
mod polygon;
mod split;
mod vector;

pub use bsp::Node;
pub use csg::Csg;
pub use error::{CsgError, PolygonError};
pub use plane::{Classification, Plane, PlaneSide, PLANE_EPSILON};
pub use polygon::Polygon;
pub use split::Split;
pub use vector::{lerp, Point, Real, Vector, VectorExt};
