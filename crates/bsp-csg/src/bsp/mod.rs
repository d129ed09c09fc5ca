//! Solid-modelling BSP tree.
//!
//! A [`Node`] partitions space by a splitting plane. Polygons lying on that
//! plane are stored in the node itself (whichever way they face); everything
//! else is pushed into the front or back subtree. This is not a leafy BSP
//! tree: there is no distinction between internal and leaf nodes, and the
//! region behind a node with no back child counts as solid.
//!
//! # Walks
//!
//! Every traversal (build, invert, clipping, flattening, cloning and drop)
//! runs on an explicit heap work-list rather than the call stack, so trees
//! of arbitrary depth never overflow the stack. Results are ordered exactly
//! as the textbook recursive formulations would order them.
//!
//! # Splitting plane choice
//!
//! Each node adopts the plane of the first polygon of the first batch it
//! receives. There is no balancing: adversarial input order can produce
//! long, list-like trees. That is a known limitation kept for predictable,
//! reproducible output.

mod build;
mod clip;
mod node;

pub use node::{Node, PreOrder};
