//! Indexed meshes for `bsp-csg`.
//!
//! The boolean engine works on loose tagged polygons. This crate provides the
//! indexed representation files use, the conversions in both directions
//! (face colours become polygon tags), and ASCII PLY input and output.

mod convert;
mod error;
mod mesh;
mod ply;

pub use convert::VertexMerge;
pub use error::MeshError;
pub use mesh::{Face, IndexedMesh, Rgb, Triangulation};
pub use ply::{read_ply, read_ply_file, write_ply, write_ply_file};
