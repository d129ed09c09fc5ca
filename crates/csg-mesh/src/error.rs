use thiserror::Error;

use bsp_csg::PolygonError;

/// Errors from reading, writing or converting meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of file")]
    UnexpectedEof,

    /// The PLY header is missing, malformed or describes an unsupported
    /// layout.
    #[error("invalid ply header: {0}")]
    Header(String),

    /// A vertex or face line could not be parsed. `line` is 1-based.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("face {face} refers to vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("invalid polygon: {0}")]
    Polygon(#[from] PolygonError),
}
