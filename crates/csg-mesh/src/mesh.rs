//! Indexed polygon meshes.

use bsp_csg::{Point, Real};

/// An 8-bit RGB colour.
pub type Rgb = [u8; 3];

/// How polygons with more than three corners are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Triangulation {
    /// Split into a fan of triangles around the first corner.
    #[default]
    Fan,
    /// Store the polygon as a single face.
    Keep,
}

/// A face of an [`IndexedMesh`]: indices into the vertex list, wound
/// counter-clockwise when seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: Vec<usize>,
    pub color: Option<Rgb>,
}

impl Face {
    pub fn new(indices: Vec<usize>, color: Option<Rgb>) -> Self {
        Self { indices, color }
    }
}

/// Shared vertex positions plus faces indexing into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<Point>,
    pub faces: Vec<Face>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh without faces is empty, whatever vertices it holds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }

    /// Adds a vertex and returns its index.
    pub fn append_vertex(&mut self, vertex: Point) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn append_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn append_triangle(&mut self, i0: usize, i1: usize, i2: usize, color: Option<Rgb>) {
        self.faces.push(Face::new(vec![i0, i1, i2], color));
    }

    pub fn append_quad(
        &mut self,
        [i0, i1, i2, i3]: [usize; 4],
        color: Option<Rgb>,
        triangulation: Triangulation,
    ) {
        self.append_polygon(&[i0, i1, i2, i3], color, triangulation);
    }

    /// Adds a convex polygon given by vertex indices. Fewer than three
    /// indices add nothing.
    pub fn append_polygon(&mut self, indices: &[usize], color: Option<Rgb>, triangulation: Triangulation) {
        let [first, rest @ ..] = indices else {
            return;
        };
        if rest.len() < 2 {
            return;
        }

        match triangulation {
            Triangulation::Fan => {
                for pair in rest.windows(2) {
                    self.append_triangle(*first, pair[0], pair[1], color);
                }
            }
            Triangulation::Keep => self.faces.push(Face::new(indices.to_vec(), color)),
        }
    }

    /// Appends all of `other`, shifting its face indices past the vertices
    /// already present.
    pub fn append_mesh(&mut self, other: &IndexedMesh) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|face| Face {
            indices: face.indices.iter().map(|i| i + base).collect(),
            color: face.color,
        }));
    }

    /// Returns the index of the first vertex equal to `vertex`.
    ///
    /// With `decimals`, coordinates are compared after rounding to that many
    /// decimal places.
    pub fn find_vertex(&self, vertex: &Point, decimals: Option<u32>) -> Option<usize> {
        match decimals {
            None => self.vertices.iter().position(|v| v == vertex),
            Some(decimals) => {
                let key = rounded_key(vertex, decimals);
                self.vertices.iter().position(|v| rounded_key(v, decimals) == key)
            }
        }
    }
}

/// Coordinates scaled by `10^decimals` and rounded to integers.
pub(crate) fn rounded_key(vertex: &Point, decimals: u32) -> [i64; 3] {
    let scale = (10.0 as Real).powi(decimals as i32);
    [vertex.x, vertex.y, vertex.z].map(|c| (c * scale).round() as i64)
}
