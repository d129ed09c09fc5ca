//! Conversion between indexed meshes and CSG solids.

use std::collections::HashMap;

use bsp_csg::{Csg, Point, Polygon};
use tracing::debug;

use crate::error::MeshError;
use crate::mesh::{rounded_key, IndexedMesh, Rgb, Triangulation};

/// Vertex sharing when rebuilding an [`IndexedMesh`] from loose polygons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VertexMerge {
    /// Every polygon corner becomes its own vertex.
    #[default]
    None,
    /// Corners with bit-identical coordinates share a vertex.
    Exact,
    /// Corners equal after rounding to `decimals` places share a vertex.
    Rounded { decimals: u32 },
}

impl IndexedMesh {
    /// Flattens the mesh into loose polygons, tagged with their face colour.
    ///
    /// Each polygon is validated; an index past the vertex list or a
    /// degenerate face is an error.
    pub fn to_csg(&self, triangulation: Triangulation) -> Result<Csg<Option<Rgb>>, MeshError> {
        let mut polygons = Vec::with_capacity(self.faces.len());

        for (face_index, face) in self.faces.iter().enumerate() {
            let corners = face
                .indices
                .iter()
                .map(|&index| {
                    self.vertices.get(index).copied().ok_or(MeshError::IndexOutOfRange {
                        face: face_index,
                        index,
                        vertex_count: self.vertices.len(),
                    })
                })
                .collect::<Result<Vec<Point>, _>>()?;

            if triangulation == Triangulation::Fan && corners.len() > 3 {
                for pair in corners[1..].windows(2) {
                    polygons.push(Polygon::new(vec![corners[0], pair[0], pair[1]], face.color)?);
                }
            } else {
                polygons.push(Polygon::new(corners, face.color)?);
            }
        }

        debug!(faces = self.faces.len(), polygons = polygons.len(), "mesh to csg");
        Ok(Csg::from_polygons(polygons))
    }

    /// Rebuilds an indexed mesh from a solid, one face per polygon.
    pub fn from_csg(csg: &Csg<Option<Rgb>>, merge: VertexMerge) -> Self {
        let mut mesh = IndexedMesh::new();
        let mut index = VertexIndex::new(merge);

        for polygon in csg.polygons() {
            let indices: Vec<usize> = polygon
                .vertices()
                .iter()
                .map(|vertex| index.insert(&mut mesh, vertex))
                .collect();
            mesh.append_polygon(&indices, *polygon.tag(), Triangulation::Keep);
        }

        debug!(
            polygons = csg.len(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "csg to mesh"
        );
        mesh
    }
}

/// Lookup of already emitted vertices, keyed per [`VertexMerge`] mode.
struct VertexIndex {
    merge: VertexMerge,
    seen: HashMap<[i64; 3], usize>,
}

impl VertexIndex {
    fn new(merge: VertexMerge) -> Self {
        Self {
            merge,
            seen: HashMap::new(),
        }
    }

    fn insert(&mut self, mesh: &mut IndexedMesh, vertex: &Point) -> usize {
        let key = match self.merge {
            VertexMerge::None => return mesh.append_vertex(*vertex),
            VertexMerge::Exact => exact_key(vertex),
            VertexMerge::Rounded { decimals } => rounded_key(vertex, decimals),
        };
        *self.seen.entry(key).or_insert_with(|| mesh.append_vertex(*vertex))
    }
}

/// Bit patterns of the coordinates, with `-0.0` folded into `0.0`.
fn exact_key(vertex: &Point) -> [i64; 3] {
    [vertex.x, vertex.y, vertex.z].map(|c| if c == 0.0 { 0 } else { c.to_bits() as i64 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;
    use bsp_csg::PolygonError;

    fn cube_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        for i in 0..8 {
            mesh.append_vertex(Point::new(
                (i & 1) as f64,
                ((i >> 1) & 1) as f64,
                ((i >> 2) & 1) as f64,
            ));
        }
        let red = Some([255, 0, 0]);
        for face in [
            [4, 5, 7, 6],
            [1, 0, 2, 3],
            [0, 4, 6, 2],
            [5, 1, 3, 7],
            [6, 7, 3, 2],
            [0, 1, 5, 4],
        ] {
            mesh.append_polygon(&face, red, Triangulation::Keep);
        }
        mesh
    }

    #[test]
    fn cube_converts_with_fan_triangles() {
        let csg = cube_mesh().to_csg(Triangulation::Fan).unwrap();
        assert_eq!(csg.len(), 12);
        assert!((csg.volume() - 1.0).abs() < 1e-12);
        assert!(csg.polygons().iter().all(|p| *p.tag() == Some([255, 0, 0])));
    }

    #[test]
    fn cube_converts_keeping_quads() {
        let csg = cube_mesh().to_csg(Triangulation::Keep).unwrap();
        assert_eq!(csg.len(), 6);
        assert!(csg.polygons().iter().all(|p| p.len() == 4));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut mesh = cube_mesh();
        mesh.append_face(Face::new(vec![0, 1, 42], None));

        match mesh.to_csg(Triangulation::Fan) {
            Err(MeshError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            }) => assert_eq!((face, index, vertex_count), (6, 42, 8)),
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_face_is_reported() {
        let mut mesh = IndexedMesh::new();
        let a = mesh.append_vertex(Point::origin());
        let b = mesh.append_vertex(Point::new(1.0, 0.0, 0.0));
        mesh.append_face(Face::new(vec![a, b], None));

        assert!(matches!(
            mesh.to_csg(Triangulation::Fan),
            Err(MeshError::Polygon(PolygonError::TooFewVertices { count: 2 }))
        ));
    }

    #[test]
    fn vertex_merge_modes() {
        let csg = cube_mesh().to_csg(Triangulation::Keep).unwrap();

        let loose = IndexedMesh::from_csg(&csg, VertexMerge::None);
        assert_eq!(loose.vertex_count(), 24);
        assert_eq!(loose.face_count(), 6);

        let shared = IndexedMesh::from_csg(&csg, VertexMerge::Exact);
        assert_eq!(shared.vertex_count(), 8);

        let jittered = csg.translated(&bsp_csg::Vector::new(1e-7, 0.0, 0.0));
        let rounded = IndexedMesh::from_csg(&jittered, VertexMerge::Rounded { decimals: 4 });
        assert_eq!(rounded.vertex_count(), 8);
    }

    #[test]
    fn boolean_result_round_trips_through_mesh() {
        let a = cube_mesh().to_csg(Triangulation::Fan).unwrap();
        let b = a.translated(&bsp_csg::Vector::new(0.5, 0.5, 0.5));
        let union = a.union(&b);

        let mesh = IndexedMesh::from_csg(&union, VertexMerge::Exact);
        let back = mesh.to_csg(Triangulation::Keep).unwrap();
        assert_eq!(back.len(), union.len());
        assert!((back.volume() - 1.875).abs() < 1e-9);
    }
}
