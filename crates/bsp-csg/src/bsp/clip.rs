//! Clipping polygons and trees against a BSP solid.

use super::node::Node;
use crate::polygon::Polygon;

/// Pending work while clipping polygons down a tree.
enum ClipTask<'a, S> {
    /// Clip these polygons against the subtree rooted at the node.
    Clip(&'a Node<S>, Vec<Polygon<S>>),
    /// Already outside the solid, emit unchanged.
    Keep(Vec<Polygon<S>>),
}

impl<S: Clone> Node<S> {
    /// Removes every part of `polygons` that lies inside this tree's solid.
    ///
    /// An empty tree returns the input unchanged. Otherwise each polygon is
    /// split by the node plane (coplanar polygons go to the side they face)
    /// and the pieces continue into the matching subtree. Pieces that reach a
    /// missing front child are outside and kept; pieces that reach a missing
    /// back child are inside and discarded. Output order is the front result
    /// followed by the back result, at every level.
    pub fn clip_polygons(&self, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![ClipTask::Clip(self, polygons)];

        while let Some(task) = stack.pop() {
            let (node, polygons) = match task {
                ClipTask::Keep(mut polygons) => {
                    result.append(&mut polygons);
                    continue;
                }
                ClipTask::Clip(node, polygons) => (node, polygons),
            };

            let Some(plane) = node.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                plane
                    .split_polygon(polygon, node.epsilon)
                    .route_coplanar_by_facing(&mut front, &mut back);
            }

            // Pushed back-first so the front side is fully emitted before it.
            if let Some(back_node) = node.back.as_deref() {
                if !back.is_empty() {
                    stack.push(ClipTask::Clip(back_node, back));
                }
            }
            if !front.is_empty() {
                stack.push(match node.front.as_deref() {
                    Some(front_node) => ClipTask::Clip(front_node, front),
                    None => ClipTask::Keep(front),
                });
            }
        }

        result
    }

    /// Removes from every node of this tree the polygons (or parts of them)
    /// lying inside `other`. Only `self` is modified.
    pub fn clip_to(&mut self, other: &Node<S>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let Node {
                polygons,
                front,
                back,
                ..
            } = node;

            *polygons = other.clip_polygons(std::mem::take(polygons));
            stack.extend(front.as_deref_mut());
            stack.extend(back.as_deref_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::Csg;
    use crate::plane::PLANE_EPSILON;
    use crate::vector::{Point, Real};

    fn unit_cube_tree() -> Node<&'static str> {
        Node::from_polygons(
            Csg::cube(Point::origin(), 1.0, "cube").into_polygons(),
            PLANE_EPSILON,
        )
    }

    fn square_z(z: Real, min: Real, max: Real, up: bool) -> Polygon<&'static str> {
        let mut vertices = vec![
            Point::new(min, min, z),
            Point::new(max, min, z),
            Point::new(max, max, z),
            Point::new(min, max, z),
        ];
        if !up {
            vertices.reverse();
        }
        Polygon::new(vertices, "square").unwrap()
    }

    #[test]
    fn empty_tree_keeps_everything() {
        let tree: Node<&'static str> = Node::new();
        let input = vec![square_z(0.5, 0.2, 0.4, true), square_z(3.0, 0.0, 1.0, false)];
        assert_eq!(tree.clip_polygons(input.clone()), input);
    }

    #[test]
    fn inside_removed_outside_kept() {
        let tree = unit_cube_tree();
        let inside = square_z(0.5, 0.2, 0.4, true);
        let outside = square_z(3.0, 0.2, 0.4, true);

        let clipped = tree.clip_polygons(vec![inside, outside.clone()]);
        assert_eq!(clipped, vec![outside]);
    }

    #[test]
    fn spanning_polygon_keeps_only_outside_part() {
        let tree = unit_cube_tree();
        // Square at z = 0.5 covering x, y in [0.5, 1.5]: three quarters stick out.
        let crossing = square_z(0.5, 0.5, 1.5, true);

        let clipped = tree.clip_polygons(vec![crossing]);
        assert!(!clipped.is_empty());
        for polygon in &clipped {
            assert_eq!(*polygon.tag(), "square");
            for v in polygon.vertices() {
                assert!(v.x >= 1.0 - 1e-9 || v.y >= 1.0 - 1e-9, "vertex {v:?} inside the cube");
            }
        }

        // Kept area is the L-shaped remainder: 1 - 0.25.
        let area: Real = clipped
            .iter()
            .map(|p| {
                let v = p.vertices();
                (1..v.len() - 1)
                    .map(|i| (v[i] - v[0]).cross(&(v[i + 1] - v[0])).norm() / 2.0)
                    .sum::<Real>()
            })
            .sum();
        assert!((area - 0.75).abs() < 1e-9, "area = {area}");
    }

    #[test]
    fn coplanar_faces_kept_only_when_facing_out() {
        let tree = unit_cube_tree();
        let facing_out = square_z(1.0, 0.25, 0.75, true);
        let facing_in = square_z(1.0, 0.25, 0.75, false);

        assert_eq!(tree.clip_polygons(vec![facing_out.clone()]), vec![facing_out]);
        assert!(tree.clip_polygons(vec![facing_in]).is_empty());
    }

    #[test]
    fn clip_to_mutates_only_self() {
        let mut small = Node::from_polygons(
            Csg::cube(Point::new(0.25, 0.25, 0.25), 0.5, "small").into_polygons(),
            PLANE_EPSILON,
        );
        let big = unit_cube_tree();
        let big_before = big.all_polygons();

        // The small cube is entirely inside the big one.
        small.clip_to(&big);
        assert_eq!(small.polygon_count(), 0);
        assert_eq!(big.all_polygons(), big_before);

        // Tree structure survives clipping, only the polygon lists change.
        assert!(!small.is_empty());
        assert_eq!(small.depth(), 6);
    }
}
