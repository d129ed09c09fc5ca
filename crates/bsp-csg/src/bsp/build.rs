//! BSP tree construction.

use tracing::trace;

use super::node::Node;
use crate::polygon::Polygon;
use crate::vector::Real;

/// A node still waiting for a batch of polygons.
type WorkItem<'a, S> = (&'a mut Node<S>, Vec<Polygon<S>>);

impl<S: Clone> Node<S> {
    /// Builds a tree from `polygons` with the given classification tolerance.
    pub fn from_polygons(polygons: Vec<Polygon<S>>, epsilon: Real) -> Self {
        let mut node = Self::with_epsilon(epsilon);
        node.build(polygons);
        node
    }

    /// Inserts a batch of polygons.
    ///
    /// On an empty node this builds a fresh tree. On an existing tree the new
    /// polygons are filtered down and become new nodes at the bottom. Each
    /// node that still lacks a plane adopts the plane of the first polygon of
    /// the batch it receives.
    ///
    /// Construction processes a work-list round by round instead of
    /// recursing, so stack usage is constant whatever the resulting depth.
    /// The tree produced is identical to the recursive formulation.
    pub fn build(&mut self, polygons: Vec<Polygon<S>>) {
        let mut pending: Vec<WorkItem<'_, S>> = vec![(self, polygons)];
        let mut round = 0usize;

        while !pending.is_empty() {
            round += 1;
            trace!(round, items = pending.len(), "bsp build round");

            let mut next = Vec::with_capacity(pending.len() * 2);
            for (node, batch) in pending {
                node.insert_batch(batch, &mut next);
            }
            pending = next;
        }
    }

    /// Partitions one batch at this node and queues the non-empty front and
    /// back remainders for the children, creating them as needed.
    fn insert_batch<'a>(&'a mut self, batch: Vec<Polygon<S>>, queue: &mut Vec<WorkItem<'a, S>>) {
        let Some(first) = batch.first() else {
            return;
        };

        let Node {
            plane,
            polygons,
            front,
            back,
            level,
            epsilon,
        } = self;
        let epsilon = *epsilon;
        let child_level = *level + 1;
        let plane = plane.get_or_insert_with(|| first.plane().clone());

        let mut front_batch = Vec::new();
        let mut back_batch = Vec::new();
        for polygon in batch {
            plane
                .split_polygon(polygon, epsilon)
                .route_coplanar_together(polygons, &mut front_batch, &mut back_batch);
        }

        if !front_batch.is_empty() {
            let child: &mut Node<S> = front.get_or_insert_with(|| Box::new(Node::empty(child_level, epsilon)));
            queue.push((child, front_batch));
        }
        if !back_batch.is_empty() {
            let child: &mut Node<S> = back.get_or_insert_with(|| Box::new(Node::empty(child_level, epsilon)));
            queue.push((child, back_batch));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::{Plane, PLANE_EPSILON};
    use crate::vector::Point;

    fn make_triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Polygon<()> {
        Polygon::new(
            vec![
                Point::new(a[0], a[1], a[2]),
                Point::new(b[0], b[1], b[2]),
                Point::new(c[0], c[1], c[2]),
            ],
            (),
        )
        .unwrap()
    }

    /// Straightforward recursive construction, used as the reference shape.
    fn build_recursive<S: Clone>(node: &mut Node<S>, polygons: Vec<Polygon<S>>) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = node.plane.get_or_insert_with(|| first.plane().clone()).clone();

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in polygons {
            plane
                .split_polygon(polygon, node.epsilon)
                .route_coplanar_together(&mut node.polygons, &mut front, &mut back);
        }

        let (level, epsilon) = (node.level, node.epsilon);
        if !front.is_empty() {
            let child = node.front.get_or_insert_with(|| Box::new(Node::empty(level + 1, epsilon)));
            build_recursive(child, front);
        }
        if !back.is_empty() {
            let child = node.back.get_or_insert_with(|| Box::new(Node::empty(level + 1, epsilon)));
            build_recursive(child, back);
        }
    }

    /// Pre-order (plane, polygons, has_front, has_back) listing of a tree.
    fn shape<S: Clone>(node: &Node<S>) -> Vec<(Option<Plane>, Vec<Polygon<S>>, bool, bool, usize)> {
        node.iter()
            .map(|n| {
                (
                    n.plane().cloned(),
                    n.polygons().to_vec(),
                    n.front().is_some(),
                    n.back().is_some(),
                    n.level(),
                )
            })
            .collect()
    }

    fn mixed_scene() -> Vec<Polygon<()>> {
        vec![
            make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            make_triangle([-0.5, -1.0, 0.5], [0.5, 1.0, 0.5], [0.5, -1.0, 0.5]),
            make_triangle([0.0, 2.0, 0.0], [0.0, 2.0, 1.0], [1.0, 2.0, 0.0]),
            make_triangle([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 0.0]),
            make_triangle([0.3, -2.0, 0.0], [0.3, 2.0, 0.0], [0.3, 0.0, 2.0]),
            make_triangle([2.0, 0.0, 0.0], [3.0, 0.0, 0.0], [2.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn build_empty() {
        let node: Node<()> = Node::from_polygons(vec![], PLANE_EPSILON);
        assert!(node.is_empty());
        assert_eq!(node.polygon_count(), 0);
    }

    #[test]
    fn build_single_polygon() {
        let poly = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let node = Node::from_polygons(vec![poly.clone()], PLANE_EPSILON);

        assert_eq!(node.plane(), Some(poly.plane()));
        assert_eq!(node.polygons(), &[poly]);
        assert!(node.is_leaf());
    }

    #[test]
    fn coplanar_polygons_of_both_facings_share_a_node() {
        let up = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let down = make_triangle([2.0, 0.0, 0.0], [2.0, 1.0, 0.0], [3.0, 0.0, 0.0]);

        let node = Node::from_polygons(vec![up, down], PLANE_EPSILON);
        assert_eq!(node.depth(), 1);
        assert_eq!(node.polygons().len(), 2);
    }

    #[test]
    fn build_spanning_polygon_gets_split() {
        // First polygon on the y = 0 plane, second spans it.
        let splitter = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let spanning = make_triangle([-0.5, -1.0, 0.5], [0.5, 1.0, 0.5], [0.5, -1.0, 0.5]);

        let node = Node::from_polygons(vec![splitter, spanning], PLANE_EPSILON);

        assert_eq!(node.polygon_count(), 3);
        assert!(node.front().is_some());
        assert!(node.back().is_some());
    }

    #[test]
    fn unsplit_input_round_trips_without_loss() {
        let polygons: Vec<Polygon<()>> = (0..10)
            .map(|i| {
                let z = i as f64 * 0.5;
                make_triangle([0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z])
            })
            .rev()
            .collect();
        let node = Node::from_polygons(polygons.clone(), PLANE_EPSILON);
        let mut flattened = node.all_polygons();
        assert_eq!(flattened.len(), polygons.len());

        // Every input polygon comes back exactly once.
        for polygon in &polygons {
            let position = flattened.iter().position(|p| p == polygon).unwrap();
            flattened.swap_remove(position);
        }
        assert!(flattened.is_empty());
    }

    #[test]
    fn iterative_build_matches_recursive_shape() {
        let iterative = Node::from_polygons(mixed_scene(), PLANE_EPSILON);

        let mut recursive = Node::with_epsilon(PLANE_EPSILON);
        build_recursive(&mut recursive, mixed_scene());

        assert_eq!(shape(&iterative), shape(&recursive));
    }

    #[test]
    fn second_batch_filters_into_existing_tree() {
        let scene = mixed_scene();
        let (first, second) = scene.split_at(3);

        let mut incremental = Node::from_polygons(first.to_vec(), PLANE_EPSILON);
        let root_plane = incremental.plane().cloned();
        incremental.build(second.to_vec());

        // The root keeps the plane chosen by the first batch.
        assert_eq!(incremental.plane().cloned(), root_plane);

        let mut recursive = Node::with_epsilon(PLANE_EPSILON);
        build_recursive(&mut recursive, first.to_vec());
        build_recursive(&mut recursive, second.to_vec());
        assert_eq!(shape(&incremental), shape(&recursive));
    }

    #[test]
    fn epsilon_is_inherited_by_children() {
        let node = Node::from_polygons(mixed_scene(), 1e-6);
        assert!(node.iter().all(|n| n.epsilon() == 1e-6));
    }

    #[test]
    fn epsilon_decides_coplanar_or_split() {
        // The second triangle tilts 5e-4 above and below z = 0.
        let scene = || {
            vec![
                make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
                make_triangle([2.0, 0.0, 5e-4], [3.0, 0.0, -5e-4], [2.0, 1.0, -5e-4]),
            ]
        };

        let loose = Node::from_polygons(scene(), 1e-3);
        assert_eq!(loose.depth(), 1);
        assert_eq!(loose.polygons().len(), 2);

        let tight = Node::from_polygons(scene(), 1e-5);
        assert_eq!(tight.polygon_count(), 3);
        assert_eq!(tight.polygons().len(), 1);
        assert!(tight.front().is_some());
        assert!(tight.back().is_some());
    }
}
