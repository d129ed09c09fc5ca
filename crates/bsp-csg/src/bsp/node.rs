//! BSP tree node implementation.

use crate::plane::{Plane, PLANE_EPSILON};
use crate::polygon::Polygon;
use crate::vector::Real;

/// A node in the BSP tree.
///
/// A node starts empty (no plane). The first batch of polygons built into it
/// fixes its splitting plane; polygons coplanar with that plane stay in the
/// node, the rest are partitioned into the `front` subtree (`normal · p >
/// offset`) and the `back` subtree (`normal · p < offset`).
///
/// The tree has strict single ownership: children are boxed and never
/// shared, so in-place mutation through [`Node::invert`] or
/// [`Node::clip_to`] can never be observed through another tree.
#[derive(Debug)]
pub struct Node<S> {
    /// The splitting plane, or `None` while the node is empty.
    pub(super) plane: Option<Plane>,

    /// Polygons lying on `plane`, both facings together.
    pub(super) polygons: Vec<Polygon<S>>,

    /// Subtree for the half-space the plane normal points into.
    pub(super) front: Option<Box<Node<S>>>,

    /// Subtree for the opposite half-space.
    pub(super) back: Option<Box<Node<S>>>,

    /// Distance from the root this node was created under.
    pub(super) level: usize,

    /// Classification tolerance, shared by every node of a tree.
    pub(super) epsilon: Real,
}

impl<S> Default for Node<S> {
    fn default() -> Self {
        Self::with_epsilon(PLANE_EPSILON)
    }
}

impl<S> Node<S> {
    /// Creates an empty tree using the default [`PLANE_EPSILON`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree classifying against planes with `epsilon`.
    pub fn with_epsilon(epsilon: Real) -> Self {
        Self::empty(0, epsilon)
    }

    pub(super) fn empty(level: usize, epsilon: Real) -> Self {
        Self {
            plane: None,
            polygons: Vec::new(),
            front: None,
            back: None,
            level,
            epsilon,
        }
    }

    /// Returns the splitting plane, `None` for an empty node.
    #[inline]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// Returns the polygons stored at this node (coplanar with its plane).
    #[inline]
    pub fn polygons(&self) -> &[Polygon<S>] {
        &self.polygons
    }

    #[inline]
    pub fn front(&self) -> Option<&Node<S>> {
        self.front.as_deref()
    }

    #[inline]
    pub fn back(&self) -> Option<&Node<S>> {
        self.back.as_deref()
    }

    /// Depth of this node below the root it was built under (root is 0).
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The classification tolerance used by this tree.
    #[inline]
    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    /// Returns `true` if nothing has been built into this node yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plane.is_none()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Iterates over this node and all its descendants in pre-order
    /// (node, front subtree, back subtree).
    pub fn iter(&self) -> PreOrder<'_, S> {
        PreOrder { stack: vec![self] }
    }

    /// Returns the total number of polygons in this subtree.
    pub fn polygon_count(&self) -> usize {
        self.iter().map(|node| node.polygons.len()).sum()
    }

    /// Returns the number of nodes on the longest root-to-leaf path
    /// (1 for a single node).
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|node| node.level - self.level + 1)
            .max()
            .unwrap_or(1)
    }

    /// Converts solid space to empty space and empty space to solid space.
    ///
    /// Every stored polygon and every plane is flipped and the front and back
    /// subtrees trade places. Applying it twice restores the original tree.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let Node {
                plane,
                polygons,
                front,
                back,
                ..
            } = node;

            for polygon in polygons.iter_mut() {
                polygon.flip();
            }
            if let Some(plane) = plane {
                plane.flip();
            }
            std::mem::swap(front, back);

            stack.extend(front.as_deref_mut());
            stack.extend(back.as_deref_mut());
        }
    }

    /// Consumes the tree and returns its polygons in pre-order: this node's
    /// polygons, then the front subtree, then the back subtree.
    pub fn into_polygons(mut self) -> Vec<Polygon<S>> {
        let mut result = std::mem::take(&mut self.polygons);
        let mut stack: Vec<Box<Node<S>>> = Vec::new();
        stack.extend(self.back.take());
        stack.extend(self.front.take());

        while let Some(mut node) = stack.pop() {
            result.append(&mut node.polygons);
            stack.extend(node.back.take());
            stack.extend(node.front.take());
        }
        result
    }
}

impl<S: Clone> Node<S> {
    /// Returns copies of all polygons in pre-order: this node's polygons,
    /// then the front subtree, then the back subtree.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(self.polygon_count());
        for node in self.iter() {
            result.extend(node.polygons.iter().cloned());
        }
        result
    }

    /// Copies this node's own data, without children.
    fn shallow_clone(&self) -> Self {
        Self {
            plane: self.plane.clone(),
            polygons: self.polygons.clone(),
            front: None,
            back: None,
            level: self.level,
            epsilon: self.epsilon,
        }
    }
}

impl<S: Clone> Clone for Node<S> {
    /// Deep copy of the whole subtree.
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        {
            let mut stack = vec![(self, &mut root)];
            while let Some((source, target)) = stack.pop() {
                let Node { front, back, .. } = target;
                if let Some(source_front) = source.front.as_deref() {
                    let target_front: &mut Node<S> = front.insert(Box::new(source_front.shallow_clone()));
                    stack.push((source_front, target_front));
                }
                if let Some(source_back) = source.back.as_deref() {
                    let target_back: &mut Node<S> = back.insert(Box::new(source_back.shallow_clone()));
                    stack.push((source_back, target_back));
                }
            }
        }
        root
    }
}

impl<S> Drop for Node<S> {
    fn drop(&mut self) {
        // Unlink children before they are dropped so deep trees do not
        // recurse through Box::drop.
        let mut stack: Vec<Box<Node<S>>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}

/// Pre-order iterator over the nodes of a tree. See [`Node::iter`].
pub struct PreOrder<'a, S> {
    stack: Vec<&'a Node<S>>,
}

impl<'a, S> Iterator for PreOrder<'a, S> {
    type Item = &'a Node<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.back.as_deref());
        self.stack.extend(node.front.as_deref());
        Some(node)
    }
}
