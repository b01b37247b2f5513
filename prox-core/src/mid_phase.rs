//! Mid-phase culling with a bounding volume hierarchy.
//!
//! The polynomial continuous-collision path must examine triangle pairs of
//! two swept meshes; testing all pairs is quadratic. The BVH here organizes
//! swept triangle bounds in a binary AABB tree so that queries only descend
//! into overlapping regions.
//!
//! # Algorithm
//!
//! Top-down construction:
//! 1. Compute the AABB of all primitives
//! 2. Pick the axis with the largest extent
//! 3. Sort primitives by centroid along that axis
//! 4. Split at the median and recurse
//!
//! Queries traverse the tree, descending only where AABBs overlap.

use crate::shape::Aabb;
use nalgebra::Point3;

/// A primitive stored in the BVH: a bound plus the index of the geometry it
/// came from (e.g. a triangle index).
#[derive(Debug, Clone)]
pub struct BvhPrimitive {
    /// Axis-aligned bound of this primitive.
    pub aabb: Aabb,
    /// Index into the original primitive array.
    pub index: usize,
}

impl BvhPrimitive {
    /// Create a new primitive.
    #[must_use]
    pub const fn new(aabb: Aabb, index: usize) -> Self {
        Self { aabb, index }
    }

    /// Centroid of the primitive's bound.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        self.aabb.center()
    }
}

/// A node in the BVH tree.
#[derive(Debug, Clone)]
enum BvhNode {
    /// Internal node with two children.
    Internal {
        /// Bound containing all descendants.
        aabb: Aabb,
        /// Index of the left child in the nodes array.
        left: usize,
        /// Index of the right child in the nodes array.
        right: usize,
    },
    /// Leaf node referencing a primitive range.
    Leaf {
        /// Bound of this leaf.
        aabb: Aabb,
        /// Start index in the primitives array.
        first_primitive: usize,
        /// Number of primitives in this leaf.
        primitive_count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Internal { aabb, .. } | Self::Leaf { aabb, .. } => aabb,
        }
    }
}

/// Bounding volume hierarchy for spatial culling.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    /// Tree nodes; index 0 is the root.
    nodes: Vec<BvhNode>,
    /// Primitives, reordered during construction.
    primitives: Vec<BvhPrimitive>,
}

/// Maximum primitives per leaf; deeper trees buy cheaper narrow-phase work.
const MAX_PRIMITIVES_PER_LEAF: usize = 4;

impl Bvh {
    /// Build a BVH from primitives. An empty input produces an empty tree
    /// that answers every query with no hits.
    #[must_use]
    pub fn build(mut primitives: Vec<BvhPrimitive>) -> Self {
        let mut bvh = Self::default();
        if primitives.is_empty() {
            return bvh;
        }

        bvh.nodes.reserve(primitives.len() * 2);
        let len = primitives.len();
        bvh.build_recursive(&mut primitives, 0, len);
        bvh.primitives = primitives;
        bvh
    }

    /// Whether the tree holds no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Recursively build the subtree over `primitives[start..end]`; returns
    /// the created node's index.
    fn build_recursive(
        &mut self,
        primitives: &mut [BvhPrimitive],
        start: usize,
        end: usize,
    ) -> usize {
        let count = end - start;
        let aabb = Self::compute_bounds(&primitives[start..end]);

        if count <= MAX_PRIMITIVES_PER_LEAF {
            let node_idx = self.nodes.len();
            self.nodes.push(BvhNode::Leaf {
                aabb,
                first_primitive: start,
                primitive_count: count,
            });
            return node_idx;
        }

        // Split on the widest axis at the median centroid
        let extent = aabb.max - aabb.min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        primitives[start..end].sort_by(|a, b| {
            let va = a.centroid()[axis];
            let vb = b.centroid()[axis];
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = start + count / 2;

        let node_idx = self.nodes.len();
        self.nodes.push(BvhNode::Internal {
            aabb,
            left: 0,
            right: 0,
        });

        let left_idx = self.build_recursive(primitives, start, mid);
        let right_idx = self.build_recursive(primitives, mid, end);

        if let BvhNode::Internal { left, right, .. } = &mut self.nodes[node_idx] {
            *left = left_idx;
            *right = right_idx;
        }

        node_idx
    }

    fn compute_bounds(primitives: &[BvhPrimitive]) -> Aabb {
        primitives
            .iter()
            .map(|p| p.aabb)
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_default()
    }

    /// Indices of primitives whose bounds may overlap `query_aabb`.
    ///
    /// The caller performs precise tests on the returned candidates.
    #[must_use]
    pub fn query(&self, query_aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if !self.nodes.is_empty() {
            self.query_recursive(0, query_aabb, &mut results);
        }
        results
    }

    fn query_recursive(&self, node_idx: usize, query_aabb: &Aabb, results: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];

        if !node.aabb().overlaps(query_aabb) {
            return;
        }

        match node {
            BvhNode::Internal { left, right, .. } => {
                self.query_recursive(*left, query_aabb, results);
                self.query_recursive(*right, query_aabb, results);
            }
            BvhNode::Leaf {
                first_primitive,
                primitive_count,
                ..
            } => {
                for i in *first_primitive..(*first_primitive + *primitive_count) {
                    if self.primitives[i].aabb.overlaps(query_aabb) {
                        results.push(self.primitives[i].index);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn unit_boxes_along_x(n: usize) -> Vec<BvhPrimitive> {
        (0..n)
            .map(|i| {
                let center = Point3::new(2.0 * i as f64, 0.0, 0.0);
                BvhPrimitive::new(Aabb::from_center(center, Vector3::repeat(0.5)), i)
            })
            .collect()
    }

    #[test]
    fn empty_tree_answers_nothing() {
        let bvh = Bvh::build(Vec::new());
        assert!(bvh.is_empty());
        let q = Aabb::from_center(Point3::origin(), Vector3::repeat(100.0));
        assert!(bvh.query(&q).is_empty());
    }

    #[test]
    fn query_finds_exactly_the_overlapping_primitives() {
        let bvh = Bvh::build(unit_boxes_along_x(32));

        // Query around the 5th box only
        let q = Aabb::from_center(Point3::new(10.0, 0.0, 0.0), Vector3::repeat(0.6));
        let hits = bvh.query(&q);
        assert_eq!(hits, vec![5]);

        // A query spanning three boxes
        let q = Aabb::new(Point3::new(3.4, -0.1, -0.1), Point3::new(8.6, 0.1, 0.1));
        let mut hits = bvh.query(&q);
        hits.sort_unstable();
        assert_eq!(hits, vec![2, 3, 4]);
    }

    #[test]
    fn query_far_away_is_empty() {
        let bvh = Bvh::build(unit_boxes_along_x(8));
        let q = Aabb::from_center(Point3::new(0.0, 50.0, 0.0), Vector3::repeat(1.0));
        assert!(bvh.query(&q).is_empty());
    }
}
