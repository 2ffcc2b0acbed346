//! Bounding Volume Hierarchy (BVH) acceleration structure for meshes.
//!
//! A binary tree over triangle indices; the triangles themselves stay
//! owned by the mesh.

use crate::hittable::Shape;
use crate::Triangle;
use strata_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with triangle indices.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { indices: Vec<usize>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH over every triangle in `triangles`.
    pub fn new(triangles: &[Triangle]) -> Self {
        if triangles.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(triangles, (0..triangles.len()).collect())
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort indices by centroid on the longest
    /// centroid axis, split in half, recurse.
    fn build(triangles: &[Triangle], mut indices: Vec<usize>) -> Self {
        let bounds = indices
            .iter()
            .map(|&i| triangles[i].bounding_box())
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, &b));

        if indices.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                indices,
                bbox: bounds,
            };
        }

        let centroid_bounds = indices.iter().fold(Aabb::EMPTY, |acc, &i| {
            let c = triangles[i].bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        indices.sort_unstable_by(|&a, &b| {
            let a_val = triangles[a].bounding_box().centroid()[axis];
            let b_val = triangles[b].bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_indices = indices.split_off(indices.len() / 2);
        let left = Self::build(triangles, indices);
        let right = Self::build(triangles, right_indices);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Nearest hit within `ray_t`, as `(triangle index, t)`.
    pub fn hit(&self, triangles: &[Triangle], ray: &Ray, ray_t: Interval) -> Option<(usize, f32)> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { indices, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                let mut closest: Option<(usize, f32)> = None;
                for &i in indices {
                    if let Some(t) = triangles[i].intersect_t(ray) {
                        let max = closest.map_or(ray_t.max, |(_, c)| c);
                        if t < max {
                            closest = Some((i, t));
                        }
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                let hit_left = left.hit(triangles, ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |(_, t)| t);
                let hit_right = right.hit(triangles, ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of nodes in the tree, for build statistics.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}
