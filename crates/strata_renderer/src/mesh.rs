//! Triangle meshes with an explicitly managed acceleration structure.

use std::collections::HashMap;
use std::time::Instant;

use crate::bvh::BvhNode;
use crate::hittable::{Hit, Shape};
use crate::Triangle;
use strata_core::Material;
use strata_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3};

/// Acceleration state of a mesh.
///
/// Editing the triangles moves the mesh to `Dirty`; `Mesh::compile` moves
/// it back to `Clean`. A dirty mesh is still intersectable, just slower.
enum AccelState {
    Dirty,
    Clean(BvhNode),
}

/// Exact vertex position, usable as a map key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey([u32; 3]);

impl VertexKey {
    fn new(v: Vec3) -> Self {
        Self(v.to_array().map(f32::to_bits))
    }
}

/// A collection of triangles treated as one object by the scene.
pub struct Mesh {
    triangles: Vec<Triangle>,
    /// Material reported for the mesh as a whole (its first triangle's)
    material: Material,
    bbox: Aabb,
    accel: AccelState,
}

impl Mesh {
    /// Create a mesh. The acceleration structure is not built until
    /// [`Mesh::compile`] is called.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let material = triangles
            .first()
            .map(|t| t.material().clone())
            .unwrap_or_default();
        let bbox = Self::bounds(&triangles);
        Self {
            triangles,
            material,
            bbox,
            accel: AccelState::Dirty,
        }
    }

    fn bounds(triangles: &[Triangle]) -> Aabb {
        triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| Aabb::surrounding(&acc, &t.bounding_box()))
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Whether the acceleration structure is up to date.
    pub fn is_compiled(&self) -> bool {
        matches!(self.accel, AccelState::Clean(_))
    }

    /// Build the acceleration structure if the mesh is dirty.
    pub fn compile(&mut self) {
        if self.is_compiled() {
            return;
        }
        let start = Instant::now();
        let bvh = BvhNode::new(&self.triangles);
        log::info!(
            "Built mesh BVH: {} triangles, {} nodes in {:.2?}",
            self.triangles.len(),
            bvh.node_count(),
            start.elapsed()
        );
        self.accel = AccelState::Clean(bvh);
    }

    /// Apply an affine transform to every triangle. Invalidates the
    /// acceleration structure.
    pub fn transform(&mut self, matrix: Mat4) {
        for triangle in &mut self.triangles {
            *triangle = triangle.transformed(&matrix);
        }
        self.bbox = Self::bounds(&self.triangles);
        self.accel = AccelState::Dirty;
    }

    /// Average the normals of every corner sharing a vertex position.
    pub fn smooth_normals(&mut self) {
        let mut sums: HashMap<VertexKey, Vec3> = HashMap::new();
        for triangle in &self.triangles {
            for (v, n) in triangle.vertices().into_iter().zip(triangle.normals()) {
                *sums.entry(VertexKey::new(v)).or_insert(Vec3::ZERO) += n;
            }
        }
        for triangle in &mut self.triangles {
            let normals = triangle.vertices().map(|v| sums[&VertexKey::new(v)].normalize_or_zero());
            triangle.set_normals(normals);
        }
        self.accel = AccelState::Dirty;
    }

    /// Like [`Mesh::smooth_normals`], but a corner only averages with
    /// neighbours whose normal is within `radians` of its own, so hard
    /// edges stay sharp.
    pub fn smooth_normals_threshold(&mut self, radians: f32) {
        let threshold = radians.cos();
        let mut shared: HashMap<VertexKey, Vec<Vec3>> = HashMap::new();
        for triangle in &self.triangles {
            for (v, n) in triangle.vertices().into_iter().zip(triangle.normals()) {
                shared.entry(VertexKey::new(v)).or_default().push(n);
            }
        }
        for triangle in &mut self.triangles {
            let vertices = triangle.vertices();
            let mut normals = triangle.normals();
            for (normal, v) in normals.iter_mut().zip(vertices) {
                let sum: Vec3 = shared[&VertexKey::new(v)]
                    .iter()
                    .filter(|n| n.dot(*normal) >= threshold)
                    .sum();
                *normal = sum.normalize_or_zero();
            }
            triangle.set_normals(normals);
        }
        self.accel = AccelState::Dirty;
    }

    /// Permute the coordinate axes of every vertex and normal; the new x
    /// is the old axis `x`, and so on.
    pub fn swap_axes(&mut self, x: usize, y: usize, z: usize) {
        for triangle in &mut self.triangles {
            triangle.swap_axes(x, y, z);
        }
        self.bbox = Self::bounds(&self.triangles);
        self.accel = AccelState::Dirty;
    }

    /// Translate so the point at `anchor` (0..1 per axis) of the bounding
    /// box lands on `position`.
    pub fn move_to(&mut self, position: Vec3, anchor: Vec3) {
        let offset = position - self.anchor_point(anchor);
        self.transform(Mat4::from_translation(offset));
    }

    /// Uniformly scale and translate to fit inside `bounds`, placing any
    /// slack according to `anchor`.
    pub fn fit_inside(&mut self, bounds: Aabb, anchor: Vec3) {
        let size = self.bbox.max() - self.bbox.min();
        let target = bounds.max() - bounds.min();
        let scale = (target / size).min_element();
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("Cannot fit mesh of size {} inside {}", size, target);
            return;
        }
        let extra = target - size * scale;
        let matrix = Mat4::from_translation(bounds.min() + extra * anchor)
            * Mat4::from_scale(Vec3::splat(scale))
            * Mat4::from_translation(-self.bbox.min());
        self.transform(matrix);
    }

    /// Fit inside the unit cube and center on the origin.
    pub fn unit_cube(&mut self) {
        self.fit_inside(Aabb::from_points(Vec3::ZERO, Vec3::ONE), Vec3::ZERO);
        self.move_to(Vec3::ZERO, Vec3::splat(0.5));
    }

    fn anchor_point(&self, anchor: Vec3) -> Vec3 {
        self.bbox.min() + (self.bbox.max() - self.bbox.min()) * anchor
    }

    fn nearest_linear(&self, ray: &Ray) -> Option<(usize, f32)> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.intersect_t(ray).map(|d| (i, d)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

impl Shape for Mesh {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let nearest = match &self.accel {
            AccelState::Clean(bvh) => bvh.hit(&self.triangles, ray, Interval::new(0.0, f32::INFINITY)),
            AccelState::Dirty => self.nearest_linear(ray),
        };
        nearest.map(|(i, t)| Hit::new(&self.triangles[i], t))
    }

    fn material_at(&self, _p: Vec3) -> &Material {
        &self.material
    }

    // Hits resolve to the individual triangle, so the mesh itself is only
    // asked for surface data when treated as a whole (e.g. as a light).
    fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.bbox.centroid()).normalize_or_zero()
    }

    fn uv(&self, _p: Vec3) -> Vec2 {
        Vec2::ZERO
    }
}
