//! Shape capability trait and the hit records produced by intersection.

use strata_core::Material;
use strata_math::{Aabb, Ray, Vec2, Vec3, EPSILON};

/// Trait for geometry that rays can hit.
///
/// Surface queries (`normal_at`, `material_at`, `uv`) are only made at
/// points returned by a confirmed intersection.
pub trait Shape: Send + Sync {
    /// Get the axis-aligned bounding box of this shape.
    fn bounding_box(&self) -> Aabb;

    /// Nearest intersection with `t > EPSILON`, or `None` on a miss.
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>>;

    /// Base material at a surface point (texture not yet applied).
    fn material_at(&self, p: Vec3) -> &Material;

    /// Outward unit normal at a surface point.
    fn normal_at(&self, p: Vec3) -> Vec3;

    /// Texture coordinates at a surface point.
    fn uv(&self, p: Vec3) -> Vec2;

    /// Exact bounding sphere `(center, radius)` for shapes that have one.
    ///
    /// Direct lighting uses it in preference to a sphere derived from the
    /// bounding box.
    fn bounding_sphere(&self) -> Option<(Vec3, f32)> {
        None
    }
}

/// The material seen at `p`, with any texture resolved through the shape's UVs.
pub fn surface_material(shape: &dyn Shape, p: Vec3) -> Material {
    let material = shape.material_at(p);
    if material.texture.is_some() {
        material.sampled(shape.uv(p))
    } else {
        material.clone()
    }
}

/// A ray-shape intersection.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// The primitive that was hit
    pub shape: &'a dyn Shape,
    /// Ray parameter of the intersection, always greater than `EPSILON`
    pub t: f32,
}

impl<'a> Hit<'a> {
    pub fn new(shape: &'a dyn Shape, t: f32) -> Self {
        Self { shape, t }
    }

    /// Derive the shading record for this hit along `ray`.
    pub fn info(&self, ray: &Ray) -> HitInfo<'a> {
        let position = ray.at(self.t);
        let outward = self.shape.normal_at(position);

        // If the ray and normal point in the same direction, we're inside
        let inside = outward.dot(ray.direction()) > 0.0;
        let normal = if inside { -outward } else { outward };

        HitInfo {
            shape: self.shape,
            position,
            normal,
            ray: Ray::new(position + normal * EPSILON, normal),
            material: surface_material(self.shape, position),
            inside,
        }
    }
}

/// Shading record for a hit, computed once and read-only afterwards.
#[derive(Clone)]
pub struct HitInfo<'a> {
    pub shape: &'a dyn Shape,
    /// Point of intersection
    pub position: Vec3,
    /// Surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Ray from just above the surface along `normal`; new paths start here
    pub ray: Ray,
    /// Material at the intersection, texture applied
    pub material: Material,
    /// Whether the incoming ray was travelling inside the shape
    pub inside: bool,
}
