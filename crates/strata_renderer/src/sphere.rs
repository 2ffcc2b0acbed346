//! Sphere primitive.

use crate::hittable::{Hit, Shape};
use std::f32::consts::PI;
use strata_core::Material;
use strata_math::{Aabb, Ray, Vec2, Vec3, EPSILON};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        // Direction is unit length, so the quadratic's `a` term is 1
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root past the self-intersection threshold
        let near = h - sqrtd;
        if near > EPSILON {
            return Some(Hit::new(self, near));
        }
        let far = h + sqrtd;
        if far > EPSILON {
            return Some(Hit::new(self, far));
        }
        None
    }

    fn material_at(&self, _p: Vec3) -> &Material {
        &self.material
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize_or_zero()
    }

    fn uv(&self, p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let p = (p - self.center).normalize_or_zero();
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    fn bounding_sphere(&self) -> Option<(Vec3, f32)> {
        Some((self.center, self.radius))
    }
}
