//! Infinite plane primitive.

use crate::hittable::{Hit, Shape};
use strata_core::Material;
use strata_math::{Aabb, Ray, Vec2, Vec3, EPSILON};

/// An infinite plane through `point` with unit normal `normal`.
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    /// In-plane axes for texture coordinates
    tangents: (Vec3, Vec3),
    material: Material,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Z);
        Self {
            point,
            normal,
            tangents: normal.any_orthonormal_pair(),
            material,
        }
    }
}

impl Shape for Plane {
    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }

    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let denom = self.normal.dot(ray.direction());
        // Ray is parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        (t > EPSILON).then(|| Hit::new(self, t))
    }

    fn material_at(&self, _p: Vec3) -> &Material {
        &self.material
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }

    fn uv(&self, p: Vec3) -> Vec2 {
        let d = p - self.point;
        Vec2::new(d.dot(self.tangents.0), d.dot(self.tangents.1))
    }
}
