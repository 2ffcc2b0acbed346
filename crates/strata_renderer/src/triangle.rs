//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{Hit, Shape};
use strata_core::Material;
use strata_math::{Aabb, Mat4, Ray, Vec2, Vec3, EPSILON};

/// A triangle primitive.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Face normal (unit length, right-handed winding)
    normal: Vec3,
    /// Optional per-vertex normals for smooth shading
    vertex_normals: Option<[Vec3; 3]>,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            vertex_normals: None,
            material,
            bbox: Self::bounds(v0, v1, v2),
        }
    }

    /// Create a triangle whose shading normal is interpolated from
    /// per-vertex normals.
    pub fn with_normals(v0: Vec3, v1: Vec3, v2: Vec3, normals: [Vec3; 3], material: Material) -> Self {
        let mut triangle = Self::new(v0, v1, v2, material);
        triangle.vertex_normals = Some(normals.map(|n| n.normalize_or_zero()));
        triangle
    }

    fn bounds(v0: Vec3, v1: Vec3, v2: Vec3) -> Aabb {
        // Pad thin dimensions to avoid degenerate AABBs
        let delta = Vec3::splat(0.0001);
        Aabb::from_points(v0.min(v1).min(v2) - delta, v0.max(v1).max(v2) + delta)
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Per-vertex shading normals; the face normal three times when the
    /// triangle is flat shaded.
    pub fn normals(&self) -> [Vec3; 3] {
        self.vertex_normals.unwrap_or([self.normal; 3])
    }

    /// Permute the coordinate axes of the vertices and any vertex normals.
    pub fn swap_axes(&mut self, x: usize, y: usize, z: usize) {
        let swap = |v: Vec3| Vec3::new(v[x], v[y], v[z]);
        let normals = self.vertex_normals.map(|n| n.map(swap));
        let [v0, v1, v2] = self.vertices().map(swap);
        *self = Triangle::new(v0, v1, v2, self.material.clone());
        self.vertex_normals = normals;
    }

    pub fn set_normals(&mut self, normals: [Vec3; 3]) {
        self.vertex_normals = Some(normals.map(|n| n.normalize_or_zero()));
    }

    /// Apply an affine transform; normals go through the inverse transpose.
    pub fn transformed(&self, matrix: &Mat4) -> Triangle {
        let [v0, v1, v2] = self.vertices().map(|v| matrix.transform_point3(v));
        let mut triangle = Triangle::new(v0, v1, v2, self.material.clone());
        if let Some(normals) = self.vertex_normals {
            let normal_matrix = matrix.inverse().transpose();
            triangle.vertex_normals =
                Some(normals.map(|n| normal_matrix.transform_vector3(n).normalize_or_zero()));
        }
        triangle
    }

    /// Möller-Trumbore intersection, returning the ray parameter.
    pub(crate) fn intersect_t(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    /// Barycentric weights of `p` for (v0, v1, v2).
    fn barycentric(&self, p: Vec3) -> Vec3 {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let ep = p - self.v0;
        let d00 = e1.dot(e1);
        let d01 = e1.dot(e2);
        let d11 = e2.dot(e2);
        let d20 = ep.dot(e1);
        let d21 = ep.dot(e2);
        let denom = d00 * d11 - d01 * d01;
        if denom.abs() < 1e-12 {
            return Vec3::X;
        }
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        Vec3::new(1.0 - v - w, v, w)
    }
}

impl Shape for Triangle {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect_t(ray).map(|t| Hit::new(self, t))
    }

    fn material_at(&self, _p: Vec3) -> &Material {
        &self.material
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        match self.vertex_normals {
            Some([n0, n1, n2]) => {
                let b = self.barycentric(p);
                (n0 * b.x + n1 * b.y + n2 * b.z)
                    .try_normalize()
                    .unwrap_or(self.normal)
            }
            None => self.normal,
        }
    }

    fn uv(&self, p: Vec3) -> Vec2 {
        let b = self.barycentric(p);
        Vec2::new(b.y, b.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Color;

    fn xy_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Material::diffuse(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = xy_triangle().intersect_t(&ray).expect("ray should hit");
        assert!((hit - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_miss() {
        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(xy_triangle().intersect_t(&ray).is_none());

        // Ray passing beside the triangle
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(xy_triangle().intersect_t(&ray).is_none());
    }

    #[test]
    fn test_triangle_face_normal() {
        assert!((xy_triangle().normal_at(Vec3::ZERO) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_interpolated_normal() {
        let tri = Triangle::with_normals(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            [Vec3::Z, Vec3::X, Vec3::Z],
            Material::default(),
        );
        // At v0 the vertex normal is returned unchanged
        assert!((tri.normal_at(Vec3::ZERO) - Vec3::Z).length() < 1e-6);
        // Halfway along v0-v1 the normal leans towards +X
        let n = tri.normal_at(Vec3::new(0.5, 0.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.x - n.z).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_uv_is_barycentric() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Material::default());
        assert!((tri.uv(Vec3::X) - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((tri.uv(Vec3::Y) - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert!(tri.uv(Vec3::ZERO).length() < 1e-6);
    }

    #[test]
    fn test_triangle_transformed() {
        let moved = xy_triangle().transformed(&Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = moved.intersect_t(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }
}
