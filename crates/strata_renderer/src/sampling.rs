//! Random direction and point generators shared by the bounce protocol
//! and the direct-light estimator.

use rand::{Rng, RngCore};
use std::f32::consts::PI;
use strata_math::{Vec2, Vec3, EPSILON};

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Use rejection sampling for uniform distribution on sphere
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Generate a uniformly distributed point in the unit disk.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec2 {
    loop {
        let p = Vec2::new(rng.gen::<f32>() * 2.0 - 1.0, rng.gen::<f32>() * 2.0 - 1.0);
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Two unit vectors orthogonal to `axis` and to each other, randomly
/// rotated around `axis`. `axis` must be unit length.
pub fn tangent_frame(axis: Vec3, rng: &mut dyn RngCore) -> (Vec3, Vec3) {
    // Gram-Schmidt against a random direction
    let s = axis.cross(random_unit_vector(rng));
    if s.length_squared() > 1e-6 {
        let s = s.normalize();
        (s, axis.cross(s))
    } else {
        axis.any_orthonormal_pair()
    }
}

/// Cosine-weighted direction in the hemisphere around `normal`, driven by
/// the stratified pair `(u, v)`.
pub fn cosine_weighted(normal: Vec3, u: f32, v: f32, rng: &mut dyn RngCore) -> Vec3 {
    let u = u.clamp(0.0, 1.0);
    let radius = u.sqrt();
    let theta = 2.0 * PI * v;
    let (s, t) = tangent_frame(normal, rng);
    let d = s * (radius * theta.cos()) + t * (radius * theta.sin()) + normal * (1.0 - u).sqrt();
    d.try_normalize().unwrap_or(normal)
}

/// Direction inside the cone of half-angle `theta` around `direction`,
/// driven by `(u, v)`. A zero angle returns `direction` unchanged.
pub fn cone(direction: Vec3, theta: f32, u: f32, v: f32, rng: &mut dyn RngCore) -> Vec3 {
    if theta < EPSILON {
        return direction;
    }
    let theta = theta * (1.0 - 2.0 * u.clamp(0.0, 1.0).acos() / PI);
    let (m1, m2) = theta.sin_cos();
    let a = v * 2.0 * PI;
    let (s, t) = tangent_frame(direction, rng);
    let d = s * (m1 * a.cos()) + t * (m1 * a.sin()) + direction * m2;
    d.try_normalize().unwrap_or(direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            assert!(random_in_unit_disk(&mut rng).length() <= 1.0);
        }
    }

    #[test]
    fn test_tangent_frame_is_orthonormal() {
        let mut rng = StdRng::seed_from_u64(3);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, 1.0).normalize()] {
            let (s, t) = tangent_frame(axis, &mut rng);
            assert!((s.length() - 1.0).abs() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(s.dot(t).abs() < 1e-5);
            assert!(s.dot(axis).abs() < 1e-5);
            assert!(t.dot(axis).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cosine_weighted_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(4);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        for i in 0..16 {
            for j in 0..16 {
                let u = (i as f32 + 0.5) / 16.0;
                let v = (j as f32 + 0.5) / 16.0;
                let d = cosine_weighted(normal, u, v, &mut rng);
                assert!((d.length() - 1.0).abs() < 1e-5);
                assert!(d.dot(normal) >= 0.0);
            }
        }
    }

    #[test]
    fn test_cone_zero_angle_is_identity() {
        let mut rng = StdRng::seed_from_u64(5);
        let d = Vec3::new(0.3, -0.4, 0.5).normalize();
        assert_eq!(cone(d, 0.0, 0.7, 0.2, &mut rng), d);
    }

    #[test]
    fn test_cone_respects_angle() {
        let mut rng = StdRng::seed_from_u64(6);
        let theta = 0.2;
        for i in 0..64 {
            let u = i as f32 / 63.0;
            let d = cone(Vec3::Z, theta, u, 0.37, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-5);
            assert!(d.dot(Vec3::Z).clamp(-1.0, 1.0).acos() <= theta + 1e-4);
        }
    }
}
