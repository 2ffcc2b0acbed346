use crate::Vec3;

/// Minimum hit distance along a ray, and the offset applied when spawning
/// secondary rays off a surface.
pub const EPSILON: f32 = 1e-4;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Rays are immutable once constructed: the direction is normalized by
/// [`Ray::new`] and never changes afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized; a zero-length
    /// direction falls back to `+Z`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize_or_zero();
        let direction = if direction == Vec3::ZERO {
            Vec3::Z
        } else {
            direction
        };
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
