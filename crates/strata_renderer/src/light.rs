//! Next-event estimation: one explicit light sample per diffuse bounce.

use rand::{Rng, RngCore};
use strata_core::Color;
use strata_math::Ray;

use crate::hittable::surface_material;
use crate::sampling::{random_in_unit_disk, tangent_frame};
use crate::Scene;

/// Estimate the light arriving directly from the scene's emitters at the
/// origin of `shading`, whose direction is the surface normal.
///
/// One light is picked uniformly, a point on its bounding sphere is sampled,
/// and the result is scaled by the light count to undo the selection
/// probability. Occluded, back-facing and degenerate samples return black.
pub fn direct_light(scene: &Scene, shading: &Ray, rng: &mut dyn RngCore) -> Color {
    let lights = scene.lights();
    if lights.is_empty() {
        return Color::ZERO;
    }
    let object = lights[rng.gen_range(0..lights.len())];
    let Some(light) = scene.shape(object) else {
        return Color::ZERO;
    };

    let (center, radius) = light.bounding_sphere().unwrap_or_else(|| {
        let bbox = light.bounding_box();
        (bbox.centroid(), bbox.outer_radius())
    });
    if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
        return Color::ZERO;
    }

    let origin = shading.origin();
    let to_center = center - origin;
    let distance = to_center.length();
    if distance <= 0.0 {
        return Color::ZERO;
    }

    // Point on the disk through the light's center, facing the shading point
    let (s, t) = tangent_frame(to_center / distance, rng);
    let disk = random_in_unit_disk(rng);
    let point = center + s * (disk.x * radius) + t * (disk.y * radius);

    let ray = Ray::new(origin, point - origin);
    let cosine = ray.direction().dot(shading.direction());
    if cosine <= 0.0 {
        return Color::ZERO;
    }

    let Some(hit) = scene.intersect(&ray) else {
        return Color::ZERO;
    };
    if hit.object != object {
        return Color::ZERO;
    }

    let material = surface_material(hit.hit.shape, ray.at(hit.hit.t));
    let coverage = coverage(radius, distance);
    material.color * (material.emittance * cosine * coverage * lights.len() as f32)
}

/// Fraction of the hemisphere subtended by a sphere of `radius` at
/// `distance`, from the cone half-angle. 1 when inside the sphere.
pub fn coverage(radius: f32, distance: f32) -> f32 {
    if distance <= radius {
        return 1.0;
    }
    let angle = (radius / distance).asin();
    let tangent = angle.tan();
    (tangent * tangent).min(1.0)
}
