//! Bounce protocol: how a path continues at a surface.
//!
//! A material splits the energy arriving at a hit into three lobes:
//!
//! - **reflect**: `reflectivity`, or the Fresnel term when it is unset
//!   (forced to 1 under total internal reflection of a transparent material)
//! - **refract**: `(1 - reflect) * transparency`
//! - **diffuse**: `(1 - reflect) * (1 - transparency)`
//!
//! [`BounceMode::Any`] picks a single lobe by its mass. The split modes let
//! the sampler spend separate samples on the diffuse and specular parts of
//! the same hit; a mode whose lobes carry no mass returns weight 0.

use rand::{Rng, RngCore};
use strata_core::Material;
use strata_math::{Ray, Vec3, EPSILON};

use crate::hittable::HitInfo;
use crate::sampling::{cone, cosine_weighted};

/// Clamp for Fresnel denominators at grazing angles.
const MIN_DENOMINATOR: f32 = 1e-6;

/// Which part of the surface response a bounce should sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceMode {
    /// One direction from the full mixture
    Any,
    /// Only the cosine-weighted diffuse lobe
    Diffuse,
    /// Only the reflective and refractive lobes
    Specular,
}

/// Outcome of a bounce.
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    /// Continuation ray, unit direction, origin offset off the surface
    pub ray: Ray,
    /// True for specular reflection or refraction, false for diffuse
    pub reflected: bool,
    /// Contribution factor of this sample; 0 means "skip"
    pub weight: f32,
}

enum Lobe {
    Reflect,
    Refract,
    Diffuse,
}

/// Probability mass of each lobe at a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LobeMasses {
    reflect: f32,
    refract: f32,
    diffuse: f32,
}

impl LobeMasses {
    fn new(material: &Material, reflectance: f32, total_internal: bool) -> Self {
        let transparency = material.transparency.clamp(0.0, 1.0);
        let mut reflect = material.reflectivity.unwrap_or(reflectance).clamp(0.0, 1.0);
        if transparency > 0.0 && total_internal {
            reflect = 1.0;
        }
        let rest = 1.0 - reflect;
        Self {
            reflect,
            refract: rest * transparency,
            diffuse: rest * (1.0 - transparency),
        }
    }

    fn specular(&self) -> f32 {
        self.reflect + self.refract
    }
}

/// Continue a path that arrived along `incoming` and hit the surface
/// described by `info`.
///
/// `u` and `v` are the (stratified) samples that drive the outgoing
/// direction; `rng` supplies any further choices.
pub fn bounce(incoming: &Ray, info: &HitInfo, u: f32, v: f32, mode: BounceMode, rng: &mut dyn RngCore) -> Bounce {
    let material = &info.material;
    let normal = info.normal;
    let i = incoming.direction();
    let (n1, n2) = if info.inside {
        (material.index, 1.0)
    } else {
        (1.0, material.index)
    };

    let refracted = refract(normal, i, n1, n2);
    let masses = LobeMasses::new(material, reflectance(normal, i, n1, n2), refracted.is_none());

    let (lobe, weight) = match mode {
        BounceMode::Any => {
            let x = rng.gen::<f32>();
            let lobe = if x < masses.reflect {
                Lobe::Reflect
            } else if x < masses.specular() {
                Lobe::Refract
            } else {
                Lobe::Diffuse
            };
            (lobe, 1.0)
        }
        BounceMode::Specular => {
            let specular = masses.specular();
            if specular <= 0.0 {
                return Bounce {
                    ray: info.ray,
                    reflected: true,
                    weight: 0.0,
                };
            }
            let lobe = if rng.gen::<f32>() * specular < masses.reflect {
                Lobe::Reflect
            } else {
                Lobe::Refract
            };
            (lobe, specular)
        }
        BounceMode::Diffuse => {
            if masses.diffuse <= 0.0 {
                return Bounce {
                    ray: info.ray,
                    reflected: false,
                    weight: 0.0,
                };
            }
            (Lobe::Diffuse, masses.diffuse)
        }
    };

    match (lobe, refracted) {
        (Lobe::Refract, Some(direction)) => {
            let direction = cone(direction, material.gloss, u, v, rng);
            Bounce {
                ray: Ray::new(info.position - normal * EPSILON, direction),
                reflected: true,
                weight,
            }
        }
        (Lobe::Reflect, _) | (Lobe::Refract, None) => {
            let direction = cone(reflect(normal, i), material.gloss, u, v, rng);
            Bounce {
                ray: Ray::new(info.ray.origin(), direction),
                reflected: true,
                weight,
            }
        }
        (Lobe::Diffuse, _) => Bounce {
            ray: Ray::new(info.ray.origin(), cosine_weighted(normal, u, v, rng)),
            reflected: false,
            weight,
        },
    }
}

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(normal: Vec3, incident: Vec3) -> Vec3 {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Refract `incident` through a surface whose `normal` faces it, going from
/// index `n1` into index `n2`. `None` on total internal reflection.
pub fn refract(normal: Vec3, incident: Vec3, n1: f32, n2: f32) -> Option<Vec3> {
    let nr = n1 / n2;
    let cos_i = (-normal.dot(incident)).clamp(0.0, 1.0);
    let sin_t2 = nr * nr * (1.0 - cos_i * cos_i);
    if sin_t2 > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    (incident * nr + normal * (nr * cos_i - cos_t)).try_normalize()
}

/// Unpolarized Fresnel reflectance for `incident` hitting a surface whose
/// `normal` faces it, going from index `n1` into index `n2`.
pub fn reflectance(normal: Vec3, incident: Vec3, n1: f32, n2: f32) -> f32 {
    let nr = n1 / n2;
    let cos_i = (-normal.dot(incident)).clamp(0.0, 1.0);
    let sin_t2 = nr * nr * (1.0 - cos_i * cos_i);
    if sin_t2 > 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    let r_orth = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t).max(MIN_DENOMINATOR);
    let r_par = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t).max(MIN_DENOMINATOR);
    ((r_orth * r_orth + r_par * r_par) / 2.0).clamp(0.0, 1.0)
}
