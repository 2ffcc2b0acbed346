//! Strata renderer - the light transport core.
//!
//! A Monte Carlo path tracer with stratified first-hit sampling, optional
//! next-event estimation and a split diffuse/specular sampling policy.
//!
//! The entry point is [`Sampler::sample`], called once per camera ray per
//! render pass. Scenes are built from [`Shape`]s and shared read-only
//! across threads; every call chain brings its own random source.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use strata_renderer::{Color, Material, PathSampler, Plane, Ray, Sampler, SamplerConfig, Scene, Sphere, Vec3};
//!
//! let mut scene = Scene::new();
//! scene.add(Plane::new(Vec3::ZERO, Vec3::Z, Material::diffuse(Color::splat(0.8))));
//! scene.add(Sphere::new(Vec3::new(0.0, 0.0, 4.0), 0.5, Material::light(Color::ONE, 10.0)));
//!
//! let sampler = PathSampler::new(SamplerConfig::new(16, 4));
//! let mut rng = StdRng::seed_from_u64(0);
//! let ray = Ray::new(Vec3::new(0.0, -3.0, 2.0), Vec3::new(0.0, 3.0, -2.0));
//! let color = sampler.sample(&scene, &ray, &mut rng);
//! assert!(color.min_element() >= 0.0);
//! ```

mod bounce;
mod bvh;
mod hittable;
mod light;
mod mesh;
mod plane;
mod sampler;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bounce::{bounce, reflect, reflectance, refract, Bounce, BounceMode};
pub use bvh::BvhNode;
pub use hittable::{surface_material, Hit, HitInfo, Shape};
pub use light::{coverage, direct_light};
pub use mesh::Mesh;
pub use plane::Plane;
pub use sampler::{stratification, PathSampler, Sampler, SamplerConfig, SpecularMode};
pub use sampling::{cone, cosine_weighted, random_in_unit_disk, random_unit_vector, tangent_frame};
pub use scene::{Scene, SceneHit};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the scene data and math types callers build scenes from
pub use strata_core::{Color, Material, Texture, TextureError, TextureResult};
pub use strata_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3, EPSILON};
