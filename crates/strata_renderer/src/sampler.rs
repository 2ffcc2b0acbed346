//! Path sampler: the recursive Monte Carlo integrator.
//!
//! Each call to [`Sampler::sample`] estimates the radiance along one camera
//! ray. At the first hit the sample budget is spread over an `n × n`
//! stratified grid; deeper bounces take a single sample each, so the
//! recursion stays narrow.
//!
//! Paths are cut off after `max_bounces` indirect bounces. There is no
//! Russian roulette, so shallow limits darken deep interreflection.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use strata_core::Color;
use strata_math::Ray;

use crate::bounce::{bounce, BounceMode};
use crate::light::direct_light;
use crate::Scene;

/// How the sampler splits the diffuse and specular parts of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecularMode {
    /// Never split; one sample from the full mixture per cell
    #[default]
    Naive,
    /// Split only where the stratification grid is larger than one cell
    First,
    /// Always sample diffuse and specular separately
    All,
}

/// Sampler settings. Fixed once a [`PathSampler`] is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Samples taken at the first hit, a perfect square works best
    pub first_hit_samples: u32,
    /// Maximum number of indirect bounces
    pub max_bounces: u32,
    /// Sample lights explicitly at diffuse bounces
    pub direct_lighting: bool,
    pub specular_mode: SpecularMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            first_hit_samples: 16,
            max_bounces: 8,
            direct_lighting: true,
            specular_mode: SpecularMode::Naive,
        }
    }
}

impl SamplerConfig {
    pub fn new(first_hit_samples: u32, max_bounces: u32) -> Self {
        Self {
            first_hit_samples,
            max_bounces,
            ..Default::default()
        }
    }

    pub fn with_first_hit_samples(mut self, samples: u32) -> Self {
        self.first_hit_samples = samples;
        self
    }

    pub fn with_max_bounces(mut self, bounces: u32) -> Self {
        self.max_bounces = bounces;
        self
    }

    pub fn with_direct_lighting(mut self, enabled: bool) -> Self {
        self.direct_lighting = enabled;
        self
    }

    pub fn with_specular_mode(mut self, mode: SpecularMode) -> Self {
        self.specular_mode = mode;
        self
    }
}

/// Estimates the radiance carried back along a camera ray.
///
/// Implementations must be safe to call from many threads at once, each
/// with its own random source.
pub trait Sampler: Send + Sync {
    fn sample(&self, scene: &Scene, ray: &Ray, rng: &mut dyn RngCore) -> Color;
}

/// Stratified path tracer with optional next-event estimation.
#[derive(Debug, Clone)]
pub struct PathSampler {
    config: SamplerConfig,
}

impl PathSampler {
    pub fn new(mut config: SamplerConfig) -> Self {
        if config.first_hit_samples == 0 {
            log::warn!("first_hit_samples is 0, using 1");
            config.first_hit_samples = 1;
        }
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Radiance along `ray`.
    ///
    /// `emission` says whether an emitter hit here may add its own light;
    /// with direct lighting on, paths that arrived by a diffuse bounce
    /// already counted a sampled light through [`direct_light`].
    /// `samples` sets the stratification at this level and `depth` the
    /// bounces left.
    pub(crate) fn sample_path(
        &self,
        scene: &Scene,
        ray: &Ray,
        emission: bool,
        samples: u32,
        depth: i32,
        rng: &mut dyn RngCore,
    ) -> Color {
        if depth < 0 {
            return Color::ZERO;
        }
        let Some(hit) = scene.intersect(ray) else {
            return scene.environment(ray.direction());
        };
        let info = hit.hit.info(ray);
        let material = &info.material;

        let mut result = Color::ZERO;
        if material.is_emissive() {
            if self.config.direct_lighting && !emission && scene.is_light(hit.object) {
                return Color::ZERO;
            }
            // Pre-scaled by the sample count so the final average keeps it whole
            result += material.color * (material.emittance * samples as f32);
        }

        let n = stratification(samples);
        let modes = self.bounce_modes(n);
        let cell = 1.0 / n as f32;

        for i in 0..n {
            for j in 0..n {
                for &mode in modes {
                    let u = (i as f32 + rng.gen::<f32>()) * cell;
                    let v = (j as f32 + rng.gen::<f32>()) * cell;
                    let next = bounce(ray, &info, u, v, mode, rng);
                    let weight = if mode == BounceMode::Any { 1.0 } else { next.weight };
                    if weight <= 0.0 {
                        continue;
                    }

                    let indirect = self.sample_path(scene, &next.ray, next.reflected, 1, depth - 1, rng);
                    if next.reflected {
                        let tinted = indirect.lerp(material.color * indirect, material.tint);
                        result += tinted * weight;
                    } else {
                        let direct = if self.config.direct_lighting {
                            direct_light(scene, &info.ray, rng)
                        } else {
                            Color::ZERO
                        };
                        result += material.color * (direct + indirect) * weight;
                    }
                }
            }
        }

        result / (n * n) as f32
    }

    fn bounce_modes(&self, n: u32) -> &'static [BounceMode] {
        const SPLIT: &[BounceMode] = &[BounceMode::Diffuse, BounceMode::Specular];
        const ANY: &[BounceMode] = &[BounceMode::Any];
        match self.config.specular_mode {
            SpecularMode::All => SPLIT,
            SpecularMode::First if n > 1 => SPLIT,
            SpecularMode::First | SpecularMode::Naive => ANY,
        }
    }
}

impl Default for PathSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl Sampler for PathSampler {
    fn sample(&self, scene: &Scene, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        let depth = i32::try_from(self.config.max_bounces).unwrap_or(i32::MAX);
        self.sample_path(scene, ray, true, self.config.first_hit_samples, depth, rng)
    }
}

/// Side of the stratification grid for `samples` samples.
pub fn stratification(samples: u32) -> u32 {
    ((samples as f64).sqrt().floor() as u32).max(1)
}
