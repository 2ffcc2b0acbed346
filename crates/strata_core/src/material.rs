//! Surface materials.
//!
//! A material is plain data: the renderer decides how a path continues at a
//! surface by reading these parameters, so there is no per-material scatter
//! code here.

use std::sync::Arc;

use strata_math::{Vec2, Vec3};

use crate::Texture;

/// Linear RGB color. Components are non-negative and may exceed 1 for
/// emissive surfaces.
pub type Color = Vec3;

/// Material parameters for a surface.
#[derive(Clone, Debug)]
pub struct Material {
    /// Base color; modulates diffuse bounces and, through `tint`, specular ones
    pub color: Color,

    /// Optional texture replacing `color` at the surface's UV coordinates
    pub texture: Option<Arc<Texture>>,

    /// Radiant intensity multiplier; anything above zero is a light
    pub emittance: f32,

    /// Index of refraction (1.0 = no refraction)
    pub index: f32,

    /// Half-angle in radians of the cone around the ideal specular
    /// direction (0 = perfect mirror)
    pub gloss: f32,

    /// How much `color` modulates specular energy (0 = untinted, 1 = fully tinted)
    pub tint: f32,

    /// Specular probability. `None` derives it from the Fresnel term of `index`.
    pub reflectivity: Option<f32>,

    /// Fraction of the non-reflected energy routed to refraction
    pub transparency: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(0.5),
            texture: None,
            emittance: 0.0,
            index: 1.0,
            gloss: 0.0,
            tint: 0.0,
            reflectivity: None,
            transparency: 0.0,
        }
    }
}

impl Material {
    /// Lambertian surface.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Diffuse base with a Fresnel-weighted, tinted mirror coat.
    pub fn specular(color: Color, index: f32) -> Self {
        Self {
            color,
            index,
            tint: 1.0,
            ..Default::default()
        }
    }

    /// Diffuse base with a Fresnel-weighted glossy coat.
    pub fn glossy(color: Color, index: f32, gloss: f32) -> Self {
        Self {
            color,
            index,
            gloss,
            ..Default::default()
        }
    }

    /// Colorless dielectric such as glass or water.
    pub fn clear(index: f32, gloss: f32) -> Self {
        Self {
            color: Color::ZERO,
            index,
            gloss,
            transparency: 1.0,
            ..Default::default()
        }
    }

    /// Colored dielectric.
    pub fn transparent(color: Color, index: f32, gloss: f32, tint: f32) -> Self {
        Self {
            color,
            index,
            gloss,
            tint: tint.clamp(0.0, 1.0),
            transparency: 1.0,
            ..Default::default()
        }
    }

    /// Fully reflective metal.
    pub fn metallic(color: Color, gloss: f32, tint: f32) -> Self {
        Self {
            color,
            gloss,
            tint: tint.clamp(0.0, 1.0),
            reflectivity: Some(1.0),
            ..Default::default()
        }
    }

    /// Perfect, untinted mirror.
    pub fn mirror() -> Self {
        Self::metallic(Color::ONE, 0.0, 0.0)
    }

    /// Light emitter.
    pub fn light(color: Color, emittance: f32) -> Self {
        Self {
            color,
            emittance,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_tint(mut self, tint: f32) -> Self {
        self.tint = tint.clamp(0.0, 1.0);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = Some(reflectivity.clamp(0.0, 1.0));
        self
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emittance > 0.0
    }

    /// The material as seen at a surface point with the given UV
    /// coordinates: a texture, when present, replaces the base color.
    pub fn sampled(&self, uv: Vec2) -> Material {
        let mut material = self.clone();
        if let Some(texture) = &self.texture {
            material.color = texture.sample(uv.x, uv.y);
        }
        material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_is_emissive() {
        assert!(Material::light(Color::ONE, 5.0).is_emissive());
        assert!(!Material::diffuse(Color::ONE).is_emissive());
    }

    #[test]
    fn test_presets() {
        let glass = Material::clear(1.5, 0.0);
        assert_eq!(glass.transparency, 1.0);
        assert_eq!(glass.reflectivity, None);
        assert_eq!(glass.index, 1.5);

        let mirror = Material::mirror();
        assert_eq!(mirror.reflectivity, Some(1.0));
        assert_eq!(mirror.gloss, 0.0);
        assert_eq!(mirror.transparency, 0.0);
    }

    #[test]
    fn test_builders_clamp() {
        let m = Material::diffuse(Color::ONE)
            .with_tint(3.0)
            .with_reflectivity(-1.0);
        assert_eq!(m.tint, 1.0);
        assert_eq!(m.reflectivity, Some(0.0));
    }

    #[test]
    fn test_preset_tint_is_clamped() {
        assert_eq!(Material::metallic(Color::ONE, 0.0, 2.5).tint, 1.0);
        assert_eq!(Material::transparent(Color::ONE, 1.5, 0.0, -0.5).tint, 0.0);
        assert_eq!(Material::transparent(Color::ONE, 1.5, 0.0, 0.4).tint, 0.4);
    }

    #[test]
    fn test_sampled_uses_texture() {
        let texture = Arc::new(Texture::solid_color(Color::new(0.1, 0.2, 0.3)));
        let m = Material::diffuse(Color::ONE).with_texture(texture);

        let sampled = m.sampled(Vec2::new(0.5, 0.5));
        assert!((sampled.color - Color::new(0.1, 0.2, 0.3)).length() < 1e-6);
        // Untextured materials pass through
        let plain = Material::diffuse(Color::ONE).sampled(Vec2::ZERO);
        assert_eq!(plain.color, Color::ONE);
    }
}
