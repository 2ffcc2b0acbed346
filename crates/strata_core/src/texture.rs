//! Textures for material colors and environment lighting.
//!
//! Pixels are stored as linear RGB so that sampled values can be fed
//! straight into the light transport without further conversion.

use std::path::Path;

use strata_math::Vec3;
use thiserror::Error;

use crate::Color;

/// Errors that can occur while building or loading a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Expected {expected} pixels for texture, got {actual}")]
    PixelCount { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with linear RGB pixel data, row-major, top row first.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(TextureError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Load an image from disk, converting sRGB bytes to linear color.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        let texture = Self::from_pixels(width, height, pixels)?;
        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// UV coordinates wrap into [0, 1), with (0, 0) at bottom-left.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0); // Flip V for image coordinates

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.pixel(x0, y0).lerp(self.pixel(x1, y0), fx);
        let bottom = self.pixel(x0, y1).lerp(self.pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = (y.min(self.height - 1) * self.width + x.min(self.width - 1)) as usize;
        self.pixels.get(idx).copied().unwrap_or(Color::ZERO)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 1);

        let sample = tex.sample(0.25, 0.75);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_from_pixels_rejects_bad_dimensions() {
        assert!(matches!(
            Texture::from_pixels(0, 4, vec![]),
            Err(TextureError::Empty { .. })
        ));
        assert!(matches!(
            Texture::from_pixels(2, 2, vec![Vec3::ONE; 3]),
            Err(TextureError::PixelCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_bilinear_sample_blends_columns() {
        // Single row: black on the left, white on the right
        let tex = Texture::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]).unwrap();

        let left = tex.sample(0.0, 0.5);
        let mid = tex.sample(0.5, 0.5);
        assert!(left.length() < 0.001);
        assert!((mid - Vec3::splat(0.5)).length() < 0.001);
    }

    #[test]
    fn test_sample_wraps_uv() {
        let tex = Texture::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]).unwrap();
        let a = tex.sample(0.25, 0.5);
        let b = tex.sample(1.25, -0.5);
        assert!((a - b).length() < 0.001);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Texture::load("does/not/exist.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
