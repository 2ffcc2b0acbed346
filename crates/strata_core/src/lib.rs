//! Strata Core - Materials and textures for the strata path tracer.
//!
//! This crate provides the long-lived, read-only data a render shares
//! across all of its sampling threads:
//!
//! - **Materials**: `Material`, `Color`
//! - **Textures**: `Texture` with bilinear sampling and image loading
//!
//! # Example
//!
//! ```
//! use strata_core::{Color, Material};
//!
//! let glass = Material::clear(1.5, 0.0);
//! let lamp = Material::light(Color::ONE, 10.0);
//! assert!(lamp.is_emissive());
//! assert!(!glass.is_emissive());
//! ```

pub mod material;
pub mod texture;

// Re-export commonly used types
pub use material::{Color, Material};
pub use texture::{Texture, TextureError, TextureResult};
