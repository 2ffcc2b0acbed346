//! Scene container: shapes, the emissive subset, and what a missed ray sees.

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use crate::hittable::{Hit, Shape};
use strata_core::{Color, Texture};
use strata_math::{Ray, Vec3};

/// The nearest hit in a scene, tagged with the index of the top-level
/// object that produced it.
#[derive(Clone, Copy)]
pub struct SceneHit<'a> {
    pub object: usize,
    pub hit: Hit<'a>,
}

/// An ordered collection of shapes plus lighting environment.
///
/// Read-only during rendering; share it by reference across threads.
pub struct Scene {
    shapes: Vec<Box<dyn Shape>>,
    /// Indices into `shapes` of emissive objects, in insertion order
    lights: Vec<usize>,
    background: Color,
    environment: Option<Arc<Texture>>,
    /// Longitude rotation of the environment texture, in radians
    environment_angle: f32,
}

impl Scene {
    /// Create an empty scene with a black background.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            background: Color::ZERO,
            environment: None,
            environment_angle: 0.0,
        }
    }

    /// Set the flat color returned for rays that miss everything.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set a latitude/longitude environment texture for missed rays,
    /// rotated by `angle` radians around the vertical axis.
    pub fn with_environment(mut self, texture: Arc<Texture>, angle: f32) -> Self {
        self.environment = Some(texture);
        self.environment_angle = angle;
        self
    }

    /// Add a shape, returning its object index.
    pub fn add(&mut self, shape: impl Shape + 'static) -> usize {
        self.add_boxed(Box::new(shape))
    }

    /// Add an already boxed shape, returning its object index.
    ///
    /// Emissive shapes with finite bounds become lights for direct
    /// sampling. Unbounded emitters (an emissive plane) cannot be sampled,
    /// so they only contribute when a path hits them.
    pub fn add_boxed(&mut self, shape: Box<dyn Shape>) -> usize {
        let index = self.shapes.len();
        let bbox = shape.bounding_box();
        if bbox.is_finite() && shape.material_at(bbox.centroid()).is_emissive() {
            log::debug!("Scene object {} is a light (bounds {:?})", index, bbox);
            self.lights.push(index);
        }
        self.shapes.push(shape);
        index
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, index: usize) -> Option<&dyn Shape> {
        self.shapes.get(index).map(|s| s.as_ref())
    }

    /// Object indices of the emissive shapes.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    /// Whether object `index` is sampled as a light.
    pub fn is_light(&self, index: usize) -> bool {
        self.lights.contains(&index)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Nearest hit along `ray`, or `None` if the ray escapes.
    pub fn intersect(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut nearest: Option<SceneHit<'_>> = None;
        for (object, shape) in self.shapes.iter().enumerate() {
            if let Some(hit) = shape.intersect(ray) {
                if nearest.map_or(true, |n| hit.t < n.hit.t) {
                    nearest = Some(SceneHit { object, hit });
                }
            }
        }
        nearest
    }

    /// Radiance arriving from an escaped ray travelling along `direction`.
    pub fn environment(&self, direction: Vec3) -> Color {
        match &self.environment {
            Some(texture) => {
                let (u, v) = self.direction_to_uv(direction);
                texture.sample(u, v)
            }
            None => self.background,
        }
    }

    /// Longitude/latitude mapping of a direction into [0, 1]².
    fn direction_to_uv(&self, d: Vec3) -> (f32, f32) {
        let longitude = d.z.atan2(d.x) + self.environment_angle;
        let latitude = d.y.atan2(Vec3::new(d.x, 0.0, d.z).length());
        let u = (longitude + PI) / (2.0 * PI);
        // Keep the zenith on the top row instead of wrapping to the bottom
        let v = ((latitude + FRAC_PI_2) / PI).min(1.0 - f32::EPSILON);
        (u, v)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
