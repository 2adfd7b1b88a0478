//! Camera ray generation.
//!
//! The view-space frustum is fixed: the eye sits at the origin looking down
//! -Z at an image plane spanning [-aspect, aspect] x [-1, 1] at z = -1. Rays
//! are then carried into world space by the inverse of the view transform.
//! Row 0 is the bottom of the image.

use crate::Ray;
use glint_math::{Mat4, Vec2, Vec3};
use rand::{Rng, RngCore};

/// Generates camera rays for one image size and view transform.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrustum {
    width: u32,
    height: u32,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    world_from_view: Mat4,
}

impl ViewFrustum {
    /// Build the frustum for a `width` x `height` image seen through `view`
    /// (the world-to-view transform).
    pub fn new(width: u32, height: u32, view: &Mat4) -> Self {
        let aspect = width as f32 / height.max(1) as f32;

        Self {
            width: width.max(1),
            height: height.max(1),
            lower_left_corner: Vec3::new(-aspect, -1.0, -1.0),
            horizontal: Vec3::new(2.0 * aspect, 0.0, 0.0),
            vertical: Vec3::new(0.0, 2.0, 0.0),
            world_from_view: view.inverse(),
        }
    }

    /// World-space ray through pixel (x, y), offset from the pixel center by `jitter`.
    pub fn ray(&self, x: u32, y: u32, jitter: Vec2) -> Ray {
        let u = (x as f32 + 0.5 + jitter.x) / self.width as f32;
        let v = (y as f32 + 0.5 + jitter.y) / self.height as f32;

        let direction = self.lower_left_corner + u * self.horizontal + v * self.vertical;
        Ray::new(Vec3::ZERO, direction).transformed(&self.world_from_view)
    }
}

/// Uniform sub-pixel offset in [-0.5, 0.5) on both axes.
pub fn sample_jitter(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5)
}
