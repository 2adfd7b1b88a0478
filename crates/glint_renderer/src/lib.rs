//! Glint - progressive CPU path tracing
//!
//! A small Monte Carlo path tracer for a fixed analytic scene of spheres,
//! axis-aligned boxes and an optional triangle mesh, shaded with diffuse,
//! metal and dielectric materials.
//!
//! The driver owns a [`Scene`] and a [`RenderContext`] and calls
//! [`RenderContext::update_image`] repeatedly; each call renders one scanline
//! and adds it to the accumulation buffer.

mod camera;
mod context;
mod cuboid;
mod hittable;
mod material;
mod renderer;
mod scene;
mod settings;
mod sphere;
mod triangle;

pub use camera::{sample_jitter, ViewFrustum};
pub use context::{sample_pixel, AccumulationState, RenderContext};
pub use cuboid::Cuboid;
pub use hittable::{hit_closest, HitRecord, Hittable};
pub use material::{
    random_unit_vector, reflect, refract, schlick, Color, Dielectric, Lambertian, Material,
    MaterialId, Metal, ScatterResult,
};
pub use renderer::{background, color_to_rgba, linear_to_gamma, ray_color, HIT_RANGE};
pub use scene::Scene;
pub use settings::{CapPolicy, ConfigError, ConfigResult, RenderSettings};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3, Vec4};
