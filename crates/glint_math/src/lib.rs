// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Below this, lengths, determinants and discriminants are treated as zero.
pub const EPSILON: f32 = 1e-8;
