use crate::{Mat4, Vec3, EPSILON};

/// A ray in 3D space: a half-line starting at `origin` heading along `direction`.
///
/// The direction is not required to be unit length. Rays are immutable once
/// built; scattering produces a new ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True if the direction is too short to intersect anything.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction.length_squared() < EPSILON
    }

    /// Map the ray through an affine transform.
    ///
    /// The origin is transformed as a point (w=1), the direction as a vector (w=0).
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray::new(
            m.transform_point3(self.origin),
            m.transform_vector3(self.direction),
        )
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
