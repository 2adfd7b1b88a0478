//! Surface scattering models.
//!
//! The variant set is closed (diffuse, metal, dielectric), so materials are a
//! plain enum dispatched with `match`. Scenes own their materials in an arena
//! and primitives refer to them by [`MaterialId`], letting many primitives
//! share one configuration without reference counting.

use std::f32::consts::TAU;

use crate::{HitRecord, Ray};
use glint_math::{Vec3, EPSILON};
use rand::{Rng, RngCore};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Handle of a material inside a [`Scene`](crate::Scene)'s material arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    /// Position of the material in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light returning along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => Some(m.scatter(rec, rng)),
            Material::Metal(m) => m.scatter(ray_in, rec),
            Material::Dielectric(m) => Some(m.scatter(ray_in, rec, rng)),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    pub albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    fn scatter(&self, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < EPSILON {
            scatter_direction = rec.normal;
        }

        ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        }
    }
}

/// Metal (perfect mirror) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    pub albedo: Color,
}

impl Metal {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize_or_zero(), rec.normal);

        // Reflections heading into the surface are absorbed
        if reflected.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, reflected),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub ref_idx: f32,
}

impl Dielectric {
    pub fn new(ref_idx: f32) -> Self {
        Self { ref_idx }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let direction = ray_in.direction();
        let reflected = reflect(direction, rec.normal);
        let d_dot_n = direction.dot(rec.normal);
        let length = direction.length().max(EPSILON);

        // A ray travelling along the normal is leaving the medium
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (-rec.normal, self.ref_idx, self.ref_idx * d_dot_n / length)
        } else {
            (rec.normal, 1.0 / self.ref_idx, -d_dot_n / length)
        };

        let (reflect_prob, refracted) = match refract(direction, outward_normal, ni_over_nt) {
            Some(refracted) => (schlick(cosine, self.ref_idx), refracted),
            None => (1.0, reflected),
        };

        let scattered = if rng.gen::<f32>() < reflect_prob {
            Ray::new(rec.p, reflected)
        } else {
            Ray::new(rec.p, refracted)
        };

        ScatterResult {
            attenuation: Color::ONE,
            scattered,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` facing the incoming side.
///
/// Returns `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize_or_zero();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Uniform random direction on the unit sphere.
///
/// Samples the azimuth and the z coordinate independently; by Archimedes'
/// hat-box theorem this is uniform over the sphere without rejection.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let a = rng.gen_range(0.0..TAU);
    let z = rng.gen_range(-1.0f32..1.0);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}
