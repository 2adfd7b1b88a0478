//! Hittable trait and HitRecord for ray-object intersection.

use crate::{MaterialId, Ray};
use glint_math::{Aabb, Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal as produced by the primitive.
    ///
    /// Not guaranteed unit length and not flipped to face the ray; the
    /// evaluator normalizes it once before shading.
    pub normal: Vec3,
    /// Handle of the hit primitive's material in the scene arena
    pub material: MaterialId,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Nearest hit among `objects`, tested in order against a shrinking bound.
///
/// `closest` holds the best record found so far and is only overwritten by a
/// strictly closer hit, so it can be threaded through several calls.
pub fn hit_closest<'a, H, I>(
    objects: I,
    ray: &Ray,
    ray_t: Interval,
    closest: &mut Option<HitRecord>,
) where
    H: Hittable + 'a,
    I: IntoIterator<Item = &'a H>,
{
    let mut closest_so_far = closest.map_or(ray_t.max, |rec| rec.t);

    for object in objects {
        if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
            closest_so_far = rec.t;
            *closest = Some(rec);
        }
    }
}
