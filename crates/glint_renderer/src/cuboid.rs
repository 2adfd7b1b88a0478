//! Axis-aligned box primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use glint_math::{Aabb, Interval, Vec3, EPSILON};

/// An axis-aligned box given by its center and per-axis half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub material: MaterialId,
}

impl Cuboid {
    pub fn new(center: Vec3, half_extents: Vec3, material: MaterialId) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            material,
        }
    }
}

impl Hittable for Cuboid {
    /// Slab test.
    ///
    /// Reports the entry point when it lies in range, otherwise the exit point
    /// (a ray starting inside the box). The normal is the outward normal of
    /// the face crossed there.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if ray.is_degenerate() {
            return None;
        }

        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let origin = ray.origin();
        let direction = ray.direction();

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = 0;
        let mut exit_axis = 0;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < EPSILON {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_enter {
                t_enter = t0;
                enter_axis = axis;
            }
            if t1 < t_exit {
                t_exit = t1;
                exit_axis = axis;
            }
        }

        if t_enter > t_exit {
            return None;
        }

        let (t, axis, sign) = if ray_t.surrounds(t_enter) {
            (t_enter, enter_axis, -direction[enter_axis].signum())
        } else if ray_t.surrounds(t_exit) {
            (t_exit, exit_axis, direction[exit_axis].signum())
        } else {
            return None;
        };

        let mut normal = Vec3::ZERO;
        normal[axis] = sign;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal,
            material: self.material,
        })
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_center(self.center, self.half_extents)
    }
}
