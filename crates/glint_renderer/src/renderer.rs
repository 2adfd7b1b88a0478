//! Core path tracing evaluator.
//!
//! Implements recursive Monte Carlo light transport:
//! - Nearest-hit query against the scene
//! - Material scattering with a bounded bounce budget
//! - Vertical ground-to-sky gradient for escaping rays

use crate::{Color, Ray, RenderSettings, Scene};
use glint_math::Interval;
use rand::RngCore;

#[cfg(test)]
thread_local! {
    /// Scene queries made by `ray_color` on this thread.
    static EVALUATIONS: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// Parametric range used for every scene query. The lower bound keeps
/// scattered rays from re-hitting the surface they start on.
pub const HIT_RANGE: Interval = Interval {
    min: 0.001,
    max: 9999.0,
};

/// Compute the radiance arriving along `ray`.
///
/// Each hit consumes one bounce; once `remaining_bounces` drops below zero the
/// ray contributes nothing. At most `remaining_bounces + 1` scene queries are
/// made for a single call.
pub fn ray_color(
    settings: &RenderSettings,
    scene: &Scene,
    ray: &Ray,
    remaining_bounces: i32,
    rng: &mut dyn RngCore,
) -> Color {
    if remaining_bounces < 0 {
        return Color::ZERO;
    }
    #[cfg(test)]
    EVALUATIONS.with(|n| n.set(n.get() + 1));

    let Some(mut rec) = scene.hit(ray, HIT_RANGE) else {
        return background(settings, ray);
    };

    // Always normalise before use
    rec.normal = rec.normal.normalize_or_zero();
    if settings.show_normals {
        return rec.normal * 0.5 + 0.5;
    }

    let Some(material) = scene.material(rec.material) else {
        return Color::ZERO;
    };

    match material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation
                * ray_color(settings, scene, &result.scattered, remaining_bounces - 1, rng)
        }
        None => Color::ZERO,
    }
}

/// Background seen by a ray that escapes the scene.
///
/// Straight down gives `ground_color`, straight up gives `sky_color`.
pub fn background(settings: &RenderSettings, ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * settings.ground_color + t * settings.sky_color
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Lambertian, Metal, Sphere};
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// `ray_color` plus the number of scene queries it made.
    fn counted_ray_color(
        settings: &RenderSettings,
        scene: &Scene,
        ray: &Ray,
        remaining_bounces: i32,
        rng: &mut dyn RngCore,
    ) -> (Color, u32) {
        EVALUATIONS.with(|n| n.set(0));
        let color = ray_color(settings, scene, ray, remaining_bounces, rng);
        (color, EVALUATIONS.with(|n| n.get()))
    }

    fn settings() -> RenderSettings {
        RenderSettings {
            ground_color: Color::new(1.0, 1.0, 1.0),
            sky_color: Color::new(0.5, 0.7, 1.0),
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_miss_straight_up_is_sky() {
        let settings = settings();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        let color = ray_color(&settings, &Scene::new(), &ray, 5, &mut rng);
        assert_eq!(color, settings.sky_color);
    }

    #[test]
    fn test_background_gradient() {
        let settings = settings();

        let down = background(&settings, &Ray::new(Vec3::ZERO, Vec3::NEG_Y));
        assert_eq!(down, settings.ground_color);

        let level = background(&settings, &Ray::new(Vec3::ZERO, Vec3::new(3.0, 0.0, -1.0)));
        let expected = (settings.ground_color + settings.sky_color) * 0.5;
        assert!((level - expected).length() < 1e-6);
    }

    #[test]
    fn test_exhausted_budget_is_black() {
        let settings = settings();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        let color = ray_color(&settings, &Scene::new(), &ray, -1, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_show_normals_remaps_normal() {
        let settings = RenderSettings {
            show_normals: true,
            ..settings()
        };
        let mut scene = Scene::new();
        let mat = scene.add_material(Lambertian::new(Color::splat(0.5)));
        scene.add_box(Cuboid::new(Vec3::ZERO, Vec3::splat(0.5), mat));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let color = ray_color(&settings, &scene, &ray, 5, &mut rng);
        assert_eq!(color, Color::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_absorbed_ray_is_black() {
        let settings = settings();
        let mut scene = Scene::new();
        let mirror = scene.add_material(Metal::new(Color::ONE));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 10.0, mirror));

        // From inside, the outward normal sends the reflection into the surface
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(ray_color(&settings, &scene, &ray, 5, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_attenuation_multiplies_background() {
        let settings = settings();
        let mut scene = Scene::new();
        let mirror = scene.add_material(Metal::new(Color::new(0.5, 0.25, 1.0)));
        scene.add_box(Cuboid::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(10.0, 0.5, 10.0), mirror));

        // Straight down onto the mirror, straight back up to the sky
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);

        let color = ray_color(&settings, &scene, &ray, 5, &mut rng);
        assert!((color - Color::new(0.5, 0.25, 1.0) * settings.sky_color).length() < 1e-6);
    }

    /// Two facing mirrors trap a vertical ray for ever.
    fn hall_of_mirrors() -> Scene {
        let mut scene = Scene::new();
        let mirror = scene.add_material(Metal::new(Color::ONE));
        let wall = Vec3::new(100.0, 0.5, 100.0);
        scene.add_box(Cuboid::new(Vec3::new(0.0, -1.0, 0.0), wall, mirror));
        scene.add_box(Cuboid::new(Vec3::new(0.0, 1.0, 0.0), wall, mirror));
        scene
    }

    #[test]
    fn test_recursion_is_bounded_by_budget() {
        let settings = settings();
        let scene = hall_of_mirrors();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);

        for budget in [0, 1, 4, 10] {
            let mut rng = StdRng::seed_from_u64(42);
            let (color, evaluations) = counted_ray_color(&settings, &scene, &ray, budget, &mut rng);

            assert_eq!(evaluations, budget as u32 + 1);
            assert_eq!(color, Color::ZERO);
        }
    }

    #[test]
    fn test_recursion_bound_holds_for_diffuse_scenes() {
        let settings = settings();
        let scene = Scene::setup(&settings);
        let mut rng = StdRng::seed_from_u64(9);

        for i in 0..50 {
            let dir = Vec3::new((i as f32 * 0.37).sin(), -0.5, -1.0);
            let ray = Ray::new(Vec3::new(0.0, 0.2, 2.0), dir);
            let (color, evaluations) = counted_ray_color(&settings, &scene, &ray, 3, &mut rng);

            assert!(evaluations <= 4);
            assert!(color.is_finite());
        }
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(0.25, 2.0, -1.0)), [127, 255, 0, 255]);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }
}
