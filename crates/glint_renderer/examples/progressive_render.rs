//! Progressive render example.
//!
//! Builds the default scene plus a glass box and a small tetrahedron mesh,
//! accumulates a number of full frames and saves the result as a PNG.
//!
//! Usage: `progressive_render [settings.json] [frames] [output.png]`

use anyhow::{anyhow, Context, Result};
use glint_renderer::{
    AccumulationState, Color, Cuboid, Dielectric, Lambertian, Mat4, RenderContext,
    RenderSettings, Scene, Vec3,
};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) if path != "-" => RenderSettings::load(&path)
            .with_context(|| format!("Failed to load settings from {}", path))?,
        _ => RenderSettings {
            view: Mat4::look_at_rh(Vec3::new(0.0, 0.4, 3.0), Vec3::new(0.0, -0.1, 0.0), Vec3::Y),
            per_sample_jitter: 4,
            ..RenderSettings::default()
        },
    };
    let frames: u32 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("Invalid frame count: {}", n))?,
        None => 8,
    };
    let output = args.next().unwrap_or_else(|| "output.png".to_string());

    let start = Instant::now();
    let scene = build_scene(&settings);
    log::info!("Scene built in {:?}", start.elapsed());

    let mut ctx = RenderContext::new(settings)?;
    log::info!(
        "Rendering {}x{} @ {} spp per frame, {} frames...",
        ctx.settings.width,
        ctx.settings.height,
        ctx.settings.per_sample_jitter,
        frames
    );

    let start = Instant::now();
    let updates = frames as usize * ctx.settings.height as usize;
    for _ in 0..updates {
        if ctx.state() == AccumulationState::Capped {
            break;
        }
        ctx.update_image(&scene);
    }
    log::info!("Rendered {} frames in {:?}", ctx.current_frame(), start.elapsed());

    let (width, height) = (ctx.settings.width, ctx.settings.height);
    let image = image::RgbaImage::from_raw(width, height, ctx.to_rgba8())
        .ok_or_else(|| anyhow!("Image buffer does not match {}x{}", width, height))?;
    image
        .save(&output)
        .with_context(|| format!("Failed to save {}", output))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn build_scene(settings: &RenderSettings) -> Scene {
    let mut scene = Scene::setup(settings);

    let glass = scene.add_material(Dielectric::new(1.5 * settings.refractive_index));
    scene.add_box(Cuboid::new(Vec3::new(0.0, -0.35, -1.0), Vec3::splat(0.15), glass));

    let clay = scene.add_material(Lambertian::new(Color::new(0.8, 0.3, 0.3)));
    let vertices = [
        Vec3::new(0.0, 0.3, 0.0),
        Vec3::new(-0.2, 0.0, -0.15),
        Vec3::new(0.2, 0.0, -0.15),
        Vec3::new(0.0, 0.0, 0.2),
    ];
    let indices = [0, 1, 3, 0, 3, 2, 0, 2, 1, 1, 2, 3];
    scene.set_mesh_indexed(&vertices, &indices, Vec3::new(0.6, -0.5, 0.5), clay);

    scene
}
