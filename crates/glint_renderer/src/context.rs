//! Progressive image accumulation.
//!
//! A [`RenderContext`] renders one scanline per [`update_image`] call and sums
//! the result into a persistent floating-point buffer. Each pixel is an RGBA
//! `Vec4`: RGB holds the summed color and alpha counts the samples, so the
//! running mean is `rgb / a`.
//!
//! [`update_image`]: RenderContext::update_image

use glint_math::Vec4;
use rand::RngCore;
use rayon::prelude::*;

use crate::camera::{sample_jitter, ViewFrustum};
use crate::{color_to_rgba, ray_color, CapPolicy, Color, ConfigResult, RenderSettings, Scene};

/// Frame counter value that restarts accumulation with a blend of the old image.
const RESTART_FRAME: i32 = -1;

/// Where the accumulator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulationState {
    /// Restarted by [`RenderContext::reset_accumulation`] and not yet through
    /// frame 0; updated pixels are blended down to their mean before new
    /// samples are added.
    Resetting,
    /// Summing samples frame after frame.
    Accumulating,
    /// Updates are skipped until `freeze` is cleared.
    Frozen,
    /// `max_frames` full frames are done.
    Capped,
}

/// Render state: settings, progress counters and the accumulation buffer.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub settings: RenderSettings,
    /// Skip every update while set.
    pub freeze: bool,
    current_frame: i32,
    current_line: u32,
    /// Set by `reset_accumulation`, cleared once frame 1 starts.
    restarting: bool,
    image: Vec<Vec4>,
}

impl RenderContext {
    /// Create a context with a cleared `width * height` buffer.
    pub fn new(settings: RenderSettings) -> ConfigResult<Self> {
        settings.validate()?;

        let image = vec![Vec4::ZERO; settings.pixel_count()];
        Ok(Self {
            settings,
            freeze: false,
            current_frame: 0,
            current_line: 0,
            restarting: false,
            image,
        })
    }

    pub fn current_frame(&self) -> i32 {
        self.current_frame
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// The accumulation buffer, row-major with row 0 at the bottom.
    pub fn image(&self) -> &[Vec4] {
        &self.image
    }

    /// True once `max_frames` full frames have been accumulated.
    pub fn is_capped(&self) -> bool {
        i64::from(self.current_frame) >= i64::from(self.settings.max_frames)
    }

    pub fn state(&self) -> AccumulationState {
        if self.freeze {
            AccumulationState::Frozen
        } else if self.is_capped() {
            AccumulationState::Capped
        } else if self.restarting {
            AccumulationState::Resetting
        } else {
            AccumulationState::Accumulating
        }
    }

    /// Render the scanline under the cursor, then advance the cursor.
    ///
    /// Does nothing while frozen. Once capped, either does nothing or keeps
    /// re-sampling the same line, depending on `settings.cap_policy`.
    pub fn update_image(&mut self, scene: &Scene) {
        if self.freeze || self.settings.height == 0 {
            return;
        }

        let capped = self.is_capped();
        if capped && self.settings.cap_policy == CapPolicy::Stop {
            return;
        }

        self.fit_image();
        self.update_line(scene, self.current_line % self.settings.height);

        if !capped {
            self.current_line += 1;
            if self.current_line >= self.settings.height {
                self.current_frame += 1;
                self.current_line %= self.settings.height;
                if self.current_frame > 0 {
                    self.restarting = false;
                }
                log::debug!("Frame {} complete", self.current_frame);

                if self.is_capped() {
                    log::info!("Reached {} frames, accumulation capped", self.settings.max_frames);
                }
            }
        }
    }

    /// Sample every pixel of row `y` and add the result to the buffer.
    ///
    /// Columns are rendered in parallel; each worker writes only its own pixel
    /// and draws from its own thread-local generator.
    pub fn update_line(&mut self, scene: &Scene, y: u32) {
        if y >= self.settings.height {
            return;
        }
        self.fit_image();

        let settings = &self.settings;
        let frustum = ViewFrustum::new(settings.width, settings.height, &settings.view);
        let blend = self.current_frame <= 0;

        let width = settings.width as usize;
        let start = y as usize * width;
        let row = &mut self.image[start..start + width];

        row.par_iter_mut()
            .enumerate()
            .for_each_init(rand::thread_rng, |rng, (x, pixel)| {
                let color = sample_pixel(settings, scene, &frustum, x as u32, y, rng);
                accumulate(pixel, color, blend);
            });
    }

    /// Clear the buffer to `width * height` zeros and rewind to frame 0, line 0.
    ///
    /// Also clears `freeze`.
    pub fn reset_image(&mut self) {
        self.image.clear();
        self.image.resize(self.settings.pixel_count(), Vec4::ZERO);
        self.current_frame = 0;
        self.current_line = 0;
        self.restarting = false;
        self.freeze = false;
        log::debug!("Image reset to {}x{}", self.settings.width, self.settings.height);
    }

    /// Restart accumulation without clearing the buffer or moving the line cursor.
    ///
    /// Pixels are averaged down to a single sample as they are next rendered,
    /// so the old image fades out instead of vanishing. Call this whenever the
    /// camera or scene changes.
    pub fn reset_accumulation(&mut self) {
        self.current_frame = RESTART_FRAME;
        self.restarting = true;
        log::debug!("Accumulation restarted at line {}", self.current_line);
    }

    /// Mean color of pixel (x, y), or `None` if it has no samples yet.
    pub fn pixel_mean(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.settings.width || y >= self.settings.height {
            return None;
        }
        let pixel = self.image.get(y as usize * self.settings.width as usize + x as usize)?;
        (pixel.w > 0.0).then(|| pixel.truncate() / pixel.w)
    }

    /// The image as gamma-corrected 8-bit RGBA, rows from top to bottom.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.settings.pixel_count() * 4);
        for y in (0..self.settings.height).rev() {
            for x in 0..self.settings.width {
                let color = self.pixel_mean(x, y).unwrap_or(Color::ZERO);
                bytes.extend_from_slice(&color_to_rgba(color));
            }
        }
        bytes
    }

    /// Resize the buffer if the settings changed size since the last update.
    fn fit_image(&mut self) {
        let pixel_count = self.settings.pixel_count();
        if self.image.len() != pixel_count {
            log::debug!("Resizing image buffer {} -> {}", self.image.len(), pixel_count);
            self.image.resize(pixel_count, Vec4::ZERO);
        }
    }
}

/// Average `per_sample_jitter` jittered camera rays through pixel (x, y).
pub fn sample_pixel(
    settings: &RenderSettings,
    scene: &Scene,
    frustum: &ViewFrustum,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = settings.per_sample_jitter.max(1);
    let mut color = Color::ZERO;

    for _ in 0..samples {
        let ray = frustum.ray(x, y, sample_jitter(rng));
        color += ray_color(settings, scene, &ray, settings.max_bounces, rng);
    }

    color / samples as f32
}

/// Add one averaged sample to an accumulated pixel.
///
/// With `blend` set the old value is first reduced to its clamped mean.
fn accumulate(pixel: &mut Vec4, color: Color, blend: bool) {
    if blend {
        let old = *pixel;
        *pixel = (old / old.w.max(1.0)).clamp(Vec4::ZERO, Vec4::ONE);
    }
    *pixel += color.extend(1.0);
}
