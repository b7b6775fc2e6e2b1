use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::field::Fireball;
use crate::img::RawImage;
use crate::Color;

/// Step policy for [`sphere_trace`]. The 0.1 safety factor and the step
/// floor are tuned constants: the displaced field is not exactly
/// 1-Lipschitz, so the reported distance is under-stepped, and the floor
/// keeps grazing rays from stalling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarchParams {
    pub max_steps: u32,
    pub min_step: f32,
    pub step_scale: f32,
}

impl Default for MarchParams {
    fn default() -> Self {
        Self {
            max_steps: 128,
            min_step: 0.01,
            step_scale: 0.1,
        }
    }
}

/// Sphere tracing: walk the ray by the locally safe distance until the
/// field goes negative. `dir` must be unit-length.
///
/// Returns the first post-surface sample, not the exact zero crossing.
/// A ray that never enters the field exhausts the step budget and misses.
pub fn sphere_trace(
    orig: Vec3,
    dir: Vec3,
    field: &Fireball,
    t: f32,
    params: MarchParams,
) -> Option<Vec3> {
    let mut pos = orig;
    for _ in 0..params.max_steps {
        let d = field.signed_distance(pos, t);
        if d < 0. {
            return Some(pos);
        }
        pos += dir * (d * params.step_scale).max(params.min_step);
    }
    None
}

/// One-sided finite differences of the field, eps sized for the noise.
pub fn distance_field_normal(pos: Vec3, field: &Fireball, t: f32) -> Vec3 {
    let eps = 0.05;
    let d = field.signed_distance(pos, t);
    let nx = field.signed_distance(pos + Vec3::new(eps, 0., 0.), t) - d;
    let ny = field.signed_distance(pos + Vec3::new(0., eps, 0.), t) - d;
    let nz = field.signed_distance(pos + Vec3::new(0., 0., eps), t) - d;

    // a flat gradient only happens on a degenerate field; any unit vector
    // beats a NaN in the shading
    Vec3::new(nx, ny, nz).try_normalize().unwrap_or(Vec3::Z)
}

/// Fixed pinhole camera looking down -Z.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub fov: f32,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    pub fn new(position: Vec3, fov: f32, width: u32, height: u32) -> Self {
        Self {
            position,
            fov,
            width,
            height,
        }
    }

    /// Unit ray direction through pixel (i, j); flips Y so row 0 is the
    /// top of the image.
    pub fn ray_dir(&self, i: u32, j: u32) -> Vec3 {
        let dir_x = (i as f32 + 0.5) - self.width as f32 / 2.;
        let dir_y = -(j as f32 + 0.5) + self.height as f32 / 2.;
        let dir_z = -(self.height as f32) / (2. * (self.fov / 2.).tan());
        Vec3::new(dir_x, dir_y, dir_z).normalize()
    }
}

/// Linear gray -> darkgray -> red -> orange -> yellow gradient. The
/// yellow endpoint is "hot" (components > 1) and is left for the tone
/// mapping stage to clamp.
pub fn palette_fire(d: f32) -> Color {
    let yellow = Color::new(1.7, 1.3, 1.0);
    let orange = Color::new(1.0, 0.6, 0.0);
    let red = Color::new(1.0, 0.0, 0.0);
    let darkgray = Color::new(0.2, 0.2, 0.2);
    let gray = Color::new(0.4, 0.4, 0.4);

    let x = d.clamp(0., 1.);
    if x < 0.25 {
        gray.lerp(darkgray, x * 4.)
    } else if x < 0.5 {
        darkgray.lerp(red, x * 4. - 1.)
    } else if x < 0.75 {
        red.lerp(orange, x * 4. - 2.)
    } else {
        orange.lerp(yellow, x * 4. - 3.)
    }
}

/// Everything needed to render one frame: the field, the fixed camera and
/// light, and the step policy. Pure with respect to the time argument.
pub struct Scene {
    pub camera: Camera,
    pub light_pos: Vec3,
    pub sky: Color,
    pub field: Fireball,
    pub march: MarchParams,
}

impl Scene {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            camera: Camera::new(config.camera_pos, config.fov, config.width, config.height),
            light_pos: config.light_pos,
            sky: config.sky_color,
            field: Fireball::new(
                config.sphere_radius,
                config.noise_amplitude,
                crate::noise::Fbm::new(config.fbm),
            ),
            march: config.march,
        }
    }

    fn shade_hit(&self, hit: Vec3, t: f32) -> Color {
        let n = distance_field_normal(hit, &self.field, t);
        let l = (self.light_pos - hit).normalize();
        let lambert = n.dot(l).max(0.);

        let v = (self.camera.position - hit).normalize();
        let rim = (1. - n.dot(v).max(0.)).max(0.).powi(2);

        // color pattern rides the same turbulence as the shape, offset in
        // time so it scrolls at its own rate
        let fval = self
            .field
            .fbm()
            .sample(2.5 * hit + Vec3::new(0., 0., 1.2 * t));

        let intensity = 0.25 + 0.9 * lambert + 0.4 * rim;
        palette_fire(fval) * intensity
    }

    /// Render one frame at time `t` (seconds). Rows are independent, so
    /// the pixel loop is a parallel map over them.
    pub fn render(&self, t: f32) -> RawImage {
        let (width, height) = (self.camera.width, self.camera.height);
        let mut img = RawImage::new(width, height);

        img.data
            .par_chunks_mut(width as usize * 3)
            .enumerate()
            .for_each(|(j, row)| {
                for i in 0..width {
                    let dir = self.camera.ray_dir(i, j as u32);
                    let color =
                        match sphere_trace(self.camera.position, dir, &self.field, t, self.march) {
                            Some(hit) => self.shade_hit(hit, t),
                            None => self.sky,
                        };
                    debug_assert!(color.is_finite(), "non-finite color at ({}, {})", i, j);

                    let idx = i as usize * 3;
                    row[idx] = color.x;
                    row[idx + 1] = color.y;
                    row[idx + 2] = color.z;
                }
            });

        img
    }
}
