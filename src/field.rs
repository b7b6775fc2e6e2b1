use glam::Vec3;

use crate::noise::Fbm;

/// Animated, noise-displaced sphere as a signed distance field.
///
/// Negative inside, positive outside. Once the displacement kicks in this
/// is not a true distance anymore, but the magnitude is still a usable
/// conservative step size for marching.
#[derive(Debug, Clone, Copy)]
pub struct Fireball {
    pub radius: f32,
    pub amplitude: f32,
    fbm: Fbm,
}

impl Fireball {
    pub fn new(radius: f32, amplitude: f32, fbm: Fbm) -> Self {
        Self {
            radius,
            amplitude,
            fbm,
        }
    }

    /// The same turbulence that shapes the surface also drives the
    /// surface color in the shader.
    pub fn fbm(&self) -> &Fbm {
        &self.fbm
    }

    pub fn signed_distance(&self, p: Vec3, t: f32) -> f32 {
        // base radius breathes over time
        let r = self.radius + 0.25 * (2. * t).sin();

        // high-frequency ripples scrolling with time
        let phase = 6. * t;
        let sin_disp =
            (16. * p.x + phase).sin() * (16. * p.y + phase).sin() * (16. * p.z + phase).sin();

        // turbulence that drifts and evolves
        let turb = self.fbm.sample(2. * p + Vec3::new(t, 0.7 * t, 1.3 * t));

        let displacement = self.amplitude * (0.6 * sin_disp + 0.8 * (turb - 0.5));
        p.length() - (r + displacement)
    }
}
