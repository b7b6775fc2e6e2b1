use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Deterministic 1D hash: fract(sin(n) * 43758.5453).
pub fn hash(n: f32) -> f32 {
    let x = n.sin() * 43758.5453;
    x - x.floor()
}

fn lerp(v0: f32, v1: f32, t: f32) -> f32 {
    v0 + (v1 - v0) * t.clamp(0., 1.)
}

/// Trilinearly interpolated lattice noise, roughly in [0, 1).
///
/// The fractional part is faded with f*f*(3-2f) so the value stays
/// continuous across cell boundaries. Same point in, same value out.
pub fn noise(x: Vec3) -> f32 {
    let p = x.floor();
    let f = x - p;
    let f = f * f * (Vec3::splat(3.) - 2. * f);
    // 1/57/113 decorrelate the 8 cube corners
    let n = p.dot(Vec3::new(1., 57., 113.));

    lerp(
        lerp(
            lerp(hash(n), hash(n + 1.), f.x),
            lerp(hash(n + 57.), hash(n + 58.), f.x),
            f.y,
        ),
        lerp(
            lerp(hash(n + 113.), hash(n + 114.), f.x),
            lerp(hash(n + 170.), hash(n + 171.), f.x),
            f.y,
        ),
        f.z,
    )
}

/// Octave layering of the fbm: amplitudes halve, frequency factors are
/// irrational-ish so octaves never line up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FbmParams {
    pub amplitudes: [f32; 4],
    pub frequency_factors: [f32; 3],
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            amplitudes: [0.5, 0.25, 0.125, 0.0625],
            frequency_factors: [2.32, 3.03, 2.61],
        }
    }
}

/// Fractal brownian motion over [`noise`].
#[derive(Debug, Clone, Copy)]
pub struct Fbm {
    rotation: Mat3,
    params: FbmParams,
}

impl Fbm {
    pub fn new(params: FbmParams) -> Self {
        // fixed orthonormal rotation applied before sampling, kills
        // lattice-aligned artifacts between octaves
        let rotation = Mat3::from_cols(
            Vec3::new(0.00, -0.80, -0.60),
            Vec3::new(0.80, 0.36, -0.48),
            Vec3::new(0.60, -0.48, 0.64),
        );
        Self { rotation, params }
    }

    /// Sum of the octaves, normalized by the total amplitude so the
    /// nominal range stays near [0, 1].
    pub fn sample(&self, x: Vec3) -> f32 {
        let mut p = self.rotation * x;
        let mut f = 0.;
        for (i, amplitude) in self.params.amplitudes.iter().enumerate() {
            f += amplitude * noise(p);
            if let Some(factor) = self.params.frequency_factors.get(i) {
                p *= *factor;
            }
        }

        let total: f32 = self.params.amplitudes.iter().sum();
        f / total
    }
}

impl Default for Fbm {
    fn default() -> Self {
        Self::new(FbmParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_in_range() {
        for n in [0., 1., 57., 113.5, -42.25, 1e4] {
            let a = hash(n);
            let b = hash(n);
            assert_eq!(a, b);
            assert!((0. ..1.).contains(&a), "hash({}) = {}", n, a);
        }
    }

    #[test]
    fn noise_is_deterministic() {
        let p = Vec3::new(1.3, -2.7, 0.42);
        assert_eq!(noise(p), noise(p));
    }

    #[test]
    fn noise_is_continuous_across_cell_boundaries() {
        let delta = 1e-3;
        // straddle the lattice planes on every axis
        for p in [
            Vec3::new(1. - delta / 2., 0.5, 0.5),
            Vec3::new(0.5, 2. - delta / 2., 0.5),
            Vec3::new(0.5, 0.5, -1. - delta / 2.),
            Vec3::new(0.3, 0.7, 0.9),
        ] {
            for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                let diff = (noise(p + axis * delta) - noise(p)).abs();
                assert!(diff < 0.05, "noise jumped by {} near {:?}", diff, p);
            }
        }
    }

    #[test]
    fn fbm_stays_near_nominal_range() {
        let fbm = Fbm::default();
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.21, i as f32 * 0.11);
            let v = fbm.sample(p);
            assert!((-0.1..1.2).contains(&v), "fbm({:?}) = {}", p, v);
        }
    }

    #[test]
    fn fbm_is_deterministic() {
        let fbm = Fbm::default();
        let p = Vec3::new(0.9, 1.7, -0.3);
        assert_eq!(fbm.sample(p), fbm.sample(p));
    }
}
