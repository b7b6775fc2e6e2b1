use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::img::ToneMappingMethod;
use crate::noise::FbmParams;
use crate::rt::MarchParams;

/// Full render configuration. The defaults reproduce the original scene:
/// 640x480, 120 frames at 24 fps, camera at (0,0,3) looking down -Z.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fov: f32,
    pub camera_pos: Vec3,
    pub light_pos: Vec3,
    pub sky_color: Vec3,
    pub sphere_radius: f32,
    pub noise_amplitude: f32,
    pub fbm: FbmParams,
    pub march: MarchParams,
    pub nframes: u32,
    pub fps: f32,
    pub output_dir: PathBuf,
    pub tone_mapping: ToneMappingMethod,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov: std::f32::consts::PI / 3.,
            camera_pos: Vec3::new(0., 0., 3.),
            light_pos: Vec3::new(10., 10., 10.),
            sky_color: Vec3::new(0.2, 0.7, 0.8),
            sphere_radius: 1.5,
            noise_amplitude: 1.0,
            fbm: FbmParams::default(),
            march: MarchParams::default(),
            nframes: 120,
            fps: 24.,
            output_dir: PathBuf::from("out"),
            tone_mapping: ToneMappingMethod::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Time value for a frame, in seconds. Constant for the whole frame;
    /// the next frame gets a fresh value.
    pub fn frame_time(&self, frame: u32) -> f32 {
        frame as f32 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scene() {
        let config = RenderConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.nframes, 120);
        assert_eq!(config.sphere_radius, 1.5);
        assert_eq!(config.camera_pos, Vec3::new(0., 0., 3.));
    }

    #[test]
    fn frame_time_advances_monotonically() {
        let config = RenderConfig::default();
        assert_eq!(config.frame_time(0), 0.);
        assert_eq!(config.frame_time(24), 1.);
        assert!(config.frame_time(5) < config.frame_time(6));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 32, "height": 16, "nframes": 2 }"#).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 16);
        assert_eq!(config.nframes, 2);
        assert_eq!(config.fps, 24.);
        assert_eq!(config.march.max_steps, 128);
    }
}
