use glam::Vec3;
use image::{ImageBuffer, Rgb};
use serde::{Deserialize, Serialize};

use crate::Color;

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub enum ToneMappingMethod {
    /// Clamp each channel to [0, 1] and scale to bytes. "Hot" palette
    /// values saturate; no highlight compression.
    Clamp,
    Reinhard,
    Gamma { gamma: f32 },
}

impl Default for ToneMappingMethod {
    fn default() -> Self {
        ToneMappingMethod::Clamp
    }
}

/// Dense row-major float framebuffer, 3 channels per pixel. Fully
/// materialized by the renderer before it is ever encoded.
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl RawImage {
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0f32; width as usize * height as usize * 3];
        Self {
            width,
            height,
            data,
        }
    }

    pub fn pixel_to_idx(&self, x: u32, y: u32) -> usize {
        (self.width * y + x) as usize * 3
    }

    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.pixel_to_idx(x, y);
        self.data[idx] = color.x;
        self.data[idx + 1] = color.y;
        self.data[idx + 2] = color.z;
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        let idx = self.pixel_to_idx(x, y);
        Vec3::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    pub fn convert_to_image(
        &self,
        tone_mapping_method: &ToneMappingMethod,
    ) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(self.width, self.height);

        fn tone_mapping_reinhard(v: f32) -> f32 {
            v / (1. + v)
        }

        for (dst, src) in img.pixels_mut().zip(self.data.chunks_exact(3)) {
            match *tone_mapping_method {
                ToneMappingMethod::Clamp => {
                    dst[0] = (src[0].clamp(0., 1.) * 255.) as u8;
                    dst[1] = (src[1].clamp(0., 1.) * 255.) as u8;
                    dst[2] = (src[2].clamp(0., 1.) * 255.) as u8;
                }
                ToneMappingMethod::Reinhard => {
                    dst[0] = (tone_mapping_reinhard(src[0].max(0.)) * 255.) as u8;
                    dst[1] = (tone_mapping_reinhard(src[1].max(0.)) * 255.) as u8;
                    dst[2] = (tone_mapping_reinhard(src[2].max(0.)) * 255.) as u8;
                }
                ToneMappingMethod::Gamma { gamma } => {
                    dst[0] = (src[0].clamp(0., 1.).powf(1. / gamma) * 255.) as u8;
                    dst[1] = (src[1].clamp(0., 1.).powf(1. / gamma) * 255.) as u8;
                    dst[2] = (src[2].clamp(0., 1.).powf(1. / gamma) * 255.) as u8;
                }
            }
        }

        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_row_major() {
        let img = RawImage::new(4, 3);
        assert_eq!(img.pixel_to_idx(0, 0), 0);
        assert_eq!(img.pixel_to_idx(3, 0), 9);
        assert_eq!(img.pixel_to_idx(0, 1), 12);
        assert_eq!(img.data.len(), 4 * 3 * 3);
    }

    #[test]
    fn draw_then_get_round_trips() {
        let mut img = RawImage::new(4, 3);
        let c = Color::new(0.1, 0.2, 0.3);
        img.draw_pixel(2, 1, c);
        assert_eq!(img.get(2, 1), c);
        assert_eq!(img.get(1, 2), Color::ZERO);
    }

    #[test]
    fn clamp_saturates_hot_values() {
        let mut img = RawImage::new(1, 1);
        // the "hot" yellow palette endpoint
        img.draw_pixel(0, 0, Color::new(1.7, 1.3, 1.0));
        let out = img.convert_to_image(&ToneMappingMethod::Clamp);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn clamp_scales_in_range_values() {
        let mut img = RawImage::new(1, 1);
        img.draw_pixel(0, 0, Color::new(0.5, 0., -0.25));
        let out = img.convert_to_image(&ToneMappingMethod::Clamp);
        assert_eq!(out.get_pixel(0, 0).0, [127, 0, 0]);
    }
}
