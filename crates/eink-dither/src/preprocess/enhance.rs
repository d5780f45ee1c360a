//! Contrast, saturation and gamma adjustment.

use super::EnhanceOptions;
use crate::color::{luma_of, Srgb};

/// Applies [`EnhanceOptions`] to whole images.
#[derive(Debug, Clone)]
pub struct Enhancer {
    options: EnhanceOptions,
    /// Gamma curve for every 8-bit input value.
    gamma_lut: [f32; 256],
}

impl Enhancer {
    pub fn new(options: EnhanceOptions) -> Self {
        let mut gamma_lut = [0.0f32; 256];
        let exponent = 1.0 / options.gamma;
        for (v, slot) in gamma_lut.iter_mut().enumerate() {
            *slot = 255.0 * (v as f32 / 255.0).powf(exponent);
        }
        Self { options, gamma_lut }
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    /// Enhance `pixels`, returning floating point pixels in the 0–255 scale.
    pub fn apply(&self, pixels: &[Srgb]) -> Vec<[f32; 3]> {
        let mut out: Vec<[f32; 3]> = pixels.iter().map(|p| p.to_f32()).collect();
        if self.options.is_identity() || out.is_empty() {
            return out;
        }

        if self.options.contrast != 1.0 {
            let mean = (out.iter().map(|&p| luma_of(p) as f64).sum::<f64>() / out.len() as f64)
                .round() as f32;
            let factor = self.options.contrast;
            for px in out.iter_mut() {
                for c in px.iter_mut() {
                    *c = (mean + (*c - mean) * factor).clamp(0.0, 255.0);
                }
            }
        }

        if self.options.saturation != 1.0 {
            let factor = self.options.saturation;
            for px in out.iter_mut() {
                let grey = luma_of(*px);
                for c in px.iter_mut() {
                    *c = (grey + (*c - grey) * factor).clamp(0.0, 255.0);
                }
            }
        }

        if self.options.gamma != 1.0 {
            for px in out.iter_mut() {
                for c in px.iter_mut() {
                    *c = self.gamma_at(*c);
                }
            }
        }

        out
    }

    /// Gamma curve, linearly interpolated between LUT entries.
    #[inline]
    fn gamma_at(&self, v: f32) -> f32 {
        let v = v.clamp(0.0, 255.0);
        let lo = v.floor() as usize;
        let hi = (lo + 1).min(255);
        let t = v - lo as f32;
        self.gamma_lut[lo] * (1.0 - t) + self.gamma_lut[hi] * t
    }
}
