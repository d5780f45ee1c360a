//! Image enhancement before quantization.
//!
//! E-ink panels look muted next to an LCD, so pixels are pushed a little
//! before they are matched against the palette:
//!
//! 1. **Contrast**: scale each channel away from the image's mean luma
//! 2. **Saturation**: scale each channel away from the pixel's own luma
//! 3. **Gamma**: `255 * (v / 255) ^ (1 / gamma)`
//!
//! Each step clamps to 0–255. Pure palette colours survive all three steps
//! unchanged for the default factors, which keeps UI colours stable.
//!
//! # Example
//!
//! ```
//! use eink_dither::{EnhanceOptions, Enhancer, Srgb};
//!
//! let enhancer = Enhancer::new(EnhanceOptions::new().contrast(1.25).gamma(0.95));
//! let out = enhancer.apply(&[Srgb::BLACK, Srgb::WHITE]);
//! assert_eq!(out[0], [0.0, 0.0, 0.0]);
//! assert_eq!(out[1], [255.0, 255.0, 255.0]);
//! ```

mod enhance;
mod options;

pub use enhance::Enhancer;
pub use options::EnhanceOptions;
