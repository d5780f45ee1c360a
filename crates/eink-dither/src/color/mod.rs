//! Colour types
//!
//! Everything in this crate works on 8-bit sRGB pixels. Intermediate
//! values (enhanced pixels, pixels carrying diffused error) are plain
//! `[f32; 3]` in the same 0–255 scale.
//!
//! # Example
//!
//! ```
//! use eink_dither::Srgb;
//!
//! let pixel = Srgb::from_rgba_over_white([255, 0, 0, 0]);
//! assert_eq!(pixel, Srgb::WHITE);
//! ```

mod srgb;

pub(crate) use srgb::luma_of;
pub use srgb::Srgb;
