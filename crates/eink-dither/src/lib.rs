#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! eink-dither: region-aware seven-colour dithering for e-ink panels
//!
//! This library turns an arbitrary 8-bit RGB image into palette indices for
//! a seven-colour e-ink panel (black, white, red, yellow, green, blue,
//! orange). It classifies every pixel as flat UI, edge or photographic
//! content and applies a different quantization strategy to each class, so
//! dashboards keep crisp text while embedded photos get dithered.
//!
//! # Quick Start
//!
//! The [`EinkDitherer`] builder is the primary entry point:
//!
//! ```
//! use eink_dither::{EinkDitherer, RenderingMode, Srgb};
//!
//! let pixels = vec![Srgb::from_u8(128, 128, 128); 4];
//! let result = EinkDitherer::new(RenderingMode::Auto)
//!     .dither(&pixels, 2, 2)
//!     .unwrap();
//!
//! assert_eq!(result.width(), 2);
//! assert!(result.indices().iter().all(|&i| i < 7));
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! Srgb input (composited over white)
//!     |
//!     +---> segment::Segmenter        (luma, gradient, activity, palette fit)
//!     |         |
//!     |       Mask                    (Flat / Edge / PhotoTexture / PhotoSmooth)
//!     |         |
//!     |       majority smoothing
//!     |
//!     v
//! preprocess::Enhancer                (contrast, saturation, gamma)
//!     |
//!     v
//! dither::plan                        (RenderingMode + PhotoMode + Region -> Strategy)
//!     |
//!     v
//! single serpentine scan              (FlatMap | ErrorDiffusion | Ordered per pixel)
//!     |
//!     v
//! DitheredImage                       (indices into the seven-colour palette)
//! ```
//!
//! # Rendering Modes
//!
//! - [`RenderingMode::ForcedOff`]: every pixel maps to its nearest colour.
//! - [`RenderingMode::ForcedOn`]: the whole frame is dithered with the
//!   uniform strategy of the configured [`PhotoMode`].
//! - [`RenderingMode::Auto`]: flat and edge pixels map to the nearest
//!   colour, photographic pixels are dithered.
//!
//! # Colour Distance
//!
//! Matching uses squared Euclidean distance in 8-bit sRGB. Near-neutral
//! pixels are only allowed to land on black or white, which keeps grey
//! anti-aliasing from turning yellow or blue. Ties resolve to the lower
//! palette index so output is fully deterministic.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod preprocess;
pub mod segment;

#[cfg(test)]
mod domain_tests;

pub use api::{DitherError, EinkDitherer};
pub use color::Srgb;
pub use dither::{
    DitherOptions, Kernel, ParseModeError, PhotoMode, RenderingMode, Strategy, ThresholdMatrix,
};
pub use output::DitheredImage;
pub use palette::{Palette, PaletteError};
pub use preprocess::{EnhanceOptions, Enhancer};
pub use segment::{Mask, Region, SegmentOptions, Segmenter};
