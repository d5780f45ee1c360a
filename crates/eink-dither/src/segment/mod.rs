//! Region segmentation.
//!
//! Splits an image into flat UI, edge and photographic pixels so each class
//! can be quantized differently. The classifier works on the un-enhanced
//! source:
//!
//! 1. Luma (ITU-R 601) and its gradient magnitude per pixel
//! 2. Activity: mean gradient over a 5x5 neighbourhood
//! 3. Per pixel:
//!    - gradient >= `edge_threshold` → [`Region::Edge`]
//!    - activity >= `sky_gradient_threshold` and the colour is not already
//!      within `palette_fit_threshold` of a palette colour → photographic,
//!      [`Region::PhotoSmooth`] when the pixel's own gradient is below
//!      `sky_gradient_threshold`, [`Region::PhotoTexture`] otherwise
//!    - anything else → [`Region::Flat`]
//! 4. Majority smoothing of the photographic flag, radius `smooth_strength`
//!
//! # Example
//!
//! ```
//! use eink_dither::{Region, SegmentOptions, Segmenter, Srgb};
//!
//! let pixels = vec![Srgb::WHITE; 16];
//! let mask = Segmenter::new(SegmentOptions::default()).segment(&pixels, 4, 4);
//! assert_eq!(mask.count(Region::Flat), 16);
//! ```

mod gradient;
mod mask;

pub use mask::{Mask, Region};

use crate::color::Srgb;
use crate::palette::Palette;

/// Window radius for the activity mean.
const ACTIVITY_RADIUS: usize = 2;

/// Largest majority-filter radius honoured.
const MAX_SMOOTH_RADIUS: u8 = 3;

/// Thresholds for the segmentation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOptions {
    /// Neighbourhood activity at or above which a pixel counts as
    /// photographic.
    pub sky_gradient_threshold: f32,
    /// Per-pixel gradient at or above which a pixel is an edge.
    pub edge_threshold: f32,
    /// Majority filter radius; 0 disables smoothing.
    pub smooth_strength: u8,
    /// Squared RGB distance below which a colour counts as a palette (UI)
    /// colour and is never photographic.
    pub palette_fit_threshold: u32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            sky_gradient_threshold: 14.0,
            edge_threshold: 26.0,
            smooth_strength: 1,
            palette_fit_threshold: 1800,
        }
    }
}

impl SegmentOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn sky_gradient_threshold(mut self, threshold: f32) -> Self {
        self.sky_gradient_threshold = threshold;
        self
    }

    #[inline]
    pub fn edge_threshold(mut self, threshold: f32) -> Self {
        self.edge_threshold = threshold;
        self
    }

    #[inline]
    pub fn smooth_strength(mut self, strength: u8) -> Self {
        self.smooth_strength = strength;
        self
    }

    #[inline]
    pub fn palette_fit_threshold(mut self, threshold: u32) -> Self {
        self.palette_fit_threshold = threshold;
        self
    }
}

/// Computes a [`Mask`] for an image.
#[derive(Debug, Clone)]
pub struct Segmenter {
    options: SegmentOptions,
    palette: Palette,
}

impl Segmenter {
    /// Segmenter judging palette fit against the e-ink palette.
    pub fn new(options: SegmentOptions) -> Self {
        Self::with_palette(options, Palette::eink())
    }

    pub fn with_palette(options: SegmentOptions, palette: Palette) -> Self {
        Self { options, palette }
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Classify every pixel of a `width` x `height` image.
    ///
    /// `pixels` must hold `width * height` entries in row-major order.
    /// Deterministic: identical input and options give an identical mask.
    pub fn segment(&self, pixels: &[Srgb], width: usize, height: usize) -> Mask {
        debug_assert_eq!(pixels.len(), width * height);
        if pixels.is_empty() {
            return Mask::new(Vec::new(), width, height);
        }

        let opts = &self.options;
        let luma = gradient::luma_plane(pixels);
        let grad = gradient::gradient_plane(&luma, width, height);
        let activity = gradient::box_mean(&grad, width, height, ACTIVITY_RADIUS);

        let regions: Vec<Region> = pixels
            .iter()
            .enumerate()
            .map(|(i, &px)| {
                if grad[i] >= opts.edge_threshold {
                    Region::Edge
                } else if activity[i] >= opts.sky_gradient_threshold
                    && self.palette.fit_distance(px) >= opts.palette_fit_threshold
                {
                    if grad[i] < opts.sky_gradient_threshold {
                        Region::PhotoSmooth
                    } else {
                        Region::PhotoTexture
                    }
                } else {
                    Region::Flat
                }
            })
            .collect();

        let radius = opts.smooth_strength.min(MAX_SMOOTH_RADIUS) as usize;
        let regions = mask::smooth_majority(
            &regions,
            &grad,
            opts.sky_gradient_threshold,
            width,
            height,
            radius,
        );
        Mask::new(regions, width, height)
    }
}
