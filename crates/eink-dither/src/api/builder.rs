//! EinkDitherer builder -- the primary entry point for the crate.
//!
//! [`EinkDitherer`] wires segmentation, enhancement and the strategy scan
//! together behind a fluent configuration API.

use crate::color::Srgb;
use crate::dither::{self, DitherOptions, PhotoMode, RenderingMode, Strategy};
use crate::output::DitheredImage;
use crate::palette::Palette;
use crate::preprocess::{EnhanceOptions, Enhancer};
use crate::segment::{Mask, SegmentOptions, Segmenter};

use super::DitherError;

/// High-level ditherer for seven-colour e-ink panels.
///
/// - Configuration methods consume and return `self`
/// - [`dither()`](Self::dither) takes `&self`, so one configured ditherer
///   can be shared across threads and reused
/// - Output is deterministic for identical input and configuration
///
/// # Example
///
/// ```
/// use eink_dither::{EinkDitherer, PhotoMode, RenderingMode, Srgb};
///
/// let ditherer = EinkDitherer::new(RenderingMode::ForcedOn)
///     .photo_mode(PhotoMode::Stucki)
///     .contrast(1.25)
///     .saturation(1.2)
///     .gamma(0.95);
///
/// let pixels = vec![Srgb::from_u8(90, 140, 200); 16];
/// let result = ditherer.dither(&pixels, 4, 4).unwrap();
/// assert_eq!(result.indices().len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct EinkDitherer {
    palette: Palette,
    mode: RenderingMode,
    photo_mode: PhotoMode,
    enhance: EnhanceOptions,
    segment: SegmentOptions,
    dither_opts: DitherOptions,
}

impl EinkDitherer {
    /// Ditherer for the seven-colour palette with identity enhancement and
    /// default segmentation thresholds.
    pub fn new(mode: RenderingMode) -> Self {
        Self {
            palette: Palette::eink(),
            mode,
            photo_mode: PhotoMode::default(),
            enhance: EnhanceOptions::default(),
            segment: SegmentOptions::default(),
            dither_opts: DitherOptions::default(),
        }
    }

    /// Ditherer for a custom set of output colours.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::Palette`] when the colours do not form a
    /// valid palette.
    pub fn with_colors(mode: RenderingMode, colors: &[Srgb]) -> Result<Self, DitherError> {
        Ok(Self::new(mode).palette(Palette::new(colors)?))
    }

    /// Replace the output palette.
    #[inline]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[inline]
    pub fn photo_mode(mut self, photo_mode: PhotoMode) -> Self {
        self.photo_mode = photo_mode;
        self
    }

    #[inline]
    pub fn contrast(mut self, factor: f32) -> Self {
        self.enhance = self.enhance.contrast(factor);
        self
    }

    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.enhance = self.enhance.saturation(factor);
        self
    }

    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.enhance = self.enhance.gamma(gamma);
        self
    }

    /// Replace all enhancement factors at once.
    #[inline]
    pub fn enhance(mut self, options: EnhanceOptions) -> Self {
        self.enhance = options;
        self
    }

    /// Replace all segmentation thresholds at once.
    #[inline]
    pub fn segmentation(mut self, options: SegmentOptions) -> Self {
        self.segment = options;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.dither_opts = self.dither_opts.serpentine(enabled);
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.dither_opts = self.dither_opts.error_clamp(clamp);
        self
    }

    pub fn mode(&self) -> RenderingMode {
        self.mode
    }

    /// Classify the image into regions.
    pub fn segment(
        &self,
        pixels: &[Srgb],
        width: usize,
        height: usize,
    ) -> Result<Mask, DitherError> {
        check_len(pixels, width, height)?;
        let segmenter = Segmenter::with_palette(self.segment, self.palette.clone());
        Ok(segmenter.segment(pixels, width, height))
    }

    /// Segment and dither in one go.
    pub fn dither(
        &self,
        pixels: &[Srgb],
        width: usize,
        height: usize,
    ) -> Result<DitheredImage, DitherError> {
        let mask = self.segment(pixels, width, height)?;
        self.dither_with_mask(pixels, &mask)
    }

    /// Dither with a mask computed earlier by [`segment()`](Self::segment).
    pub fn dither_with_mask(
        &self,
        pixels: &[Srgb],
        mask: &Mask,
    ) -> Result<DitheredImage, DitherError> {
        let (width, height) = (mask.width(), mask.height());
        check_len(pixels, width, height)?;

        let enhanced = Enhancer::new(self.enhance).apply(pixels);
        let strategies: Vec<Strategy> = mask
            .regions()
            .iter()
            .map(|&region| dither::plan(self.mode, self.photo_mode, region))
            .collect();
        let indices = dither::render_plan(
            &enhanced,
            &strategies,
            width,
            height,
            &self.palette,
            &self.dither_opts,
        );
        Ok(DitheredImage::new(
            indices,
            width,
            height,
            self.palette.clone(),
        ))
    }
}

fn check_len(pixels: &[Srgb], width: usize, height: usize) -> Result<(), DitherError> {
    let expected = width * height;
    if pixels.len() != expected {
        return Err(DitherError::DimensionMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteError;

    #[test]
    fn test_dimension_mismatch() {
        let err = EinkDitherer::new(RenderingMode::Auto)
            .dither(&[Srgb::WHITE; 3], 2, 2)
            .unwrap_err();
        assert_eq!(
            err,
            DitherError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_mask_mismatch() {
        let ditherer = EinkDitherer::new(RenderingMode::Auto);
        let mask = ditherer.segment(&[Srgb::WHITE; 4], 2, 2).unwrap();
        assert!(matches!(
            ditherer.dither_with_mask(&[Srgb::WHITE; 6], &mask),
            Err(DitherError::DimensionMismatch {
                expected: 4,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_forced_off_is_nearest_everywhere() {
        let pixels: Vec<Srgb> = (0..64u32)
            .map(|i| Srgb::from_u8((i * 4) as u8, (255 - i * 3) as u8, (i * 2) as u8))
            .collect();
        let palette = Palette::eink();
        let result = EinkDitherer::new(RenderingMode::ForcedOff)
            .dither(&pixels, 8, 8)
            .unwrap();
        for (px, &idx) in pixels.iter().zip(result.indices()) {
            assert_eq!(idx, palette.nearest(px.to_f32()));
        }
    }

    #[test]
    fn test_reusable_and_deterministic() {
        let pixels: Vec<Srgb> = (0..256u32)
            .map(|i| Srgb::from_u8(i as u8, (i * 7 % 256) as u8, (i * 13 % 256) as u8))
            .collect();
        let ditherer = EinkDitherer::new(RenderingMode::ForcedOn).photo_mode(PhotoMode::Stucki);
        let a = ditherer.dither(&pixels, 16, 16).unwrap();
        let b = ditherer.dither(&pixels, 16, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_with_colors_rejects_empty() {
        assert!(matches!(
            EinkDitherer::with_colors(RenderingMode::Auto, &[]),
            Err(DitherError::Palette(PaletteError::EmptyPalette))
        ));
    }

    #[test]
    fn test_custom_palette() {
        let result = EinkDitherer::with_colors(RenderingMode::ForcedOn, &[Srgb::BLACK, Srgb::WHITE])
            .unwrap()
            .dither(&vec![Srgb::from_u8(200, 30, 30); 16], 4, 4)
            .unwrap();
        assert!(result.indices().iter().all(|&i| i < 2));
    }
}
