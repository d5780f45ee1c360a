//! The e-ink palette and nearest-colour matching.
//!
//! All matching uses squared Euclidean distance in 8-bit sRGB. Two rules
//! sit on top of plain distance:
//!
//! - **Neutral rule**: a near-grey pixel (see [`Srgb::is_near_neutral`])
//!   may only map to black or white, when the palette contains both.
//! - **Tie-break**: equal distances resolve to the lower palette index.

use super::PaletteError;
use crate::color::Srgb;

/// The seven panel colours in palette-index order.
///
/// Index order is significant: it is the PNG palette order and the
/// tie-break order.
pub const EINK_COLORS: [Srgb; 7] = [
    Srgb::from_u8(0, 0, 0),
    Srgb::from_u8(255, 255, 255),
    Srgb::from_u8(255, 0, 0),
    Srgb::from_u8(255, 255, 0),
    Srgb::from_u8(0, 255, 0),
    Srgb::from_u8(0, 0, 255),
    Srgb::from_u8(255, 165, 0),
];

/// Largest palette addressable by a 4-bit indexed image.
pub const MAX_PALETTE_SIZE: usize = 16;

/// An ordered set of output colours.
///
/// # Example
///
/// ```
/// use eink_dither::{Palette, Srgb};
///
/// let palette = Palette::eink();
/// assert_eq!(palette.len(), 7);
/// assert_eq!(palette.nearest(Srgb::from_u8(250, 10, 5).to_f32()), 2); // red
/// assert_eq!(palette.nearest(Srgb::from_u8(140, 140, 140).to_f32()), 1); // grey -> white
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
    /// Indices of pure black and pure white, when both are present.
    neutral_pair: Option<(u8, u8)>,
}

impl Palette {
    /// Build a custom palette.
    ///
    /// # Errors
    ///
    /// Fails on an empty palette, more than [`MAX_PALETTE_SIZE`] entries, or
    /// a repeated colour.
    pub fn new(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
            });
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        let position = |target: Srgb| colors.iter().position(|&c| c == target);
        let neutral_pair = match (position(Srgb::BLACK), position(Srgb::WHITE)) {
            (Some(black), Some(white)) => Some((black as u8, white as u8)),
            _ => None,
        };

        Ok(Self {
            colors: colors.to_vec(),
            neutral_pair,
        })
    }

    /// The seven-colour panel palette.
    pub fn eink() -> Self {
        Self {
            colors: EINK_COLORS.to_vec(),
            neutral_pair: Some((0, 1)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn color(&self, index: usize) -> Srgb {
        self.colors[index]
    }

    #[inline]
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Index of the nearest palette colour.
    ///
    /// The pixel is rounded and clamped to 8 bits before matching.
    pub fn nearest(&self, px: [f32; 3]) -> u8 {
        let rgb = Srgb::from_f32(px);
        if let Some((black, white)) = self.neutral_pair.filter(|_| rgb.is_near_neutral()) {
            return self.closest_of(rgb, [black, white]);
        }
        self.ranked(rgb).0
    }

    /// The two nearest palette colours, nearest first.
    ///
    /// Near-neutral pixels always get the black/white pair. A palette with
    /// a single colour returns that colour twice.
    pub fn nearest_two(&self, px: [f32; 3]) -> (u8, u8) {
        let rgb = Srgb::from_f32(px);
        if let Some(pair) = self.neutral_pair.filter(|_| rgb.is_near_neutral()) {
            return pair;
        }
        let (first, second) = self.ranked(rgb);
        (first, second.unwrap_or(first))
    }

    /// How much of colour `a` a pixel contains when read as a blend of
    /// colours `a` and `b`.
    ///
    /// Projects the pixel onto the segment from `b` to `a` and clamps to
    /// `0.0..=1.0`; `1.0` means "pure `a`".
    pub fn mix_ratio(&self, px: [f32; 3], a: u8, b: u8) -> f32 {
        let ca = self.colors[a as usize].to_f32();
        let cb = self.colors[b as usize].to_f32();
        let mut numerator = 0.0f32;
        let mut denominator = 1e-6f32;
        for c in 0..3 {
            let span = ca[c] - cb[c];
            numerator += span * (px[c] - cb[c]);
            denominator += span * span;
        }
        (numerator / denominator).clamp(0.0, 1.0)
    }

    /// Squared distance from `rgb` to its closest palette colour, ignoring
    /// the neutral rule.
    ///
    /// Used to decide whether a pixel is already a palette (UI) colour.
    pub fn fit_distance(&self, rgb: Srgb) -> u32 {
        self.colors
            .iter()
            .map(|&c| rgb.distance_sq(c))
            .min()
            .unwrap_or(u32::MAX)
    }

    /// Nearest and second nearest, lower index winning ties.
    fn ranked(&self, rgb: Srgb) -> (u8, Option<u8>) {
        let mut best: (u32, u8) = (u32::MAX, 0);
        let mut second: Option<(u32, u8)> = None;
        for (i, &color) in self.colors.iter().enumerate() {
            let d = rgb.distance_sq(color);
            if d < best.0 {
                if best.0 != u32::MAX {
                    second = Some(best);
                }
                best = (d, i as u8);
            } else if second.map_or(true, |(sd, _)| d < sd) {
                second = Some((d, i as u8));
            }
        }
        (best.1, second.map(|(_, i)| i))
    }

    fn closest_of(&self, rgb: Srgb, candidates: [u8; 2]) -> u8 {
        let [a, b] = candidates;
        let da = rgb.distance_sq(self.colors[a as usize]);
        let db = rgb.distance_sq(self.colors[b as usize]);
        if da < db || (da == db && a < b) {
            a
        } else {
            b
        }
    }
}
