//! Ordered (threshold matrix) dithering between two palette colours.
//!
//! For each pixel the two nearest palette colours `a` and `b` are found,
//! the pixel is projected onto the line between them to get how much of
//! `a` it contains, and that ratio is compared to a tiled threshold. No
//! error leaves the pixel, so patterns stay stable and never bleed across
//! region boundaries.

use crate::palette::Palette;

/// A tiled threshold matrix with entries `0..size*size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdMatrix {
    pub size: usize,
    pub values: &'static [u8],
}

/// 8x8 Bayer matrix.
pub const BAYER_8: ThresholdMatrix = ThresholdMatrix {
    size: 8,
    values: &[
        0, 48, 12, 60, 3, 51, 15, 63, //
        32, 16, 44, 28, 35, 19, 47, 31, //
        8, 56, 4, 52, 11, 59, 7, 55, //
        40, 24, 36, 20, 43, 27, 39, 23, //
        2, 50, 14, 62, 1, 49, 13, 61, //
        34, 18, 46, 30, 33, 17, 45, 29, //
        10, 58, 6, 54, 9, 57, 5, 53, //
        42, 26, 38, 22, 41, 25, 37, 21, //
    ],
};

impl ThresholdMatrix {
    /// Threshold for `(x, y)` in `(0, 1)`.
    ///
    /// Offset by `size` at both ends so that a ratio of exactly 0 or 1
    /// always picks the same colour.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f32 {
        let n = self.size;
        let m = self.values[(y % n) * n + (x % n)] as f32;
        (m + n as f32) / (n * n + n) as f32
    }
}

/// Pick between the two nearest palette colours for one pixel.
#[inline]
pub(crate) fn ordered_pick(
    palette: &Palette,
    matrix: &ThresholdMatrix,
    px: [f32; 3],
    x: usize,
    y: usize,
) -> u8 {
    let (a, b) = palette.nearest_two(px);
    if a == b {
        return a;
    }
    let alpha = palette.mix_ratio(px, a, b);
    if alpha >= matrix.threshold(x, y) {
        a
    } else {
        b
    }
}
