//! Quantization strategies and the scan loop that applies them.
//!
//! Every pixel carries its own [`Strategy`]. The frame is walked once, in
//! serpentine order, and each pixel is quantized by its strategy:
//!
//! - [`Strategy::FlatMap`]: nearest colour. Error arriving from diffusing
//!   neighbours is dropped and nothing is passed on, so hard UI boundaries
//!   stop error bleed.
//! - [`Strategy::ErrorDiffusion`]: nearest colour of pixel plus accumulated
//!   error, the residual spread with the kernel.
//! - [`Strategy::Ordered`]: threshold choice between the two nearest
//!   colours. Also drops incoming error.
//!
//! Because all strategies share one pass and one [`ErrorBuffer`], mixed
//! frames need no compositing of separately rendered images.

mod kernel;
mod options;
mod ordered;
mod strategy;

pub use kernel::{Kernel, FLOYD_STEINBERG, STUCKI};
pub use options::DitherOptions;
pub use ordered::{ThresholdMatrix, BAYER_8};
pub use strategy::{plan, ParseModeError, PhotoMode, RenderingMode, Strategy};

use crate::palette::Palette;

/// Error buffer for efficient error diffusion.
///
/// Keeps only the rows a kernel can reach: `rows[0]` is the current row,
/// `rows[1]` the next, and so on.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a buffer `row_depth` rows deep (kernel `max_dy + 1`).
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth.max(1))
                .map(|_| vec![[0.0; 3]; width])
                .collect(),
            width,
        }
    }

    /// Error accumulated so far for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-range targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row.
    pub fn advance_row(&mut self) {
        // [0,1,2] -> [1,2,0], then zero the recycled row
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Quantize `pixels` with a per-pixel strategy plan.
///
/// `pixels` are 0–255 floating point values (typically the enhanced image)
/// and `strategies` holds one entry per pixel. Returns one palette index per
/// pixel in row-major order.
pub fn render_plan(
    pixels: &[[f32; 3]],
    strategies: &[Strategy],
    width: usize,
    height: usize,
    palette: &Palette,
    options: &DitherOptions,
) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), width * height);
    debug_assert_eq!(strategies.len(), width * height);

    let mut output = vec![0u8; width * height];
    let depth = strategies.iter().map(Strategy::reach).max().unwrap_or(0) + 1;
    let mut error_buf = ErrorBuffer::new(width, depth);
    let lo = -options.error_clamp;
    let hi = 255.0 + options.error_clamp;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;
        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            match strategies[idx] {
                Strategy::FlatMap => {
                    output[idx] = palette.nearest(pixels[idx]);
                }
                Strategy::Ordered(matrix) => {
                    output[idx] = ordered::ordered_pick(palette, matrix, pixels[idx], x, y);
                }
                Strategy::ErrorDiffusion(kernel) => {
                    let accumulated = error_buf.get_accumulated(x);
                    let mut px = pixels[idx];
                    for c in 0..3 {
                        px[c] = (px[c] + accumulated[c]).clamp(lo, hi);
                    }

                    let chosen = palette.nearest(px);
                    output[idx] = chosen;

                    let target = palette.color(chosen as usize).to_f32();
                    let error = [px[0] - target[0], px[1] - target[1], px[2] - target[2]];
                    let divisor = kernel.divisor as f32;
                    for &(dx, dy, weight) in kernel.entries {
                        let effective_dx = if reverse { -dx } else { dx };
                        let nx = x as i64 + effective_dx as i64;
                        if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                            continue;
                        }
                        let share = weight as f32 / divisor;
                        error_buf.add_error(
                            nx as usize,
                            dy as usize,
                            [error[0] * share, error[1] * share, error[2] * share],
                        );
                    }
                }
            }
        }
        error_buf.advance_row();
    }

    output
}
