//! Luma gradient and neighbourhood activity planes.

use crate::color::Srgb;

/// Per-pixel luma plane.
pub(crate) fn luma_plane(pixels: &[Srgb]) -> Vec<f32> {
    pixels.iter().map(|p| p.luma()).collect()
}

/// Gradient magnitude: mean of the absolute horizontal and vertical
/// central differences, borders clamped. Range 0.0..=255.0.
pub(crate) fn gradient_plane(luma: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut grad = vec![0.0f32; width * height];
    for y in 0..height {
        let up = y.saturating_sub(1);
        let down = (y + 1).min(height - 1);
        for x in 0..width {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(width - 1);
            let gx = (luma[y * width + right] - luma[y * width + left]).abs();
            let gy = (luma[down * width + x] - luma[up * width + x]).abs();
            grad[y * width + x] = (gx + gy) * 0.5;
        }
    }
    grad
}

/// Summed-area table with a zero row and column in front.
pub(crate) struct Integral {
    sums: Vec<f64>,
    stride: usize,
}

impl Integral {
    pub(crate) fn new(values: impl Iterator<Item = f64>, width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0f64; stride * (height + 1)];
        let mut values = values;
        for y in 0..height {
            let mut row = 0.0f64;
            for x in 0..width {
                row += values.next().unwrap_or(0.0);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { sums, stride }
    }

    /// Sum over the window of `radius` around `(x, y)`, clipped to the
    /// image, together with the number of pixels it covers.
    pub(crate) fn window(
        &self,
        x: usize,
        y: usize,
        radius: usize,
        width: usize,
        height: usize,
    ) -> (f64, usize) {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(width);
        let y1 = (y + radius + 1).min(height);
        let s = &self.sums;
        let w = self.stride;
        let sum = s[y1 * w + x1] - s[y0 * w + x1] - s[y1 * w + x0] + s[y0 * w + x0];
        (sum, (x1 - x0) * (y1 - y0))
    }
}

/// Box mean of `plane` over a `(2 * radius + 1)` square window.
pub(crate) fn box_mean(plane: &[f32], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let integral = Integral::new(plane.iter().map(|&v| v as f64), width, height);
    let mut out = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let (sum, count) = integral.window(x, y, radius, width, height);
            out[y * width + x] = (sum / count as f64) as f32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image_has_zero_gradient() {
        let luma = vec![80.0; 12];
        assert!(gradient_plane(&luma, 4, 3).iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_vertical_step_edge() {
        // Left half black, right half white.
        let luma: Vec<f32> = (0..16)
            .map(|i| if i % 4 < 2 { 0.0 } else { 255.0 })
            .collect();
        let grad = gradient_plane(&luma, 4, 4);
        assert_eq!(grad[0], 0.0);
        assert!((grad[1] - 127.5).abs() < 1e-3);
        assert!((grad[2] - 127.5).abs() < 1e-3);
        assert_eq!(grad[3], 0.0);
    }

    #[test]
    fn test_single_pixel_image() {
        assert_eq!(gradient_plane(&[42.0], 1, 1), vec![0.0]);
    }

    #[test]
    fn test_box_mean_clips_at_borders() {
        let plane = vec![1.0, 2.0, 3.0, 4.0];
        let mean = box_mean(&plane, 2, 2, 1);
        assert!(mean.iter().all(|&m| (m - 2.5).abs() < 1e-6));
    }

    #[test]
    fn test_integral_window_counts() {
        let integral = Integral::new([1.0f64; 25].into_iter(), 5, 5);
        assert_eq!(integral.window(2, 2, 1, 5, 5), (9.0, 9));
        assert_eq!(integral.window(0, 0, 1, 5, 5), (4.0, 4));
    }
}
