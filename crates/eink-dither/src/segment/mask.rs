//! Region classes and the per-pixel mask.

use super::gradient::Integral;

/// Classification of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Low local activity or an exact UI colour: maps to the nearest colour.
    Flat,
    /// A hard luma step such as text or a border.
    Edge,
    /// Photographic area, pixel itself busy.
    PhotoTexture,
    /// Photographic area, pixel itself calm (sky, skin, soft gradients).
    PhotoSmooth,
}

impl Region {
    #[inline]
    pub fn is_photographic(self) -> bool {
        matches!(self, Region::PhotoTexture | Region::PhotoSmooth)
    }

    /// Short lowercase name, used in logs and debug output.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Flat => "flat",
            Region::Edge => "edge",
            Region::PhotoTexture => "photo-texture",
            Region::PhotoSmooth => "photo-smooth",
        }
    }
}

/// One [`Region`] per pixel, row-major, same dimensions as the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    regions: Vec<Region>,
    width: usize,
    height: usize,
}

impl Mask {
    pub(crate) fn new(regions: Vec<Region>, width: usize, height: usize) -> Self {
        debug_assert_eq!(regions.len(), width * height);
        Self {
            regions,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn region(&self, x: usize, y: usize) -> Region {
        self.regions[y * self.width + x]
    }

    /// Number of pixels in `region`.
    pub fn count(&self, region: Region) -> usize {
        self.regions.iter().filter(|&&r| r == region).count()
    }

    /// Share of photographic pixels, 0.0..=1.0.
    pub fn photographic_ratio(&self) -> f32 {
        if self.regions.is_empty() {
            return 0.0;
        }
        let photo = self.regions.iter().filter(|r| r.is_photographic()).count();
        photo as f32 / self.regions.len() as f32
    }
}

/// Majority filter over the photographic flag.
///
/// Every pixel looks at the `(2 * radius + 1)` window around it (clipped at
/// the borders). If more than half the window is photographic the pixel
/// becomes photographic; if less than half, it stops being photographic; an
/// exact split leaves it alone. Pixels that join take their sub-class from
/// their own gradient, pixels that leave become [`Region::Flat`] (edges are
/// never created or changed by leaving).
pub(crate) fn smooth_majority(
    regions: &[Region],
    gradient: &[f32],
    smooth_below: f32,
    width: usize,
    height: usize,
    radius: usize,
) -> Vec<Region> {
    if radius == 0 {
        return regions.to_vec();
    }
    let integral = Integral::new(
        regions
            .iter()
            .map(|r| if r.is_photographic() { 1.0 } else { 0.0 }),
        width,
        height,
    );

    let mut out = regions.to_vec();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let (photo, count) = integral.window(x, y, radius, width, height);
            let photo = photo as usize;
            let current = regions[idx];
            if photo * 2 > count && !current.is_photographic() {
                out[idx] = if gradient[idx] < smooth_below {
                    Region::PhotoSmooth
                } else {
                    Region::PhotoTexture
                };
            } else if photo * 2 < count && current.is_photographic() {
                out[idx] = Region::Flat;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_photo_pixel_is_absorbed() {
        let mut regions = vec![Region::Flat; 25];
        regions[12] = Region::PhotoTexture;
        let gradient = vec![0.0; 25];
        let out = smooth_majority(&regions, &gradient, 14.0, 5, 5, 1);
        assert!(out.iter().all(|&r| r == Region::Flat));
    }

    #[test]
    fn test_hole_in_photo_is_filled() {
        let mut regions = vec![Region::PhotoTexture; 25];
        regions[12] = Region::Edge;
        let mut gradient = vec![30.0; 25];
        gradient[12] = 5.0;
        let out = smooth_majority(&regions, &gradient, 14.0, 5, 5, 1);
        assert_eq!(out[12], Region::PhotoSmooth);
        assert!(out.iter().all(|r| r.is_photographic()));
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let regions = vec![Region::Flat, Region::PhotoSmooth, Region::Edge, Region::Flat];
        let out = smooth_majority(&regions, &[0.0; 4], 14.0, 2, 2, 0);
        assert_eq!(out, regions);
    }

    #[test]
    fn test_edges_survive_in_flat_surroundings() {
        let mut regions = vec![Region::Flat; 9];
        regions[4] = Region::Edge;
        let out = smooth_majority(&regions, &[0.0; 9], 14.0, 3, 3, 1);
        assert_eq!(out[4], Region::Edge);
    }

    #[test]
    fn test_mask_accessors() {
        let mask = Mask::new(
            vec![Region::Flat, Region::PhotoTexture, Region::PhotoSmooth, Region::Edge],
            2,
            2,
        );
        assert_eq!(mask.region(1, 0), Region::PhotoTexture);
        assert_eq!(mask.region(0, 1), Region::PhotoSmooth);
        assert_eq!(mask.count(Region::Edge), 1);
        assert!((mask.photographic_ratio() - 0.5).abs() < 1e-6);
    }
}
