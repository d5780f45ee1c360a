//! 8-bit sRGB pixel type.

/// A pixel in 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Srgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::from_u8(0, 0, 0);
    pub const WHITE: Srgb = Srgb::from_u8(255, 255, 255);

    /// Create a pixel from 8-bit channel values.
    #[inline]
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a pixel from a byte array `[R, G, B]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Composite an RGBA pixel over a white background.
    ///
    /// E-ink panels have a white substrate, so transparent regions of the
    /// source must come out white rather than black.
    ///
    /// ```
    /// use eink_dither::Srgb;
    ///
    /// assert_eq!(Srgb::from_rgba_over_white([0, 0, 0, 255]), Srgb::BLACK);
    /// assert_eq!(Srgb::from_rgba_over_white([0, 0, 0, 128]), Srgb::from_u8(127, 127, 127));
    /// ```
    #[inline]
    pub fn from_rgba_over_white(rgba: [u8; 4]) -> Self {
        let a = rgba[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a)) / 255) as u8;
        Self::from_u8(blend(rgba[0]), blend(rgba[1]), blend(rgba[2]))
    }

    /// Convert a floating point pixel (0–255 scale) back to bytes.
    ///
    /// Rounds and clamps each channel.
    #[inline]
    pub fn from_f32(px: [f32; 3]) -> Self {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::from_u8(q(px[0]), q(px[1]), q(px[2]))
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as `f32` in the 0–255 scale.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// ITU-R 601 luma, 0.0..=255.0.
    #[inline]
    pub fn luma(self) -> f32 {
        luma_of(self.to_f32())
    }

    /// Squared Euclidean distance to another pixel.
    #[inline]
    pub fn distance_sq(self, other: Srgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Whether the pixel is close enough to grey that only black or white
    /// should represent it.
    ///
    /// The channel spread must not exceed `max(12, 10% of the brightest
    /// channel)`.
    #[inline]
    pub fn is_near_neutral(self) -> bool {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let tolerance = 12u8.max(max / 10);
        max - min <= tolerance
    }
}

impl From<[u8; 3]> for Srgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// ITU-R 601 luma of a floating point pixel.
#[inline]
pub(crate) fn luma_of(px: [f32; 3]) -> f32 {
    0.299 * px[0] + 0.587 * px[1] + 0.114 * px[2]
}
