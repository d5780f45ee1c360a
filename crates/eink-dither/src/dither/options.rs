//! Dithering options and configuration.

/// Configuration for the scan loop.
///
/// # Defaults
///
/// - Serpentine scanning: enabled (no directional worms)
/// - Error clamp: 0.0 (pixel plus error stays inside 0..=255)
///
/// ```
/// use eink_dither::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(false).error_clamp(16.0);
/// assert!(!options.serpentine);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// Process odd rows right-to-left with the kernel mirrored.
    ///
    /// Default: `true`
    pub serpentine: bool,

    /// How far, in 8-bit units, accumulated error may push a channel
    /// outside `0..=255` before it is matched.
    ///
    /// Default: `0.0`
    pub error_clamp: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            serpentine: true,
            error_clamp: 0.0,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp;
        self
    }
}
