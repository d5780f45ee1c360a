//! Enhancement options.

/// Factors for the enhancement stage.
///
/// All factors default to `1.0` (identity). The server feeds in its own
/// tuned values.
///
/// ```
/// use eink_dither::EnhanceOptions;
///
/// let options = EnhanceOptions::new().contrast(1.25).saturation(1.2).gamma(0.95);
/// assert!(!options.is_identity());
/// assert!(EnhanceOptions::new().is_identity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceOptions {
    /// Contrast multiplier around the mean luma.
    pub contrast: f32,
    /// Saturation multiplier around each pixel's luma.
    pub saturation: f32,
    /// Gamma; values below 1.0 darken midtones.
    pub gamma: f32,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            saturation: 1.0,
            gamma: 1.0,
        }
    }
}

impl EnhanceOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contrast(mut self, factor: f32) -> Self {
        self.contrast = factor;
        self
    }

    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.saturation = factor;
        self
    }

    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Whether every factor is exactly `1.0`.
    pub fn is_identity(&self) -> bool {
        self.contrast == 1.0 && self.saturation == 1.0 && self.gamma == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let opts = EnhanceOptions::default();
        assert!(opts.is_identity());
    }

    #[test]
    fn test_builder_chaining() {
        let opts = EnhanceOptions::new().contrast(1.5).saturation(0.5).gamma(2.0);
        assert!((opts.contrast - 1.5).abs() < f32::EPSILON);
        assert!((opts.saturation - 0.5).abs() < f32::EPSILON);
        assert!((opts.gamma - 2.0).abs() < f32::EPSILON);
    }
}
