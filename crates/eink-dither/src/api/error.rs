//! Unified error type for the eink-dither public API.

use crate::palette::PaletteError;
use std::fmt;

/// Error type for the eink-dither public API.
#[derive(Debug, Clone, PartialEq)]
pub enum DitherError {
    /// Pixel buffer length does not match `width * height`
    DimensionMismatch {
        /// `width * height`
        expected: usize,
        /// Number of pixels supplied
        actual: usize,
    },
    /// Palette validation error
    Palette(PaletteError),
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::DimensionMismatch { expected, actual } => write!(
                f,
                "pixel buffer holds {} pixels, expected {}",
                actual, expected
            ),
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}
