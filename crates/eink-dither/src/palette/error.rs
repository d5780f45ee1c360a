//! Error types for palette construction.

use std::fmt;

/// Error type for palette validation.
///
/// Returned by [`Palette::new`](super::Palette::new) when a custom palette
/// cannot be used for indexed output.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No colors provided in palette
    EmptyPalette,
    /// More colors than a 4-bit indexed image can address
    TooManyColors {
        /// Number of colors supplied
        count: usize,
    },
    /// Duplicate color found at the specified index
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => write!(f, "palette cannot be empty"),
            PaletteError::TooManyColors { count } => write!(
                f,
                "palette has {} colors, at most {} are supported",
                count,
                super::MAX_PALETTE_SIZE
            ),
            PaletteError::DuplicateColor { index } => {
                write!(f, "duplicate color found at index {}", index)
            }
        }
    }
}

impl std::error::Error for PaletteError {}
