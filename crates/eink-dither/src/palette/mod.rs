//! Palette types
//!
//! This module provides the fixed seven-colour e-ink palette and the
//! nearest-colour queries the quantization strategies are built on.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{Palette, EINK_COLORS, MAX_PALETTE_SIZE};
