//! Public API for the eink-dither crate.
//!
//! This module provides the high-level API: the [`EinkDitherer`] builder and
//! the [`DitherError`] error type.

mod builder;
mod error;

pub use builder::EinkDitherer;
pub use error::DitherError;
