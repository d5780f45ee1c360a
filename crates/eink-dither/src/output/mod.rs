//! Output types for the dithering pipeline.
//!
//! [`DitheredImage`] stores palette indices with dimension metadata and an
//! owned [`Palette`](crate::palette::Palette). The indexed form is what the
//! server encodes into an indexed PNG; RGB is available for previews.

mod dithered_image;

pub use dithered_image::DitheredImage;
