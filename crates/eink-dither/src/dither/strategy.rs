//! Rendering modes and the per-pixel strategy plan.

use std::fmt;
use std::str::FromStr;

use super::kernel::{Kernel, FLOYD_STEINBERG, STUCKI};
use super::ordered::{ThresholdMatrix, BAYER_8};
use crate::segment::Region;

/// How a single pixel is quantized.
///
/// A closed set: the renderer matches on it directly inside its scan loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Nearest palette colour, no error in or out.
    FlatMap,
    /// Nearest colour of pixel plus accumulated error; the new error is
    /// spread with the kernel.
    ErrorDiffusion(&'static Kernel),
    /// Threshold choice between the two nearest colours.
    Ordered(&'static ThresholdMatrix),
}

impl Strategy {
    /// Rows of error this strategy writes ahead of the current one.
    pub fn reach(&self) -> usize {
        match self {
            Strategy::ErrorDiffusion(kernel) => kernel.max_dy,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FlatMap => "flat",
            Strategy::ErrorDiffusion(kernel) => kernel.name,
            Strategy::Ordered(_) => "ordered",
        }
    }
}

/// Per-request choice of how much dithering to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingMode {
    /// Let the segmentation mask decide per pixel.
    #[default]
    Auto,
    /// Dither the whole frame.
    ForcedOn,
    /// Map every pixel to its nearest colour.
    ForcedOff,
}

impl RenderingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderingMode::Auto => "auto",
            RenderingMode::ForcedOn => "forced_on",
            RenderingMode::ForcedOff => "forced_off",
        }
    }
}

impl fmt::Display for RenderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderingMode {
    type Err = ParseModeError;

    /// Parse the value of a `dither` query parameter.
    ///
    /// ```
    /// use eink_dither::RenderingMode;
    ///
    /// assert_eq!("true".parse::<RenderingMode>().unwrap(), RenderingMode::ForcedOn);
    /// assert_eq!("OFF".parse::<RenderingMode>().unwrap(), RenderingMode::ForcedOff);
    /// assert_eq!("regional".parse::<RenderingMode>().unwrap(), RenderingMode::Auto);
    /// assert!("sometimes".parse::<RenderingMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "regional" | "auto" | "hybrid" => Ok(RenderingMode::Auto),
            "true" | "on" | "1" | "yes" => Ok(RenderingMode::ForcedOn),
            "false" | "off" | "0" | "no" => Ok(RenderingMode::ForcedOff),
            _ => Err(ParseModeError {
                kind: "rendering mode",
                value: s.to_string(),
                expected: "true, false or regional",
            }),
        }
    }
}

/// Which algorithm family renders photographic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhotoMode {
    /// Ordered dithering on calm photo pixels, Stucki on busy ones.
    #[default]
    Hybrid,
    /// Floyd-Steinberg everywhere photographic.
    Fs,
    /// Stucki everywhere photographic.
    Stucki,
    /// Ordered dithering everywhere photographic.
    Ordered,
}

impl PhotoMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoMode::Hybrid => "hybrid",
            PhotoMode::Fs => "fs",
            PhotoMode::Stucki => "stucki",
            PhotoMode::Ordered => "ordered",
        }
    }

    /// Strategy for a photographic pixel in auto mode.
    pub fn photo_strategy(self, region: Region) -> Strategy {
        match self {
            PhotoMode::Fs => Strategy::ErrorDiffusion(&FLOYD_STEINBERG),
            PhotoMode::Stucki => Strategy::ErrorDiffusion(&STUCKI),
            PhotoMode::Ordered => Strategy::Ordered(&BAYER_8),
            PhotoMode::Hybrid => match region {
                Region::PhotoSmooth => Strategy::Ordered(&BAYER_8),
                _ => Strategy::ErrorDiffusion(&STUCKI),
            },
        }
    }

    /// Strategy applied to every pixel when dithering is forced on.
    pub fn uniform_strategy(self) -> Strategy {
        match self {
            PhotoMode::Fs | PhotoMode::Hybrid => Strategy::ErrorDiffusion(&FLOYD_STEINBERG),
            PhotoMode::Stucki => Strategy::ErrorDiffusion(&STUCKI),
            PhotoMode::Ordered => Strategy::Ordered(&BAYER_8),
        }
    }
}

impl fmt::Display for PhotoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(PhotoMode::Hybrid),
            "fs" | "floyd-steinberg" => Ok(PhotoMode::Fs),
            "stucki" => Ok(PhotoMode::Stucki),
            "ordered" | "bayer" => Ok(PhotoMode::Ordered),
            _ => Err(ParseModeError {
                kind: "photo mode",
                value: s.to_string(),
                expected: "hybrid, fs, stucki or ordered",
            }),
        }
    }
}

/// Error returned when a mode string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} '{}' (expected {})",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseModeError {}

/// Strategy for one pixel given the request mode and its region.
#[inline]
pub fn plan(mode: RenderingMode, photo_mode: PhotoMode, region: Region) -> Strategy {
    match mode {
        RenderingMode::ForcedOff => Strategy::FlatMap,
        RenderingMode::ForcedOn => photo_mode.uniform_strategy(),
        RenderingMode::Auto if region.is_photographic() => photo_mode.photo_strategy(region),
        RenderingMode::Auto => Strategy::FlatMap,
    }
}
