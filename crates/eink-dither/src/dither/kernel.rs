//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighbouring pixels that have not been processed yet.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` and a weight. The total error
/// propagated is `sum(weights) / divisor`; both kernels here propagate all
/// of it. `max_dy` is how many rows ahead the kernel reaches, which sizes
/// the error buffer (`max_dy + 1` rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// (dx, dy, weight) entries; `dx` is flipped on reversed rows.
    pub entries: &'static [(i32, i32, u8)],
    /// Each neighbour receives `error * weight / divisor`.
    pub divisor: u8,
    pub max_dy: usize,
    /// Name used in logs.
    pub name: &'static str,
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
    name: "floyd-steinberg",
};

/// Stucki dithering kernel.
///
/// Wider than Floyd-Steinberg, so individual dots are less likely to line
/// up into worms on sparse seven-colour palettes.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
    max_dy: 2,
    name: "stucki",
};
