//! Domain-critical regression tests for eink-dither.
//!
//! Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::EinkDitherer;
    use crate::color::Srgb;
    use crate::dither::{PhotoMode, RenderingMode};
    use crate::palette::Palette;
    use crate::segment::{Region, SegmentOptions};

    const W: usize = 64;
    const H: usize = 48;

    /// A dashboard-like frame: white background, a red header bar, black
    /// text strokes, and a photo tile in the lower right.
    fn dashboard() -> Vec<Srgb> {
        let mut state = 0x9e37_79b9u32;
        let mut pixels = Vec::with_capacity(W * H);
        for y in 0..H {
            for x in 0..W {
                let px = if y < 8 {
                    Srgb::from_u8(255, 0, 0)
                } else if (12..14).contains(&y) && x % 6 < 4 && x < 28 {
                    Srgb::BLACK
                } else if x >= 32 && y >= 20 {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    let v = (state % 70) as u8;
                    Srgb::from_u8(70 + v, 110 + v / 2, 150 + v)
                } else {
                    Srgb::WHITE
                };
                pixels.push(px);
            }
        }
        pixels
    }

    fn in_photo_tile(x: usize, y: usize) -> bool {
        x >= 36 && y >= 24 && x < W - 4 && y < H - 4
    }

    // ========================================================================
    // Palette closure
    // ========================================================================

    /// If this breaks, it means: some strategy produced an index outside the
    /// seven-colour palette and the PNG encoder would emit garbage.
    #[test]
    fn test_every_mode_stays_inside_palette() {
        let pixels = dashboard();
        for mode in [
            RenderingMode::Auto,
            RenderingMode::ForcedOn,
            RenderingMode::ForcedOff,
        ] {
            for photo_mode in [
                PhotoMode::Hybrid,
                PhotoMode::Fs,
                PhotoMode::Stucki,
                PhotoMode::Ordered,
            ] {
                let result = EinkDitherer::new(mode)
                    .photo_mode(photo_mode)
                    .contrast(1.25)
                    .saturation(1.2)
                    .gamma(0.95)
                    .dither(&pixels, W, H)
                    .unwrap();
                assert!(
                    result.indices().iter().all(|&i| (i as usize) < Palette::eink().len()),
                    "REGRESSION: {mode}/{photo_mode} produced an out-of-palette index"
                );
            }
        }
    }

    // ========================================================================
    // Regional contract
    // ========================================================================

    /// If this breaks, it means: UI pixels in auto mode were dithered instead
    /// of mapped directly, so text and solid bars get speckled.
    #[test]
    fn test_auto_keeps_ui_exact() {
        let pixels = dashboard();
        let result = EinkDitherer::new(RenderingMode::Auto)
            .dither(&pixels, W, H)
            .unwrap();
        for y in 0..8 {
            for x in 0..W {
                assert_eq!(result.indices()[y * W + x], 2, "header pixel ({x}, {y})");
            }
        }
        for x in 0..20 {
            assert_eq!(result.indices()[16 * W + x], 1, "background pixel ({x}, 16)");
        }
    }

    /// If this breaks, it means: the photo tile was treated as UI and
    /// posterised to a single flat colour.
    #[test]
    fn test_auto_dithers_photo_tile() {
        let pixels = dashboard();
        let ditherer = EinkDitherer::new(RenderingMode::Auto);
        let mask = ditherer.segment(&pixels, W, H).unwrap();
        let photo_inside = (0..W * H)
            .filter(|&i| in_photo_tile(i % W, i / W))
            .filter(|&i| mask.regions()[i].is_photographic())
            .count();
        let tile_size = (W - 4 - 36) * (H - 4 - 24);
        assert!(
            photo_inside * 10 >= tile_size * 8,
            "REGRESSION: only {photo_inside}/{tile_size} tile pixels classified photographic"
        );

        let result = ditherer.dither_with_mask(&pixels, &mask).unwrap();
        let mut used = [false; 7];
        for i in (0..W * H).filter(|&i| in_photo_tile(i % W, i / W)) {
            used[result.indices()[i] as usize] = true;
        }
        assert!(
            used.iter().filter(|&&u| u).count() >= 2,
            "REGRESSION: photo tile rendered with a single colour"
        );
    }

    /// If this breaks, it means: forced_off still dithers somewhere.
    #[test]
    fn test_forced_off_is_posterised() {
        let pixels = vec![Srgb::from_u8(150, 90, 200); W * H];
        let result = EinkDitherer::new(RenderingMode::ForcedOff)
            .dither(&pixels, W, H)
            .unwrap();
        let first = result.indices()[0];
        assert!(result.indices().iter().all(|&i| i == first));
    }

    /// If this breaks, it means: forced_on no longer dithers flat fills, so
    /// an off-palette UI colour is posterised even when the client asked for
    /// full dithering.
    #[test]
    fn test_forced_on_dithers_flat_fill() {
        let pixels = vec![Srgb::from_u8(128, 128, 128); W * H];
        for photo_mode in [PhotoMode::Hybrid, PhotoMode::Stucki, PhotoMode::Ordered] {
            let result = EinkDitherer::new(RenderingMode::ForcedOn)
                .photo_mode(photo_mode)
                .dither(&pixels, W, H)
                .unwrap();
            let histogram = result.histogram();
            assert!(histogram[0] > 0 && histogram[1] > 0, "{photo_mode}: {histogram:?}");
            assert_eq!(histogram[0] + histogram[1], W * H, "grey must stay black/white");
        }
    }

    // ========================================================================
    // Determinism and configuration
    // ========================================================================

    /// If this breaks, it means: output depends on something other than the
    /// input and configuration, which would defeat caching and make the
    /// panel flicker between identical refreshes.
    #[test]
    fn test_output_is_deterministic() {
        let pixels = dashboard();
        let ditherer = EinkDitherer::new(RenderingMode::Auto).contrast(1.25);
        let a = ditherer.dither(&pixels, W, H).unwrap();
        let b = ditherer.dither(&pixels, W, H).unwrap();
        assert_eq!(a.indices(), b.indices());
    }

    /// If this breaks, it means: raising the photographic threshold stopped
    /// shrinking the photographic region, so the tunable no longer works.
    #[test]
    fn test_threshold_monotonic() {
        let pixels = dashboard();
        let mut last = f32::MAX;
        for threshold in [4.0, 14.0, 40.0, 120.0] {
            let mask = EinkDitherer::new(RenderingMode::Auto)
                .segmentation(SegmentOptions::default().sky_gradient_threshold(threshold))
                .segment(&pixels, W, H)
                .unwrap();
            let ratio = mask.photographic_ratio();
            assert!(ratio <= last + 1e-6, "ratio {ratio} at {threshold} grew from {last}");
            last = ratio;
        }
    }

    /// If this breaks, it means: text strokes are no longer recognised as
    /// edges and could end up inside a dithered region.
    #[test]
    fn test_text_strokes_are_edges_or_flat() {
        let pixels = dashboard();
        let mask = EinkDitherer::new(RenderingMode::Auto)
            .segment(&pixels, W, H)
            .unwrap();
        for x in 0..28 {
            let region = mask.region(x, 12);
            assert!(
                matches!(region, Region::Edge | Region::Flat),
                "stroke pixel ({x}, 12) classified {}",
                region.as_str()
            );
        }
    }
}
