use std::sync::Arc;
use std::time::Instant;

use eink_dither::{DitheredImage, Region, RenderingMode};

use crate::error::RenderError;
use crate::models::{OutputKind, RenderSettings};
use crate::rendering::{encode_indexed, RawImage, RenderedImage};

/// Palette index painted over each region in the mask overlay.
fn overlay_index(region: Region) -> Option<u8> {
    match region {
        Region::Edge => Some(2),
        Region::PhotoTexture => Some(4),
        Region::PhotoSmooth => Some(5),
        Region::Flat => None,
    }
}

/// Turns decoded upstream images into served bytes.
pub struct RenderService {
    settings: RenderSettings,
}

impl RenderService {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Produce the output for `kind`. CPU-bound for rendered kinds.
    pub fn render(
        &self,
        image: &RawImage,
        kind: OutputKind,
        mode: RenderingMode,
    ) -> Result<RenderedImage, RenderError> {
        if kind == OutputKind::Raw {
            return Ok(RenderedImage {
                body: image.bytes.clone(),
                content_type: image.mime_type(),
                width: image.width,
                height: image.height,
            });
        }

        if image.width == 0 || image.height == 0 {
            return Err(RenderError::UnsupportedDimensions {
                width: image.width,
                height: image.height,
            });
        }

        let started = Instant::now();
        let (width, height) = (image.width as usize, image.height as usize);
        let ditherer = self.settings.ditherer(mode);
        let dither_err = |e: eink_dither::DitherError| RenderError::Dither(e.to_string());

        let mask = ditherer
            .segment(&image.pixels, width, height)
            .map_err(dither_err)?;
        let mut output = ditherer
            .dither_with_mask(&image.pixels, &mask)
            .map_err(dither_err)?;

        if kind == OutputKind::Masks {
            let indices = output
                .indices()
                .iter()
                .zip(mask.regions())
                .map(|(&index, &region)| overlay_index(region).unwrap_or(index))
                .collect();
            output = DitheredImage::new(indices, width, height, output.palette().clone());
        }

        let png = encode_indexed(&output)?;
        tracing::debug!(
            kind = kind.as_str(),
            mode = %mode,
            width,
            height,
            photographic = mask.photographic_ratio(),
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered image"
        );
        Ok(RenderedImage::png(png, image.width, image.height))
    }

    /// Run [`render`](Self::render) on the blocking pool.
    pub async fn render_in_blocking_context(
        self: Arc<Self>,
        image: Arc<RawImage>,
        kind: OutputKind,
        mode: RenderingMode,
    ) -> Result<RenderedImage, RenderError> {
        tokio::task::spawn_blocking(move || self.render(&image, kind, mode))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}
