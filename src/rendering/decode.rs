use axum::body::Bytes;
use eink_dither::Srgb;
use image::{ImageError, ImageFormat};

/// An upstream image: the bytes as received plus their decoded pixels.
///
/// Transparent pixels are composited over white, the colour of an
/// unpowered panel.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Bytes,
    /// `Content-Type` sent by the upstream, if any
    pub content_type: Option<String>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Srgb>,
}

impl RawImage {
    /// Sniff the format from the bytes and decode.
    ///
    /// CPU-bound; call from a blocking context.
    pub fn decode(bytes: Bytes, content_type: Option<String>) -> Result<Self, ImageError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| Srgb::from_rgba_over_white(p.0))
            .collect();

        Ok(Self {
            bytes,
            content_type,
            format,
            width,
            height,
            pixels,
        })
    }

    /// The upstream content type, or the MIME type of the detected format.
    pub fn mime_type(&self) -> String {
        match &self.content_type {
            Some(ct) if !ct.is_empty() => ct.clone(),
            _ => self.format.to_mime_type().to_string(),
        }
    }
}
