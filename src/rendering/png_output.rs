use std::io::Cursor;

use axum::body::Bytes;
use eink_dither::DitheredImage;

use crate::error::RenderError;

/// Encoded bytes ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub body: Bytes,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    pub fn png(body: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            body: Bytes::from(body),
            content_type: "image/png".to_string(),
            width,
            height,
        }
    }
}

/// Encode palette indices as an indexed PNG.
///
/// The PLTE chunk holds exactly the image's palette, so every pixel decodes
/// to one of its colours. The bit depth is the smallest that fits the
/// palette (4 bits for the seven panel colours). The fast first encode is
/// re-compressed with oxipng, keeping palette order and bit depth so PNG
/// indices stay palette indices.
pub fn encode_indexed(image: &DitheredImage) -> Result<Vec<u8>, RenderError> {
    let width = u32::try_from(image.width()).map_err(|_| dims_error(image))?;
    let height = u32::try_from(image.height()).map_err(|_| dims_error(image))?;
    if width == 0 || height == 0 {
        return Err(dims_error(image));
    }

    let palette = image.palette();
    let (depth, bits) = match palette.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte: Vec<u8> = palette.colors().iter().flat_map(|c| c.to_bytes()).collect();
    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), width, bits)
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            palette_reduction: false,
            bit_depth_reduction: false,
            color_type_reduction: false,
            grayscale_reduction: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(smaller) => Ok(smaller),
        Err(e) => {
            tracing::warn!(error = %e, "oxipng failed, serving unoptimised PNG");
            Ok(png_bytes)
        }
    }
}

fn dims_error(image: &DitheredImage) -> RenderError {
    RenderError::UnsupportedDimensions {
        width: image.width().min(u32::MAX as usize) as u32,
        height: image.height().min(u32::MAX as usize) as u32,
    }
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let slot = i % pixels_per_byte;
            byte |= (idx & mask) << ((8 - bits) - slot as u8 * bits);
            if slot == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
