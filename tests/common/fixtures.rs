//! Synthetic upstream screenshots.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// The seven panel colours, in palette order
pub const PANEL_COLORS: [[u8; 3]; 7] = [
    [0, 0, 0],
    [255, 255, 255],
    [255, 0, 0],
    [255, 255, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 165, 0],
];

fn encode(image: impl Into<image::DynamicImage>, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image
        .into()
        .write_to(&mut out, format)
        .expect("Failed to encode fixture");
    out.into_inner()
}

/// Flat dashboard: white background, a black header bar and a red badge
pub fn dashboard_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if y < height / 5 {
            Rgb([0, 0, 0])
        } else if x > width / 2 && y > height / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    encode(img, ImageFormat::Png)
}

/// Smooth diagonal gradient with off-palette colours
pub fn photo_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 180u8.wrapping_sub(r / 3)])
    });
    encode(img, ImageFormat::Png)
}

/// Fully transparent image
pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 0]));
    encode(img, ImageFormat::Png)
}

/// Striped JPEG photo
pub fn photo_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90])
    });
    encode(img, ImageFormat::Jpeg)
}

/// Query pairs an upstream request arrived with, in order
pub fn query_pairs(request: &wiremock::Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
