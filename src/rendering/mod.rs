pub mod decode;
pub mod png_output;

pub use decode::RawImage;
pub use png_output::{encode_indexed, RenderedImage};
