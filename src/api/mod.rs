pub mod image;
pub mod status;

pub use image::{handle_debug_masks, handle_eink_image, handle_raw, RENDER_CACHE_HEADER};
pub use image::{__path_handle_debug_masks, __path_handle_eink_image, __path_handle_raw};
pub use status::{handle_health, handle_index, HealthResponse};
pub use status::{__path_handle_health, __path_handle_index};
