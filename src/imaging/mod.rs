//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` (JPEG, PNG, TIFF, WebP, GIF, BMP) |
//! | **Rotate** | `image` quarter turns, `imageproc` warp for other angles |
//! | **Crop** | `image::DynamicImage::crop_imm` |
//! | **Resize** | Lanczos3 via `image::DynamicImage::resize_exact` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Codec**: file and byte decoding, extension-driven encoding

pub mod backend;
pub mod calculations;
pub mod codec;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use codec::{decode_image, open_image, save_image};
pub use params::{CropRect, Fill};
pub use rust_backend::RustBackend;
