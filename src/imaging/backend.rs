//! Image-math backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three geometric operations the
//! pipeline needs: rotate (with a fill colour), crop, and resize. The trait
//! works on decoded in-memory images and never touches the filesystem;
//! decoding and encoding live in [`codec`](super::codec).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, built on the
//! `image` and `imageproc` crates.

use super::params::{CropRect, Fill};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Trait for image-math backends.
///
/// Every operation takes the input by reference and returns a brand-new
/// image; inputs are never modified, so callers can keep sharing a handle
/// while a backend reads it.
pub trait ImageBackend: Sync {
    /// Rotate counter-clockwise by `degrees`, growing the canvas to fit the
    /// rotated content and painting exposed areas with `fill`.
    fn rotate(
        &self,
        image: &DynamicImage,
        degrees: f64,
        fill: Fill,
    ) -> Result<DynamicImage, BackendError>;

    /// Cut out `rect`. Rectangles reaching outside the image are rejected.
    fn crop(&self, image: &DynamicImage, rect: CropRect) -> Result<DynamicImage, BackendError>;

    /// Resample to exactly `width × height` (aspect ratio is not preserved).
    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError>;
}
