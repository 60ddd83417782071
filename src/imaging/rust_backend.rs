//! Pure Rust image-math backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Quarter-turn rotation | `image::DynamicImage::rotate90` / `rotate180` / `rotate270` |
//! | Arbitrary rotation | `imageproc::geometric_transformations::warp_into` (bilinear) |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{QuarterTurn, quarter_turn, rotated_size};
use super::params::{CropRect, Fill};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate by an angle that is not a multiple of 90°.
///
/// The source is centred on a canvas sized to the rotated bounding box and
/// sampled back with bilinear interpolation. Pixels that map outside the
/// source take the fill colour.
fn rotate_with_fill(
    image: &DynamicImage,
    degrees: f64,
    fill: Fill,
) -> Result<DynamicImage, BackendError> {
    let (src_w, src_h) = (image.width(), image.height());
    let (dst_w, dst_h) = rotated_size((src_w, src_h), degrees);
    if dst_w == 0 || dst_h == 0 {
        return Err(BackendError::InvalidGeometry(format!(
            "cannot rotate a {src_w}x{src_h} image"
        )));
    }

    let source = image.to_rgba8();
    // y grows downwards, so counter-clockwise is a negative angle
    let theta = -degrees.to_radians() as f32;
    let projection = Projection::translate(dst_w as f32 / 2.0, dst_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(src_w as f32) / 2.0, -(src_h as f32) / 2.0);

    let mut canvas = RgbaImage::from_pixel(dst_w, dst_h, fill.rgba());
    warp_into(
        &source,
        &projection,
        Interpolation::Bilinear,
        fill.rgba(),
        &mut canvas,
    );
    Ok(DynamicImage::ImageRgba8(canvas))
}

impl ImageBackend for RustBackend {
    fn rotate(
        &self,
        image: &DynamicImage,
        degrees: f64,
        fill: Fill,
    ) -> Result<DynamicImage, BackendError> {
        match quarter_turn(degrees) {
            Some(QuarterTurn::None) => Ok(image.clone()),
            // image's quarter turns are clockwise
            Some(QuarterTurn::Left) => Ok(image.rotate270()),
            Some(QuarterTurn::Half) => Ok(image.rotate180()),
            Some(QuarterTurn::Right) => Ok(image.rotate90()),
            None => rotate_with_fill(image, degrees, fill),
        }
    }

    fn crop(&self, image: &DynamicImage, rect: CropRect) -> Result<DynamicImage, BackendError> {
        if rect.width == 0 || rect.height == 0 {
            return Err(BackendError::InvalidGeometry(format!(
                "crop rectangle at ({}, {}) is empty ({}x{})",
                rect.x, rect.y, rect.width, rect.height
            )));
        }
        if rect.right() > u64::from(image.width()) || rect.bottom() > u64::from(image.height()) {
            return Err(BackendError::InvalidGeometry(format!(
                "crop rectangle ({}, {})-({}, {}) exceeds {}x{} image",
                rect.x,
                rect.y,
                rect.right(),
                rect.bottom(),
                image.width(),
                image.height()
            )));
        }
        Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidGeometry(format!(
                "resize target {width}x{height} is degenerate"
            )));
        }
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }
}
