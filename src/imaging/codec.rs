//! Decoding and encoding at the edges of the pipeline.
//!
//! The pipeline itself only sees decoded images. The one-shot command and the
//! HTTP server use these helpers to turn files and upload bytes into
//! [`DynamicImage`]s and to write results back out, with the format chosen
//! from the file extension.

use super::backend::BackendError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// JPEG encoding quality for saved outputs.
const JPEG_QUALITY: u8 = 95;

/// Load and decode an image from disk, guessing the format from its content.
pub fn open_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Decode an image held in memory.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))
}

/// Save an image to `path`, choosing the encoder from the extension.
///
/// Formats without an alpha channel (JPEG) get the image flattened to RGB
/// first, so transparent rotation corners come out black.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            path.display()
        ))
    })?;

    match format {
        ImageFormat::Jpeg => save_jpeg(image, path),
        ImageFormat::Png | ImageFormat::Tiff => image
            .save_with_format(path, format)
            .map_err(|e| encode_error(path, e)),
        // WebP, GIF and BMP encoders only take 8-bit samples
        _ => DynamicImage::ImageRgba8(image.to_rgba8())
            .save_with_format(path, format)
            .map_err(|e| encode_error(path, e)),
    }
}

fn save_jpeg(image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| encode_error(path, e))
}

fn encode_error(path: &Path, e: image::ImageError) -> BackendError {
    match e {
        image::ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::ProcessingFailed(format!(
            "Failed to encode {}: {}",
            path.display(),
            other
        )),
    }
}
