//! One-shot formatting: file in, transformed files out.
//!
//! ```text
//! src ──open──▶ pipeline ──▶ dst, dst-stem+suffix₁.ext, … ──save──▶ disk
//! ```
//!
//! The destination path doubles as the primary output's name, so thumbnails
//! land next to it (`out/photo.jpg` → `out/photo-small.jpg`). Output formats
//! follow each file's extension.
//!
//! Encoding is the slow part of a run, so outputs are saved in parallel with
//! [rayon](https://docs.rs/rayon). The returned paths keep pipeline order.

use crate::imaging::{BackendError, ImageBackend, open_image, save_image};
use crate::options::Options;
use crate::pipeline::{ImageHandle, PipelineEvent, ProcessedImage, process_image};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Output name used more than once: {0}")]
    DuplicateOutput(String),
}

/// Read a JSON options document from disk.
pub fn load_options(path: &Path) -> Result<Options, FormatError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Open `src`, run the pipeline, and write every output.
pub fn format_file(
    backend: &impl ImageBackend,
    src: &Path,
    dst: &Path,
    options: &Options,
    events: Option<Sender<PipelineEvent>>,
) -> Result<Vec<PathBuf>, FormatError> {
    let image = Arc::new(open_image(src)?);
    format_image(backend, image, dst, options, events)
}

/// Run the pipeline on an already decoded image and write every output.
///
/// Creates the destination directory if needed. Fails before touching the
/// image when two outputs would share a file name.
pub fn format_image(
    backend: &impl ImageBackend,
    image: ImageHandle,
    dst: &Path,
    options: &Options,
    events: Option<Sender<PipelineEvent>>,
) -> Result<Vec<PathBuf>, FormatError> {
    let name = dst.to_string_lossy();
    if let Some(output) = options.duplicate_output(&name, &[]) {
        return Err(FormatError::DuplicateOutput(output));
    }
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let outputs = process_image(backend, &name, image, options, events)?;
    Ok(save_outputs(&outputs, Path::new(""))?)
}

/// Save each output to `root/<name>`, returning the written paths in output
/// order. Stops at the first failure.
pub fn save_outputs(
    outputs: &[ProcessedImage],
    root: &Path,
) -> Result<Vec<PathBuf>, BackendError> {
    outputs
        .par_iter()
        .map(|output| -> Result<PathBuf, BackendError> {
            let path = root.join(&output.name);
            save_image(&output.image, &path)?;
            Ok(path)
        })
        .collect()
}
