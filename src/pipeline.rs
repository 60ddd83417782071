//! The transformation pipeline: rotate → crop → resize, then thumbnails.
//!
//! ```text
//! source ──rotate──▶ ──crop──▶ ──resize──▶ primary ──┬──▶ output[0]  name
//!                                                    ├─resize─▶ output[1]  name+suffix₁
//!                                                    └─resize─▶ output[n]  name+suffixₙ
//! ```
//!
//! ## Handles
//!
//! Images travel as [`ImageHandle`]s (`Arc<DynamicImage>`). A step whose
//! parameters mean "do nothing" hands back the very handle it received
//! (`Arc::ptr_eq` holds); a step that runs returns a fresh handle from the
//! backend. Nothing is mutated in place, so every thumbnail reads the same
//! finalized primary without copying it.
//!
//! ## Failure
//!
//! The pipeline adds no error cases of its own. The first backend failure
//! aborts the run and is returned unchanged; no partial output set is
//! produced.
//!
//! ## Progress
//!
//! Callers may pass a channel sender to observe each step. Events are purely
//! informational; a dropped receiver does not affect the run.

use crate::imaging::{BackendError, CropRect, Dimensions, Fill, ImageBackend};
use crate::naming::derive_name;
use crate::options::{Crop, Options, Resize};
use image::DynamicImage;
use std::sync::Arc;
use std::sync::mpsc::Sender;

/// Shared, immutable decoded image.
pub type ImageHandle = Arc<DynamicImage>;

/// One named output of a pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub name: String,
    pub image: ImageHandle,
}

/// A pipeline step together with the parameters it was asked to run with.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Rotate { degrees: f64, fill: Fill },
    Crop(CropRect),
    Resize { width: u32, height: u32 },
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::Rotate { .. } => "rotate",
            Step::Crop(_) => "crop",
            Step::Resize { .. } => "resize",
        }
    }
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A step produced a new image.
    StepApplied {
        output: String,
        step: Step,
        from: Dimensions,
        to: Dimensions,
    },
    /// A step's parameters made it a no-op.
    StepSkipped { output: String, step: Step },
    /// An output is final. `index` 0 is the primary image.
    OutputReady {
        index: usize,
        name: String,
        size: Dimensions,
    },
}

/// Rotate counter-clockwise by `degrees`. Skipped when `degrees == 0`.
pub fn apply_rotate(
    backend: &impl ImageBackend,
    image: ImageHandle,
    degrees: f64,
    fill: Fill,
) -> Result<ImageHandle, BackendError> {
    if degrees == 0.0 {
        return Ok(image);
    }
    Ok(Arc::new(backend.rotate(&image, degrees, fill)?))
}

/// Crop to `crop`, unless [`Crop::should_crop`] says it changes nothing.
///
/// Bounds are not checked here; the backend rejects rectangles that leave the
/// image.
pub fn apply_crop(
    backend: &impl ImageBackend,
    image: ImageHandle,
    crop: &Crop,
) -> Result<ImageHandle, BackendError> {
    if !crop.should_crop(image.width(), image.height()) {
        return Ok(image);
    }
    Ok(Arc::new(backend.crop(&image, crop.rect())?))
}

/// Resize to `width × height` with the square-fill rule for a zero side.
///
/// Skipped when both sides are zero or the resolved target is already the
/// current size.
pub fn apply_resize(
    backend: &impl ImageBackend,
    image: ImageHandle,
    width: u32,
    height: u32,
) -> Result<ImageHandle, BackendError> {
    match (Resize { width, height }).target_for(image.width(), image.height()) {
        Some((w, h)) => Ok(Arc::new(backend.resize(&image, w, h)?)),
        None => Ok(image),
    }
}

/// Run the full pipeline on `source` and fan out the thumbnails.
///
/// Returns `1 + options.thumbnails.len()` outputs: the primary image named
/// `name`, then one per thumbnail spec in order, each resized from the
/// finalized primary and named with [`derive_name`].
pub fn process_image(
    backend: &impl ImageBackend,
    name: &str,
    source: ImageHandle,
    options: &Options,
    events: Option<Sender<PipelineEvent>>,
) -> Result<Vec<ProcessedImage>, BackendError> {
    let observer = Observer { events };

    let rotate = Step::Rotate {
        degrees: options.rotate,
        fill: options.fill(),
    };
    let img = observer.step(name, rotate, source, |img| {
        apply_rotate(backend, img, options.rotate, options.fill())
    })?;

    let crop = Step::Crop(options.crop.rect());
    let img = observer.step(name, crop, img, |img| {
        apply_crop(backend, img, &options.crop)
    })?;

    let resize = Step::Resize {
        width: options.resize.width,
        height: options.resize.height,
    };
    let primary = observer.step(name, resize, img, |img| {
        apply_resize(backend, img, options.resize.width, options.resize.height)
    })?;

    let mut outputs = Vec::with_capacity(1 + options.thumbnails.len());
    observer.ready(0, name, &primary);
    outputs.push(ProcessedImage {
        name: name.to_string(),
        image: Arc::clone(&primary),
    });

    for (i, thumb) in options.thumbnails.iter().enumerate() {
        let thumb_name = derive_name(name, &thumb.suffix);
        let step = Step::Resize {
            width: thumb.width,
            height: thumb.height,
        };
        let image = observer.step(&thumb_name, step, Arc::clone(&primary), |img| {
            apply_resize(backend, img, thumb.width, thumb.height)
        })?;
        observer.ready(i + 1, &thumb_name, &image);
        outputs.push(ProcessedImage {
            name: thumb_name,
            image,
        });
    }

    Ok(outputs)
}

/// Forwards step results to the optional event channel.
struct Observer {
    events: Option<Sender<PipelineEvent>>,
}

impl Observer {
    fn step(
        &self,
        output: &str,
        step: Step,
        input: ImageHandle,
        run: impl FnOnce(ImageHandle) -> Result<ImageHandle, BackendError>,
    ) -> Result<ImageHandle, BackendError> {
        let from = Dimensions::of(&input);
        let result = run(Arc::clone(&input))?;
        let output = output.to_string();
        if Arc::ptr_eq(&input, &result) {
            self.emit(PipelineEvent::StepSkipped { output, step });
        } else {
            self.emit(PipelineEvent::StepApplied {
                output,
                step,
                from,
                to: Dimensions::of(&result),
            });
        }
        Ok(result)
    }

    fn ready(&self, index: usize, name: &str, image: &ImageHandle) {
        self.emit(PipelineEvent::OutputReady {
            index,
            name: name.to_string(),
            size: Dimensions::of(image),
        });
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            tx.send(event).ok();
        }
    }
}
