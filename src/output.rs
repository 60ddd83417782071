//! CLI output formatting for `pixform format`.
//!
//! # Information-First Display
//!
//! Each output is identified by its positional index and file name, with the
//! pipeline steps that produced it shown as indented context lines above it.
//! Skipped steps are listed too so it is obvious why an image came out
//! unchanged.
//!
//! # Output Format
//!
//! ```text
//! Source: in.jpg (800x600)
//!     rotate: skipped
//!     crop: skipped
//!     resize 400x0: 800x600 → 400x400
//! 001 photo.jpg (400x400)
//!     resize 150x150: 400x400 → 150x150
//! 002 photo-small.jpg (150x150)
//! Saved 2 images
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::imaging::{Dimensions, Fill};
use crate::pipeline::{PipelineEvent, Step};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_dims(dims: Dimensions) -> String {
    format!("{}x{}", dims.width, dims.height)
}

/// Step label plus the parameters it was asked to run with.
///
/// ```text
/// rotate 30° (white)
/// crop 100x80+10+20
/// resize 400x0
/// ```
fn step_heading(step: &Step) -> String {
    match step {
        Step::Rotate { degrees, fill } => match fill {
            Fill::Transparent => format!("rotate {degrees}°"),
            other => format!("rotate {degrees}° ({})", other.label()),
        },
        Step::Crop(rect) => format!(
            "crop {}x{}+{}+{}",
            rect.width, rect.height, rect.x, rect.y
        ),
        Step::Resize { width, height } => format!("resize {width}x{height}"),
    }
}

// ============================================================================
// Pipeline events
// ============================================================================

/// Format a single pipeline progress event as display lines.
///
/// Skipped steps show only the step label since their parameters are the
/// reason nothing happened.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::StepSkipped { step, .. } => {
            vec![format!("{}{}: skipped", indent(1), step.label())]
        }
        PipelineEvent::StepApplied { step, from, to, .. } => vec![format!(
            "{}{}: {} \u{2192} {}",
            indent(1),
            step_heading(step),
            format_dims(*from),
            format_dims(*to)
        )],
        PipelineEvent::OutputReady { index, name, size } => vec![format!(
            "{} {} ({})",
            format_index(index + 1),
            name,
            format_dims(*size)
        )],
    }
}

/// Header line naming the source image.
pub fn format_source_line(source: &Path, dims: Dimensions) -> String {
    format!("Source: {} ({})", source.display(), format_dims(dims))
}

/// Closing summary after every output was written.
pub fn format_saved_summary(count: usize) -> String {
    match count {
        1 => "Saved 1 image".to_string(),
        n => format!("Saved {n} images"),
    }
}

pub fn print_source_line(source: &Path, dims: Dimensions) {
    println!("{}", format_source_line(source, dims));
}

pub fn print_saved_summary(count: usize) {
    println!("{}", format_saved_summary(count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::CropRect;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(999), "999");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn step_heading_rotate_shows_fill_when_opaque() {
        let step = Step::Rotate {
            degrees: 30.0,
            fill: Fill::White,
        };
        assert_eq!(step_heading(&step), "rotate 30° (white)");

        let step = Step::Rotate {
            degrees: -12.5,
            fill: Fill::Transparent,
        };
        assert_eq!(step_heading(&step), "rotate -12.5°");
    }

    #[test]
    fn step_heading_crop_uses_geometry_notation() {
        let step = Step::Crop(CropRect {
            x: 10,
            y: 20,
            width: 100,
            height: 80,
        });
        assert_eq!(step_heading(&step), "crop 100x80+10+20");
    }

    #[test]
    fn format_skipped_step() {
        let event = PipelineEvent::StepSkipped {
            output: "a.jpg".into(),
            step: Step::Resize {
                width: 0,
                height: 0,
            },
        };
        assert_eq!(format_pipeline_event(&event), vec!["    resize: skipped"]);
    }

    #[test]
    fn format_applied_step() {
        let event = PipelineEvent::StepApplied {
            output: "a.jpg".into(),
            step: Step::Resize {
                width: 400,
                height: 0,
            },
            from: dims(800, 600),
            to: dims(400, 400),
        };
        assert_eq!(
            format_pipeline_event(&event),
            vec!["    resize 400x0: 800x600 \u{2192} 400x400"]
        );
    }

    #[test]
    fn format_output_ready_is_one_based() {
        let event = PipelineEvent::OutputReady {
            index: 0,
            name: "photo.jpg".into(),
            size: dims(400, 400),
        };
        assert_eq!(format_pipeline_event(&event), vec!["001 photo.jpg (400x400)"]);
    }

    #[test]
    fn format_source() {
        assert_eq!(
            format_source_line(Path::new("in/photo.jpg"), dims(800, 600)),
            "Source: in/photo.jpg (800x600)"
        );
    }

    #[test]
    fn saved_summary_pluralizes() {
        assert_eq!(format_saved_summary(1), "Saved 1 image");
        assert_eq!(format_saved_summary(3), "Saved 3 images");
    }
}
