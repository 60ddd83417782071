//! Transformation options and the "does this step run" decisions.
//!
//! [`Options`] is what callers send: as a JSON document to `POST /format`, as
//! an `--options` file, or assembled from command-line flags. Every field is
//! optional on the wire and an all-default document makes every step a no-op:
//!
//! ```json
//! {
//!   "crop":   {"x": 0, "y": 0, "width": 0, "height": 0},
//!   "rotate": 0.0,
//!   "fill":   "black",
//!   "resize": {"width": 0, "height": 0},
//!   "thumbnails": [{"suffix": "-small", "width": 150, "height": 150}]
//! }
//! ```
//!
//! Dimensions are unsigned, so negative values are rejected at parse time.

use crate::imaging::calculations::resolve_resize;
use crate::imaging::{CropRect, Fill};
use crate::naming::derive_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub crop: Crop,
    /// Counter-clockwise rotation in degrees. `0` skips the step.
    pub rotate: f64,
    /// Fill token for areas a rotation exposes: `black`/`b`, `white`/`w`,
    /// anything else is transparent.
    pub fill: String,
    pub resize: Resize,
    pub thumbnails: Vec<Thumb>,
}

impl Options {
    /// The resolved fill colour.
    pub fn fill(&self) -> Fill {
        Fill::from_token(&self.fill)
    }

    /// Names of every output for a primary called `name`, in pipeline order.
    pub fn output_names(&self, name: &str) -> Vec<String> {
        std::iter::once(name.to_string())
            .chain(self.thumbnails.iter().map(|t| derive_name(name, &t.suffix)))
            .collect()
    }

    /// The first output name that repeats an earlier one or one of `taken`.
    ///
    /// Two outputs with the same name would be written to the same file.
    pub fn duplicate_output(&self, name: &str, taken: &[&str]) -> Option<String> {
        let mut seen: HashSet<String> = taken.iter().map(|t| t.to_string()).collect();
        self.output_names(name)
            .into_iter()
            .find(|output| !seen.insert(output.clone()))
    }
}

/// Crop region in the coordinates of the rotated image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    /// Whether cropping an image of `width × height` would change anything.
    ///
    /// A nonzero origin always crops. Otherwise the crop runs only when both
    /// sides are given and differ from the current size, so an all-zero crop
    /// and a full-frame crop are both skipped.
    pub fn should_crop(&self, width: u32, height: u32) -> bool {
        self.x != 0
            || self.y != 0
            || (self.width > 0
                && self.height > 0
                && (self.width != width || self.height != height))
    }

    pub fn rect(&self) -> CropRect {
        CropRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Resize target. See [`resolve_resize`] for the zero rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Resize {
    /// The size an image of `width × height` should be resized to, or `None`
    /// when the step is a no-op.
    pub fn target_for(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        resize_target(self.width, self.height, (width, height))
    }
}

/// One extra output: the finalized image resized and saved under
/// `name + suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumb {
    pub suffix: String,
    pub width: u32,
    pub height: u32,
}

impl Thumb {
    pub fn target_for(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        resize_target(self.width, self.height, (width, height))
    }
}

fn resize_target(width: u32, height: u32, current: (u32, u32)) -> Option<(u32, u32)> {
    resolve_resize(width, height).filter(|&target| target != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Wire format
    // =========================================================================

    #[test]
    fn empty_document_is_all_defaults() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.fill(), Fill::Transparent);
        assert!(options.thumbnails.is_empty());
    }

    #[test]
    fn full_document_parses() {
        let options: Options = serde_json::from_str(
            r#"{
                "crop": {"x": 10, "y": 20, "width": 300, "height": 200},
                "rotate": -12.5,
                "fill": "W",
                "resize": {"width": 150},
                "thumbnails": [
                    {"suffix": "-small", "width": 150, "height": 150},
                    {"suffix": "-tiny", "height": 32}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            options.crop,
            Crop {
                x: 10,
                y: 20,
                width: 300,
                height: 200
            }
        );
        assert_eq!(options.rotate, -12.5);
        assert_eq!(options.fill(), Fill::White);
        assert_eq!(
            options.resize,
            Resize {
                width: 150,
                height: 0
            }
        );
        assert_eq!(options.thumbnails.len(), 2);
        assert_eq!(options.thumbnails[1].suffix, "-tiny");
        assert_eq!(options.thumbnails[1].width, 0);
        assert_eq!(options.thumbnails[1].height, 32);
    }

    #[test]
    fn negative_dimensions_are_malformed() {
        let result: Result<Options, _> =
            serde_json::from_str(r#"{"crop": {"x": -1, "y": 0, "width": 10, "height": 10}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_is_malformed() {
        let result: Result<Options, _> = serde_json::from_str(r#"{"rotate": "ninety"}"#);
        assert!(result.is_err());
    }

    // =========================================================================
    // Crop decisions
    // =========================================================================

    #[test]
    fn zero_crop_is_skipped() {
        assert!(!Crop::default().should_crop(800, 600));
    }

    #[test]
    fn full_frame_crop_is_skipped() {
        let crop = Crop {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        };
        assert!(!crop.should_crop(800, 600));
    }

    #[test]
    fn nonzero_origin_always_crops() {
        let crop = Crop {
            x: 1,
            ..Crop::default()
        };
        assert!(crop.should_crop(800, 600));

        let crop = Crop {
            y: 5,
            width: 800,
            height: 600,
            ..Crop::default()
        };
        assert!(crop.should_crop(800, 600));
    }

    #[test]
    fn smaller_region_at_origin_crops() {
        let crop = Crop {
            width: 400,
            height: 600,
            ..Crop::default()
        };
        assert!(crop.should_crop(800, 600));
    }

    #[test]
    fn single_dimension_at_origin_is_skipped() {
        let crop = Crop {
            width: 400,
            ..Crop::default()
        };
        assert!(!crop.should_crop(800, 600));
    }

    // =========================================================================
    // Resize decisions
    // =========================================================================

    #[test]
    fn resize_zero_is_noop() {
        assert_eq!(Resize::default().target_for(800, 600), None);
    }

    #[test]
    fn resize_missing_height_makes_square() {
        let resize = Resize {
            width: 400,
            height: 0,
        };
        assert_eq!(resize.target_for(800, 600), Some((400, 400)));
    }

    #[test]
    fn resize_missing_width_makes_square() {
        let resize = Resize {
            width: 0,
            height: 300,
        };
        assert_eq!(resize.target_for(800, 600), Some((300, 300)));
    }

    #[test]
    fn resize_to_current_size_is_noop() {
        let resize = Resize {
            width: 800,
            height: 600,
        };
        assert_eq!(resize.target_for(800, 600), None);

        let square = Resize {
            width: 0,
            height: 256,
        };
        assert_eq!(square.target_for(256, 256), None);
    }

    #[test]
    fn thumb_follows_resize_rules() {
        let thumb = Thumb {
            suffix: "-t".into(),
            width: 100,
            height: 0,
        };
        assert_eq!(thumb.target_for(400, 400), Some((100, 100)));
        assert_eq!(thumb.target_for(100, 100), None);
    }

    // =========================================================================
    // Output names
    // =========================================================================

    fn with_suffixes(suffixes: &[&str]) -> Options {
        Options {
            thumbnails: suffixes
                .iter()
                .map(|suffix| Thumb {
                    suffix: suffix.to_string(),
                    width: 10,
                    height: 10,
                })
                .collect(),
            ..Options::default()
        }
    }

    #[test]
    fn output_names_follow_pipeline_order() {
        let options = with_suffixes(&["-small", "-tiny"]);
        assert_eq!(
            options.output_names("photo.jpg"),
            vec!["photo.jpg", "photo-small.jpg", "photo-tiny.jpg"]
        );
    }

    #[test]
    fn distinct_outputs_have_no_duplicate() {
        let options = with_suffixes(&["-small", "-tiny"]);
        assert_eq!(options.duplicate_output("photo.jpg", &["photo-original.jpg"]), None);
    }

    #[test]
    fn empty_suffix_duplicates_primary() {
        let options = with_suffixes(&[""]);
        assert_eq!(
            options.duplicate_output("photo.jpg", &[]),
            Some("photo.jpg".to_string())
        );
    }

    #[test]
    fn repeated_suffix_is_duplicate() {
        let options = with_suffixes(&["-small", "-small"]);
        assert_eq!(
            options.duplicate_output("photo.jpg", &[]),
            Some("photo-small.jpg".to_string())
        );
    }

    #[test]
    fn suffix_colliding_with_taken_name_is_duplicate() {
        let options = with_suffixes(&["-original"]);
        assert_eq!(
            options.duplicate_output("photo.jpg", &["photo-original.jpg"]),
            Some("photo-original.jpg".to_string())
        );
    }
}
