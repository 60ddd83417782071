//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline steps (which decide whether an operation
//! runs at all) and the [`backend`](super::backend) (which does the actual
//! pixel work). This separation allows swapping backends (e.g. for testing
//! with a mock) without changing step logic.
//!
//! ## Types
//!
//! - [`Fill`] — Colour used for the corners a rotation exposes.
//! - [`CropRect`] — Absolute crop rectangle in source pixel coordinates.

use image::Rgba;

/// Colour painted into the areas a non-quarter-turn rotation exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    Black,
    White,
    #[default]
    Transparent,
}

impl Fill {
    /// Resolve a fill token case-insensitively.
    ///
    /// - `"black"` / `"b"` → [`Fill::Black`]
    /// - `"white"` / `"w"` → [`Fill::White`]
    /// - anything else, including the empty string → [`Fill::Transparent`]
    pub fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "black" | "b" => Fill::Black,
            "white" | "w" => Fill::White,
            _ => Fill::Transparent,
        }
    }

    pub fn rgba(self) -> Rgba<u8> {
        match self {
            Fill::Black => Rgba([0, 0, 0, 255]),
            Fill::White => Rgba([255, 255, 255, 255]),
            Fill::Transparent => Rgba([0, 0, 0, 0]),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Fill::Black => "black",
            Fill::White => "white",
            Fill::Transparent => "transparent",
        }
    }
}

/// Crop rectangle: top-left corner plus extent.
///
/// The rectangle spans `(x, y)` to `(x + width, y + height)`, exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Right edge (exclusive), widened so overflow is detectable.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Bottom edge (exclusive), widened so overflow is detectable.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_tokens_resolve_case_insensitively() {
        assert_eq!(Fill::from_token("black"), Fill::Black);
        assert_eq!(Fill::from_token("B"), Fill::Black);
        assert_eq!(Fill::from_token("WHITE"), Fill::White);
        assert_eq!(Fill::from_token("w"), Fill::White);
    }

    #[test]
    fn unknown_fill_is_transparent() {
        assert_eq!(Fill::from_token(""), Fill::Transparent);
        assert_eq!(Fill::from_token("red"), Fill::Transparent);
        assert_eq!(Fill::from_token("blackish"), Fill::Transparent);
    }

    #[test]
    fn fill_colours_are_opaque_except_transparent() {
        assert_eq!(Fill::Black.rgba(), Rgba([0, 0, 0, 255]));
        assert_eq!(Fill::White.rgba(), Rgba([255, 255, 255, 255]));
        assert_eq!(Fill::Transparent.rgba().0[3], 0);
    }

    #[test]
    fn crop_rect_edges_do_not_overflow() {
        let rect = CropRect {
            x: u32::MAX,
            y: 10,
            width: 10,
            height: 5,
        };
        assert_eq!(rect.right(), u64::from(u32::MAX) + 10);
        assert_eq!(rect.bottom(), 15);
    }
}
