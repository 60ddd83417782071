//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Normalize an angle in degrees into `[0, 360)`.
///
/// ```
/// # use pixform::imaging::calculations::normalize_degrees;
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(450.0), 90.0);
/// ```
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees - (degrees / 360.0).floor() * 360.0
}

/// A rotation that maps pixels onto pixels exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterTurn {
    None,
    /// 90° counter-clockwise.
    Left,
    Half,
    /// 270° counter-clockwise, i.e. 90° clockwise.
    Right,
}

/// Classify a counter-clockwise rotation as a quarter turn, if it is one.
pub fn quarter_turn(degrees: f64) -> Option<QuarterTurn> {
    let normalized = normalize_degrees(degrees);
    if normalized == 0.0 {
        Some(QuarterTurn::None)
    } else if normalized == 90.0 {
        Some(QuarterTurn::Left)
    } else if normalized == 180.0 {
        Some(QuarterTurn::Half)
    } else if normalized == 270.0 {
        Some(QuarterTurn::Right)
    } else {
        None
    }
}

/// Canvas size needed to hold a `width × height` image rotated by `degrees`.
///
/// Rotates the pixel-centre corners and takes their bounding box, so the
/// rotated content is never cut off. A fractional remainder above 0.1 px
/// rounds the edge up.
///
/// # Examples
/// ```
/// # use pixform::imaging::calculations::rotated_size;
/// // 45° of a 100×100 square needs a ~141 px canvas
/// assert_eq!(rotated_size((100, 100), 45.0), (141, 141));
/// ```
pub fn rotated_size(source: (u32, u32), degrees: f64) -> (u32, u32) {
    let (w, h) = source;
    if w == 0 || h == 0 {
        return (0, 0);
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let rotate = |x: f64, y: f64| (x * cos - y * sin, x * sin + y * cos);

    let corners = [
        (0.0, 0.0),
        rotate(f64::from(w - 1), 0.0),
        rotate(f64::from(w - 1), f64::from(h - 1)),
        rotate(0.0, f64::from(h - 1)),
    ];

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for (x, y) in corners {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    (extent(max_x - min_x + 1.0), extent(max_y - min_y + 1.0))
}

fn extent(span: f64) -> u32 {
    let span = if span - span.floor() > 0.1 { span + 1.0 } else { span };
    span as u32
}

/// Resolve a resize target.
///
/// - both zero → `None` (no resize)
/// - exactly one zero → the missing side copies the other (a square, not an
///   aspect-preserving fit)
/// - otherwise the target as given
///
/// ```
/// # use pixform::imaging::calculations::resolve_resize;
/// assert_eq!(resolve_resize(0, 0), None);
/// assert_eq!(resolve_resize(400, 0), Some((400, 400)));
/// assert_eq!(resolve_resize(0, 90), Some((90, 90)));
/// assert_eq!(resolve_resize(320, 200), Some((320, 200)));
/// ```
pub fn resolve_resize(width: u32, height: u32) -> Option<(u32, u32)> {
    match (width, height) {
        (0, 0) => None,
        (0, h) => Some((h, h)),
        (w, 0) => Some((w, w)),
        (w, h) => Some((w, h)),
    }
}
