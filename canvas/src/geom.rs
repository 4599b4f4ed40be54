//! Geometry helpers: points, axis-aligned rectangles, clamping and the
//! coercions that keep user-supplied numbers out of the document.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FALLBACK_SIZE, MIN_ELEMENT_SIZE};

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace non-finite coordinates with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self { x: coerce_position(self.x), y: coerce_position(self.y) }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` lies inside the rectangle. Edges count as inside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics when `max < min`: the lower bound
/// wins, so an element larger than its container pins to the container origin.
#[must_use]
pub fn clamp_lenient(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Clamp a `width`×`height` box positioned at `(x, y)` so it stays inside `bounds`.
#[must_use]
pub fn clamp_into(x: f64, y: f64, width: f64, height: f64, bounds: Rect) -> Point {
    Point::new(
        clamp_lenient(x, bounds.x, bounds.x + bounds.width - width),
        clamp_lenient(y, bounds.y, bounds.y + bounds.height - height),
    )
}

/// Non-finite positions become `0`.
#[must_use]
pub fn coerce_position(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Non-finite sizes become [`FALLBACK_SIZE`]; everything is floored at [`MIN_ELEMENT_SIZE`].
#[must_use]
pub fn coerce_size(value: f64) -> f64 {
    let value = if value.is_finite() { value } else { FALLBACK_SIZE };
    value.max(MIN_ELEMENT_SIZE)
}

/// Normalize an angle in degrees into `[-180, 180]`.
///
/// Values already in range are returned untouched, so both `180` and `-180`
/// survive. Non-finite input becomes `0`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    if (-180.0..=180.0).contains(&degrees) {
        return degrees;
    }
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Angle of `pt` around `center`, in degrees.
#[must_use]
pub fn angle_deg(center: Point, pt: Point) -> f64 {
    (pt.y - center.y).atan2(pt.x - center.x).to_degrees()
}
