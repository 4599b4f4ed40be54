//! Shared numeric constants for the canvas crate.

// ── Element sizing ──────────────────────────────────────────────

/// Smallest width or height an element may have, in canvas pixels.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Fallback size used when a user-supplied width/height is not a number.
pub const FALLBACK_SIZE: f64 = 1.0;

/// Default text box width.
pub const TEXT_DEFAULT_WIDTH: f64 = 200.0;

/// Default text box height.
pub const TEXT_DEFAULT_HEIGHT: f64 = 40.0;

/// Default font size in pixels; also the fallback for invalid font sizes.
pub const TEXT_DEFAULT_FONT_SIZE: f64 = 16.0;

/// Widest an uploaded image is placed at creation time.
pub const IMAGE_MAX_WIDTH: f64 = 300.0;

/// Widest an image becomes after "reset to original ratio".
pub const IMAGE_RESET_MAX_SIZE: f64 = 200.0;

/// Edge length of a freshly placed symbol.
pub const SYMBOL_DEFAULT_SIZE: f64 = 60.0;

// ── Element defaults ────────────────────────────────────────────

pub const DEFAULT_TEXT_CONTENT: &str = "Your text here";
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_COLOR: &str = "#000000";

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels around resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge midpoint to the rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Canvas ──────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
