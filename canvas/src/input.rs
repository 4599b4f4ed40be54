//! Input model: tools, mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each variant carries exactly the context its pointer-move math
//! needs, so a drag and a rotate can never be in progress at the same time.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::doc::ElementId;
use crate::error::StudioError;
use crate::geom::Point;
use crate::hit::ResizeAnchor;

/// Which studio tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Clicking empty canvas places a text box.
    Text,
    /// Image upload panel is open; canvas clicks only select.
    Upload,
    /// Symbol picker is open; canvas clicks only select.
    Symbols,
}

impl Tool {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Text => "text",
            Self::Upload => "upload",
            Self::Symbols => "symbols",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "text" => Ok(Self::Text),
            "upload" => Ok(Self::Upload),
            "symbols" => Ok(Self::Symbols),
            other => Err(StudioError::UnknownTool(other.to_string())),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    /// Keys that remove the selected element.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Persistent UI state that outlives a single gesture.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an element across the canvas.
    Dragging {
        id: ElementId,
        /// Pointer position at the previous event, used to compute the delta.
        last: Point,
    },
    /// Resizing an element by one of its corner handles.
    Resizing {
        id: ElementId,
        anchor: ResizeAnchor,
        /// Pointer position at gesture start.
        start: Point,
        orig_x: f64,
        orig_y: f64,
        orig_w: f64,
        orig_h: f64,
    },
    /// Rotating an element with the rotate handle.
    Rotating {
        id: ElementId,
        /// Element center; the rotation pivot.
        center: Point,
        /// Pointer angle around `center` at gesture start, in degrees.
        start_angle: f64,
        /// Element rotation at gesture start, in degrees.
        orig_rotation: f64,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Element the active gesture operates on.
    #[must_use]
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(id),
        }
    }
}
