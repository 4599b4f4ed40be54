//! Hit-testing: which element, or which handle of the selected element, sits
//! under a canvas point.
//!
//! Element bodies are tested against their unrotated bounding box; rotation
//! does not affect what is hit.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::doc::{DesignElement, ElementId};
use crate::geom::Point;

/// Corner handle of a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Position of this corner on `el`'s bounding box.
    #[must_use]
    pub fn position(self, el: &DesignElement) -> Point {
        let left = el.x;
        let right = el.x + el.width;
        let top = el.y;
        let bottom = el.y + el.height;
        match self {
            Self::Nw => Point::new(left, top),
            Self::Ne => Point::new(right, top),
            Self::Sw => Point::new(left, bottom),
            Self::Se => Point::new(right, bottom),
        }
    }

    /// CSS cursor shown while dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Handle metrics, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Hit slop around each handle center.
    pub radius: f64,
    /// Distance of the rotate handle above the top edge midpoint.
    pub rotate_offset: f64,
}

/// Topmost element whose bounding box contains `(x, y)`.
///
/// The highest `z_index` wins; on a tie the earliest element in the sequence
/// wins.
#[must_use]
pub fn hit_test(elements: &[DesignElement], x: f64, y: f64) -> Option<&DesignElement> {
    let pt = Point::new(x, y);
    elements
        .iter()
        .filter(|el| el.bounds().contains(pt))
        .fold(None, |top: Option<&DesignElement>, el| match top {
            Some(t) if el.z_index <= t.z_index => Some(t),
            _ => Some(el),
        })
}

/// Center of the rotate handle for `el`.
#[must_use]
pub fn rotate_handle_position(el: &DesignElement, metrics: HandleMetrics) -> Point {
    Point::new(el.x + el.width / 2.0, el.y - metrics.rotate_offset)
}

/// Handle of `el` under `pt`, if any. The rotate handle is checked first.
#[must_use]
pub fn handle_at(el: &DesignElement, pt: Point, metrics: HandleMetrics) -> Option<HitPart> {
    if rotate_handle_position(el, metrics).distance(pt) <= metrics.radius {
        return Some(HitPart::RotateHandle);
    }
    ResizeAnchor::ALL
        .into_iter()
        .find(|anchor| anchor.position(el).distance(pt) <= metrics.radius)
        .map(HitPart::ResizeHandle)
}

/// Full pointer-down hit test: handles of the selected element first, then
/// element bodies.
#[must_use]
pub fn hit_at(elements: &[DesignElement], selected: Option<&DesignElement>, pt: Point, metrics: HandleMetrics) -> Option<Hit> {
    if let Some(sel) = selected {
        if let Some(part) = handle_at(sel, pt, metrics) {
            return Some(Hit { element_id: sel.id.clone(), part });
        }
    }
    hit_test(elements, pt.x, pt.y).map(|el| Hit { element_id: el.id.clone(), part: HitPart::Body })
}
