//! Document model: design elements, their kind-specific payloads, sparse
//! patches, and the immutable [`DesignState`] snapshot.
//!
//! An element is a common geometric record ([`DesignElement`]) plus a tagged
//! payload ([`ElementKind`]). On the wire the payload is flattened into the
//! record and discriminated by a `"type"` field, which keeps the JSON shape
//! the browser host already works with.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, IMAGE_RESET_MAX_SIZE, TEXT_DEFAULT_FONT_SIZE};
use crate::geom::{Rect, coerce_position, coerce_size, normalize_rotation};

/// Unique, opaque identifier for a design element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an existing id, e.g. one received from the host.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh id of the form `element_<uuid>`.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("element_{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Discriminant of an element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    /// Text to print. May be empty.
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    /// CSS color string.
    pub color: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
}

/// Payload of an uploaded image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    /// Data URI or URL of the decoded image.
    pub src: String,
    /// Source pixel width. Never changes after creation.
    pub original_width: f64,
    /// Source pixel height. Never changes after creation.
    pub original_height: f64,
}

impl ImageProps {
    /// Width over height of the source image, if it is a usable number.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        let ratio = self.original_width / self.original_height;
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }
}

/// Payload of a catalog symbol element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolProps {
    /// Key into the external symbol catalog.
    pub symbol_id: String,
    /// Optional tint as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextProps),
    Image(ImageProps),
    Symbol(SymbolProps),
}

impl ElementKind {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::Symbol(_) => ElementType::Symbol,
        }
    }
}

/// A placed design object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignElement {
    pub id: ElementId,
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the element center, in `[-180, 180]`.
    pub rotation: f64,
    /// Paint and hit-test priority; higher is on top.
    pub z_index: i64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl DesignElement {
    /// Unrotated bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Return a copy with `patch` merged in and every numeric field coerced
    /// back into its valid range.
    #[must_use]
    pub fn patched(&self, patch: &ElementPatch) -> Self {
        let mut next = self.clone();
        if let Some(x) = patch.x {
            next.x = coerce_position(x);
        }
        if let Some(y) = patch.y {
            next.y = coerce_position(y);
        }
        if let Some(w) = patch.width {
            next.width = coerce_size(w);
        }
        if let Some(h) = patch.height {
            next.height = coerce_size(h);
        }
        if let Some(r) = patch.rotation {
            next.rotation = normalize_rotation(r);
        }
        if let Some(z) = patch.z_index {
            next.z_index = z;
        }

        match &mut next.kind {
            ElementKind::Text(text) => {
                if let Some(ref content) = patch.content {
                    text.content.clone_from(content);
                }
                if let Some(size) = patch.font_size {
                    text.font_size = coerce_font_size(size);
                }
                if let Some(ref family) = patch.font_family {
                    text.font_family.clone_from(family);
                }
                if let Some(ref color) = patch.color {
                    text.color.clone_from(color);
                }
                if let Some(weight) = patch.font_weight {
                    text.font_weight = weight;
                }
                if let Some(style) = patch.font_style {
                    text.font_style = style;
                }
                if let Some(align) = patch.text_align {
                    text.text_align = align;
                }
            }
            ElementKind::Image(image) => {
                if let Some(ref src) = patch.src {
                    image.src.clone_from(src);
                }
            }
            ElementKind::Symbol(symbol) => {
                if let Some(ref symbol_id) = patch.symbol_id {
                    symbol.symbol_id.clone_from(symbol_id);
                }
                if let Some(ref color) = patch.color {
                    symbol.color = Some(color.clone());
                }
            }
        }
        next
    }

    /// The patch that resets an image to its source aspect ratio, capped at
    /// [`IMAGE_RESET_MAX_SIZE`] wide. `None` for non-image elements.
    #[must_use]
    pub fn ratio_reset_patch(&self) -> Option<ElementPatch> {
        let ElementKind::Image(ref image) = self.kind else {
            return None;
        };
        let width = IMAGE_RESET_MAX_SIZE.min(image.original_width);
        let height = image.aspect_ratio().map_or(width, |ratio| width / ratio);
        Some(ElementPatch { width: Some(width), height: Some(height), ..Default::default() })
    }
}

fn coerce_font_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 { size } else { TEXT_DEFAULT_FONT_SIZE }
}

/// Sparse update for an element. Only present fields are applied; fields that
/// do not belong to the target's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Text content (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Font size (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Font family (text only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Fill color (text) or tint (symbol).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Image source (image only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Catalog reference (symbol only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<String>,
}

impl ElementPatch {
    /// A patch that only moves the element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// A patch that moves and resizes the element.
    #[must_use]
    pub fn frame(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn rotation(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Default::default() }
    }

    #[must_use]
    pub fn z_index(z: i64) -> Self {
        Self { z_index: Some(z), ..Default::default() }
    }

    /// The fields that differ between two versions of the same element, or
    /// `None` when nothing changed.
    #[must_use]
    pub fn between(before: &DesignElement, after: &DesignElement) -> Option<Self> {
        let mut patch = Self {
            x: changed(&before.x, &after.x),
            y: changed(&before.y, &after.y),
            width: changed(&before.width, &after.width),
            height: changed(&before.height, &after.height),
            rotation: changed(&before.rotation, &after.rotation),
            z_index: changed(&before.z_index, &after.z_index),
            ..Default::default()
        };
        match (&before.kind, &after.kind) {
            (ElementKind::Text(a), ElementKind::Text(b)) => {
                patch.content = changed(&a.content, &b.content);
                patch.font_size = changed(&a.font_size, &b.font_size);
                patch.font_family = changed(&a.font_family, &b.font_family);
                patch.color = changed(&a.color, &b.color);
                patch.font_weight = changed(&a.font_weight, &b.font_weight);
                patch.font_style = changed(&a.font_style, &b.font_style);
                patch.text_align = changed(&a.text_align, &b.text_align);
            }
            (ElementKind::Image(a), ElementKind::Image(b)) => {
                patch.src = changed(&a.src, &b.src);
            }
            (ElementKind::Symbol(a), ElementKind::Symbol(b)) => {
                patch.symbol_id = changed(&a.symbol_id, &b.symbol_id);
                patch.color = changed(&a.color, &b.color).flatten();
            }
            _ => {}
        }
        (patch != Self::default()).then_some(patch)
    }
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

/// Immutable snapshot of one product surface's design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    /// Elements in insertion order. Paint order comes from `z_index`.
    pub elements: Vec<DesignElement>,
    /// At most one selected element. May name an id that no longer exists.
    pub selected_element_id: Option<ElementId>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Background product photo; never modified here.
    pub product_image_src: String,
}

impl DesignState {
    /// Create an empty design for a canvas of the given size.
    #[must_use]
    pub fn new(canvas_width: f64, canvas_height: f64, product_image_src: impl Into<String>) -> Self {
        Self {
            elements: Vec::new(),
            selected_element_id: None,
            canvas_width,
            canvas_height,
            product_image_src: product_image_src.into(),
        }
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|el| &el.id == id)
    }

    /// The selected element, if the selection names an existing element.
    #[must_use]
    pub fn selected(&self) -> Option<&DesignElement> {
        self.selected_element_id.as_ref().and_then(|id| self.element(id))
    }

    /// Canvas extent as a rectangle anchored at the origin.
    #[must_use]
    pub fn canvas_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas_width, self.canvas_height)
    }

    #[must_use]
    pub fn max_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|el| el.z_index).max()
    }

    #[must_use]
    pub fn min_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|el| el.z_index).min()
    }

    /// Elements sorted by `(z_index, insertion order)`, bottom first.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&DesignElement> {
        let mut sorted: Vec<&DesignElement> = self.elements.iter().collect();
        sorted.sort_by_key(|el| el.z_index);
        sorted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for DesignState {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, "")
    }
}

