//! Element factory: builds new elements with fresh ids, default attributes
//! and a z-index drawn from a monotonic counter.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use crate::consts::{
    DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_TEXT_CONTENT, IMAGE_MAX_WIDTH, SYMBOL_DEFAULT_SIZE,
    TEXT_DEFAULT_FONT_SIZE, TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH,
};
use crate::doc::{
    DesignElement, ElementId, ElementKind, FontStyle, FontWeight, ImageProps, SymbolProps, TextAlign, TextProps,
};
use crate::geom::{coerce_position, coerce_size};

/// Monotonic source of z-indices for new elements.
///
/// Each value handed out is strictly greater than every earlier one, so two
/// elements created in the same burst never tie in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZCounter {
    next: i64,
}

impl ZCounter {
    /// Start counting at `first`.
    #[must_use]
    pub fn starting_at(first: i64) -> Self {
        Self { next: first }
    }

    /// Hand out the next z-index, raised to at least `floor`.
    pub fn next_above(&mut self, floor: i64) -> i64 {
        let z = self.next.max(floor);
        self.next = z.saturating_add(1);
        z
    }
}

/// Builds typed elements with default attributes.
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    z: ZCounter,
}

impl ElementFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose first z-index is `first_z`.
    #[must_use]
    pub fn starting_at(first_z: i64) -> Self {
        Self { z: ZCounter::starting_at(first_z) }
    }

    /// Ensure the next element lands above `max_z`.
    pub fn observe(&mut self, max_z: Option<i64>) -> i64 {
        let floor = max_z.map_or(i64::MIN, |z| z.saturating_add(1));
        self.z.next_above(floor)
    }

    /// A 200×40 black, left-aligned text box. `None` content uses the placeholder text.
    pub fn create_text(&mut self, x: f64, y: f64, content: Option<&str>, max_z: Option<i64>) -> DesignElement {
        let kind = ElementKind::Text(TextProps {
            content: content.unwrap_or(DEFAULT_TEXT_CONTENT).to_string(),
            font_size: TEXT_DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            color: DEFAULT_COLOR.to_string(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
        });
        self.build(x, y, TEXT_DEFAULT_WIDTH, TEXT_DEFAULT_HEIGHT, kind, max_z)
    }

    /// An image at most 300px wide that keeps the source aspect ratio.
    ///
    /// Unusable source dimensions fall back to a square.
    pub fn create_image(
        &mut self,
        x: f64,
        y: f64,
        src: &str,
        original_width: f64,
        original_height: f64,
        max_z: Option<i64>,
    ) -> DesignElement {
        let props = ImageProps { src: src.to_string(), original_width, original_height };
        let width = IMAGE_MAX_WIDTH.min(original_width);
        let height = props.aspect_ratio().map_or(width, |ratio| width / ratio);
        self.build(x, y, width, height, ElementKind::Image(props), max_z)
    }

    /// A 60×60 catalog symbol, tinted black unless `color` is given.
    pub fn create_symbol(
        &mut self,
        x: f64,
        y: f64,
        symbol_id: &str,
        color: Option<&str>,
        max_z: Option<i64>,
    ) -> DesignElement {
        let kind = ElementKind::Symbol(SymbolProps {
            symbol_id: symbol_id.to_string(),
            color: Some(color.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_COLOR).to_string()),
        });
        self.build(x, y, SYMBOL_DEFAULT_SIZE, SYMBOL_DEFAULT_SIZE, kind, max_z)
    }

    fn build(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        kind: ElementKind,
        max_z: Option<i64>,
    ) -> DesignElement {
        DesignElement {
            id: ElementId::generate(),
            x: coerce_position(x),
            y: coerce_position(y),
            width: coerce_size(width),
            height: coerce_size(height),
            rotation: 0.0,
            z_index: self.observe(max_z),
            kind,
        }
    }
}
