//! Line-item export: the finished design as a cart line-item attribute.
//!
//! The cart stores custom attributes as string key/value pairs, so the whole
//! multi-surface design is serialized to JSON under the `_design` key.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::doc::DesignElement;
use crate::error::StudioError;
use crate::surface::{ProductDesign, SurfaceId};

/// Attribute key the print pipeline looks for.
pub const DESIGN_ATTRIBUTE_KEY: &str = "_design";

/// One surface's printable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceDesign {
    pub surface: SurfaceId,
    pub product_image_src: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Elements in paint order, bottom first.
    pub elements: Vec<DesignElement>,
}

/// Everything printed for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignExport {
    pub product_type: String,
    pub surfaces: Vec<SurfaceDesign>,
}

impl DesignExport {
    /// Collect every surface that has at least one element.
    #[must_use]
    pub fn from_design(product_type: &str, design: &ProductDesign) -> Self {
        let surfaces = design
            .surfaces()
            .filter(|(_, store)| !store.state().is_empty())
            .map(|(surface, store)| {
                let state = store.state();
                SurfaceDesign {
                    surface,
                    product_image_src: state.product_image_src.clone(),
                    canvas_width: state.canvas_width,
                    canvas_height: state.canvas_height,
                    elements: state.paint_order().into_iter().cloned().collect(),
                }
            })
            .collect();
        Self { product_type: product_type.to_string(), surfaces }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// A cart line-item custom attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemAttribute {
    pub key: String,
    pub value: String,
}

impl LineItemAttribute {
    /// Serialize `export` under [`DESIGN_ATTRIBUTE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Serialize`] if the design cannot be encoded.
    pub fn for_design(export: &DesignExport) -> Result<Self, StudioError> {
        let value = serde_json::to_string(export)?;
        Ok(Self { key: DESIGN_ATTRIBUTE_KEY.to_string(), value })
    }

    /// Decode the design carried by this attribute.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Serialize`] if the value is not a design export.
    pub fn design(&self) -> Result<DesignExport, StudioError> {
        Ok(serde_json::from_str(&self.value)?)
    }
}
