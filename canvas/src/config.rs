//! Studio configuration supplied by the host page.
//!
//! Every field has a default, so `{}` is a valid configuration. The host
//! passes the JSON once when the engine is created.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::error::StudioError;
use crate::hit::HandleMetrics;
use crate::surface::BoundaryConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    /// Canvas width in pixels. Fixed for the session.
    pub canvas_width: f64,
    /// Canvas height in pixels. Fixed for the session.
    pub canvas_height: f64,
    /// Product photo shown behind the design.
    pub product_image_src: String,
    /// Hit slop around resize and rotate handles.
    pub handle_radius: f64,
    /// Distance of the rotate handle above the element's top edge.
    pub rotate_handle_offset: f64,
    /// Clamp drags to the primary print area instead of the whole canvas.
    pub clamp_to_print_area: bool,
    pub boundaries: BoundaryConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            product_image_src: String::new(),
            handle_radius: HANDLE_RADIUS_PX,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET_PX,
            clamp_to_print_area: false,
            boundaries: BoundaryConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`StudioError::ConfigParse`] for malformed JSON and
    /// [`StudioError::InvalidConfig`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, StudioError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| StudioError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and surface uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), StudioError> {
        positive("canvasWidth", self.canvas_width)?;
        positive("canvasHeight", self.canvas_height)?;
        positive("handleRadius", self.handle_radius)?;
        if !self.rotate_handle_offset.is_finite() || self.rotate_handle_offset < 0.0 {
            return Err(StudioError::InvalidConfig(format!(
                "rotateHandleOffset must be a non-negative number, got {}",
                self.rotate_handle_offset
            )));
        }
        if self.boundaries.surfaces.is_empty() {
            return Err(StudioError::InvalidConfig("at least one surface is required".into()));
        }
        let mut seen = BTreeSet::new();
        for surface in &self.boundaries.surfaces {
            if !seen.insert(surface.id) {
                return Err(StudioError::InvalidConfig(format!("duplicate surface: {}", surface.id)));
            }
            for b in &surface.boundaries {
                finite("boundary x", b.x)?;
                finite("boundary y", b.y)?;
                positive("boundary width", b.width)?;
                positive("boundary height", b.height)?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn handle_metrics(&self) -> HandleMetrics {
        HandleMetrics { radius: self.handle_radius, rotate_offset: self.rotate_handle_offset }
    }
}

fn finite(name: &str, value: f64) -> Result<(), StudioError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StudioError::InvalidConfig(format!("{name} must be a finite number, got {value}")))
    }
}

fn positive(name: &str, value: f64) -> Result<(), StudioError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StudioError::InvalidConfig(format!("{name} must be a positive number, got {value}")))
    }
}
