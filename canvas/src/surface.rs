//! Product surfaces (front/back) and their printable areas.
//!
//! Each surface of a product carries its own design and a list of print-area
//! boundaries. The first boundary is the primary one: new elements are
//! centered in it and, when configured, drags are clamped to it.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::error::StudioError;
use crate::geom::{Point, Rect, clamp_into};
use crate::store::DocStore;

/// A printable side of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceId {
    Front,
    Back,
}

impl SurfaceId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceId {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            other => Err(StudioError::UnknownSurface(other.to_string())),
        }
    }
}

/// A rectangular print area on a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignBoundary {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl DesignBoundary {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSurface {
    pub id: SurfaceId,
    pub name: String,
    /// Product photo for this side, if it differs from the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub boundaries: Vec<DesignBoundary>,
}

/// Print-area layout for a product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryConfig {
    pub product_type: String,
    pub surfaces: Vec<ProductSurface>,
}

impl BoundaryConfig {
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&ProductSurface> {
        self.surfaces.iter().find(|s| s.id == id)
    }
}

impl Default for BoundaryConfig {
    /// Front and back, each with a single 300×400 print area at (150, 100).
    fn default() -> Self {
        let print_area = || DesignBoundary { x: 150.0, y: 100.0, width: 300.0, height: 400.0, label: "Print Area".into() };
        Self {
            product_type: "default".into(),
            surfaces: vec![
                ProductSurface { id: SurfaceId::Front, name: "Front".into(), image_url: None, boundaries: vec![print_area()] },
                ProductSurface { id: SurfaceId::Back, name: "Back".into(), image_url: None, boundaries: vec![print_area()] },
            ],
        }
    }
}

/// Whether `(x, y)` lies in any of `boundaries`. Edges count as inside.
#[must_use]
pub fn is_point_in_boundaries(x: f64, y: f64, boundaries: &[DesignBoundary]) -> bool {
    let pt = Point::new(x, y);
    boundaries.iter().any(|b| b.rect().contains(pt))
}

/// The first boundary, used for centering and clamping.
#[must_use]
pub fn primary_boundary(boundaries: &[DesignBoundary]) -> Option<&DesignBoundary> {
    boundaries.first()
}

/// Clamp a `width`×`height` box at `(x, y)` into the primary boundary.
/// Without boundaries the position is returned unchanged.
#[must_use]
pub fn constrain_to_boundaries(x: f64, y: f64, width: f64, height: f64, boundaries: &[DesignBoundary]) -> Point {
    match primary_boundary(boundaries) {
        Some(b) => clamp_into(x, y, width, height, b.rect()),
        None => Point::new(x, y),
    }
}

/// The multi-surface design of one product: a document store per surface
/// and the surface currently being edited.
///
/// The store being edited is held apart from the others, so there is always
/// exactly one current store.
#[derive(Debug, Clone)]
pub struct ProductDesign {
    current: SurfaceId,
    active: DocStore,
    parked: BTreeMap<SurfaceId, DocStore>,
    boundaries: BTreeMap<SurfaceId, Vec<DesignBoundary>>,
}

impl ProductDesign {
    /// Build one empty store per surface in `config`. The first configured
    /// surface becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] if `config` has no surfaces.
    pub fn new(
        config: &BoundaryConfig,
        canvas_width: f64,
        canvas_height: f64,
        product_image_src: &str,
    ) -> Result<Self, StudioError> {
        Self::build(config, canvas_width, canvas_height, product_image_src)
            .ok_or_else(|| StudioError::InvalidConfig("boundary config has no surfaces".into()))
    }

    fn build(config: &BoundaryConfig, canvas_width: f64, canvas_height: f64, product_image_src: &str) -> Option<Self> {
        let mut stores = config.surfaces.iter().map(|surface| {
            let image = surface.image_url.as_deref().unwrap_or(product_image_src);
            (surface.id, DocStore::new(canvas_width, canvas_height, image))
        });
        let (current, active) = stores.next()?;
        let mut parked: BTreeMap<_, _> = stores.collect();
        parked.remove(&current);
        let boundaries = config.surfaces.iter().map(|surface| (surface.id, surface.boundaries.clone())).collect();
        Some(Self { current, active, parked, boundaries })
    }

    #[must_use]
    pub fn current_surface(&self) -> SurfaceId {
        self.current
    }

    /// Make `id` the surface being edited.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::UnknownSurface`] if the product has no such surface.
    pub fn switch_surface(&mut self, id: SurfaceId) -> Result<(), StudioError> {
        if id == self.current {
            return Ok(());
        }
        let Some(store) = self.parked.remove(&id) else {
            return Err(StudioError::UnknownSurface(id.to_string()));
        };
        let previous = std::mem::replace(&mut self.active, store);
        self.parked.insert(self.current, previous);
        self.current = id;
        Ok(())
    }

    /// Store of the surface being edited.
    #[must_use]
    pub fn current(&self) -> &DocStore {
        &self.active
    }

    pub fn current_mut(&mut self) -> &mut DocStore {
        &mut self.active
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&DocStore> {
        if id == self.current { Some(&self.active) } else { self.parked.get(&id) }
    }

    /// Print areas of the surface being edited.
    #[must_use]
    pub fn current_boundaries(&self) -> &[DesignBoundary] {
        self.boundaries.get(&self.current).map_or(&[], Vec::as_slice)
    }

    /// Surfaces in a stable order, with their stores.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &DocStore)> {
        let mut all: Vec<_> = self.parked.iter().map(|(id, store)| (*id, store)).collect();
        all.push((self.current, &self.active));
        all.sort_by_key(|(id, _)| *id);
        all.into_iter()
    }
}

impl Default for ProductDesign {
    /// Front and back of the default product on a 600×600 canvas, front current.
    fn default() -> Self {
        let blank = || DocStore::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, "");
        let defaults = BoundaryConfig::default();
        Self {
            current: SurfaceId::Front,
            active: blank(),
            parked: BTreeMap::from([(SurfaceId::Back, blank())]),
            boundaries: defaults.surfaces.into_iter().map(|surface| (surface.id, surface.boundaries)).collect(),
        }
    }
}
