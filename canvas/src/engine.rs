//! Interaction controller.
//!
//! [`EngineCore`] turns pointer and keyboard events into document commands
//! and reports what changed as a list of [`Action`]s for the host. It has no
//! browser dependencies so it can be driven from tests and the replay CLI.
//! [`Engine`] is the thin `wasm-bindgen` wrapper the page talks to; it speaks
//! JSON strings across the boundary.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use crate::config::StudioConfig;
use crate::consts::{SYMBOL_DEFAULT_SIZE, TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH};
use crate::doc::{DesignElement, DesignState, ElementId, ElementPatch};
use crate::error::StudioError;
use crate::export::{DesignExport, LineItemAttribute};
use crate::geom::{Point, Rect, angle_deg, clamp_into, coerce_size, normalize_rotation};
use crate::hit::{HitPart, ResizeAnchor, hit_at};
use crate::input::{Button, InputState, Key, Tool, UiState};
use crate::store::Command;
use crate::surface::{ProductDesign, SurfaceId, constrain_to_boundaries};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_MOVE: &str = "move";
const CURSOR_ROTATE: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum Action {
    ElementCreated(DesignElement),
    ElementUpdated { id: ElementId, patch: ElementPatch },
    ElementDeleted { id: ElementId },
    SelectionChanged { id: Option<ElementId> },
    SetCursor(String),
    RenderNeeded,
}

/// Compare two snapshots of the same surface and describe the difference.
fn diff_actions(before: &DesignState, after: &DesignState) -> Vec<Action> {
    let mut actions = Vec::new();
    for el in &after.elements {
        match before.element(&el.id) {
            None => actions.push(Action::ElementCreated(el.clone())),
            Some(prev) => {
                if let Some(patch) = ElementPatch::between(prev, el) {
                    actions.push(Action::ElementUpdated { id: el.id.clone(), patch });
                }
            }
        }
    }
    for el in &before.elements {
        if after.element(&el.id).is_none() {
            actions.push(Action::ElementDeleted { id: el.id.clone() });
        }
    }
    if before.selected_element_id != after.selected_element_id {
        actions.push(Action::SelectionChanged { id: after.selected_element_id.clone() });
    }
    if !actions.is_empty() {
        actions.push(Action::RenderNeeded);
    }
    actions
}

/// Core engine state: all logic that doesn't depend on the browser.
pub struct EngineCore {
    pub design: ProductDesign,
    pub config: StudioConfig,
    pub ui: UiState,
    pub input: InputState,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            design: ProductDesign::default(),
            config: StudioConfig::default(),
            ui: UiState::default(),
            input: InputState::default(),
        }
    }
}

impl EngineCore {
    /// Build an engine with one empty design per configured surface.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: StudioConfig) -> Result<Self, StudioError> {
        config.validate()?;
        let design = ProductDesign::new(
            &config.boundaries,
            config.canvas_width,
            config.canvas_height,
            &config.product_image_src,
        )?;
        info!(
            product_type = %config.boundaries.product_type,
            surfaces = config.boundaries.surfaces.len(),
            canvas_width = config.canvas_width,
            canvas_height = config.canvas_height,
            "design engine ready"
        );
        Ok(Self { design, config, ui: UiState::default(), input: InputState::default() })
    }

    // --- Tool / surface ---

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        debug!(%tool, "tool changed");
        self.ui.tool = tool;
    }

    /// Start editing another side of the product. Any gesture in progress is
    /// abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::UnknownSurface`] if the product has no such side.
    pub fn switch_surface(&mut self, surface: SurfaceId) -> Result<Vec<Action>, StudioError> {
        self.design.switch_surface(surface)?;
        let mut actions = self.end_gesture();
        actions.push(Action::SelectionChanged { id: self.selection().cloned() });
        actions.push(Action::RenderNeeded);
        info!(%surface, "surface switched");
        Ok(actions)
    }

    // --- Commands ---

    /// Apply a document command to the current surface.
    pub fn dispatch(&mut self, command: Command) -> Vec<Action> {
        let before = self.design.current().snapshot();
        self.design.current_mut().apply(command);
        let after = self.design.current().snapshot();
        if self.input.target().is_some_and(|id| after.element(id).is_none()) {
            self.input = InputState::Idle;
        }
        diff_actions(&before, &after)
    }

    /// Add a text box in the middle of the canvas and return to the select tool.
    pub fn add_text_centered(&mut self, content: Option<&str>) -> Vec<Action> {
        let center = self.canvas_center();
        self.ui.tool = Tool::Select;
        self.dispatch(Command::AddText {
            x: center.x - TEXT_DEFAULT_WIDTH / 2.0,
            y: center.y - TEXT_DEFAULT_HEIGHT / 2.0,
            content: content.map(str::to_string),
        })
    }

    /// Add an uploaded image in the middle of the canvas and return to the select tool.
    pub fn add_image_centered(&mut self, src: &str, original_width: f64, original_height: f64) -> Vec<Action> {
        let center = self.canvas_center();
        self.ui.tool = Tool::Select;
        self.dispatch(Command::AddImage {
            x: center.x - original_width / 4.0,
            y: center.y - original_height / 4.0,
            src: src.to_string(),
            original_width,
            original_height,
        })
    }

    /// Add a catalog symbol in the middle of the canvas and return to the select tool.
    pub fn add_symbol_centered(&mut self, symbol_id: &str, color: Option<&str>) -> Vec<Action> {
        let center = self.canvas_center();
        self.ui.tool = Tool::Select;
        self.dispatch(Command::AddSymbol {
            x: center.x - SYMBOL_DEFAULT_SIZE / 2.0,
            y: center.y - SYMBOL_DEFAULT_SIZE / 2.0,
            symbol_id: symbol_id.to_string(),
            color: color.map(str::to_string),
        })
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }
        let pt = pt.sanitized();
        let state = self.design.current().snapshot();
        let hit = hit_at(&state.elements, state.selected(), pt, self.config.handle_metrics());

        let Some(hit) = hit else {
            return if self.ui.tool == Tool::Text {
                self.dispatch(Command::AddText { x: pt.x, y: pt.y, content: None })
            } else {
                self.dispatch(Command::Select { id: None })
            };
        };
        let Some(el) = state.element(&hit.element_id) else {
            return Vec::new();
        };

        let (input, cursor) = match hit.part {
            HitPart::Body => (InputState::Dragging { id: el.id.clone(), last: pt }, CURSOR_MOVE),
            HitPart::ResizeHandle(anchor) => (
                InputState::Resizing {
                    id: el.id.clone(),
                    anchor,
                    start: pt,
                    orig_x: el.x,
                    orig_y: el.y,
                    orig_w: el.width,
                    orig_h: el.height,
                },
                anchor.cursor(),
            ),
            HitPart::RotateHandle => {
                let center = el.bounds().center();
                (
                    InputState::Rotating {
                        id: el.id.clone(),
                        center,
                        start_angle: angle_deg(center, pt),
                        orig_rotation: el.rotation,
                    },
                    CURSOR_ROTATE,
                )
            }
        };
        debug!(id = %el.id, part = ?hit.part, x = pt.x, y = pt.y, "gesture started");

        let mut actions = self.dispatch(Command::Select { id: Some(el.id.clone()) });
        self.input = input;
        actions.push(Action::SetCursor(cursor.to_string()));
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let pt = pt.sanitized();
        let Some(id) = self.input.target().cloned() else {
            return Vec::new();
        };
        let Some(el) = self.design.current().element(&id).cloned() else {
            self.input = InputState::Idle;
            return Vec::new();
        };

        let patch = match &mut self.input {
            InputState::Idle => return Vec::new(),
            InputState::Dragging { last, .. } => {
                let dx = pt.x - last.x;
                let dy = pt.y - last.y;
                *last = pt;
                let to = clamp_drag(&self.design, self.config.clamp_to_print_area, &el, dx, dy);
                ElementPatch::position(to.x, to.y)
            }
            InputState::Resizing { anchor, start, orig_x, orig_y, orig_w, orig_h, .. } => {
                let frame = resize_frame(*anchor, pt.x - start.x, pt.y - start.y, Rect::new(*orig_x, *orig_y, *orig_w, *orig_h));
                ElementPatch::frame(frame)
            }
            InputState::Rotating { center, start_angle, orig_rotation, .. } => {
                let angle = angle_deg(*center, pt);
                ElementPatch::rotation(normalize_rotation(*orig_rotation + angle - *start_angle))
            }
        };
        self.dispatch(Command::Update { id, patch })
    }

    pub fn on_pointer_up(&mut self, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.end_gesture()
    }

    /// The pointer left the canvas; treated as a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            let mut actions = self.end_gesture();
            actions.extend(self.dispatch(Command::Select { id: None }));
            return actions;
        }
        if key.is_delete() && self.input.is_idle() {
            if let Some(id) = self.selection().cloned() {
                return self.dispatch(Command::Delete { id });
            }
        }
        Vec::new()
    }

    // --- Queries ---

    /// The selected element id on the current surface, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ElementId> {
        self.design.current().selection()
    }

    /// Look up an element on the current surface.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&DesignElement> {
        self.design.current().element(id)
    }

    /// The current surface's snapshot.
    #[must_use]
    pub fn state(&self) -> Rc<DesignState> {
        self.design.current().snapshot()
    }

    #[must_use]
    pub fn export(&self) -> DesignExport {
        DesignExport::from_design(&self.config.boundaries.product_type, &self.design)
    }

    /// The design as a cart line-item attribute.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::Serialize`] if the design cannot be encoded.
    pub fn line_item(&self) -> Result<LineItemAttribute, StudioError> {
        LineItemAttribute::for_design(&self.export())
    }

    // --- Helpers ---

    fn end_gesture(&mut self) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        if let Some(id) = self.input.target() {
            debug!(%id, "gesture ended");
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor(CURSOR_DEFAULT.to_string())]
    }

    fn canvas_center(&self) -> Point {
        self.design.current().state().canvas_bounds().center()
    }
}

/// Position of `el` moved by `(dx, dy)`, kept inside the primary print area
/// when `to_print_area` is set and the surface has one, otherwise inside the
/// canvas.
fn clamp_drag(design: &ProductDesign, to_print_area: bool, el: &DesignElement, dx: f64, dy: f64) -> Point {
    let (x, y) = (el.x + dx, el.y + dy);
    let boundaries = design.current_boundaries();
    if to_print_area && !boundaries.is_empty() {
        return constrain_to_boundaries(x, y, el.width, el.height, boundaries);
    }
    clamp_into(x, y, el.width, el.height, design.current().state().canvas_bounds())
}

/// New frame for a corner resize by `(dx, dy)` from `orig`. The corner
/// opposite `anchor` stays fixed and both sides are floored at the minimum size.
fn resize_frame(anchor: ResizeAnchor, dx: f64, dy: f64, orig: Rect) -> Rect {
    let (raw_w, raw_h) = match anchor {
        ResizeAnchor::Se => (orig.width + dx, orig.height + dy),
        ResizeAnchor::Ne => (orig.width + dx, orig.height - dy),
        ResizeAnchor::Sw => (orig.width - dx, orig.height + dy),
        ResizeAnchor::Nw => (orig.width - dx, orig.height - dy),
    };
    let width = coerce_size(raw_w);
    let height = coerce_size(raw_h);
    let x = match anchor {
        ResizeAnchor::Nw | ResizeAnchor::Sw => orig.x + orig.width - width,
        ResizeAnchor::Ne | ResizeAnchor::Se => orig.x,
    };
    let y = match anchor {
        ResizeAnchor::Nw | ResizeAnchor::Ne => orig.y + orig.height - height,
        ResizeAnchor::Sw | ResizeAnchor::Se => orig.y,
    };
    Rect::new(x, y, width, height)
}

/// The full canvas engine exposed to the browser.
#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
}

#[wasm_bindgen]
#[allow(clippy::missing_errors_doc)]
impl Engine {
    /// Create an engine from a JSON [`StudioConfig`].
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Engine, JsValue> {
        let config = StudioConfig::from_json(config_json).map_err(to_js)?;
        let core = EngineCore::new(config).map_err(to_js)?;
        Ok(Self { core })
    }

    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        self.core.set_tool(tool.parse().map_err(to_js)?);
        Ok(())
    }

    pub fn switch_surface(&mut self, surface: &str) -> Result<String, JsValue> {
        let surface: SurfaceId = surface.parse().map_err(to_js)?;
        let actions = self.core.switch_surface(surface).map_err(to_js)?;
        actions_json(&actions)
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<String, JsValue> {
        actions_json(&self.core.on_pointer_down(Point::new(x, y), Button::from_dom(button)))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        actions_json(&self.core.on_pointer_move(Point::new(x, y)))
    }

    pub fn on_pointer_up(&mut self, button: i16) -> Result<String, JsValue> {
        actions_json(&self.core.on_pointer_up(Button::from_dom(button)))
    }

    pub fn on_pointer_leave(&mut self) -> Result<String, JsValue> {
        actions_json(&self.core.on_pointer_leave())
    }

    pub fn on_key_down(&mut self, key: &str) -> Result<String, JsValue> {
        actions_json(&self.core.on_key_down(&Key(key.to_string())))
    }

    pub fn add_text_centered(&mut self, content: Option<String>) -> Result<String, JsValue> {
        actions_json(&self.core.add_text_centered(content.as_deref()))
    }

    pub fn add_image_centered(&mut self, src: &str, original_width: f64, original_height: f64) -> Result<String, JsValue> {
        actions_json(&self.core.add_image_centered(src, original_width, original_height))
    }

    pub fn add_symbol_centered(&mut self, symbol_id: &str, color: Option<String>) -> Result<String, JsValue> {
        actions_json(&self.core.add_symbol_centered(symbol_id, color.as_deref()))
    }

    /// Apply a JSON-encoded [`Command`].
    pub fn dispatch(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command = Command::from_json(command_json).map_err(to_js)?;
        actions_json(&self.core.dispatch(command))
    }

    /// The current surface's design as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.core.state().as_ref()).map_err(|e| to_js(e.into()))
    }

    /// The `_design` line-item attribute as JSON.
    pub fn line_item_json(&self) -> Result<String, JsValue> {
        let attr = self.core.line_item().map_err(to_js)?;
        serde_json::to_string(&attr).map_err(|e| to_js(e.into()))
    }
}

fn actions_json(actions: &[Action]) -> Result<String, JsValue> {
    serde_json::to_string(actions).map_err(|e| to_js(e.into()))
}

fn to_js(err: StudioError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
