//! Document store: pure state transitions over [`DesignState`] snapshots and
//! the [`DocStore`] that owns the current snapshot.
//!
//! Every transition borrows the current snapshot and returns a new one; the
//! input is never mutated. Transitions that target an id which does not exist
//! return an unchanged copy instead of an error.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{DesignElement, DesignState, ElementId, ElementPatch};
use crate::error::StudioError;
use crate::factory::ElementFactory;

// =============================================================
// Pure transitions
// =============================================================

/// Append `element` and select it.
///
/// Ids are unique within a state: if an element with the same id is already
/// present the state is returned unchanged.
#[must_use]
pub fn add_element(state: &DesignState, element: DesignElement) -> DesignState {
    if state.element(&element.id).is_some() {
        return state.clone();
    }
    let mut next = state.clone();
    next.selected_element_id = Some(element.id.clone());
    next.elements.push(element);
    next
}

/// Merge `patch` into the element with `id`. Unknown ids leave the state unchanged.
#[must_use]
pub fn update_element(state: &DesignState, id: &ElementId, patch: &ElementPatch) -> DesignState {
    let mut next = state.clone();
    if let Some(el) = next.elements.iter_mut().find(|el| &el.id == id) {
        *el = el.patched(patch);
    }
    next
}

/// Remove the element with `id`, clearing the selection if it pointed at it.
#[must_use]
pub fn delete_element(state: &DesignState, id: &ElementId) -> DesignState {
    let mut next = state.clone();
    next.elements.retain(|el| &el.id != id);
    if next.selected_element_id.as_ref() == Some(id) {
        next.selected_element_id = None;
    }
    next
}

/// Set the selection. The id is not checked against the element list.
#[must_use]
pub fn select_element(state: &DesignState, id: Option<ElementId>) -> DesignState {
    let mut next = state.clone();
    next.selected_element_id = id;
    next
}

/// Raise the element above every other one.
#[must_use]
pub fn bring_to_front(state: &DesignState, id: &ElementId) -> DesignState {
    match (state.max_z_index(), state.element(id)) {
        (Some(max), Some(_)) => update_element(state, id, &ElementPatch::z_index(max.saturating_add(1))),
        _ => state.clone(),
    }
}

/// Lower the element beneath every other one.
#[must_use]
pub fn send_to_back(state: &DesignState, id: &ElementId) -> DesignState {
    match (state.min_z_index(), state.element(id)) {
        (Some(min), Some(_)) => update_element(state, id, &ElementPatch::z_index(min.saturating_sub(1))),
        _ => state.clone(),
    }
}

/// Resize an image element back to its source aspect ratio. Other kinds are untouched.
#[must_use]
pub fn reset_image_ratio(state: &DesignState, id: &ElementId) -> DesignState {
    match state.element(id).and_then(DesignElement::ratio_reset_patch) {
        Some(patch) => update_element(state, id, &patch),
        None => state.clone(),
    }
}

// =============================================================
// Commands
// =============================================================

/// A document mutation, as sent by the host or produced by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddText {
        x: f64,
        y: f64,
        #[serde(default)]
        content: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddImage {
        x: f64,
        y: f64,
        src: String,
        original_width: f64,
        original_height: f64,
    },
    #[serde(rename_all = "camelCase")]
    AddSymbol {
        x: f64,
        y: f64,
        symbol_id: String,
        #[serde(default)]
        color: Option<String>,
    },
    Update {
        id: ElementId,
        patch: ElementPatch,
    },
    Delete {
        id: ElementId,
    },
    Select {
        #[serde(default)]
        id: Option<ElementId>,
    },
    BringToFront {
        id: ElementId,
    },
    SendToBack {
        id: ElementId,
    },
    ResetImageRatio {
        id: ElementId,
    },
}

impl Command {
    /// Decode a command from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::CommandDecode`] for malformed or unknown commands.
    pub fn from_json(raw: &str) -> Result<Self, StudioError> {
        serde_json::from_str(raw).map_err(|e| StudioError::CommandDecode(e.to_string()))
    }
}

// =============================================================
// DocStore
// =============================================================

/// Owner of one surface's current snapshot and its z-index counter.
///
/// Snapshots are shared as `Rc<DesignState>`; a snapshot handed out earlier
/// stays valid and unchanged after later commands.
#[derive(Debug, Clone)]
pub struct DocStore {
    state: Rc<DesignState>,
    factory: ElementFactory,
}

impl DocStore {
    /// Create a store around an empty design.
    #[must_use]
    pub fn new(canvas_width: f64, canvas_height: f64, product_image_src: impl Into<String>) -> Self {
        Self::from_state(DesignState::new(canvas_width, canvas_height, product_image_src))
    }

    /// Create a store around an existing design, e.g. one restored by the host.
    #[must_use]
    pub fn from_state(state: DesignState) -> Self {
        let first_z = state.max_z_index().map_or(0, |z| z.saturating_add(1));
        Self { state: Rc::new(state), factory: ElementFactory::starting_at(first_z) }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Rc<DesignState> {
        Rc::clone(&self.state)
    }

    /// Borrow the current snapshot.
    #[must_use]
    pub fn state(&self) -> &DesignState {
        &self.state
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&DesignElement> {
        self.state.element(id)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&ElementId> {
        self.state.selected_element_id.as_ref()
    }

    /// Apply `command`, replacing the current snapshot.
    ///
    /// Returns the element created by an add command, if any.
    pub fn apply(&mut self, command: Command) -> Option<DesignElement> {
        let max_z = self.state.max_z_index();
        let (next, created) = match command {
            Command::AddText { x, y, content } => {
                let el = self.factory.create_text(x, y, content.as_deref(), max_z);
                (add_element(&self.state, el.clone()), Some(el))
            }
            Command::AddImage { x, y, src, original_width, original_height } => {
                let el = self.factory.create_image(x, y, &src, original_width, original_height, max_z);
                (add_element(&self.state, el.clone()), Some(el))
            }
            Command::AddSymbol { x, y, symbol_id, color } => {
                let el = self.factory.create_symbol(x, y, &symbol_id, color.as_deref(), max_z);
                (add_element(&self.state, el.clone()), Some(el))
            }
            Command::Update { id, patch } => (update_element(&self.state, &id, &patch), None),
            Command::Delete { id } => (delete_element(&self.state, &id), None),
            Command::Select { id } => (select_element(&self.state, id), None),
            Command::BringToFront { id } => (bring_to_front(&self.state, &id), None),
            Command::SendToBack { id } => (send_to_back(&self.state, &id), None),
            Command::ResetImageRatio { id } => (reset_image_ratio(&self.state, &id), None),
        };
        if let Some(ref el) = created {
            debug!(id = %el.id, kind = ?el.element_type(), z_index = el.z_index, "element created");
        }
        self.state = Rc::new(next);
        created
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::from_state(DesignState::default())
    }
}
