#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::surface::{BoundaryConfig, DesignBoundary, ProductSurface};

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Add a symbol and reshape it to the given frame. Leaves it selected.
fn add_box(core: &mut EngineCore, x: f64, y: f64, w: f64, h: f64) -> ElementId {
    core.dispatch(Command::AddSymbol { x, y, symbol_id: "star".into(), color: None });
    let id = core.selection().cloned().unwrap();
    core.dispatch(Command::Update { id: id.clone(), patch: ElementPatch::frame(Rect::new(x, y, w, h)) });
    id
}

fn frame_of(core: &EngineCore, id: &ElementId) -> (f64, f64, f64, f64) {
    let el = core.element(id).unwrap();
    (el.x, el.y, el.width, el.height)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_element_created(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ElementCreated(_)))
}

fn has_element_deleted(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ElementDeleted { .. }))
}

fn has_cursor(actions: &[Action], cursor: &str) -> bool {
    has_action(actions, |a| matches!(a, Action::SetCursor(c) if c == cursor))
}

fn count_updates(actions: &[Action]) -> usize {
    actions.iter().filter(|a| matches!(a, Action::ElementUpdated { .. })).count()
}

fn resizing(id: &ElementId, anchor: ResizeAnchor, start: Point, orig: (f64, f64, f64, f64)) -> InputState {
    InputState::Resizing {
        id: id.clone(),
        anchor,
        start,
        orig_x: orig.0,
        orig_y: orig.1,
        orig_w: orig.2,
        orig_h: orig.3,
    }
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_default_has_no_selection() {
    let core = EngineCore::default();
    assert!(core.selection().is_none());
    assert!(core.state().is_empty());
}

#[test]
fn core_default_tool_is_select() {
    let core = EngineCore::default();
    assert_eq!(core.ui.tool, Tool::Select);
    assert!(core.input.is_idle());
}

#[test]
fn core_default_starts_on_front() {
    let core = EngineCore::default();
    assert_eq!(core.design.current_surface(), SurfaceId::Front);
    assert_eq!(core.state().canvas_width, 600.0);
}

#[test]
fn core_new_uses_config_canvas() {
    let config = StudioConfig { canvas_width: 800.0, canvas_height: 400.0, ..Default::default() };
    let core = EngineCore::new(config).unwrap();
    assert_eq!(core.state().canvas_width, 800.0);
    assert_eq!(core.state().canvas_height, 400.0);
}

#[test]
fn core_new_rejects_invalid_config() {
    let config = StudioConfig { canvas_height: -1.0, ..Default::default() };
    assert!(matches!(EngineCore::new(config), Err(StudioError::InvalidConfig(_))));
}

// =============================================================
// EngineCore: set_tool
// =============================================================

#[test]
fn set_tool_changes_tool() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Text);
    assert_eq!(core.ui.tool, Tool::Text);
}

// =============================================================
// EngineCore: dispatch
// =============================================================

#[test]
fn dispatch_add_text_reports_creation_and_selection() {
    let mut core = EngineCore::default();
    let actions = core.dispatch(Command::AddText { x: 10.0, y: 20.0, content: None });
    assert!(has_element_created(&actions));
    assert!(has_render_needed(&actions));
    let id = core.selection().cloned().unwrap();
    assert!(actions.contains(&Action::SelectionChanged { id: Some(id) }));
}

#[test]
fn dispatch_update_reports_only_changed_fields() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.dispatch(Command::Update {
        id: id.clone(),
        patch: ElementPatch { x: Some(50.0), y: Some(0.0), ..Default::default() },
    });
    let expected = ElementPatch { x: Some(50.0), ..Default::default() };
    assert_eq!(actions[0], Action::ElementUpdated { id, patch: expected });
}

#[test]
fn dispatch_update_unknown_id_is_silent() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions =
        core.dispatch(Command::Update { id: ElementId::new("missing"), patch: ElementPatch::position(1.0, 1.0) });
    assert!(actions.is_empty());
}

#[test]
fn dispatch_delete_selected_clears_selection() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.dispatch(Command::Delete { id: id.clone() });
    assert!(actions.contains(&Action::ElementDeleted { id }));
    assert!(actions.contains(&Action::SelectionChanged { id: None }));
    assert!(core.selection().is_none());
}

#[test]
fn dispatch_bring_to_front_reports_z_change() {
    let mut core = EngineCore::default();
    let a = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let b = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let top = core.element(&b).unwrap().z_index;
    let actions = core.dispatch(Command::BringToFront { id: a.clone() });
    assert_eq!(actions[0], Action::ElementUpdated { id: a, patch: ElementPatch::z_index(top + 1) });
}

#[test]
fn dispatch_select_same_id_is_silent() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    assert!(core.dispatch(Command::Select { id: Some(id) }).is_empty());
}

#[test]
fn dispatch_deleting_gesture_target_ends_gesture() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(10.0, 10.0) };
    core.dispatch(Command::Delete { id });
    assert!(core.input.is_idle());
}

// =============================================================
// Centered adds
// =============================================================

#[test]
fn add_text_centered_places_box_in_middle() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Text);
    let actions = core.add_text_centered(Some("Hello"));
    assert!(has_element_created(&actions));
    let el = core.state().selected().cloned().unwrap();
    assert_eq!((el.x, el.y), (200.0, 280.0));
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn add_symbol_centered_places_symbol_in_middle() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Symbols);
    core.add_symbol_centered("heart", Some("#ff0000"));
    let el = core.state().selected().cloned().unwrap();
    assert_eq!((el.x, el.y, el.width, el.height), (270.0, 270.0, 60.0, 60.0));
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn add_image_centered_offsets_by_quarter_source_size() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Upload);
    core.add_image_centered("logo.png", 400.0, 200.0);
    let el = core.state().selected().cloned().unwrap();
    assert_eq!((el.x, el.y), (200.0, 250.0));
    assert_eq!((el.width, el.height), (300.0, 150.0));
    assert_eq!(core.ui.tool, Tool::Select);
}

// =============================================================
// Pointer down: empty canvas
// =============================================================

#[test]
fn pointer_down_on_empty_clears_selection() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.on_pointer_down(pt(500.0, 500.0), Button::Primary);
    assert!(actions.contains(&Action::SelectionChanged { id: None }));
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
}

#[test]
fn pointer_down_on_empty_with_text_tool_adds_text_at_point() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(50.0, 60.0), Button::Primary);
    assert!(has_element_created(&actions));
    let el = core.state().selected().cloned().unwrap();
    assert_eq!((el.x, el.y, el.width, el.height), (50.0, 60.0, 200.0, 40.0));
    assert!(core.input.is_idle());
    assert_eq!(core.ui.tool, Tool::Text);
}

#[test]
fn pointer_down_on_empty_with_upload_tool_only_deselects() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.set_tool(Tool::Upload);
    let actions = core.on_pointer_down(pt(500.0, 500.0), Button::Primary);
    assert!(!has_element_created(&actions));
    assert_eq!(core.state().len(), 1);
}

#[test]
fn pointer_down_on_empty_without_selection_is_silent() {
    let mut core = EngineCore::default();
    assert!(core.on_pointer_down(pt(500.0, 500.0), Button::Primary).is_empty());
}

// =============================================================
// Pointer down: element body
// =============================================================

#[test]
fn pointer_down_on_body_selects_and_starts_drag() {
    let mut core = EngineCore::default();
    let a = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    add_box(&mut core, 400.0, 400.0, 50.0, 50.0);

    let actions = core.on_pointer_down(pt(150.0, 120.0), Button::Primary);
    assert_eq!(core.selection(), Some(&a));
    assert!(actions.contains(&Action::SelectionChanged { id: Some(a.clone()) }));
    assert!(has_cursor(&actions, "move"));
    assert_eq!(core.input, InputState::Dragging { id: a, last: pt(150.0, 120.0) });
}

#[test]
fn pointer_down_on_body_with_text_tool_drags_instead_of_adding() {
    let mut core = EngineCore::default();
    let a = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(150.0, 120.0), Button::Primary);
    assert!(!has_element_created(&actions));
    assert_eq!(core.input.target(), Some(&a));
}

#[test]
fn pointer_down_prefers_higher_z_on_overlap() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let top = add_box(&mut core, 50.0, 50.0, 100.0, 100.0);
    core.dispatch(Command::Select { id: None });
    core.on_pointer_down(pt(75.0, 75.0), Button::Primary);
    assert_eq!(core.selection(), Some(&top));
}

// =============================================================
// Pointer down: handles
// =============================================================

#[test]
fn pointer_down_near_se_corner_starts_resize() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    let actions = core.on_pointer_down(pt(303.0, 141.0), Button::Primary);
    assert_eq!(core.input, resizing(&id, ResizeAnchor::Se, pt(303.0, 141.0), (100.0, 100.0, 200.0, 40.0)));
    assert!(has_cursor(&actions, "nwse-resize"));
}

#[test]
fn pointer_down_on_ne_corner_uses_nesw_cursor() {
    let mut core = EngineCore::default();
    add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    let actions = core.on_pointer_down(pt(300.0, 100.0), Button::Primary);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Ne, .. }));
    assert!(has_cursor(&actions, "nesw-resize"));
}

#[test]
fn pointer_down_on_rotate_handle_starts_rotation() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    // Rotate handle sits 24px above the top-edge midpoint: (200, 76).
    let actions = core.on_pointer_down(pt(200.0, 78.0), Button::Primary);
    let InputState::Rotating { id: target, center, start_angle, orig_rotation } = core.input.clone() else {
        panic!("expected rotation gesture");
    };
    assert_eq!(target, id);
    assert_eq!(center, pt(200.0, 120.0));
    assert!((start_angle + 90.0).abs() < 1e-9);
    assert_eq!(orig_rotation, 0.0);
    assert!(has_cursor(&actions, "grabbing"));
}

#[test]
fn handles_are_inactive_on_unselected_element() {
    let mut core = EngineCore::default();
    add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.dispatch(Command::Select { id: None });
    // Just outside the se corner: would hit the handle if it were selected.
    core.on_pointer_down(pt(305.0, 145.0), Button::Primary);
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
}

#[test]
fn custom_handle_radius_widens_hit_area() {
    let config = StudioConfig { handle_radius: 20.0, ..Default::default() };
    let mut core = EngineCore::new(config).unwrap();
    add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.on_pointer_down(pt(312.0, 152.0), Button::Primary);
    assert!(matches!(core.input, InputState::Resizing { anchor: ResizeAnchor::Se, .. }));
}

// =============================================================
// Pointer down: ignored
// =============================================================

#[test]
fn secondary_button_is_noop() {
    let mut core = EngineCore::default();
    add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    let actions = core.on_pointer_down(pt(150.0, 120.0), Button::Secondary);
    assert!(actions.is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn pointer_down_during_gesture_is_ignored() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    let gesture = InputState::Dragging { id, last: pt(150.0, 120.0) };
    core.input = gesture.clone();
    assert!(core.on_pointer_down(pt(500.0, 500.0), Button::Primary).is_empty());
    assert_eq!(core.input, gesture);
}

// =============================================================
// Pointer move: Dragging
// =============================================================

#[test]
fn drag_moves_by_pointer_delta() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(150.0, 120.0) };

    let actions = core.on_pointer_move(pt(170.0, 150.0));
    assert_eq!(frame_of(&core, &id), (120.0, 130.0, 200.0, 40.0));
    assert_eq!(count_updates(&actions), 1);
    assert!(has_render_needed(&actions));
    assert_eq!(core.input, InputState::Dragging { id, last: pt(170.0, 150.0) });
}

#[test]
fn drag_clamps_to_canvas() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(150.0, 120.0) };

    core.on_pointer_move(pt(2000.0, 2000.0));
    assert_eq!(frame_of(&core, &id), (400.0, 560.0, 200.0, 40.0));

    core.on_pointer_move(pt(-5000.0, -5000.0));
    assert_eq!(frame_of(&core, &id), (0.0, 0.0, 200.0, 40.0));
}

#[test]
fn drag_against_edge_is_idempotent() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(150.0, 120.0) };

    core.on_pointer_move(pt(2000.0, 120.0));
    let pinned = frame_of(&core, &id);
    let actions = core.on_pointer_move(pt(2500.0, 120.0));
    assert_eq!(frame_of(&core, &id), pinned);
    assert_eq!(count_updates(&actions), 0);
}

#[test]
fn drag_clamps_to_print_area_when_configured() {
    let config = StudioConfig { clamp_to_print_area: true, ..Default::default() };
    let mut core = EngineCore::new(config).unwrap();
    let id = add_box(&mut core, 200.0, 200.0, 100.0, 50.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(250.0, 220.0) };

    core.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(frame_of(&core, &id), (150.0, 100.0, 100.0, 50.0));

    core.on_pointer_move(pt(1000.0, 1000.0));
    assert_eq!(frame_of(&core, &id), (350.0, 450.0, 100.0, 50.0));
}

#[test]
fn drag_clamps_to_first_print_area_only() {
    let mut boundaries = BoundaryConfig::default();
    boundaries.surfaces[0].boundaries = vec![
        DesignBoundary { x: 100.0, y: 100.0, width: 200.0, height: 200.0, label: "Chest".into() },
        DesignBoundary { x: 0.0, y: 0.0, width: 600.0, height: 600.0, label: "Full".into() },
    ];
    let config = StudioConfig { clamp_to_print_area: true, boundaries, ..Default::default() };
    let mut core = EngineCore::new(config).unwrap();
    let id = add_box(&mut core, 200.0, 200.0, 100.0, 50.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(250.0, 220.0) };

    core.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(frame_of(&core, &id), (100.0, 100.0, 100.0, 50.0));

    core.on_pointer_move(pt(1000.0, 1000.0));
    assert_eq!(frame_of(&core, &id), (200.0, 250.0, 100.0, 50.0));
}

#[test]
fn drag_with_print_area_clamp_but_no_boundaries_uses_canvas() {
    let mut boundaries = BoundaryConfig::default();
    for surface in &mut boundaries.surfaces {
        surface.boundaries.clear();
    }
    let config = StudioConfig { clamp_to_print_area: true, boundaries, ..Default::default() };
    let mut core = EngineCore::new(config).unwrap();
    let id = add_box(&mut core, 200.0, 200.0, 100.0, 50.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(250.0, 220.0) };

    core.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(frame_of(&core, &id), (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn drag_of_missing_element_returns_to_idle() {
    let mut core = EngineCore::default();
    core.input = InputState::Dragging { id: ElementId::new("gone"), last: pt(0.0, 0.0) };
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
    assert!(core.input.is_idle());
}

// =============================================================
// Pointer move: Resizing
// =============================================================

#[test]
fn resize_se_grows_dimensions() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Se, pt(110.0, 100.0), (10.0, 20.0, 100.0, 80.0));

    let actions = core.on_pointer_move(pt(130.0, 120.0));
    assert_eq!(frame_of(&core, &id), (10.0, 20.0, 120.0, 100.0));
    assert_eq!(count_updates(&actions), 1);
}

#[test]
fn resize_nw_moves_origin_and_shrinks() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Nw, pt(10.0, 20.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(30.0, 40.0));
    assert_eq!(frame_of(&core, &id), (30.0, 40.0, 80.0, 60.0));
}

#[test]
fn resize_ne_keeps_left_edge_and_bottom() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Ne, pt(110.0, 20.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(130.0, 10.0));
    assert_eq!(frame_of(&core, &id), (10.0, 10.0, 120.0, 90.0));
}

#[test]
fn resize_sw_keeps_right_edge_and_top() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Sw, pt(10.0, 100.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(0.0, 110.0));
    assert_eq!(frame_of(&core, &id), (0.0, 20.0, 110.0, 90.0));
}

#[test]
fn resize_se_past_origin_floors_at_minimum() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Se, pt(110.0, 100.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(0.0, 0.0));
    assert_eq!(frame_of(&core, &id), (10.0, 20.0, 20.0, 20.0));
}

#[test]
fn resize_nw_past_opposite_corner_keeps_it_anchored() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Nw, pt(10.0, 20.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(500.0, 500.0));
    // Bottom-right corner stays at (110, 100).
    assert_eq!(frame_of(&core, &id), (90.0, 80.0, 20.0, 20.0));
}

#[test]
fn resize_is_relative_to_gesture_start() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 10.0, 20.0, 100.0, 80.0);
    core.input = resizing(&id, ResizeAnchor::Se, pt(110.0, 100.0), (10.0, 20.0, 100.0, 80.0));

    core.on_pointer_move(pt(150.0, 140.0));
    core.on_pointer_move(pt(120.0, 110.0));
    assert_eq!(frame_of(&core, &id), (10.0, 20.0, 110.0, 90.0));
}

#[test]
fn resize_frame_floor_applies_to_each_anchor() {
    let orig = Rect::new(0.0, 0.0, 50.0, 50.0);
    for anchor in ResizeAnchor::ALL {
        let frame = resize_frame(anchor, 1000.0, 1000.0, orig);
        assert!(frame.width >= 20.0 && frame.height >= 20.0, "{anchor:?}");
        let frame = resize_frame(anchor, -1000.0, -1000.0, orig);
        assert!(frame.width >= 20.0 && frame.height >= 20.0, "{anchor:?}");
    }
}

// =============================================================
// Pointer move: Rotating
// =============================================================

fn rotating_box(orig_rotation: f64) -> (EngineCore, ElementId) {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 80.0);
    core.dispatch(Command::Update { id: id.clone(), patch: ElementPatch::rotation(orig_rotation) });
    // Gesture started directly above the center: angle -90.
    core.input = InputState::Rotating { id: id.clone(), center: pt(50.0, 40.0), start_angle: -90.0, orig_rotation };
    (core, id)
}

#[test]
fn rotating_adds_delta_to_initial_rotation() {
    let (mut core, id) = rotating_box(0.0);
    let actions = core.on_pointer_move(pt(150.0, 40.0));
    assert!((core.element(&id).unwrap().rotation - 90.0).abs() < 1e-9);
    assert_eq!(count_updates(&actions), 1);
}

#[test]
fn rotating_back_to_start_restores_rotation() {
    let (mut core, id) = rotating_box(30.0);
    core.on_pointer_move(pt(150.0, 40.0));
    core.on_pointer_move(pt(50.0, -60.0));
    assert!((core.element(&id).unwrap().rotation - 30.0).abs() < 1e-9);
}

#[test]
fn rotating_wraps_into_range() {
    let (mut core, id) = rotating_box(170.0);
    // Pointer to the right of center: +90 on top of 170.
    core.on_pointer_move(pt(150.0, 40.0));
    assert!((core.element(&id).unwrap().rotation + 100.0).abs() < 1e-9);
}

#[test]
fn rotating_full_sweep_stays_in_range() {
    let (mut core, id) = rotating_box(0.0);
    for step in 0..72 {
        let theta = f64::from(step) * 5.0_f64.to_radians();
        core.on_pointer_move(pt(50.0 + 100.0 * theta.cos(), 40.0 + 100.0 * theta.sin()));
        let rotation = core.element(&id).unwrap().rotation;
        assert!((-180.0..=180.0).contains(&rotation), "step {step}: {rotation}");
    }
}

// =============================================================
// Pointer move: Idle
// =============================================================

#[test]
fn pointer_move_while_idle_is_noop() {
    let mut core = EngineCore::default();
    add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    assert!(core.on_pointer_move(pt(150.0, 120.0)).is_empty());
}

// =============================================================
// Pointer up / leave
// =============================================================

#[test]
fn pointer_up_ends_drag_and_resets_cursor() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = InputState::Dragging { id, last: pt(150.0, 120.0) };
    let actions = core.on_pointer_up(Button::Primary);
    assert!(core.input.is_idle());
    assert!(has_cursor(&actions, "default"));
}

#[test]
fn pointer_up_ends_resize_and_rotate() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = resizing(&id, ResizeAnchor::Se, pt(300.0, 140.0), (100.0, 100.0, 200.0, 40.0));
    core.on_pointer_up(Button::Primary);
    assert!(core.input.is_idle());

    core.input = InputState::Rotating { id, center: pt(200.0, 120.0), start_angle: -90.0, orig_rotation: 0.0 };
    core.on_pointer_up(Button::Primary);
    assert!(core.input.is_idle());
}

#[test]
fn pointer_up_while_idle_is_noop() {
    let mut core = EngineCore::default();
    assert!(core.on_pointer_up(Button::Primary).is_empty());
}

#[test]
fn secondary_release_does_not_end_drag() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = InputState::Dragging { id, last: pt(150.0, 120.0) };
    assert!(core.on_pointer_up(Button::Secondary).is_empty());
    assert!(!core.input.is_idle());
}

#[test]
fn pointer_leave_ends_any_gesture() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.input = resizing(&id, ResizeAnchor::Nw, pt(100.0, 100.0), (100.0, 100.0, 200.0, 40.0));
    let actions = core.on_pointer_leave();
    assert!(core.input.is_idle());
    assert!(has_cursor(&actions, "default"));
    assert_eq!(core.selection(), Some(&id));
}

// =============================================================
// Key down
// =============================================================

#[test]
fn delete_key_removes_selected_element() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.on_key_down(&Key("Delete".into()));
    assert!(core.element(&id).is_none());
    assert!(core.selection().is_none());
    assert!(has_element_deleted(&actions));
    assert!(has_render_needed(&actions));
}

#[test]
fn backspace_key_removes_selected_element() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.on_key_down(&Key("Backspace".into()));
    assert!(has_element_deleted(&actions));
}

#[test]
fn delete_key_without_selection_is_noop() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.dispatch(Command::Select { id: None });
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert_eq!(core.state().len(), 1);
}

#[test]
fn delete_key_during_gesture_is_ignored() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(50.0, 50.0) };
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert!(core.element(&id).is_some());
}

#[test]
fn escape_cancels_gesture_and_deselects() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.input = InputState::Dragging { id, last: pt(50.0, 50.0) };
    let actions = core.on_key_down(&Key("Escape".into()));
    assert!(core.input.is_idle());
    assert!(core.selection().is_none());
    assert!(has_cursor(&actions, "default"));
    assert!(actions.contains(&Action::SelectionChanged { id: None }));
}

#[test]
fn escape_while_idle_only_deselects() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    let actions = core.on_key_down(&Key("Escape".into()));
    assert!(!has_cursor(&actions, "default"));
    assert!(core.selection().is_none());
}

#[test]
fn unknown_key_is_noop() {
    let mut core = EngineCore::default();
    add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    assert!(core.on_key_down(&Key("q".into())).is_empty());
}

// =============================================================
// Surfaces
// =============================================================

#[test]
fn switch_surface_cancels_gesture_and_shows_empty_back() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 0.0, 0.0, 100.0, 100.0);
    core.input = InputState::Dragging { id: id.clone(), last: pt(50.0, 50.0) };

    let actions = core.switch_surface(SurfaceId::Back).unwrap();
    assert!(core.input.is_idle());
    assert!(core.state().is_empty());
    assert!(actions.contains(&Action::SelectionChanged { id: None }));
    assert!(has_render_needed(&actions));

    core.switch_surface(SurfaceId::Front).unwrap();
    assert_eq!(core.selection(), Some(&id));
}

#[test]
fn switch_to_unconfigured_surface_errors() {
    let boundaries = BoundaryConfig {
        product_type: "sticker".into(),
        surfaces: vec![ProductSurface { id: SurfaceId::Front, name: "Front".into(), image_url: None, boundaries: vec![] }],
    };
    let mut core = EngineCore::new(StudioConfig { boundaries, ..Default::default() }).unwrap();
    assert!(matches!(core.switch_surface(SurfaceId::Back), Err(StudioError::UnknownSurface(_))));
    assert_eq!(core.design.current_surface(), SurfaceId::Front);
}

#[test]
fn pointer_events_edit_current_surface_only() {
    let mut core = EngineCore::default();
    core.switch_surface(SurfaceId::Back).unwrap();
    core.set_tool(Tool::Text);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert_eq!(core.design.surface(SurfaceId::Back).map(|s| s.state().len()), Some(1));
    assert_eq!(core.design.surface(SurfaceId::Front).map(|s| s.state().len()), Some(0));
}

// =============================================================
// Export
// =============================================================

#[test]
fn line_item_carries_design() {
    let mut core = EngineCore::default();
    core.add_text_centered(None);
    let attr = core.line_item().unwrap();
    assert_eq!(attr.key, "_design");
    let export = attr.design().unwrap();
    assert_eq!(export.surfaces.len(), 1);
    assert_eq!(export.surfaces[0].elements.len(), 1);
}

// =============================================================
// Action wire shape
// =============================================================

#[test]
fn action_serializes_with_tag_and_data() {
    let value = serde_json::to_value(Action::SetCursor("move".into())).unwrap();
    assert_eq!(value, json!({ "action": "setCursor", "data": "move" }));

    let value = serde_json::to_value(Action::RenderNeeded).unwrap();
    assert_eq!(value, json!({ "action": "renderNeeded" }));

    let value = serde_json::to_value(Action::SelectionChanged { id: None }).unwrap();
    assert_eq!(value, json!({ "action": "selectionChanged", "data": { "id": null } }));
}

#[test]
fn element_updated_serializes_sparse_patch() {
    let action = Action::ElementUpdated { id: ElementId::new("element_1"), patch: ElementPatch::position(5.0, 6.0) };
    let value = serde_json::to_value(action).unwrap();
    assert_eq!(value, json!({ "action": "elementUpdated", "data": { "id": "element_1", "patch": { "x": 5.0, "y": 6.0 } } }));
}

// =============================================================
// Full gestures
// =============================================================

#[test]
fn full_gesture_drag_element() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);
    core.on_pointer_down(pt(150.0, 120.0), Button::Primary);
    core.on_pointer_move(pt(160.0, 125.0));
    core.on_pointer_move(pt(180.0, 140.0));
    core.on_pointer_up(Button::Primary);
    assert_eq!(frame_of(&core, &id), (130.0, 120.0, 200.0, 40.0));
    assert!(core.input.is_idle());
}

#[test]
fn full_gesture_resize_then_rotate() {
    let mut core = EngineCore::default();
    let id = add_box(&mut core, 100.0, 100.0, 200.0, 40.0);

    core.on_pointer_down(pt(300.0, 140.0), Button::Primary);
    core.on_pointer_move(pt(320.0, 200.0));
    core.on_pointer_up(Button::Primary);
    assert_eq!(frame_of(&core, &id), (100.0, 100.0, 220.0, 100.0));

    // Rotate handle is now at (210, 76); center at (210, 150).
    core.on_pointer_down(pt(210.0, 76.0), Button::Primary);
    core.on_pointer_move(pt(300.0, 150.0));
    core.on_pointer_up(Button::Primary);
    assert!((core.element(&id).unwrap().rotation - 90.0).abs() < 1e-9);
}

#[test]
fn send_to_back_changes_which_element_is_grabbed() {
    let mut core = EngineCore::default();
    core.dispatch(Command::AddText { x: 280.0, y: 290.0, content: None });
    let text = core.selection().cloned().unwrap();
    core.dispatch(Command::AddImage {
        x: 300.0,
        y: 300.0,
        src: "photo.png".into(),
        original_width: 100.0,
        original_height: 50.0,
    });
    let image = core.selection().cloned().unwrap();

    core.on_pointer_down(pt(310.0, 310.0), Button::Primary);
    core.on_pointer_up(Button::Primary);
    assert_eq!(core.selection(), Some(&image));

    let text_z = core.element(&text).unwrap().z_index;
    core.dispatch(Command::SendToBack { id: image.clone() });
    assert_eq!(core.element(&image).unwrap().z_index, text_z - 1);

    core.on_pointer_down(pt(310.0, 310.0), Button::Primary);
    assert_eq!(core.selection(), Some(&text));
}
