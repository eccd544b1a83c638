//! Drag lifecycle and closest-center drop resolution

use mailcraft_editor::{
    Container, Destination, DragError, DragInterpreter, DragSource, DragState, DropTargets,
    EditRequest, Placement, Point, Rect,
};
use mailcraft_model::{BlockId, BlockKind, ColumnId};

/// Canvas with two top-level blocks, and a two-column row below them:
///
/// ```text
///   y=0   ┌──────────── h1 ────────────┐
///   y=100 ├──────────── t1 ────────────┤
///   y=200 ├──── c1 ─────┬───── c2 ─────┤
///         │  [a1]       │  (empty)     │
///   y=400 └─────────────┴──────────────┘
/// ```
fn layout() -> DropTargets {
    let mut targets = DropTargets::new();
    targets.register_canvas(Rect::new(0.0, 0.0, 600.0, 400.0));
    targets.register_anchor("h1", Container::Canvas, Rect::new(0.0, 0.0, 600.0, 100.0));
    targets.register_anchor("t1", Container::Canvas, Rect::new(0.0, 100.0, 600.0, 100.0));
    targets.register_column("c1", Rect::new(0.0, 200.0, 300.0, 200.0));
    targets.register_column("c2", Rect::new(300.0, 200.0, 300.0, 200.0));
    targets.register_anchor(
        "a1",
        Container::Column(ColumnId::new("c1")),
        Rect::new(0.0, 200.0, 300.0, 60.0),
    );
    targets
}

#[test]
fn test_release_over_block_lands_after_it() {
    let targets = layout();

    assert_eq!(
        targets.resolve(Point::new(300.0, 140.0)),
        Some(Destination::canvas_after("t1"))
    );
    assert_eq!(
        targets.resolve(Point::new(300.0, 40.0)),
        Some(Destination::canvas_after("h1"))
    );
}

#[test]
fn test_release_over_empty_column_appends() {
    let targets = layout();

    assert_eq!(
        targets.resolve(Point::new(450.0, 300.0)),
        Some(Destination::column_end("c2"))
    );
}

#[test]
fn test_column_container_uses_its_own_anchors() {
    let targets = layout();

    // Nearest target is c1's zone; the only anchor in c1 is a1
    let resolved = targets.resolve(Point::new(150.0, 320.0)).unwrap();

    assert_eq!(resolved.container, Container::Column(ColumnId::new("c1")));
    assert_eq!(resolved.placement, Placement::After(BlockId::new("a1")));
}

#[test]
fn test_closest_center_picks_single_container() {
    let targets = layout();

    let closest = targets.closest(Point::new(149.0, 301.0)).unwrap();
    assert_eq!(closest.kind.container(), Container::Column(ColumnId::new("c1")));
}

#[test]
fn test_full_palette_gesture() {
    let targets = layout();
    let mut drag = DragInterpreter::new();

    drag.on_drag_start(DragSource::Palette(BlockKind::Button)).unwrap();
    assert!(drag.is_dragging());

    // Hovering reports but does not end the session
    assert_eq!(
        drag.on_drag_over(Point::new(450.0, 300.0), &targets),
        Some(Destination::column_end("c2"))
    );
    assert!(drag.is_dragging());

    let request = drag.on_drag_end_at(Some(Point::new(450.0, 300.0)), &targets);
    assert_eq!(
        request,
        Some(EditRequest::InsertNew {
            kind: BlockKind::Button,
            destination: Destination::column_end("c2"),
        })
    );
    assert_eq!(drag.state(), &DragState::Idle);
}

#[test]
fn test_tree_gesture_requests_move() {
    let targets = layout();
    let mut drag = DragInterpreter::new();

    drag.on_drag_start(DragSource::Tree(BlockId::new("h1"))).unwrap();
    let request = drag.on_drag_end_at(Some(Point::new(300.0, 140.0)), &targets);

    assert_eq!(
        request,
        Some(EditRequest::Move {
            block_id: BlockId::new("h1"),
            destination: Destination::canvas_after("t1"),
        })
    );
}

#[test]
fn test_release_outside_editor_cancels() {
    let targets = layout();
    let mut drag = DragInterpreter::new();

    drag.on_drag_start(DragSource::Tree(BlockId::new("h1"))).unwrap();
    assert_eq!(drag.on_drag_end_at(None, &targets), None);
    assert_eq!(drag.state(), &DragState::Idle);

    // Idempotent
    assert_eq!(drag.on_drag_end_at(None, &targets), None);
}

#[test]
fn test_release_with_no_registered_targets_cancels() {
    let mut drag = DragInterpreter::new();

    drag.on_drag_start(DragSource::Palette(BlockKind::Text)).unwrap();
    assert_eq!(drag.on_drag_end_at(Some(Point::new(10.0, 10.0)), &DropTargets::new()), None);
    assert!(!drag.is_dragging());
}

#[test]
fn test_hover_while_idle_reports_nothing() {
    let drag = DragInterpreter::new();
    assert_eq!(drag.on_drag_over(Point::new(300.0, 40.0), &layout()), None);
}

#[test]
fn test_new_drag_waits_for_current_one() {
    let mut drag = DragInterpreter::new();
    drag.on_drag_start(DragSource::Palette(BlockKind::Text)).unwrap();

    assert_eq!(
        drag.on_drag_start(DragSource::Palette(BlockKind::Image)),
        Err(DragError::AlreadyDragging)
    );

    drag.cancel();
    assert!(drag.on_drag_start(DragSource::Palette(BlockKind::Image)).is_ok());
}
