//! Drop-target registry and closest-center resolution.
//!
//! The rendering layer registers the bounding box of every place a block can
//! land: the canvas, each column's drop zone, and each existing block (which
//! acts as an "insert after me" anchor). On release, the target whose center
//! is nearest the pointer picks the container; within that container the
//! nearest anchor picks the placement.

use crate::location::{Container, Destination, Placement};
use mailcraft_model::{BlockId, ColumnId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    /// The top-level canvas
    Canvas,
    /// The drop zone of one column
    ColumnZone(ColumnId),
    /// An existing block, inside `container`
    #[serde(rename_all = "camelCase")]
    Anchor { block_id: BlockId, container: Container },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub kind: TargetKind,
    pub rect: Rect,
}

/// Targets currently registered by the renderer, in registration order
#[derive(Debug, Clone, Default)]
pub struct DropTargets {
    targets: Vec<DropTarget>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl TargetKind {
    pub fn container(&self) -> Container {
        match self {
            TargetKind::Canvas => Container::Canvas,
            TargetKind::ColumnZone(column_id) => Container::Column(column_id.clone()),
            TargetKind::Anchor { container, .. } => container.clone(),
        }
    }
}

impl DropTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: TargetKind, rect: Rect) {
        self.targets.push(DropTarget { kind, rect });
    }

    pub fn register_canvas(&mut self, rect: Rect) {
        self.register(TargetKind::Canvas, rect);
    }

    pub fn register_column(&mut self, column_id: impl Into<ColumnId>, rect: Rect) {
        self.register(TargetKind::ColumnZone(column_id.into()), rect);
    }

    pub fn register_anchor(
        &mut self,
        block_id: impl Into<BlockId>,
        container: Container,
        rect: Rect,
    ) {
        self.register(
            TargetKind::Anchor {
                block_id: block_id.into(),
                container,
            },
            rect,
        );
    }

    /// Forget the anchor registered for `block_id`
    pub fn unregister_block(&mut self, block_id: &BlockId) {
        self.targets
            .retain(|t| {
                !matches!(&t.kind, TargetKind::Anchor { block_id: id, .. } if id == block_id)
            });
    }

    /// Forget a column's drop zone and every anchor inside it
    pub fn unregister_column(&mut self, column_id: &ColumnId) {
        let container = Container::Column(column_id.clone());
        self.targets.retain(|t| t.kind.container() != container);
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropTarget> {
        self.targets.iter()
    }

    /// The target whose center is nearest `pointer`. Ties go to the
    /// earliest registration.
    pub fn closest(&self, pointer: Point) -> Option<&DropTarget> {
        nearest(self.targets.iter(), pointer)
    }

    /// Resolve a pointer position to a destination.
    ///
    /// Exactly one container receives the drop. Within it, the nearest
    /// anchor gives an "after" placement; with no anchors the block is
    /// appended.
    pub fn resolve(&self, pointer: Point) -> Option<Destination> {
        let container = self.closest(pointer)?.kind.container();

        let anchors = self
            .targets
            .iter()
            .filter(|t| {
                matches!(t.kind, TargetKind::Anchor { .. }) && t.kind.container() == container
            });

        let placement = match nearest(anchors, pointer).map(|t| &t.kind) {
            Some(TargetKind::Anchor { block_id, .. }) => Placement::After(block_id.clone()),
            _ => Placement::Append,
        };

        Some(Destination::new(container, placement))
    }
}

fn nearest<'a>(
    targets: impl Iterator<Item = &'a DropTarget>,
    pointer: Point,
) -> Option<&'a DropTarget> {
    targets.min_by(|a, b| {
        a.rect
            .center()
            .distance_sq(&pointer)
            .total_cmp(&b.rect.center().distance_sq(&pointer))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        assert_eq!(Rect::new(10.0, 20.0, 100.0, 40.0).center(), Point::new(60.0, 40.0));
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        assert_eq!(DropTargets::new().resolve(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let mut targets = DropTargets::new();
        targets.register_column("c1", Rect::new(0.0, 0.0, 10.0, 10.0));
        targets.register_column("c2", Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(
            targets.resolve(Point::new(5.0, 5.0)),
            Some(Destination::column_end("c1"))
        );
    }

    #[test]
    fn test_unregister_column_drops_its_anchors() {
        let mut targets = DropTargets::new();
        targets.register_canvas(Rect::new(0.0, 0.0, 600.0, 800.0));
        targets.register_column("c1", Rect::new(0.0, 0.0, 300.0, 100.0));
        targets.register_anchor(
            "b1",
            Container::Column(ColumnId::new("c1")),
            Rect::new(0.0, 0.0, 300.0, 50.0),
        );

        targets.unregister_column(&ColumnId::new("c1"));
        assert_eq!(targets.len(), 1);

        targets.unregister_block(&BlockId::new("b1"));
        assert_eq!(targets.len(), 1);
    }
}
