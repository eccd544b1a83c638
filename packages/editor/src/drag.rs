//! # Drag Interpreter
//!
//! Turns the drag lifecycle (start, over, end) into at most one semantic
//! edit request per gesture.
//!
//! ```text
//!            on_drag_start(source)
//!   Idle ─────────────────────────────▶ Dragging(source)
//!    ▲                                      │
//!    └──────────────────────────────────────┘
//!      on_drag_end(destination?) / cancel()
//! ```
//!
//! Hovering never touches the document; it only reports where the block
//! would land so the renderer can highlight it.

use crate::drop_targets::{DropTargets, Point};
use crate::errors::DragError;
use crate::location::Destination;
use crate::mutations::Mutation;
use mailcraft_model::{BlockId, BlockKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragSource {
    /// A new block of this kind, from the palette
    Palette(BlockKind),
    /// An existing block, picked up from the tree
    Tree(BlockId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSource),
}

/// The request a completed drag hands to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    /// Create via the factory, insert at `destination`, select it
    InsertNew { kind: BlockKind, destination: Destination },
    /// Relocate an existing block; selection unchanged
    Move { block_id: BlockId, destination: Destination },
}

impl From<EditRequest> for Mutation {
    fn from(request: EditRequest) -> Self {
        match request {
            EditRequest::InsertNew { kind, destination } => {
                Mutation::InsertBlock { kind, destination }
            }
            EditRequest::Move { block_id, destination } => {
                Mutation::MoveBlock { block_id, destination }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DragInterpreter {
    state: DragState,
}

impl DragInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Begin a drag session. A session already in progress is kept.
    pub fn on_drag_start(&mut self, source: DragSource) -> Result<(), DragError> {
        if self.is_dragging() {
            return Err(DragError::AlreadyDragging);
        }

        debug!(?source, "Drag started");
        self.state = DragState::Dragging(source);
        Ok(())
    }

    /// Where the dragged block would land if released at `pointer`
    pub fn on_drag_over(&self, pointer: Point, targets: &DropTargets) -> Option<Destination> {
        if !self.is_dragging() {
            return None;
        }
        targets.resolve(pointer)
    }

    /// Finish the session. Emits a request only when a destination was
    /// resolved; ending while idle does nothing.
    pub fn on_drag_end(&mut self, resolved: Option<Destination>) -> Option<EditRequest> {
        let DragState::Dragging(source) = std::mem::take(&mut self.state) else {
            return None;
        };

        let Some(destination) = resolved else {
            debug!(?source, "Drag released outside any target");
            return None;
        };

        let request = match source {
            DragSource::Palette(kind) => EditRequest::InsertNew { kind, destination },
            DragSource::Tree(block_id) => EditRequest::Move { block_id, destination },
        };
        debug!(?request, "Drag resolved");

        Some(request)
    }

    /// Finish the session at a pointer position, resolving the destination
    /// against the registered targets. `None` means the pointer left the
    /// editor entirely.
    pub fn on_drag_end_at(
        &mut self,
        pointer: Option<Point>,
        targets: &DropTargets,
    ) -> Option<EditRequest> {
        let resolved = pointer.and_then(|p| targets.resolve(p));
        self.on_drag_end(resolved)
    }

    /// Abandon the session without a request
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
