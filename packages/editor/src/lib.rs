//! # Mailcraft Editor
//!
//! Block-tree editing engine for newsletter documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ renderer: pointer events, drop-target rects │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ drag: Idle/Dragging machine → EditRequest   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: owns the snapshot, applies         │
//! │ mutations, tracks version and dirty state   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tree: pure insert/remove/move/update        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every change yields a new `EditorState`
//! 2. **Failures are no-ops**: an unresolvable request leaves the document as it was
//! 3. **Identity is stable**: moves never recreate blocks
//! 4. **Blocks come from the factory**: the palette only sends kind tags
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailcraft_editor::{Destination, DragSource, EditSession};
//! use mailcraft_model::{BlockKind, EditorState};
//!
//! let mut session = EditSession::new(EditorState::new());
//!
//! session.drag_start(DragSource::Palette(BlockKind::Text))?;
//! session.handle_drag_end(Some(Destination::canvas_end()));
//!
//! let selected = session.resolve_selected_block();
//! ```

mod document;
mod drag;
mod drop_targets;
mod errors;
mod location;
mod mutations;
mod session;
pub mod tree;

pub use document::{JsonFileStore, MemoryStore, SaveHandler, SavedDocument};
pub use drag::{DragInterpreter, DragSource, DragState, EditRequest};
pub use drop_targets::{DropTarget, DropTargets, Point, Rect, TargetKind};
pub use errors::{DragError, EditorError, MutationError, StorageError};
pub use location::{Container, Destination, Location, Placement};
pub use mutations::{Mutation, MutationOutcome};
pub use session::EditSession;

// Re-export model types for convenience
pub use mailcraft_model as model;
pub use mailcraft_model::{Block, BlockId, BlockKind, ColumnId, EditorState};
