//! # Edit Session
//!
//! Sole owner of the current [`EditorState`].
//!
//! Renderers and settings panels read snapshots and send requests; they
//! never mutate state directly. Every request results in at most one tree
//! engine call and at most one snapshot replacement. A request that cannot
//! be applied leaves the held snapshot pointer-equal to the previous one.

use crate::document::{JsonFileStore, SaveHandler, SavedDocument};
use crate::drag::{DragInterpreter, DragSource, DragState, EditRequest};
use crate::drop_targets::{DropTargets, Point};
use crate::errors::{DragError, EditorError, MutationError};
use crate::location::Destination;
use crate::mutations::{Mutation, MutationOutcome};
use crate::tree;
use mailcraft_model::{Block, BlockFactory, BlockId, EditorState, GlobalStylePatch};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct EditSession {
    /// Current snapshot
    state: Arc<EditorState>,

    /// Mints blocks for palette drops and duplicates
    factory: BlockFactory,

    drag: DragInterpreter,

    /// Drop targets registered by the renderer
    drop_targets: DropTargets,

    /// Increments on each applied change
    version: u64,

    /// Unsaved content changes
    dirty: bool,

    save_handler: Option<Box<dyn SaveHandler>>,
}

impl EditSession {
    pub fn new(state: EditorState) -> Self {
        Self {
            state: Arc::new(state),
            factory: BlockFactory::default(),
            drag: DragInterpreter::new(),
            drop_targets: DropTargets::new(),
            version: 0,
            dirty: false,
            save_handler: None,
        }
    }

    /// Open a file-backed session, saving back to the same file
    pub fn open(store: JsonFileStore) -> Result<Self, EditorError> {
        let state = store.load()?.into_state();
        Ok(Self::new(state).with_save_handler(store))
    }

    pub fn with_factory(mut self, factory: BlockFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_save_handler(mut self, handler: impl SaveHandler + 'static) -> Self {
        self.save_handler = Some(Box::new(handler));
        self
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<EditorState> {
        Arc::clone(&self.state)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.state.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn drop_targets(&self) -> &DropTargets {
        &self.drop_targets
    }

    pub fn drop_targets_mut(&mut self) -> &mut DropTargets {
        &mut self.drop_targets
    }

    /// Apply a mutation, reporting why it was rejected.
    ///
    /// On error, or when the mutation changes nothing, the snapshot is left
    /// exactly as it was. Returns the id of the block the mutation created,
    /// if any.
    #[instrument(
        skip(self, mutation),
        fields(mutation = mutation.name(), version = self.version)
    )]
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<BlockId>, MutationError> {
        let MutationOutcome { state, created } =
            mutation.apply(&self.state, &mut self.factory)?;
        if state != *self.state {
            self.commit(state, mutation.touches_content());
        } else {
            debug!("Mutation left the document as it was");
        }
        Ok(created)
    }

    /// Select a block. Unknown ids and `None` clear the selection.
    pub fn select(&mut self, id: Option<&BlockId>) {
        self.apply_quietly(Mutation::Select {
            block_id: id.cloned(),
        });
    }

    pub fn update_block(&mut self, id: &BlockId, fields: Map<String, Value>) -> bool {
        self.apply_quietly(Mutation::UpdateBlock {
            block_id: id.clone(),
            fields,
        })
    }

    pub fn set_block_style(&mut self, id: &BlockId, property: &str, value: &str) -> bool {
        self.apply_quietly(Mutation::SetStyle {
            block_id: id.clone(),
            property: property.to_string(),
            value: value.to_string(),
        })
    }

    /// Delete a block; clears the selection if it pointed at it
    pub fn delete_block(&mut self, id: &BlockId) -> bool {
        self.apply_quietly(Mutation::RemoveBlock { block_id: id.clone() })
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Option<BlockId> {
        self.apply(Mutation::DuplicateBlock { block_id: id.clone() })
            .map_err(|err| debug!(error = %err, "Duplicate left document unchanged"))
            .ok()
            .flatten()
    }

    pub fn set_global_style(&mut self, patch: GlobalStylePatch) {
        if !patch.is_empty() {
            self.apply_quietly(Mutation::SetGlobalStyle { patch });
        }
    }

    /// The selected block, if any
    pub fn resolve_selected_block(&self) -> Option<&Block> {
        let selected = self.state.selected_block_id.as_ref()?;
        tree::locate(&self.state, selected).map(|(block, _)| block)
    }

    pub fn drag_start(&mut self, source: DragSource) -> Result<(), DragError> {
        self.drag.on_drag_start(source)
    }

    /// Destination to highlight while hovering
    pub fn drag_over(&self, pointer: Point) -> Option<Destination> {
        self.drag.on_drag_over(pointer, &self.drop_targets)
    }

    /// Release at `pointer`, resolved against the registered drop targets.
    /// Returns whether the document changed.
    pub fn drag_end(&mut self, pointer: Option<Point>) -> bool {
        let request = self.drag.on_drag_end_at(pointer, &self.drop_targets);
        self.dispatch(request)
    }

    /// Release with an already-resolved destination.
    /// Returns whether the document changed.
    #[instrument(skip(self))]
    pub fn handle_drag_end(&mut self, resolved: Option<Destination>) -> bool {
        let request = self.drag.on_drag_end(resolved);
        self.dispatch(request)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Hand the current blocks to the save handler.
    ///
    /// Fire-and-forget: failures are logged and the editor carries on.
    pub fn save(&mut self) {
        if let Err(err) = self.save_now() {
            warn!(error = %err, "Save failed");
        }
    }

    /// Save and report the outcome
    pub fn save_now(&mut self) -> Result<(), EditorError> {
        let handler = self.save_handler.as_mut().ok_or(EditorError::NoSaveHandler)?;
        handler.save(&self.state.blocks, &self.state.global_style)?;
        self.dirty = false;
        Ok(())
    }

    /// The persisted form of the current snapshot
    pub fn to_saved_document(&self) -> SavedDocument {
        SavedDocument::from_state(&self.state)
    }

    fn dispatch(&mut self, request: Option<EditRequest>) -> bool {
        match request {
            Some(request) => self.apply_quietly(request.into()),
            None => false,
        }
    }

    fn apply_quietly(&mut self, mutation: Mutation) -> bool {
        let name = mutation.name();
        match self.apply(mutation) {
            Ok(_) => true,
            Err(err) => {
                debug!(mutation = name, error = %err, "Request left document unchanged");
                false
            }
        }
    }

    fn commit(&mut self, next: EditorState, touches_content: bool) {
        self.state = Arc::new(next);
        self.version += 1;
        if touches_content {
            self.dirty = true;
        }
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("version", &self.version)
            .field("dirty", &self.dirty)
            .field("blocks", &self.state.blocks.len())
            .field("drag", self.drag.state())
            .finish()
    }
}
