//! # Editor Mutations
//!
//! Serializable editing requests. Drag gestures, settings panels and edit
//! scripts all end up here, and [`Mutation::apply`] is the single place that
//! dispatches them to the tree engine.
//!
//! ## Semantics
//!
//! ### InsertBlock
//! - The block is always minted by the factory from a kind tag
//! - Placed after the anchor, or appended when the anchor is absent
//! - The new block becomes the selection
//!
//! ### MoveBlock
//! - Same id before and after
//! - Dropping onto the current position is rejected as a no-op
//! - `columns` blocks only move within the top level
//!
//! ### RemoveBlock
//! - Removes the block and anything nested in it
//! - Clears the selection if it pointed into the removed subtree

use crate::errors::MutationError;
use crate::location::Destination;
use crate::tree;
use mailcraft_model::{BlockFactory, BlockId, BlockKind, EditorState, GlobalStylePatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Create a block from the palette and drop it at `destination`
    InsertBlock {
        kind: BlockKind,
        destination: Destination,
    },

    #[serde(rename_all = "camelCase")]
    MoveBlock {
        block_id: BlockId,
        destination: Destination,
    },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { block_id: BlockId },

    /// Shallow-merge fields into a block
    #[serde(rename_all = "camelCase")]
    UpdateBlock {
        block_id: BlockId,
        fields: Map<String, Value>,
    },

    #[serde(rename_all = "camelCase")]
    SetStyle {
        block_id: BlockId,
        property: String,
        value: String,
    },

    #[serde(rename_all = "camelCase")]
    RemoveStyle { block_id: BlockId, property: String },

    SetGlobalStyle { patch: GlobalStylePatch },

    #[serde(rename_all = "camelCase")]
    Select {
        #[serde(default)]
        block_id: Option<BlockId>,
    },

    #[serde(rename_all = "camelCase")]
    DuplicateBlock { block_id: BlockId },
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The new snapshot
    pub state: EditorState,

    /// Id of the block the mutation created, if any
    pub created: Option<BlockId>,
}

impl MutationOutcome {
    fn changed(state: EditorState) -> Self {
        Self { state, created: None }
    }

    fn created(state: EditorState, id: BlockId) -> Self {
        Self {
            state,
            created: Some(id),
        }
    }
}

impl Mutation {
    /// Apply against `state`, which is left untouched
    pub fn apply(
        &self,
        state: &EditorState,
        factory: &mut BlockFactory,
    ) -> Result<MutationOutcome, MutationError> {
        match self {
            Mutation::InsertBlock { kind, destination } => {
                let block = factory.create(*kind);
                let id = block.id.clone();
                let mut next = tree::try_insert_at(state, destination, block)?;
                next.selected_block_id = Some(id.clone());
                Ok(MutationOutcome::created(next, id))
            }

            Mutation::MoveBlock { block_id, destination } => {
                tree::try_move_to(state, block_id, destination).map(MutationOutcome::changed)
            }

            Mutation::RemoveBlock { block_id } => {
                tree::try_remove(state, block_id).map(|(next, _)| MutationOutcome::changed(next))
            }

            Mutation::UpdateBlock { block_id, fields } => {
                tree::try_update(state, block_id, fields).map(MutationOutcome::changed)
            }

            Mutation::SetStyle { block_id, property, value } => {
                tree::try_set_style(state, block_id, property, value).map(MutationOutcome::changed)
            }

            Mutation::RemoveStyle { block_id, property } => {
                tree::try_remove_style(state, block_id, property).map(MutationOutcome::changed)
            }

            Mutation::SetGlobalStyle { patch } => {
                Ok(MutationOutcome::changed(tree::set_global_style(state, patch)))
            }

            Mutation::Select { block_id } => {
                Ok(MutationOutcome::changed(tree::select(state, block_id.as_ref())))
            }

            Mutation::DuplicateBlock { block_id } => {
                let (next, id) = tree::try_duplicate(state, block_id, factory)?;
                Ok(MutationOutcome::created(next, id))
            }
        }
    }

    /// Whether the mutation changes persisted content (selection is not persisted)
    pub fn touches_content(&self) -> bool {
        !matches!(self, Mutation::Select { .. })
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "insert_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::SetStyle { .. } => "set_style",
            Mutation::RemoveStyle { .. } => "remove_style",
            Mutation::SetGlobalStyle { .. } => "set_global_style",
            Mutation::Select { .. } => "select",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
        }
    }
}
