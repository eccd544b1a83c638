//! # Block Tree Engine
//!
//! Pure functions over [`EditorState`] snapshots: locate, insert, remove,
//! move, update. The input is never modified; every change produces a new
//! snapshot so earlier ones stay valid.
//!
//! Each operation comes in two flavours:
//!
//! - `try_*` returns `Err(MutationError)` describing why a request could not
//!   be applied.
//! - The plain variant degrades any failure to "document unchanged" and logs
//!   the reason at `debug` level. This is what interactive callers use: an
//!   unresolvable drag must never corrupt or crash the document.
//!
//! ## Move semantics
//!
//! Destination indices are expressed against the sequence *before* the
//! moved block is taken out. When source and destination share a container
//! and the destination lies after the source, the index is shifted down by
//! one. If the shifted position equals the source position the move is a
//! no-op.
//!
//! ```text
//! [A, B, C]  move A to Top(3)  →  remove A → [B, C]  insert at 2 → [B, C, A]
//! ```

use crate::errors::MutationError;
use crate::location::{Container, Destination, Location, Placement};
use mailcraft_model::{Block, BlockFactory, BlockId, EditorState, GlobalStylePatch};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

pub type TreeResult<T> = Result<T, MutationError>;

/// Find a block anywhere in the tree.
///
/// Scans the top level first, then each column of each `columns` block.
pub fn locate<'a>(state: &'a EditorState, id: &BlockId) -> Option<(&'a Block, Location)> {
    if let Some(index) = state.blocks.iter().position(|b| &b.id == id) {
        return Some((&state.blocks[index], Location::Top(index)));
    }

    state.iter_columns().find_map(|column| {
        column
            .blocks
            .iter()
            .position(|b| &b.id == id)
            .map(|index| (&column.blocks[index], Location::in_column(column.id.clone(), index)))
    })
}

/// Turn a drop destination into a concrete location.
///
/// After the anchor when the anchor is in the container, otherwise at the
/// end of the container.
pub fn resolve_destination(state: &EditorState, destination: &Destination) -> TreeResult<Location> {
    let seq = sequence(state, &destination.container)?;

    let index = match &destination.placement {
        Placement::After(anchor) => seq
            .iter()
            .position(|b| &b.id == anchor)
            .map(|i| i + 1)
            .unwrap_or(seq.len()),
        Placement::Append => seq.len(),
    };

    Ok(destination.container.at(index))
}

pub fn try_insert(
    state: &EditorState,
    location: &Location,
    block: Block,
) -> TreeResult<EditorState> {
    check_placeable(&block, location)?;
    check_fresh_ids(state, &block)?;
    sequence(state, &location.container())?;

    let mut next = state.clone();
    let seq = sequence_mut(&mut next, &location.container())?;
    let index = location.index().min(seq.len());
    seq.insert(index, block);

    Ok(next)
}

pub fn try_insert_at(
    state: &EditorState,
    destination: &Destination,
    block: Block,
) -> TreeResult<EditorState> {
    let location = resolve_destination(state, destination)?;
    try_insert(state, &location, block)
}

/// Remove a block, returning the new snapshot and the removed block.
///
/// Clears the selection when it pointed at the removed block or at anything
/// nested inside it.
pub fn try_remove(state: &EditorState, id: &BlockId) -> TreeResult<(EditorState, Block)> {
    let (_, location) = find(state, id)?;

    let mut next = state.clone();
    let removed = sequence_mut(&mut next, &location.container())?.remove(location.index());

    let selection_removed = next
        .selected_block_id
        .as_ref()
        .is_some_and(|selected| removed.block_ids().contains(&selected));
    if selection_removed {
        next.selected_block_id = None;
    }

    Ok((next, removed))
}

pub fn try_move(
    state: &EditorState,
    id: &BlockId,
    destination: &Location,
) -> TreeResult<EditorState> {
    let (block, source) = find(state, id)?;

    if block.is_columns() && destination.is_in_column() {
        return Err(MutationError::NestedColumns);
    }

    let target_len = sequence(state, &destination.container())?.len();
    let same_container = source.container() == destination.container();

    let mut index = destination.index().min(target_len);
    if same_container && index > source.index() {
        index -= 1;
    }
    if same_container && index == source.index() {
        return Err(MutationError::NoOpMove(id.clone()));
    }

    let mut next = state.clone();
    let moved = sequence_mut(&mut next, &source.container())?.remove(source.index());
    sequence_mut(&mut next, &destination.container())?.insert(index, moved);

    Ok(next)
}

pub fn try_move_to(
    state: &EditorState,
    id: &BlockId,
    destination: &Destination,
) -> TreeResult<EditorState> {
    let location = resolve_destination(state, destination)?;
    try_move(state, id, &location)
}

/// Shallow-merge `fields` into the block's wire representation.
///
/// `id` and `kind` cannot be patched. Fields the block kind does not have
/// are rejected, as is any merge that fails to decode or breaks a tree
/// invariant. On a `columns` block only column widths can change: blocks
/// enter and leave columns through insert, move and remove.
pub fn try_update(
    state: &EditorState,
    id: &BlockId,
    fields: &Map<String, Value>,
) -> TreeResult<EditorState> {
    if let Some(key) = fields.keys().find(|k| *k == "id" || *k == "kind") {
        return Err(MutationError::ImmutableField(key.clone()));
    }

    let (block, location) = find(state, id)?;

    let mut value = serde_json::to_value(block).map_err(invalid_patch)?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| MutationError::InvalidPatch("block is not an object".to_string()))?;
    for (key, field) in fields {
        object.insert(key.clone(), field.clone());
    }

    let updated: Block = serde_json::from_value(value).map_err(invalid_patch)?;

    let round_trip = serde_json::to_value(&updated).map_err(invalid_patch)?;
    let kind = updated.kind();
    let unknown = fields.iter().find(|(key, field)| {
        let known = if field.is_null() {
            *key == "style" || kind.optional_fields().contains(&key.as_str())
        } else {
            round_trip.get(key.as_str()).is_some()
        };
        !known
    });
    if let Some((key, _)) = unknown {
        return Err(MutationError::InvalidPatch(format!(
            "{} blocks have no field `{}`",
            kind, key
        )));
    }

    check_same_columns(block, &updated)?;

    let mut next = replace_at(state, &location, updated)?;
    let selection_gone = next
        .selected_block_id
        .as_ref()
        .is_some_and(|selected| !next.contains_block(selected));
    if selection_gone {
        next.selected_block_id = None;
    }
    next.check_invariants()?;

    Ok(next)
}

pub fn try_set_style(
    state: &EditorState,
    id: &BlockId,
    property: &str,
    value: &str,
) -> TreeResult<EditorState> {
    let (block, location) = find(state, id)?;

    let mut updated = block.clone();
    updated
        .style
        .get_or_insert_with(Default::default)
        .insert(property.to_string(), value.to_string());

    replace_at(state, &location, updated)
}

pub fn try_remove_style(
    state: &EditorState,
    id: &BlockId,
    property: &str,
) -> TreeResult<EditorState> {
    let (block, location) = find(state, id)?;

    let mut updated = block.clone();
    let style = updated
        .style
        .as_mut()
        .filter(|style| style.contains_key(property))
        .ok_or_else(|| MutationError::InvalidPatch(format!("no style property `{}`", property)))?;
    style.remove(property);
    if style.is_empty() {
        updated.style = None;
    }

    replace_at(state, &location, updated)
}

/// Insert a fresh-id copy right after the original, in the same container
pub fn try_duplicate(
    state: &EditorState,
    id: &BlockId,
    factory: &mut BlockFactory,
) -> TreeResult<(EditorState, BlockId)> {
    let (block, location) = find(state, id)?;

    let copy = factory.duplicate(block);
    let copy_id = copy.id.clone();
    let next = try_insert(state, &location.with_index(location.index() + 1), copy)?;

    Ok((next, copy_id))
}

pub fn insert(state: &EditorState, location: &Location, block: Block) -> EditorState {
    unchanged_on_err(state, "insert", try_insert(state, location, block))
}

pub fn insert_at(state: &EditorState, destination: &Destination, block: Block) -> EditorState {
    unchanged_on_err(state, "insert", try_insert_at(state, destination, block))
}

pub fn remove(state: &EditorState, id: &BlockId) -> EditorState {
    unchanged_on_err(state, "remove", try_remove(state, id).map(|(next, _)| next))
}

pub fn move_block(state: &EditorState, id: &BlockId, destination: &Location) -> EditorState {
    unchanged_on_err(state, "move", try_move(state, id, destination))
}

pub fn move_to(state: &EditorState, id: &BlockId, destination: &Destination) -> EditorState {
    unchanged_on_err(state, "move", try_move_to(state, id, destination))
}

pub fn update(state: &EditorState, id: &BlockId, fields: &Map<String, Value>) -> EditorState {
    unchanged_on_err(state, "update", try_update(state, id, fields))
}

pub fn set_style(state: &EditorState, id: &BlockId, property: &str, value: &str) -> EditorState {
    unchanged_on_err(state, "set_style", try_set_style(state, id, property, value))
}

pub fn remove_style(state: &EditorState, id: &BlockId, property: &str) -> EditorState {
    unchanged_on_err(state, "remove_style", try_remove_style(state, id, property))
}

/// Returns the copy's id alongside the new snapshot, `None` when nothing was copied
pub fn duplicate(
    state: &EditorState,
    id: &BlockId,
    factory: &mut BlockFactory,
) -> (EditorState, Option<BlockId>) {
    match try_duplicate(state, id, factory) {
        Ok((next, copy_id)) => (next, Some(copy_id)),
        Err(err) => {
            debug!(op = "duplicate", error = %err, "Request left document unchanged");
            (state.clone(), None)
        }
    }
}

pub fn set_global_style(state: &EditorState, patch: &GlobalStylePatch) -> EditorState {
    let mut next = state.clone();
    next.global_style = state.global_style.merged(patch);
    next
}

/// Select a block, or clear the selection when `id` is `None` or unknown
pub fn select(state: &EditorState, id: Option<&BlockId>) -> EditorState {
    let mut next = state.clone();
    next.selected_block_id = id.filter(|id| state.contains_block(id)).cloned();
    next
}

fn unchanged_on_err(
    state: &EditorState,
    op: &'static str,
    result: TreeResult<EditorState>,
) -> EditorState {
    result.unwrap_or_else(|err| {
        debug!(op, error = %err, "Request left document unchanged");
        state.clone()
    })
}

fn sequence<'a>(state: &'a EditorState, container: &Container) -> TreeResult<&'a Vec<Block>> {
    match container {
        Container::Canvas => Ok(&state.blocks),
        Container::Column(column_id) => state
            .find_column(column_id)
            .map(|column| &column.blocks)
            .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone())),
    }
}

fn sequence_mut<'a>(
    state: &'a mut EditorState,
    container: &Container,
) -> TreeResult<&'a mut Vec<Block>> {
    match container {
        Container::Canvas => Ok(&mut state.blocks),
        Container::Column(column_id) => state
            .blocks
            .iter_mut()
            .filter_map(|block| block.columns_mut())
            .flat_map(|columns| columns.iter_mut())
            .find(|column| &column.id == column_id)
            .map(|column| &mut column.blocks)
            .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone())),
    }
}

fn find<'a>(state: &'a EditorState, id: &BlockId) -> TreeResult<(&'a Block, Location)> {
    locate(state, id).ok_or_else(|| MutationError::BlockNotFound(id.clone()))
}

fn invalid_patch(err: serde_json::Error) -> MutationError {
    MutationError::InvalidPatch(err.to_string())
}

/// An update may resize columns but never add, drop or reorder them, nor
/// touch the blocks they hold.
fn check_same_columns(before: &Block, after: &Block) -> TreeResult<()> {
    let (Some(before), Some(after)) = (before.columns(), after.columns()) else {
        return Ok(());
    };

    let same = before.len() == after.len()
        && before
            .iter()
            .zip(after)
            .all(|(old, new)| old.id == new.id && old.blocks == new.blocks);

    if same {
        Ok(())
    } else {
        Err(MutationError::StructuralField("columns".to_string()))
    }
}

/// Targeted replace of the block at `location`
fn replace_at(state: &EditorState, location: &Location, block: Block) -> TreeResult<EditorState> {
    let mut next = state.clone();
    let id = block.id.clone();
    let slot = sequence_mut(&mut next, &location.container())?
        .get_mut(location.index())
        .ok_or(MutationError::BlockNotFound(id))?;
    *slot = block;
    Ok(next)
}

fn check_placeable(block: &Block, location: &Location) -> TreeResult<()> {
    let Some(columns) = block.columns() else {
        return Ok(());
    };

    if location.is_in_column() || columns.iter().flat_map(|c| &c.blocks).any(Block::is_columns) {
        return Err(MutationError::NestedColumns);
    }

    Ok(())
}

fn check_fresh_ids(state: &EditorState, block: &Block) -> TreeResult<()> {
    let mut seen = HashSet::new();
    for id in block.block_ids() {
        if !seen.insert(id) || state.contains_block(id) {
            return Err(MutationError::DuplicateId(id.to_string()));
        }
    }

    let mut seen_columns = HashSet::new();
    for column in block.columns().unwrap_or_default() {
        if !seen_columns.insert(&column.id) || state.find_column(&column.id).is_some() {
            return Err(MutationError::DuplicateId(column.id.to_string()));
        }
    }

    Ok(())
}
