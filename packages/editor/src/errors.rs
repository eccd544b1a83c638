//! Error types for the editor

use mailcraft_model::{BlockId, ColumnId, InvariantViolation};
use thiserror::Error;

/// Why a tree request was not applied.
///
/// The interactive API never surfaces these: a failed request leaves the
/// document as it was. They exist so callers such as the CLI and tests can
/// tell *why* nothing happened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Columns blocks cannot be placed inside a column")]
    NestedColumns,

    #[error("Block {0} is already at that position")]
    NoOpMove(BlockId),

    #[error("Field cannot be changed: {0}")]
    ImmutableField(String),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Field `{0}` can only change through insert, move or remove")]
    StructuralField(String),

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    Invalid(#[from] InvariantViolation),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DragError {
    #[error("A drag is already in progress")]
    AlreadyDragging,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Drag error: {0}")]
    Drag(#[from] DragError),

    #[error("No save handler configured")]
    NoSaveHandler,
}
