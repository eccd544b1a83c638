//! # Document Storage
//!
//! Persistence collaborators for newsletter documents.
//!
//! The editor hands the current blocks (and global style) to a
//! [`SaveHandler`] on an explicit save. Storage is fire-and-forget from the
//! editor's point of view: a failed save is reported, never folded back into
//! editor state.
//!
//! Backends:
//! - **Memory**: records every save, for tests and previews
//! - **File**: a pretty-printed JSON document on disk
//!
//! ## On-disk shape
//!
//! ```json
//! { "blocks": [ { "id": "...", "kind": "text", "content": "..." } ],
//!   "globalStyle": { "fontFamily": "...", ... } }
//! ```

use crate::errors::StorageError;
use mailcraft_model::{Block, EditorState, GlobalStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// The persisted part of an [`EditorState`] (selection is session-only)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub global_style: GlobalStyle,
}

impl SavedDocument {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            blocks: state.blocks.clone(),
            global_style: state.global_style.clone(),
        }
    }

    pub fn into_state(self) -> EditorState {
        EditorState::with_blocks(self.blocks).with_global_style(self.global_style)
    }

    /// Parse and check structural invariants
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let doc: SavedDocument = serde_json::from_str(json)?;
        EditorState::with_blocks(doc.blocks.clone()).check_invariants()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Receives the document on explicit save
pub trait SaveHandler: Send {
    fn save(&mut self, blocks: &[Block], global_style: &GlobalStyle) -> Result<(), StorageError>;
}

/// In-memory store that keeps every saved revision
#[derive(Debug, Default)]
pub struct MemoryStore {
    saves: Vec<SavedDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saves(&self) -> &[SavedDocument] {
        &self.saves
    }

    pub fn last(&self) -> Option<&SavedDocument> {
        self.saves.last()
    }
}

impl SaveHandler for MemoryStore {
    fn save(&mut self, blocks: &[Block], global_style: &GlobalStyle) -> Result<(), StorageError> {
        self.saves.push(SavedDocument {
            blocks: blocks.to_vec(),
            global_style: global_style.clone(),
        });
        Ok(())
    }
}

/// JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the document from disk
    pub fn load(&self) -> Result<SavedDocument, StorageError> {
        let source = std::fs::read_to_string(&self.path)?;
        let doc = SavedDocument::from_json(&source)?;
        info!(path = %self.path.display(), blocks = doc.blocks.len(), "Loaded document");
        Ok(doc)
    }

    pub fn write(&self, doc: &SavedDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, doc.to_json()?)?;
        info!(path = %self.path.display(), blocks = doc.blocks.len(), "Saved document");
        Ok(())
    }
}

impl SaveHandler for JsonFileStore {
    fn save(&mut self, blocks: &[Block], global_style: &GlobalStyle) -> Result<(), StorageError> {
        self.write(&SavedDocument {
            blocks: blocks.to_vec(),
            global_style: global_style.clone(),
        })
    }
}
