//! Whole-document snapshot and its structural invariants.

use crate::block::{Block, Column};
use crate::ids::{BlockId, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Document-wide style defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStyle {
    pub font_family: String,
    pub background_color: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub content_width: String,
}

impl Default for GlobalStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            background_color: "#ffffff".to_string(),
            primary_color: "#2563eb".to_string(),
            secondary_color: "#64748b".to_string(),
            content_width: "600px".to_string(),
        }
    }
}

/// Partial update for [`GlobalStyle`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_width: Option<String>,
}

impl GlobalStylePatch {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.background_color.is_none()
            && self.primary_color.is_none()
            && self.secondary_color.is_none()
            && self.content_width.is_none()
    }
}

impl GlobalStyle {
    pub fn merged(&self, patch: &GlobalStylePatch) -> Self {
        let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());

        Self {
            font_family: pick(&patch.font_family, &self.font_family),
            background_color: pick(&patch.background_color, &self.background_color),
            primary_color: pick(&patch.primary_color, &self.primary_color),
            secondary_color: pick(&patch.secondary_color, &self.secondary_color),
            content_width: pick(&patch.content_width, &self.content_width),
        }
    }
}

/// A broken structural invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),

    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(ColumnId),

    #[error("Column {column_id} contains columns block {block_id}")]
    NestedColumns {
        column_id: ColumnId,
        block_id: BlockId,
    },

    #[error("Selected block {0} does not exist")]
    DanglingSelection(BlockId),
}

/// The whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_block_id: Option<BlockId>,

    #[serde(default)]
    pub global_style: GlobalStyle,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    pub fn with_global_style(mut self, global_style: GlobalStyle) -> Self {
        self.global_style = global_style;
        self
    }

    /// Every block, top level first then the contents of each column
    pub fn iter_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().chain(self.iter_columns().flat_map(|c| c.blocks.iter()))
    }

    /// Every column of every `columns` block, in document order
    pub fn iter_columns(&self) -> impl Iterator<Item = &Column> {
        self.blocks
            .iter()
            .filter_map(|b| b.columns())
            .flat_map(|cols| cols.iter())
    }

    /// Total number of blocks, nested ones included
    pub fn block_count(&self) -> usize {
        self.iter_blocks().count()
    }

    pub fn find_block(&self, id: &BlockId) -> Option<&Block> {
        self.iter_blocks().find(|b| &b.id == id)
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.find_block(id).is_some()
    }

    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.iter_columns().find(|c| &c.id == id)
    }

    /// Check all structural invariants, reporting the first violation
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut block_ids = HashSet::new();
        for block in self.iter_blocks() {
            if !block_ids.insert(&block.id) {
                return Err(InvariantViolation::DuplicateBlockId(block.id.clone()));
            }
        }

        let mut column_ids = HashSet::new();
        for column in self.iter_columns() {
            if !column_ids.insert(&column.id) {
                return Err(InvariantViolation::DuplicateColumnId(column.id.clone()));
            }

            if let Some(nested) = column.blocks.iter().find(|b| b.is_columns()) {
                return Err(InvariantViolation::NestedColumns {
                    column_id: column.id.clone(),
                    block_id: nested.id.clone(),
                });
            }
        }

        if let Some(selected) = &self.selected_block_id {
            if !block_ids.contains(selected) {
                return Err(InvariantViolation::DanglingSelection(selected.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockContent;

    fn text(id: &str) -> Block {
        Block::new(id, BlockContent::Text { content: id.to_string() })
    }

    fn columns(id: &str, cols: Vec<Column>) -> Block {
        Block::new(id, BlockContent::Columns { columns: cols })
    }

    #[test]
    fn test_counts_nested_blocks() {
        let state = EditorState::with_blocks(vec![
            text("a"),
            columns(
                "cols",
                vec![
                    Column::new("c1", "50%").with_blocks(vec![text("b"), text("c")]),
                    Column::new("c2", "50%"),
                ],
            ),
        ]);

        assert_eq!(state.block_count(), 4);
        assert!(state.contains_block(&BlockId::new("c")));
        assert!(state.find_column(&ColumnId::new("c2")).is_some());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_detects_duplicate_ids_across_levels() {
        let state = EditorState::with_blocks(vec![
            text("a"),
            columns("cols", vec![Column::new("c1", "100%").with_blocks(vec![text("a")])]),
        ]);

        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DuplicateBlockId(BlockId::new("a")))
        );
    }

    #[test]
    fn test_detects_nested_columns() {
        let inner = columns("inner", vec![]);
        let state = EditorState::with_blocks(vec![columns(
            "outer",
            vec![Column::new("c1", "100%").with_blocks(vec![inner])],
        )]);

        assert!(matches!(
            state.check_invariants(),
            Err(InvariantViolation::NestedColumns { .. })
        ));
    }

    #[test]
    fn test_detects_dangling_selection() {
        let mut state = EditorState::with_blocks(vec![text("a")]);
        state.selected_block_id = Some(BlockId::new("ghost"));

        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::DanglingSelection(BlockId::new("ghost")))
        );
    }

    #[test]
    fn test_global_style_patch_merges_only_set_fields() {
        let style = GlobalStyle::default();
        let patch = GlobalStylePatch {
            primary_color: Some("#ff0000".to_string()),
            ..Default::default()
        };

        let merged = style.merged(&patch);
        assert_eq!(merged.primary_color, "#ff0000");
        assert_eq!(merged.font_family, style.font_family);
        assert!(!patch.is_empty());
        assert!(GlobalStylePatch::default().is_empty());
    }
}
