//! Where things live in the block tree.
//!
//! [`Location`] is positional: a container plus an index. [`Destination`] is
//! what a drop produces: a container plus a placement relative to an anchor
//! block. The engine turns destinations into locations with
//! [`crate::tree::resolve_destination`].

use mailcraft_model::{BlockId, ColumnId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A block sequence: the top-level canvas or one column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Canvas,
    Column(ColumnId),
}

/// A position within a container. `index` may equal the sequence length,
/// meaning append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Top(usize),
    #[serde(rename_all = "camelCase")]
    InColumn { column_id: ColumnId, index: usize },
}

/// Position relative to the blocks already in a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Immediately after the anchor block
    After(BlockId),
    /// At the end of the container
    #[default]
    Append,
}

/// Resolved drop destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub container: Container,
    #[serde(default)]
    pub placement: Placement,
}

impl Location {
    pub fn in_column(column_id: impl Into<ColumnId>, index: usize) -> Self {
        Location::InColumn {
            column_id: column_id.into(),
            index,
        }
    }

    pub fn container(&self) -> Container {
        match self {
            Location::Top(_) => Container::Canvas,
            Location::InColumn { column_id, .. } => Container::Column(column_id.clone()),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Location::Top(index) | Location::InColumn { index, .. } => *index,
        }
    }

    pub fn is_in_column(&self) -> bool {
        matches!(self, Location::InColumn { .. })
    }

    /// Same container, different index
    pub fn with_index(&self, index: usize) -> Self {
        match self {
            Location::Top(_) => Location::Top(index),
            Location::InColumn { column_id, .. } => Location::InColumn {
                column_id: column_id.clone(),
                index,
            },
        }
    }
}

impl Container {
    pub fn at(&self, index: usize) -> Location {
        match self {
            Container::Canvas => Location::Top(index),
            Container::Column(column_id) => Location::InColumn {
                column_id: column_id.clone(),
                index,
            },
        }
    }
}

impl Destination {
    pub fn new(container: Container, placement: Placement) -> Self {
        Self { container, placement }
    }

    pub fn canvas_after(anchor: impl Into<BlockId>) -> Self {
        Self::new(Container::Canvas, Placement::After(anchor.into()))
    }

    pub fn canvas_end() -> Self {
        Self::new(Container::Canvas, Placement::Append)
    }

    pub fn column_after(column_id: impl Into<ColumnId>, anchor: impl Into<BlockId>) -> Self {
        Self::new(Container::Column(column_id.into()), Placement::After(anchor.into()))
    }

    pub fn column_end(column_id: impl Into<ColumnId>) -> Self {
        Self::new(Container::Column(column_id.into()), Placement::Append)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Canvas => write!(f, "canvas"),
            Container::Column(id) => write!(f, "column {}", id),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.placement {
            Placement::After(anchor) => write!(f, "{} after {}", self.container, anchor),
            Placement::Append => write!(f, "end of {}", self.container),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.container(), self.index())
    }
}
