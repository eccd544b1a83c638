//! # Block Model
//!
//! Every block kind the composer knows about, as one closed sum type.
//!
//! ## Wire shape
//!
//! ```json
//! { "id": "b-1", "kind": "text", "content": "Hello", "style": { "color": "#333" } }
//! ```
//!
//! `columns` blocks embed their columns, and each column its own blocks:
//!
//! ```json
//! { "id": "b-2", "kind": "columns", "columns": [
//!     { "id": "c-1", "width": "50%", "blocks": [] },
//!     { "id": "c-2", "width": "50%", "blocks": [] }
//! ] }
//! ```

use crate::ids::{BlockId, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Presentation overrides (color, alignment, spacing). Merged over the
/// global style at render time.
pub type StyleMap = BTreeMap<String, String>;

/// Kind tag for a block, as emitted by the palette.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Text,
    Image,
    Button,
    Divider,
    Spacer,
    Columns,
    Gallery,
    Social,
    Footer,
}

/// A single content unit of the newsletter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(flatten)]
    pub content: BlockContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
}

/// Kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockContent {
    #[serde(rename_all = "camelCase")]
    Hero {
        title: String,
        subtitle: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
        cta_text: String,
        cta_url: String,
    },

    Text {
        content: String,
    },

    Image {
        url: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },

    Button {
        label: String,
        url: String,
    },

    Divider {
        color: String,
        thickness: u32,
    },

    Spacer {
        height: u32,
    },

    Columns {
        columns: Vec<Column>,
    },

    Gallery {
        images: Vec<GalleryImage>,
    },

    Social {
        links: Vec<SocialLink>,
    },

    #[serde(rename_all = "camelCase")]
    Footer {
        content: String,
        unsubscribe_url: String,
    },
}

/// A sub-container of a `columns` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,

    /// CSS length, e.g. `50%` or `200px`
    pub width: String,

    /// Never holds a `columns` block
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

impl BlockKind {
    /// Wire fields this kind may leave out (sent as `null` to clear them)
    pub fn optional_fields(self) -> &'static [&'static str] {
        match self {
            BlockKind::Hero => &["imageUrl"],
            BlockKind::Image => &["link"],
            _ => &[],
        }
    }
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Hero { .. } => BlockKind::Hero,
            BlockContent::Text { .. } => BlockKind::Text,
            BlockContent::Image { .. } => BlockKind::Image,
            BlockContent::Button { .. } => BlockKind::Button,
            BlockContent::Divider { .. } => BlockKind::Divider,
            BlockContent::Spacer { .. } => BlockKind::Spacer,
            BlockContent::Columns { .. } => BlockKind::Columns,
            BlockContent::Gallery { .. } => BlockKind::Gallery,
            BlockContent::Social { .. } => BlockKind::Social,
            BlockContent::Footer { .. } => BlockKind::Footer,
        }
    }
}

impl Block {
    pub fn new(id: impl Into<BlockId>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
            style: None,
        }
    }

    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.style = Some(style);
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn is_columns(&self) -> bool {
        matches!(self.content, BlockContent::Columns { .. })
    }

    /// Columns of a `columns` block, `None` for every other kind
    pub fn columns(&self) -> Option<&[Column]> {
        match &self.content {
            BlockContent::Columns { columns } => Some(columns),
            _ => None,
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.content {
            BlockContent::Columns { columns } => Some(columns),
            _ => None,
        }
    }

    /// Ids of this block and of every block nested in its columns
    pub fn block_ids(&self) -> Vec<&BlockId> {
        let mut ids = vec![&self.id];
        for column in self.columns().unwrap_or_default() {
            ids.extend(column.blocks.iter().map(|b| &b.id));
        }
        ids
    }

    /// Short human-readable summary, used by outlines and logs
    pub fn summary(&self) -> String {
        match &self.content {
            BlockContent::Hero { title, .. } => title.clone(),
            BlockContent::Text { content } => truncate(content, 40),
            BlockContent::Image { url, .. } => url.clone(),
            BlockContent::Button { label, url } => format!("{} → {}", label, url),
            BlockContent::Divider { color, thickness } => format!("{}px {}", thickness, color),
            BlockContent::Spacer { height } => format!("{}px", height),
            BlockContent::Columns { columns } => format!("{} columns", columns.len()),
            BlockContent::Gallery { images } => format!("{} images", images.len()),
            BlockContent::Social { links } => links
                .iter()
                .map(|l| l.platform.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            BlockContent::Footer { content, .. } => truncate(content, 40),
        }
    }
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, width: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: width.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}
