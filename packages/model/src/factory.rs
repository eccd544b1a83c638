//! # Block Factory
//!
//! The only place blocks come into existence. The palette hands over a kind
//! tag; the factory fills in defaults and assigns fresh ids.

use crate::block::{Block, BlockContent, BlockKind, Column, GalleryImage, SocialLink};
use crate::ids::{BlockId, ColumnId, IdGenerator, UuidGenerator};
use std::str::FromStr;

pub const DEFAULT_TEXT: &str = "Write your message here. Click to edit this text.";
pub const DEFAULT_COLUMN_WIDTH: &str = "50%";

/// Builds fully-populated default blocks
pub struct BlockFactory {
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for BlockFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockFactory").finish_non_exhaustive()
    }
}

impl Default for BlockFactory {
    fn default() -> Self {
        Self::new(UuidGenerator)
    }
}

impl BlockFactory {
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        Self { ids: Box::new(ids) }
    }

    pub fn block_id(&mut self) -> BlockId {
        BlockId::new(self.ids.next_id())
    }

    pub fn column_id(&mut self) -> ColumnId {
        ColumnId::new(self.ids.next_id())
    }

    /// Create a block of `kind` with default content
    pub fn create(&mut self, kind: BlockKind) -> Block {
        let id = self.block_id();
        let content = match kind {
            BlockKind::Hero => BlockContent::Hero {
                title: "Your headline here".to_string(),
                subtitle: "A short line that tells readers why they should keep reading"
                    .to_string(),
                image_url: None,
                cta_text: "Learn more".to_string(),
                cta_url: "https://example.com".to_string(),
            },
            BlockKind::Text => BlockContent::Text {
                content: DEFAULT_TEXT.to_string(),
            },
            BlockKind::Image => BlockContent::Image {
                url: "https://placehold.co/600x300".to_string(),
                alt: "Image".to_string(),
                link: None,
            },
            BlockKind::Button => BlockContent::Button {
                label: "Click here".to_string(),
                url: "https://example.com".to_string(),
            },
            BlockKind::Divider => BlockContent::Divider {
                color: "#e5e7eb".to_string(),
                thickness: 1,
            },
            BlockKind::Spacer => BlockContent::Spacer { height: 24 },
            BlockKind::Columns => BlockContent::Columns {
                columns: vec![
                    Column::new(self.column_id(), DEFAULT_COLUMN_WIDTH),
                    Column::new(self.column_id(), DEFAULT_COLUMN_WIDTH),
                ],
            },
            BlockKind::Gallery => BlockContent::Gallery {
                images: (1..=3)
                    .map(|n| GalleryImage {
                        url: "https://placehold.co/200x200".to_string(),
                        alt: format!("Gallery image {}", n),
                    })
                    .collect(),
            },
            BlockKind::Social => BlockContent::Social {
                links: ["facebook", "twitter", "instagram"]
                    .iter()
                    .map(|platform| SocialLink {
                        platform: platform.to_string(),
                        url: format!("https://{}.com", platform),
                    })
                    .collect(),
            },
            BlockKind::Footer => BlockContent::Footer {
                content: "You are receiving this email because you subscribed to our newsletter."
                    .to_string(),
                unsubscribe_url: "https://example.com/unsubscribe".to_string(),
            },
        };

        Block::new(id, content)
    }

    /// Create a block from a raw palette tag.
    ///
    /// Unrecognized tags produce a `text` block naming the tag, the same
    /// permissive fallback renderers apply to unknown kinds.
    pub fn create_from_tag(&mut self, tag: &str) -> Block {
        match BlockKind::from_str(tag) {
            Ok(kind) => self.create(kind),
            Err(_) => Block::new(
                self.block_id(),
                BlockContent::Text {
                    content: format!("Unknown block type: {}", tag),
                },
            ),
        }
    }

    /// Deep copy with fresh ids for the block, its columns and their blocks
    pub fn duplicate(&mut self, block: &Block) -> Block {
        let mut copy = block.clone();
        copy.id = self.block_id();

        if let Some(columns) = copy.columns_mut() {
            for column in columns.iter_mut() {
                column.id = self.column_id();
                for nested in column.blocks.iter_mut() {
                    nested.id = self.block_id();
                }
            }
        }

        copy
    }
}
