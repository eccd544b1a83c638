//! # Mailcraft Model
//!
//! Plain data for newsletter documents: blocks, columns, the editor
//! snapshot, and the factory that mints new blocks.
//!
//! The tree is two levels deep at most. Top-level blocks form an ordered
//! sequence; a `columns` block holds columns, and each column holds its own
//! ordered blocks, none of which may be another `columns` block.

pub mod block;
pub mod factory;
pub mod ids;
pub mod state;

pub use block::{Block, BlockContent, BlockKind, Column, GalleryImage, SocialLink, StyleMap};
pub use factory::{BlockFactory, DEFAULT_COLUMN_WIDTH, DEFAULT_TEXT};
pub use ids::{BlockId, ColumnId, IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use state::{EditorState, GlobalStyle, GlobalStylePatch, InvariantViolation};
