use super::{display_path, DocumentArg, OpenDocument};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_editor::{Container, Destination, Mutation, Placement};
use mailcraft_model::{BlockId, BlockKind, ColumnId};

/// Where a block lands: top level or a column, after a block or at the end
#[derive(Debug, Args)]
pub struct DestinationArgs {
    /// Column to place the block in (top level when omitted)
    #[arg(long)]
    pub column: Option<String>,

    /// Place after this block (end of the container when omitted)
    #[arg(long)]
    pub after: Option<String>,
}

impl DestinationArgs {
    pub fn destination(&self) -> Destination {
        let container = match &self.column {
            Some(id) => Container::Column(ColumnId::new(id.as_str())),
            None => Container::Canvas,
        };
        let placement = match &self.after {
            Some(id) => Placement::After(BlockId::new(id.as_str())),
            None => Placement::Append,
        };
        Destination::new(container, placement)
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Block kind (hero, text, image, button, divider, spacer, columns, gallery, social, footer)
    pub kind: BlockKind,

    #[command(flatten)]
    pub destination: DestinationArgs,

    #[command(flatten)]
    pub target: DocumentArg,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Block to move
    pub id: String,

    #[command(flatten)]
    pub destination: DestinationArgs,

    #[command(flatten)]
    pub target: DocumentArg,
}

#[derive(Debug, Args)]
pub struct BlockArgs {
    /// Block id
    pub id: String,

    #[command(flatten)]
    pub target: DocumentArg,
}

#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Block id
    pub id: String,

    /// Style property, e.g. backgroundColor
    pub property: String,

    /// New value; the override is removed when omitted
    pub value: Option<String>,

    #[command(flatten)]
    pub target: DocumentArg,
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let mut doc = args.target.open(cwd)?;

    let created = commit(
        &mut doc,
        Mutation::InsertBlock {
            kind: args.kind,
            destination: args.destination.destination(),
        },
    )?;

    if let Some(id) = created {
        println!(
            "{} Added {} {}",
            "✓".green(),
            args.kind.as_ref().cyan(),
            id.as_str().bright_white()
        );
    }
    saved(&doc, cwd);
    Ok(())
}

pub fn move_block(args: MoveArgs, cwd: &str) -> Result<()> {
    let mut doc = args.target.open(cwd)?;
    let destination = args.destination.destination();

    commit(
        &mut doc,
        Mutation::MoveBlock {
            block_id: BlockId::new(args.id.as_str()),
            destination: destination.clone(),
        },
    )?;

    println!("{} Moved {} to {}", "✓".green(), args.id.bright_white(), destination);
    saved(&doc, cwd);
    Ok(())
}

pub fn remove(args: BlockArgs, cwd: &str) -> Result<()> {
    let mut doc = args.target.open(cwd)?;

    commit(
        &mut doc,
        Mutation::RemoveBlock {
            block_id: BlockId::new(args.id.as_str()),
        },
    )?;

    println!("{} Removed {}", "✓".green(), args.id.bright_white());
    saved(&doc, cwd);
    Ok(())
}

pub fn duplicate(args: BlockArgs, cwd: &str) -> Result<()> {
    let mut doc = args.target.open(cwd)?;

    let created = commit(
        &mut doc,
        Mutation::DuplicateBlock {
            block_id: BlockId::new(args.id.as_str()),
        },
    )?;

    if let Some(id) = created {
        println!("{} Duplicated {} as {}", "✓".green(), args.id, id.as_str().bright_white());
    }
    saved(&doc, cwd);
    Ok(())
}

pub fn style(args: StyleArgs, cwd: &str) -> Result<()> {
    let mut doc = args.target.open(cwd)?;
    let block_id = BlockId::new(args.id.as_str());

    let mutation = match &args.value {
        Some(value) => Mutation::SetStyle {
            block_id,
            property: args.property.clone(),
            value: value.clone(),
        },
        None => Mutation::RemoveStyle {
            block_id,
            property: args.property.clone(),
        },
    };
    commit(&mut doc, mutation)?;

    match args.value {
        Some(value) => println!("{} {}.{} = {}", "✓".green(), args.id, args.property, value),
        None => println!("{} Cleared {}.{}", "✓".green(), args.id, args.property),
    }
    saved(&doc, cwd);
    Ok(())
}

/// Apply one mutation and write the document back
fn commit(doc: &mut OpenDocument, mutation: Mutation) -> Result<Option<BlockId>> {
    let created = doc.session.apply(mutation)?;
    doc.session.save_now()?;
    Ok(created)
}

fn saved(doc: &OpenDocument, cwd: &str) {
    println!("  {} {}", "Saved".dimmed(), display_path(&doc.path, cwd).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use mailcraft_editor::{JsonFileStore, SavedDocument};
    use mailcraft_model::{Block, BlockContent, Column};

    /// Project with `[t1, row(left: [], right: [b1])]` and sequential ids
    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        Config {
            id_prefix: Some("n".to_string()),
            ..Config::default()
        }
        .save(cwd)
        .unwrap();

        let doc = SavedDocument {
            blocks: vec![
                Block::new("t1", BlockContent::Text { content: "Hi".to_string() }),
                Block::new(
                    "row",
                    BlockContent::Columns {
                        columns: vec![
                            Column::new("left", "50%"),
                            Column::new("right", "50%").with_blocks(vec![Block::new(
                                "b1",
                                BlockContent::Button {
                                    label: "Go".to_string(),
                                    url: "https://example.com".to_string(),
                                },
                            )]),
                        ],
                    },
                ),
            ],
            global_style: Default::default(),
        };
        JsonFileStore::new(dir.path().join("newsletter.json")).write(&doc).unwrap();

        dir
    }

    fn load(dir: &tempfile::TempDir) -> SavedDocument {
        JsonFileStore::new(dir.path().join("newsletter.json")).load().unwrap()
    }

    fn target() -> DocumentArg {
        DocumentArg { document: None }
    }

    #[test]
    fn test_add_into_column() {
        let dir = project();
        let args = AddArgs {
            kind: BlockKind::Image,
            destination: DestinationArgs {
                column: Some("left".to_string()),
                after: None,
            },
            target: target(),
        };

        add(args, dir.path().to_str().unwrap()).unwrap();

        let doc = load(&dir);
        let left = &doc.blocks[1].columns().unwrap()[0];
        assert_eq!(left.blocks.len(), 1);
        assert_eq!(left.blocks[0].id, "n-1");
        assert_eq!(left.blocks[0].kind(), BlockKind::Image);
    }

    #[test]
    fn test_move_promotes_nested_block() {
        let dir = project();
        let args = MoveArgs {
            id: "b1".to_string(),
            destination: DestinationArgs {
                column: None,
                after: Some("t1".to_string()),
            },
            target: target(),
        };

        move_block(args, dir.path().to_str().unwrap()).unwrap();

        let doc = load(&dir);
        let ids: Vec<_> = doc.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "b1", "row"]);
        assert!(doc.blocks[2].columns().unwrap()[1].blocks.is_empty());
    }

    #[test]
    fn test_rejected_edit_leaves_file_alone() {
        let dir = project();
        let before = load(&dir);
        let args = AddArgs {
            kind: BlockKind::Columns,
            destination: DestinationArgs {
                column: Some("left".to_string()),
                after: None,
            },
            target: target(),
        };

        assert!(add(args, dir.path().to_str().unwrap()).is_err());
        assert_eq!(load(&dir), before);
    }

    #[test]
    fn test_style_set_and_clear() {
        let dir = project();
        let cwd = dir.path().to_str().unwrap();
        let style_args = |value: Option<&str>| StyleArgs {
            id: "t1".to_string(),
            property: "color".to_string(),
            value: value.map(str::to_string),
            target: target(),
        };

        style(style_args(Some("#ff0000")), cwd).unwrap();
        assert_eq!(load(&dir).blocks[0].style.as_ref().unwrap()["color"], "#ff0000");

        style(style_args(None), cwd).unwrap();
        assert!(load(&dir).blocks[0].style.is_none());
    }

    #[test]
    fn test_remove_and_duplicate() {
        let dir = project();
        let cwd = dir.path().to_str().unwrap();

        duplicate(BlockArgs { id: "t1".to_string(), target: target() }, cwd).unwrap();
        remove(BlockArgs { id: "row".to_string(), target: target() }, cwd).unwrap();

        let doc = load(&dir);
        let ids: Vec<_> = doc.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "n-1"]);
    }
}
