use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_editor::{JsonFileStore, SavedDocument};
use mailcraft_model::{BlockKind, EditorState, SequentialIdGenerator};
use std::path::PathBuf;

/// Blocks of the starter newsletter
const STARTER_LAYOUT: [BlockKind; 4] =
    [BlockKind::Hero, BlockKind::Text, BlockKind::Button, BlockKind::Footer];

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Newsletter document to create
    #[arg(short, long, default_value = "newsletter.json")]
    pub document: String,

    /// Use sequential ids seeded from the document path
    #[arg(long)]
    pub sequential: bool,

    /// Use sequential ids with this prefix
    #[arg(long, conflicts_with = "sequential")]
    pub id_prefix: Option<String>,

    /// Start from an empty document instead of the starter layout
    #[arg(long)]
    pub blank: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Mailcraft project...".bright_blue().bold());

    let id_prefix = match (args.id_prefix, args.sequential) {
        (Some(prefix), _) => Some(prefix),
        (None, true) => {
            Some(SequentialIdGenerator::for_document(&args.document).seed().to_string())
        }
        (None, false) => None,
    };

    let config = Config {
        document: args.document.clone(),
        id_prefix,
        ..Config::default()
    };
    config.save(cwd)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let store = JsonFileStore::new(config.document_path(cwd, None));
    if store.exists() && !args.force {
        println!("  {} Kept existing {}", "•".dimmed(), args.document);
    } else {
        let state = EditorState::new().with_global_style(config.global_style.clone());
        let mut factory = config.factory_for(&state);
        let blocks = if args.blank {
            Vec::new()
        } else {
            STARTER_LAYOUT.iter().map(|kind| factory.create(*kind)).collect()
        };

        store.write(&SavedDocument {
            blocks,
            global_style: state.global_style,
        })?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: mailcraft show");
    println!("  2. Run: mailcraft add image --after <id>");

    Ok(())
}
