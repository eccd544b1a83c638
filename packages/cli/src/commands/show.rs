use super::{display_path, DocumentArg};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_model::{Block, EditorState};

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: DocumentArg,

    /// Print the document JSON instead of the outline
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let doc = args.target.open(cwd)?;

    if args.json {
        println!("{}", doc.session.to_saved_document().to_json()?);
        return Ok(());
    }

    let state = doc.session.state();
    println!(
        "{} {}",
        display_path(&doc.path, cwd).bright_white().bold(),
        format!("({} blocks)", state.block_count()).dimmed()
    );
    println!();
    print!("{}", outline(&state));

    Ok(())
}

/// Indented outline of the tree, one block per line
pub fn outline(state: &EditorState) -> String {
    let mut out = String::new();

    if state.blocks.is_empty() {
        out.push_str(&format!("  {}\n", "(empty)".dimmed()));
    }

    for block in &state.blocks {
        push_block(&mut out, block, 1);
        for column in block.columns().unwrap_or_default() {
            out.push_str(&format!(
                "    {} {} {}\n",
                "▸".dimmed(),
                column.id.as_str().yellow(),
                format!("({})", column.width).dimmed()
            ));
            for nested in &column.blocks {
                push_block(&mut out, nested, 3);
            }
        }
    }

    out
}

fn push_block(out: &mut String, block: &Block, depth: usize) {
    out.push_str(&format!(
        "{}{:<8} {}  {}\n",
        "  ".repeat(depth),
        block.kind().as_ref().cyan(),
        block.id.as_str().dimmed(),
        block.summary()
    ));
}
