use super::{display_path, CliError, DocumentArg};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_editor::Mutation;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON array of mutations, applied in order
    pub script: PathBuf,

    /// Apply without writing the document back
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub target: DocumentArg,
}

/// Run an edit script. All steps apply or none are saved.
pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let script_path = PathBuf::from(cwd).join(&args.script);
    let source = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read script {}", script_path.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&source)
        .with_context(|| format!("Malformed script {}", script_path.display()))?;

    let mut doc = args.target.open(cwd)?;

    println!(
        "📜 {} {} step(s) from {}",
        "Applying".green().bold(),
        mutations.len(),
        display_path(&script_path, cwd)
    );

    for (index, mutation) in mutations.into_iter().enumerate() {
        let name = mutation.name();
        let created = doc
            .session
            .apply(mutation)
            .map_err(|source| CliError::ScriptStep { index, name, source })?;

        match created {
            Some(id) => println!("   {} {} → {}", "✓".green(), name, id.as_str().bright_white()),
            None => println!("   {} {}", "✓".green(), name),
        }
    }

    if args.dry_run {
        println!();
        println!("{} Dry run, document not written", "•".dimmed());
        return Ok(());
    }

    doc.session.save_now()?;
    info!(version = doc.session.version(), "Script applied");

    println!();
    println!("✨ {} Saved {}", "Done".green().bold(), display_path(&doc.path, cwd));
    Ok(())
}
