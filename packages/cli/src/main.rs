mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, apply, check, duplicate, init, move_block, remove, show, style, AddArgs, ApplyArgs,
    BlockArgs, CheckArgs, InitArgs, MoveArgs, ShowArgs, StyleArgs,
};
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - compose newsletter layouts from the shell
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailcraft project
    Init(InitArgs),

    /// Print the block outline of the document
    Show(ShowArgs),

    /// Validate the document
    Check(CheckArgs),

    /// Add a block from the palette
    Add(AddArgs),

    /// Move a block to another position or column
    Move(MoveArgs),

    /// Remove a block (and everything inside it)
    Remove(BlockArgs),

    /// Copy a block right after itself
    Duplicate(BlockArgs),

    /// Set or clear a style override on a block
    Style(StyleArgs),

    /// Apply a JSON script of mutations
    Apply(ApplyArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(command: Command) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match command {
        Command::Init(args) => init(args, &cwd),
        Command::Show(args) => show(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Add(args) => add(args, &cwd),
        Command::Move(args) => move_block(args, &cwd),
        Command::Remove(args) => remove(args, &cwd),
        Command::Duplicate(args) => duplicate(args, &cwd),
        Command::Style(args) => style(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}
