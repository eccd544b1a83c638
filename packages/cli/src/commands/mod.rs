pub mod apply;
pub mod check;
pub mod edit;
pub mod init;
pub mod show;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use edit::{add, duplicate, move_block, remove, style, AddArgs, BlockArgs, MoveArgs, StyleArgs};
pub use init::{init, InitArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use clap::Args;
use mailcraft_editor::{EditSession, JsonFileStore, MutationError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Document not found: {0} (run `mailcraft init` first)")]
    DocumentMissing(PathBuf),

    #[error("Step {index} ({name}) failed: {source}")]
    ScriptStep {
        index: usize,
        name: &'static str,
        source: MutationError,
    },
}

/// Which document a command works on
#[derive(Debug, Args)]
pub struct DocumentArg {
    /// Newsletter JSON file (defaults to the one named in mailcraft.config.json)
    #[arg(short, long)]
    pub document: Option<PathBuf>,
}

/// A document loaded for editing, saving back to where it came from
pub struct OpenDocument {
    pub path: PathBuf,
    pub session: EditSession,
}

impl DocumentArg {
    pub fn path(&self, cwd: &str) -> anyhow::Result<PathBuf> {
        let config = Config::load(cwd)?;
        Ok(config.document_path(cwd, self.document.as_deref()))
    }

    pub fn open(&self, cwd: &str) -> anyhow::Result<OpenDocument> {
        let config = Config::load(cwd)?;
        let path = config.document_path(cwd, self.document.as_deref());

        let store = JsonFileStore::new(&path);
        if !store.exists() {
            return Err(CliError::DocumentMissing(path).into());
        }

        let session = EditSession::open(store)?;
        let factory = config.factory_for(&session.state());

        Ok(OpenDocument {
            path,
            session: session.with_factory(factory),
        })
    }
}

/// Path relative to the working directory, for display
pub fn display_path(path: &std::path::Path, cwd: &str) -> String {
    path.strip_prefix(cwd).unwrap_or(path).display().to_string()
}
