use mailcraft_model::{BlockFactory, EditorState, GlobalStyle, SequentialIdGenerator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Newsletter document, relative to the config file
    #[serde(default = "default_document")]
    pub document: String,

    /// Global style for newly created documents
    #[serde(default)]
    pub global_style: GlobalStyle,

    /// Seed for sequential ids. Random UUIDs when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_prefix: Option<String>,
}

fn default_document() -> String {
    "newsletter.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, cwd: &str) -> anyhow::Result<PathBuf> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
        std::fs::write(&config_path, serde_json::to_string_pretty(self)?)?;
        Ok(config_path)
    }

    /// Absolute path to the document, unless `--document` overrides it
    pub fn document_path(&self, cwd: &str, document: Option<&Path>) -> PathBuf {
        match document {
            Some(path) => PathBuf::from(cwd).join(path),
            None => PathBuf::from(cwd).join(&self.document),
        }
    }

    /// Factory for editing `state`.
    ///
    /// Sequential ids resume past every id of that seed already in the
    /// document, so new blocks never collide with existing ones.
    pub fn factory_for(&self, state: &EditorState) -> BlockFactory {
        match &self.id_prefix {
            Some(prefix) => {
                let existing = state
                    .iter_blocks()
                    .map(|b| b.id.as_str())
                    .chain(state.iter_columns().map(|c| c.id.as_str()));
                BlockFactory::new(SequentialIdGenerator::starting_after(prefix.clone(), existing))
            }
            None => BlockFactory::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            global_style: GlobalStyle::default(),
            id_prefix: None,
        }
    }
}
