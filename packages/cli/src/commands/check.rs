use super::{display_path, CliError, DocumentArg};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_editor::{JsonFileStore, SavedDocument};
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: DocumentArg,
}

/// Validate the document: wire format, unique ids, no nested columns
pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let path = args.target.path(cwd)?;
    let store = JsonFileStore::new(&path);
    if !store.exists() {
        return Err(CliError::DocumentMissing(path).into());
    }

    println!("🔍 {} {}", "Checking".green().bold(), display_path(&path, cwd));

    let doc = store.load()?;
    let summary = Summary::of(&doc);

    println!("   Blocks:  {} ({} in columns)", summary.blocks, summary.nested);
    println!("   Columns: {}", summary.columns);
    for (kind, count) in &summary.kinds {
        println!("     {:<8} {}", kind.as_str().cyan(), count);
    }
    println!();
    println!("✨ {} Document is valid", "Done".green().bold());

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    blocks: usize,
    nested: usize,
    columns: usize,
    kinds: BTreeMap<String, usize>,
}

impl Summary {
    fn of(doc: &SavedDocument) -> Self {
        let mut summary = Summary::default();

        for block in &doc.blocks {
            summary.count(block.kind().to_string());
            for column in block.columns().unwrap_or_default() {
                summary.columns += 1;
                for nested in &column.blocks {
                    summary.nested += 1;
                    summary.count(nested.kind().to_string());
                }
            }
        }

        summary
    }

    fn count(&mut self, kind: String) {
        self.blocks += 1;
        *self.kinds.entry(kind).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_nested_blocks() {
        let doc = SavedDocument::from_json(
            r#"{ "blocks": [
                { "id": "a", "kind": "spacer", "height": 20 },
                { "id": "row", "kind": "columns", "columns": [
                    { "id": "l", "width": "50%", "blocks": [
                        { "id": "b", "kind": "spacer", "height": 4 }
                    ] },
                    { "id": "r", "width": "50%", "blocks": [] }
                ] }
            ] }"#,
        )
        .unwrap();

        let summary = Summary::of(&doc);

        assert_eq!(summary.blocks, 3);
        assert_eq!(summary.nested, 1);
        assert_eq!(summary.columns, 2);
        assert_eq!(summary.kinds["spacer"], 2);
        assert_eq!(summary.kinds["columns"], 1);
    }

    #[test]
    fn test_check_reports_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            target: DocumentArg { document: None },
        };

        let err = check(args, dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::DocumentMissing(_))));
    }
}
