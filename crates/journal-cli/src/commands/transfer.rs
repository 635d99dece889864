//! Export, import and clear handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use journal_core::{export_entries, JournalError};

use super::{store_failure, Journal};
use crate::output::Output;
use crate::prompt::{confirm, is_interactive};

/// Write the journal as a JSON array to `path`, or stdout
pub fn export(journal: &Journal, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let entries = journal.entries();
    let json = export_entries(&entries).context("Failed to encode entries")?;

    match path {
        Some(path) => {
            fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!(
                "Exported {} entry(ies) to {}",
                entries.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Merge the entries of an exported file into the journal
pub fn import(journal: &mut Journal, file: &Path, output: &Output) -> Result<()> {
    let payload = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let report = match journal.store.import_entries(&payload, &mut journal.storage) {
        Ok(report) => report,
        Err(JournalError::ImportEmpty) => {
            anyhow::bail!("{} contains no valid entries", file.display())
        }
        Err(e) => return Err(store_failure(e, "Import failed")),
    };

    let mut summary = format!(
        "Imported {} new, {} updated",
        report.added, report.updated
    );
    if report.skipped > 0 {
        summary.push_str(&format!(", {} skipped", report.skipped));
    }
    output.success(&summary);
    output.message(&format!("{} entry(ies) in journal", report.entries.len()));

    Ok(())
}

/// Remove every entry
pub fn clear(journal: &mut Journal, yes: bool, output: &Output) -> Result<()> {
    let count = journal.entries().len();

    if !yes && output.should_prompt() && is_interactive() {
        println!("This removes all {} entry(ies).", count);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    journal
        .store
        .clear(&mut journal.storage)
        .map_err(|e| store_failure(e, "Failed to clear journal"))?;

    output.success(&format!("Cleared {} entry(ies)", count));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use journal_core::Config;
    use tempfile::TempDir;

    fn open(temp_dir: &TempDir) -> Journal {
        let config = Config {
            data_dir: temp_dir.path().join("data"),
            ..Config::default()
        };
        Journal::open(config).unwrap()
    }

    const PAYLOAD: &str = r#"[
        {"id": "a", "createdAt": "2024-01-01T00:00:00.000Z",
         "title": "A", "summary": "s", "commitments": "c"},
        {"id": "b", "createdAt": "2024-01-02T00:00:00.000Z",
         "title": "B", "summary": "s", "commitments": "c"},
        {"title": ""}
    ]"#;

    #[test]
    fn test_export_then_import_elsewhere() {
        let temp_dir = TempDir::new().unwrap();
        let quiet = Output::new(OutputFormat::Quiet);
        let source_file = temp_dir.path().join("in.json");
        fs::write(&source_file, PAYLOAD).unwrap();

        let mut journal = open(&temp_dir);
        import(&mut journal, &source_file, &quiet).unwrap();
        assert_eq!(journal.entries().len(), 2);

        let export_file = temp_dir.path().join("out.json");
        export(&journal, Some(export_file.clone()), &quiet).unwrap();

        let other_dir = TempDir::new().unwrap();
        let mut other = open(&other_dir);
        import(&mut other, &export_file, &quiet).unwrap();
        assert_eq!(other.entries(), journal.entries());
    }

    #[test]
    fn test_import_without_valid_entries_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("empty.json");
        fs::write(&file, r#"[{"title": ""}]"#).unwrap();

        let mut journal = open(&temp_dir);
        let err = import(&mut journal, &file, &Output::new(OutputFormat::Quiet)).unwrap_err();
        assert!(err.to_string().contains("no valid entries"));
    }

    #[test]
    fn test_clear_with_yes() {
        let temp_dir = TempDir::new().unwrap();
        let quiet = Output::new(OutputFormat::Quiet);
        let file = temp_dir.path().join("in.json");
        fs::write(&file, PAYLOAD).unwrap();

        let mut journal = open(&temp_dir);
        import(&mut journal, &file, &quiet).unwrap();
        clear(&mut journal, true, &quiet).unwrap();
        assert!(journal.entries().is_empty());
    }
}
