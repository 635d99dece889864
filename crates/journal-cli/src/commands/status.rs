//! Status command handler

use anyhow::Result;

use journal_core::storage::probe;
use journal_core::unique_tags;

use super::Journal;
use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(journal: &mut Journal, output: &Output) -> Result<()> {
    let writable = probe(&mut journal.storage, journal.store.logger());
    let entries = journal.entries();
    let tag_count = unique_tags(&entries).len();
    let has_draft = journal.store.load_draft(&journal.storage).is_some();
    let size = journal.storage.total_size();
    let newest = entries.first().map(|e| e.created_at.clone());

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "storage": {
                        "location": journal.storage.dir(),
                        "key": journal.store.storage_key(),
                        "writable": writable,
                        "size": size
                    },
                    "counts": {
                        "entries": entries.len(),
                        "tags": tag_count
                    },
                    "validation": {
                        "required_fields": journal.config.required_fields,
                        "max_field_length": journal.config.max_field_length
                    },
                    "newest": newest,
                    "draft": has_draft
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", entries.len());
        }
        OutputFormat::Human => {
            println!("Community Journal Status");
            println!("========================");
            println!();
            println!("Storage:");
            println!("  Location: {}", journal.storage.dir().display());
            println!("  Key:      {}", journal.store.storage_key());
            println!("  Size:     {}", human_size(size));
            println!(
                "  Writable: {}",
                if writable { "yes" } else { "no" }
            );
            println!();
            println!("Contents:");
            println!("  Entries: {}", entries.len());
            println!("  Tags:    {}", tag_count);
            if let Some(ref newest) = newest {
                println!("  Newest:  {}", newest);
            }
            println!("  Draft:   {}", if has_draft { "saved" } else { "none" });
            println!();
            println!("Validation:");
            println!(
                "  Required:   {}",
                journal.config.required_fields.join(", ")
            );
            println!("  Max length: {}", journal.config.max_field_length);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
