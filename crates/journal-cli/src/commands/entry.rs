//! Entry command handlers

use anyhow::{bail, Context, Result};

use journal_core::{filter_entries, Entry, EntryFilter, EntryInput, EntryOptions, JournalError};

use super::{store_failure, Journal};
use crate::output::{short_id, unescape_html, Output};
use crate::prompt::{confirm, is_interactive};
use crate::EntryFields;

/// Record a new entry
pub fn add(
    journal: &mut Journal,
    fields: EntryFields,
    from_draft: bool,
    output: &Output,
) -> Result<()> {
    let base = if from_draft {
        journal
            .store
            .load_draft(&journal.storage)
            .context("No saved draft to start from")?
    } else {
        EntryInput::new()
    };
    let input = fields.apply_to(base);

    let entry = journal
        .store
        .create_entry(&input, &EntryOptions::new())
        .map_err(rejection)?;
    journal
        .store
        .add_entry(entry.clone(), &mut journal.storage)
        .map_err(|e| store_failure(e, "Failed to save entry"))?;

    if from_draft {
        journal.store.clear_draft(&mut journal.storage);
    }

    if output.is_quiet() {
        println!("{}", entry.id);
    } else {
        output.success(&format!(
            "Recorded entry: {} ({})",
            unescape_html(&entry.title),
            entry.id
        ));
    }

    Ok(())
}

/// List entries, optionally filtered
pub fn list(
    journal: &Journal,
    tag: Option<String>,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let entries = journal.entries();
    let filter = EntryFilter::new(tag.unwrap_or_default(), search.unwrap_or_default());
    output.print_entries(&filter_entries(&entries, &filter));
    Ok(())
}

/// Show one entry
pub fn show(journal: &Journal, id: &str, output: &Output) -> Result<()> {
    let entries = journal.entries();
    let entry = resolve_entry(&entries, id)?;
    output.print_entry(entry);
    Ok(())
}

/// Remove an entry
///
/// Asks first when running on a terminal, unless `yes` is set.
pub fn remove(journal: &mut Journal, id: &str, yes: bool, output: &Output) -> Result<()> {
    let entries = journal.entries();
    let entry = resolve_entry(&entries, id)?;

    if !yes && output.should_prompt() && is_interactive() {
        println!(
            "Remove entry: {} - {}",
            short_id(&entry.id),
            unescape_html(&entry.title)
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    journal
        .store
        .remove_entry(&entry.id, &mut journal.storage)
        .map_err(|e| store_failure(e, "Failed to remove entry"))?;

    output.success(&format!("Removed entry: {}", entry.id));

    Ok(())
}

/// Find an entry by full id or unique prefix
///
/// The prefix may omit the generated `entry-` lead.
fn resolve_entry<'a>(entries: &'a [Entry], id: &str) -> Result<&'a Entry> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Entry ID must not be empty");
    }

    if let Some(exact) = entries.iter().find(|e| e.id == id) {
        return Ok(exact);
    }

    let matches: Vec<_> = entries
        .iter()
        .filter(|e| {
            e.id.starts_with(id)
                || e.id
                    .strip_prefix("entry-")
                    .is_some_and(|tail| tail.starts_with(id))
        })
        .collect();

    match matches.len() {
        0 => bail!("No entry found matching: {}", id),
        1 => Ok(matches[0]),
        _ => {
            eprintln!("Multiple entries match '{}':", id);
            for entry in &matches {
                eprintln!("  {} - {}", entry.id, unescape_html(&entry.title));
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Turn a validation failure into one readable error
fn rejection(err: JournalError) -> anyhow::Error {
    match err {
        JournalError::EntryInvalid(errors) => {
            anyhow::anyhow!("Entry rejected:\n  {}", errors.join("\n  "))
        }
        other => other.into(),
    }
}
