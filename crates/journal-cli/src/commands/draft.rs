//! Draft command handlers

use anyhow::{bail, Result};

use journal_core::storage::probe;
use journal_core::EntryInput;

use super::{store_failure, Journal};
use crate::output::Output;
use crate::EntryFields;

/// Save a draft, replacing the previous one
pub fn save(journal: &mut Journal, fields: EntryFields, output: &Output) -> Result<()> {
    let draft = fields.apply_to(EntryInput::new());
    if !draft.has_content() {
        bail!("Nothing to save: give at least one field");
    }

    if !probe(&mut journal.storage, journal.store.logger()) {
        bail!(
            "Storage at {} is not writable",
            journal.storage.dir().display()
        );
    }

    journal
        .store
        .save_draft(&draft, &mut journal.storage)
        .map_err(|e| store_failure(e, "Failed to save draft"))?;

    output.success("Draft saved");
    Ok(())
}

/// Show the saved draft
pub fn show(journal: &Journal, output: &Output) -> Result<()> {
    match journal.store.load_draft(&journal.storage) {
        Some(draft) => output.print_draft(&draft),
        None => output.message("No saved draft."),
    }
    Ok(())
}

/// Delete the saved draft
pub fn clear(journal: &mut Journal, output: &Output) -> Result<()> {
    journal.store.clear_draft(&mut journal.storage);
    output.success("Draft cleared");
    Ok(())
}
