//! Tag command handlers

use anyhow::Result;

use journal_core::tag_counts;

use super::Journal;
use crate::output::Output;

/// List all tags and decision types with usage counts
pub fn list(journal: &Journal, output: &Output) -> Result<()> {
    let tags = tag_counts(&journal.entries());
    output.print_tags(&tags);
    Ok(())
}
