//! Query operations over entry collections
//!
//! All functions here are total: they never fail and never mutate their
//! input.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::Entry;
use crate::sanitize::sanitize_text;

/// Newest first, by `created_at`
///
/// The sort is stable. Entries whose timestamp cannot be parsed sort after
/// every dated entry.
pub fn sort_entries(entries: &[Entry]) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_cached_key(|entry| Reverse(entry.created_at_time()));
    sorted
}

/// Criteria for `filter_entries`; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Matches an entry tag or its decision type
    pub tag: String,
    /// Case-insensitive substring of the entry text
    pub search: String,
}

impl EntryFilter {
    pub fn new(tag: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            search: search.into(),
        }
    }

    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self::new(tag, "")
    }

    pub fn by_search(search: impl Into<String>) -> Self {
        Self::new("", search)
    }
}

/// Entries matching both the tag and the search criteria, in input order
pub fn filter_entries(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    let tag = sanitize_text(&filter.tag).to_lowercase();
    let search = sanitize_text(&filter.search).to_lowercase();

    entries
        .iter()
        .filter(|entry| {
            let matches_tag =
                tag.is_empty() || entry.tags.contains(&tag) || entry.decision_type == tag;
            let matches_search = search.is_empty() || entry.searchable_text().contains(&search);
            matches_tag && matches_search
        })
        .cloned()
        .collect()
}

/// Every tag and non-empty decision type, sorted and de-duplicated
pub fn unique_tags(entries: &[Entry]) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for entry in entries {
        tags.extend(entry.tags.iter().cloned());
        if !entry.decision_type.is_empty() {
            tags.insert(entry.decision_type.clone());
        }
    }
    tags.into_iter().collect()
}

/// How many entries carry each tag or decision type, sorted by name
///
/// An entry counts once per name even if it repeats a tag.
pub fn tag_counts(entries: &[Entry]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        let mut names: BTreeSet<&str> = entry.tags.iter().map(String::as_str).collect();
        if !entry.decision_type.is_empty() {
            names.insert(entry.decision_type.as_str());
        }
        for name in names {
            *counts.entry(name.to_string()).or_default() += 1;
        }
    }
    counts.into_iter().collect()
}
