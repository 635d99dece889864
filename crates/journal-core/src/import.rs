//! Import, export and merge
//!
//! An import payload is a JSON array in the persisted format (typically a
//! previous export). Each element is rebuilt through `create_entry`, so it
//! is validated and sanitized again; its `id` and `createdAt` are kept when
//! usable. Elements that fail are skipped, not fatal.

use std::collections::{HashMap, HashSet};

use chrono::DateTime;
use serde_json::Value;

use crate::error::{JournalError, JournalResult};
use crate::models::{format_timestamp, parse_timestamp, Entry, EntryInput, EntryOptions};
use crate::query::sort_entries;
use crate::sanitize::TagsInput;
use crate::storage::KeyValueStorage;
use crate::store::EntryStore;

/// Outcome of `EntryStore::import_entries`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Imported entries whose id was new
    pub added: usize,
    /// Imported entries that replaced an existing id
    pub updated: usize,
    /// Payload elements that could not be imported
    pub skipped: usize,
    /// The persisted collection after the merge, newest first
    pub entries: Vec<Entry>,
}

/// Serialize entries as a pretty-printed JSON array
pub fn export_entries(entries: &[Entry]) -> JournalResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Union of two collections keyed by id, imported entries winning
///
/// An id keeps the position of its first appearance; its value is the
/// last one seen.
pub fn merge_entries(existing: Vec<Entry>, imported: Vec<Entry>) -> Vec<Entry> {
    let mut merged: Vec<Entry> = Vec::with_capacity(existing.len() + imported.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in existing.into_iter().chain(imported) {
        match positions.get(&entry.id) {
            Some(&index) => merged[index] = entry,
            None => {
                positions.insert(entry.id.clone(), merged.len());
                merged.push(entry);
            }
        }
    }
    merged
}

impl EntryStore {
    /// Rebuild one element of an import payload
    ///
    /// Returns `None` for non-objects and for elements that fail
    /// validation (logged as `import.entry_invalid`).
    pub fn build_imported_entry(&self, raw: &Value) -> Option<Entry> {
        if !raw.is_object() {
            return None;
        }

        let input = EntryInput {
            title: text_value(raw.get("title")),
            summary: text_value(raw.get("summary")),
            commitments: text_value(raw.get("commitments")),
            participants: text_value(raw.get("participants")),
            decision_type: text_value(raw.get("decisionType")),
            tags: tags_value(raw.get("tags")),
        };

        let mut options = EntryOptions::new();
        if let Some(id) = id_value(raw.get("id")) {
            options = options.with_id(id);
        }
        if let Some(created_at) = timestamp_value(raw.get("createdAt")) {
            options = options.with_created_at(created_at);
        }

        match self.create_entry(&input, &options) {
            Ok(entry) => Some(entry),
            Err(e) => {
                self.logger()
                    .warn("import.entry_invalid", &[("error", e.to_string())]);
                None
            }
        }
    }

    /// Merge a JSON payload into the stored journal
    ///
    /// Fails with `ImportMalformed` when the payload is not a JSON array,
    /// `ImportEmpty` when no element survives, or `StorageWriteFailed`.
    /// Nothing is written on failure.
    pub fn import_entries<S: KeyValueStorage + ?Sized>(
        &self,
        payload: &str,
        storage: &mut S,
    ) -> JournalResult<ImportReport> {
        let items = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                return Err(JournalError::ImportMalformed(
                    "top-level value is not an array".to_string(),
                ))
            }
            Err(e) => return Err(JournalError::ImportMalformed(e.to_string())),
        };

        let total = items.len();
        let imported: Vec<Entry> = items
            .iter()
            .filter_map(|item| self.build_imported_entry(item))
            .collect();
        if imported.is_empty() {
            return Err(JournalError::ImportEmpty);
        }

        let existing = self.load_entries(&*storage);
        let existing_ids: HashSet<&str> = existing.iter().map(|e| e.id.as_str()).collect();
        let added = imported
            .iter()
            .filter(|e| !existing_ids.contains(e.id.as_str()))
            .count();
        let updated = imported.len() - added;
        let skipped = total - imported.len();

        let merged = merge_entries(existing, imported);
        let entries = sort_entries(&merged);
        self.persist_entries(&entries, storage)?;

        self.logger().info(
            "import.completed",
            &[
                ("added", added.to_string()),
                ("updated", updated.to_string()),
                ("skipped", skipped.to_string()),
            ],
        );

        Ok(ImportReport {
            added,
            updated,
            skipped,
            entries,
        })
    }
}

/// Text of a scalar JSON value; null, arrays and objects yield `None`
pub(crate) fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Tags as a string or a list; non-text list items are dropped
pub(crate) fn tags_value(value: Option<&Value>) -> Option<TagsInput> {
    match value? {
        Value::Array(items) => Some(TagsInput::List(
            items
                .iter()
                .filter_map(|item| text_value(Some(item)))
                .collect(),
        )),
        other => text_value(Some(other)).map(TagsInput::Text),
    }
}

/// A usable id: a non-empty string or a non-zero number
fn id_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// A parseable timestamp, normalized to UTC with milliseconds
///
/// Numbers are read as milliseconds since the Unix epoch.
fn timestamp_value(value: Option<&Value>) -> Option<String> {
    let time = match value? {
        Value::String(s) => parse_timestamp(s)?,
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?)?,
        _ => return None,
    };
    Some(format_timestamp(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logger::MemoryLogger;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn test_store() -> (EntryStore, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let store = EntryStore::with_logger(&Config::default(), logger.clone()).unwrap();
        (store, logger)
    }

    fn entry(id: &str, created_at: &str, title: &str) -> Entry {
        Entry {
            id: id.to_string(),
            created_at: created_at.to_string(),
            title: title.to_string(),
            summary: "s".to_string(),
            commitments: "c".to_string(),
            participants: String::new(),
            decision_type: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_merge_imported_wins_and_keeps_position() {
        let existing = vec![
            entry("a", "2023-12-01T10:00:00.000Z", "old a"),
            entry("b", "2023-12-02T10:00:00.000Z", "old b"),
        ];
        let imported = vec![
            entry("b", "2023-12-02T10:00:00.000Z", "new b"),
            entry("c", "2023-12-03T10:00:00.000Z", "new c"),
        ];

        let merged = merge_entries(existing, imported);
        let ids: Vec<_> = merged.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(merged[1].title, "new b");
    }

    #[test]
    fn test_merge_last_duplicate_in_batch_wins() {
        let imported = vec![
            entry("x", "2023-12-01T10:00:00.000Z", "first"),
            entry("x", "2023-12-01T10:00:00.000Z", "second"),
        ];
        let merged = merge_entries(Vec::new(), imported);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "second");
    }

    #[test]
    fn test_build_imported_entry_preserves_identity() {
        let (store, _) = test_store();
        let raw = json!({
            "id": "entry-42",
            "createdAt": "2023-12-02T12:00:00+02:00",
            "title": " <b>Titre</b> ",
            "summary": "s",
            "commitments": "c",
            "decisionType": "Consensus",
            "tags": ["Feedback", " "]
        });

        let entry = store.build_imported_entry(&raw).unwrap();
        assert_eq!(entry.id, "entry-42");
        assert_eq!(entry.created_at, "2023-12-02T10:00:00.000Z");
        assert_eq!(entry.title, "&lt;b&gt;Titre&lt;/b&gt;");
        assert_eq!(entry.decision_type, "consensus");
        assert_eq!(entry.tags, vec!["feedback"]);
    }

    #[test]
    fn test_build_imported_entry_generates_missing_identity() {
        let (store, _) = test_store();
        let raw = json!({
            "id": "",
            "createdAt": "not a date",
            "title": "t", "summary": "s", "commitments": "c"
        });

        let entry = store.build_imported_entry(&raw).unwrap();
        assert!(entry.id.starts_with("entry-"));
        assert!(entry.created_at_time().is_some());
    }

    #[test]
    fn test_build_imported_entry_numeric_values() {
        let (store, _) = test_store();
        let raw = json!({
            "id": 7,
            "createdAt": 1_701_511_200_000_i64,
            "title": 2024, "summary": "s", "commitments": "c"
        });

        let entry = store.build_imported_entry(&raw).unwrap();
        assert_eq!(entry.id, "7");
        assert_eq!(entry.created_at, "2023-12-02T10:00:00.000Z");
        assert_eq!(entry.title, "2024");
    }

    #[test]
    fn test_build_imported_entry_rejects_invalid() {
        let (store, logger) = test_store();
        assert!(store.build_imported_entry(&json!("text")).is_none());
        assert!(store.build_imported_entry(&json!(null)).is_none());
        assert!(logger.events().is_empty());

        assert!(store.build_imported_entry(&json!({"title": "t"})).is_none());
        assert_eq!(logger.events()[0].event, "import.entry_invalid");
    }

    #[test]
    fn test_import_counts_added_updated_skipped() {
        let (store, _) = test_store();
        let mut storage = MemoryStorage::new();
        store
            .persist_entries(
                &[entry("a", "2023-12-01T10:00:00.000Z", "old a")],
                &mut storage,
            )
            .unwrap();

        let payload = json!([
            {"id": "a", "createdAt": "2023-12-01T10:00:00.000Z",
             "title": "new a", "summary": "s", "commitments": "c"},
            {"id": "b", "createdAt": "2023-12-03T10:00:00.000Z",
             "title": "b", "summary": "s", "commitments": "c"},
            {"id": "broken"},
            3
        ])
        .to_string();

        let report = store.import_entries(&payload, &mut storage).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 2);

        let ids: Vec<_> = report.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.entries[1].title, "new a");
        assert_eq!(store.load_entries(&storage), report.entries);
    }

    #[test]
    fn test_import_rejects_malformed_payload() {
        let (store, _) = test_store();
        let mut storage = MemoryStorage::new();

        let err = store.import_entries("{oops", &mut storage).unwrap_err();
        assert!(matches!(err, JournalError::ImportMalformed(_)));

        let err = store
            .import_entries(r#"{"id":"a"}"#, &mut storage)
            .unwrap_err();
        assert!(matches!(err, JournalError::ImportMalformed(_)));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_import_without_valid_entries_writes_nothing() {
        let (store, _) = test_store();
        let mut storage = MemoryStorage::new();

        let err = store
            .import_entries(r#"[{"title":""}, 1]"#, &mut storage)
            .unwrap_err();
        assert!(matches!(err, JournalError::ImportEmpty));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_export_then_import_is_stable() {
        let (store, _) = test_store();
        let mut storage = MemoryStorage::new();
        let entries = vec![
            entry("b", "2023-12-02T10:00:00.000Z", "b"),
            entry("a", "2023-12-01T10:00:00.000Z", "a"),
        ];

        let exported = export_entries(&entries).unwrap();
        assert!(exported.contains("\n  {"));

        let report = store.import_entries(&exported, &mut storage).unwrap();
        assert_eq!(report.added, 2);
        assert_eq!(report.entries, entries);
    }
}
