//! The Entry Store
//!
//! `EntryStore` owns the validated configuration and the logger, and
//! implements entry validation, construction and persistence. It never
//! owns a storage backend: every persistence call takes one.
//!
//! ## Usage
//!
//! ```ignore
//! let store = EntryStore::new(&Config::default())?;
//! let mut storage = MemoryStorage::new();
//!
//! let input = EntryInput::new()
//!     .with_title("Weekly round table")
//!     .with_summary("We agreed to publish minutes")
//!     .with_commitments("Share the minutes by Friday");
//! let entry = store.create_entry(&input, &EntryOptions::new())?;
//! let entries = store.add_entry(entry, &mut storage)?;
//! ```
//!
//! `add_entry` and `remove_entry` are read-modify-write without locking:
//! two writers sharing one backend can lose each other's changes.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{JournalError, JournalResult};
use crate::import::{tags_value, text_value};
use crate::logger::{EventLogger, TracingLogger};
use crate::models::{Entry, EntryInput, EntryOptions, Validation};
use crate::query::sort_entries;
use crate::sanitize::{normalize_tags, sanitize_opt, sanitize_text, TagsInput};
use crate::storage::KeyValueStorage;

/// Validation, construction and persistence of journal entries
#[derive(Clone)]
pub struct EntryStore {
    storage_key: String,
    max_field_length: usize,
    required_fields: Vec<String>,
    logger: Arc<dyn EventLogger>,
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("storage_key", &self.storage_key)
            .field("max_field_length", &self.max_field_length)
            .field("required_fields", &self.required_fields)
            .finish_non_exhaustive()
    }
}

impl EntryStore {
    /// Create a store that logs through `tracing`
    ///
    /// Fails with `ConfigInvalid` listing every violated rule.
    pub fn new(config: &Config) -> JournalResult<Self> {
        Self::with_logger(config, Arc::new(TracingLogger::default()))
    }

    /// Create a store with a specific logger
    pub fn with_logger(config: &Config, logger: Arc<dyn EventLogger>) -> JournalResult<Self> {
        config.validate()?;
        Ok(Self {
            storage_key: config.storage_key.trim().to_string(),
            max_field_length: config.max_field_length as usize,
            required_fields: config.required_fields.clone(),
            logger,
        })
    }

    /// Key the collection is stored under
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn max_field_length(&self) -> usize {
        self.max_field_length
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    pub fn logger(&self) -> &dyn EventLogger {
        self.logger.as_ref()
    }

    // ==================== Validation ====================

    /// Check required fields, then field lengths
    ///
    /// A required field fails when missing or blank after sanitization.
    /// Length is measured in characters on the raw input.
    pub fn validate_entry(&self, input: &EntryInput) -> Validation {
        let mut errors = Vec::new();

        for field in &self.required_fields {
            let present = input
                .field(field)
                .map(|raw| !sanitize_text(&raw).is_empty())
                .unwrap_or(false);
            if !present {
                errors.push(format!("Field '{}' is required.", field));
            }
        }

        for (name, value) in input.string_fields() {
            if value.chars().count() > self.max_field_length {
                errors.push(format!(
                    "Field '{}' exceeds the allowed length ({}).",
                    name, self.max_field_length
                ));
            }
        }

        Validation { errors }
    }

    /// Validate `input` and build a sanitized entry
    ///
    /// Never returns a partial entry: invalid input fails with
    /// `EntryInvalid` carrying every validation message.
    pub fn create_entry(&self, input: &EntryInput, options: &EntryOptions) -> JournalResult<Entry> {
        let validation = self.validate_entry(input);
        if !validation.is_valid() {
            return Err(JournalError::EntryInvalid(validation.errors));
        }

        Ok(Entry {
            id: options.next_id(),
            created_at: options.next_timestamp(),
            title: sanitize_opt(input.title.as_deref()),
            summary: sanitize_opt(input.summary.as_deref()),
            commitments: sanitize_opt(input.commitments.as_deref()),
            participants: sanitize_opt(input.participants.as_deref()),
            decision_type: sanitize_opt(input.decision_type.as_deref()).to_lowercase(),
            tags: normalize_tags(input.tags.as_ref()),
        })
    }

    // ==================== Persistence ====================

    /// Read the stored collection
    ///
    /// Never fails. A missing value yields an empty list; unreadable or
    /// non-array data is logged as `storage.load_failed` and also yields an
    /// empty list. Elements without a string `id` and `createdAt` are
    /// dropped; any other element is kept, with null or mistyped fields
    /// read as empty.
    pub fn load_entries<S: KeyValueStorage + ?Sized>(&self, storage: &S) -> Vec<Entry> {
        let raw = match storage.get(&self.storage_key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                self.load_failed(e.to_string());
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                self.load_failed("stored value is not an array".to_string());
                return Vec::new();
            }
            Err(e) => {
                self.load_failed(e.to_string());
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter(has_identity)
            .map(|item| stored_entry(&item))
            .collect()
    }

    /// Replace the stored collection with `entries`
    ///
    /// A rejected write is logged as `storage.write_failed` and returned as
    /// `StorageWriteFailed`.
    pub fn persist_entries<S: KeyValueStorage + ?Sized>(
        &self,
        entries: &[Entry],
        storage: &mut S,
    ) -> JournalResult<()> {
        let json = serde_json::to_string(entries)?;
        storage.set(&self.storage_key, &json).map_err(|source| {
            self.logger.error(
                "storage.write_failed",
                &[
                    ("key", self.storage_key.clone()),
                    ("error", source.to_string()),
                ],
            );
            JournalError::StorageWriteFailed {
                key: self.storage_key.clone(),
                source,
            }
        })
    }

    /// Append `entry`, persist the newest-first collection and return it
    pub fn add_entry<S: KeyValueStorage + ?Sized>(
        &self,
        entry: Entry,
        storage: &mut S,
    ) -> JournalResult<Vec<Entry>> {
        let mut entries = self.load_entries(&*storage);
        let id = entry.id.clone();
        entries.push(entry);

        let ordered = sort_entries(&entries);
        self.persist_entries(&ordered, storage)?;
        self.logger.info(
            "entry.added",
            &[("id", id), ("count", ordered.len().to_string())],
        );
        Ok(ordered)
    }

    /// Drop every entry with `id`, persist and return what remains
    ///
    /// An unknown id leaves the collection unchanged.
    pub fn remove_entry<S: KeyValueStorage + ?Sized>(
        &self,
        id: &str,
        storage: &mut S,
    ) -> JournalResult<Vec<Entry>> {
        let mut entries = self.load_entries(&*storage);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        self.persist_entries(&entries, storage)?;
        if entries.len() != before {
            self.logger.info("entry.removed", &[("id", id.to_string())]);
        }
        Ok(entries)
    }

    /// Persist an empty collection
    pub fn clear<S: KeyValueStorage + ?Sized>(&self, storage: &mut S) -> JournalResult<()> {
        self.persist_entries(&[], storage)?;
        self.logger.info("journal.cleared", &[]);
        Ok(())
    }

    fn load_failed(&self, error: String) {
        self.logger.warn(
            "storage.load_failed",
            &[
                ("message", "Could not load journal entries.".to_string()),
                ("error", error),
            ],
        );
    }
}

/// Rebuild a stored element that passed `has_identity`
///
/// Stored text is taken as-is, no sanitizing. A tag string is split the
/// way form input is.
fn stored_entry(item: &Value) -> Entry {
    let text = |key: &str| text_value(item.get(key)).unwrap_or_default();
    let tags = match tags_value(item.get("tags")) {
        Some(TagsInput::List(items)) => items,
        Some(text @ TagsInput::Text(_)) => normalize_tags(Some(&text)),
        None => Vec::new(),
    };

    Entry {
        id: text("id"),
        created_at: text("createdAt"),
        title: text("title"),
        summary: text("summary"),
        commitments: text("commitments"),
        participants: text("participants"),
        decision_type: text("decisionType"),
        tags,
    }
}

/// Whether a stored element has a non-empty string `id` and `createdAt`
fn has_identity(item: &Value) -> bool {
    let non_empty = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    };
    non_empty("id") && non_empty("createdAt")
}
