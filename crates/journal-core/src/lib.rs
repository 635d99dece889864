//! Community Journal Core Library
//!
//! This crate provides the Entry Store behind the community journal: a
//! small log of collective decisions (what was decided, who took part,
//! what was committed to) kept in a key-value store.
//!
//! # Architecture
//!
//! - **EntryStore**: validation, construction and persistence of entries
//! - **KeyValueStorage**: injected backend; the store never owns one
//! - **EventLogger**: injected diagnostics sink, `tracing` by default
//!
//! # Quick Start
//!
//! ```text
//! let store = EntryStore::new(&Config::load()?)?;
//! let mut storage = FileStorage::open(&config.data_dir)?;
//!
//! let input = EntryInput::new()
//!     .with_title("Round table")
//!     .with_summary("We chose a facilitator")
//!     .with_commitments("Rotate monthly");
//! let entry = store.create_entry(&input, &EntryOptions::new())?;
//! store.add_entry(entry, &mut storage)?;
//!
//! let entries = store.load_entries(&storage);
//! let found = filter_entries(&entries, &EntryFilter::by_tag("consensus"));
//! ```
//!
//! # Modules
//!
//! - `store`: the Entry Store (main entry point)
//! - `models`: entries, raw inputs and timestamps
//! - `sanitize`: HTML escaping and tag normalization
//! - `query`: sorting, filtering and tag listing
//! - `import`: import, export and merge
//! - `draft`: unsubmitted form drafts
//! - `storage`: key-value backends
//! - `logger`: diagnostics capability
//! - `config`: configuration

pub mod config;
pub mod draft;
pub mod error;
pub mod import;
pub mod logger;
pub mod models;
pub mod query;
pub mod sanitize;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{JournalError, JournalResult};
pub use import::{export_entries, merge_entries, ImportReport};
pub use logger::{EventLogger, MemoryLogger, NoopLogger, TracingLogger};
pub use models::{decision_label, Entry, EntryInput, EntryOptions, Validation};
pub use query::{filter_entries, sort_entries, tag_counts, unique_tags, EntryFilter};
pub use sanitize::{normalize_tags, sanitize_text, TagsInput};
pub use storage::{BackendError, FileStorage, KeyValueStorage, MemoryStorage};
pub use store::EntryStore;
