//! Command handlers

pub mod config;
pub mod draft;
pub mod entry;
pub mod status;
pub mod tag;
pub mod transfer;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use journal_core::{
    sort_entries, Config, Entry, EntryStore, EventLogger, FileStorage, JournalError,
    TracingLogger,
};

/// The opened journal: configuration, entry store and its backend
pub struct Journal {
    pub config: Config,
    pub store: EntryStore,
    pub storage: FileStorage,
}

impl Journal {
    /// Open the journal described by `config`
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_logger(config, Arc::new(TracingLogger::default()))
    }

    /// Open the journal, sending store diagnostics to `logger`
    pub fn open_with_logger(config: Config, logger: Arc<dyn EventLogger>) -> Result<Self> {
        let store = EntryStore::with_logger(&config, logger).context("Invalid configuration")?;
        let storage = FileStorage::open(&config.data_dir).with_context(|| {
            format!(
                "Failed to open data directory {}",
                config.data_dir.display()
            )
        })?;
        debug!(
            data_dir = %config.data_dir.display(),
            storage_key = store.storage_key(),
            "Opened journal"
        );

        Ok(Self {
            config,
            store,
            storage,
        })
    }

    /// Current entries, newest first
    pub fn entries(&self) -> Vec<Entry> {
        sort_entries(&self.store.load_entries(&self.storage))
    }
}

/// Wrap a failed store operation, adding the backend's recovery hint
pub fn store_failure(err: JournalError, action: &str) -> anyhow::Error {
    let hint = match &err {
        JournalError::StorageWriteFailed { source, .. } if source.is_recoverable() => {
            source.recovery_suggestion()
        }
        _ => None,
    };

    let err = anyhow::Error::new(err);
    match hint {
        Some(hint) => err.context(format!("{}\nHint: {}", action, hint)),
        None => err.context(action.to_string()),
    }
}
