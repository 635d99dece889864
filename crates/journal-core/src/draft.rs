//! Unsubmitted form drafts
//!
//! A draft is the raw `EntryInput` saved as-is (no validation, no
//! sanitization) so a user can resume writing later.

use crate::error::{JournalError, JournalResult};
use crate::models::EntryInput;
use crate::storage::KeyValueStorage;
use crate::store::EntryStore;

/// Key drafts are stored under
pub const DRAFT_KEY: &str = "communityLogDraft";

impl EntryStore {
    /// Store `draft`, replacing any previous one
    pub fn save_draft<S: KeyValueStorage + ?Sized>(
        &self,
        draft: &EntryInput,
        storage: &mut S,
    ) -> JournalResult<()> {
        let json = serde_json::to_string(draft)?;
        storage.set(DRAFT_KEY, &json).map_err(|source| {
            self.logger()
                .error("draft.write_failed", &[("error", source.to_string())]);
            JournalError::StorageWriteFailed {
                key: DRAFT_KEY.to_string(),
                source,
            }
        })
    }

    /// The saved draft, if any
    ///
    /// An unreadable draft is logged as `draft.invalid` and ignored.
    pub fn load_draft<S: KeyValueStorage + ?Sized>(&self, storage: &S) -> Option<EntryInput> {
        let raw = match storage.get(DRAFT_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                self.logger()
                    .warn("draft.invalid", &[("error", e.to_string())]);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                self.logger()
                    .warn("draft.invalid", &[("error", e.to_string())]);
                None
            }
        }
    }

    /// Forget the saved draft
    pub fn clear_draft<S: KeyValueStorage + ?Sized>(&self, storage: &mut S) {
        if let Err(e) = storage.remove(DRAFT_KEY) {
            self.logger()
                .warn("draft.clear_failed", &[("error", e.to_string())]);
        }
    }
}
