//! Storage layer
//!
//! The Entry Store never owns its persistence: every load or write goes
//! through a `KeyValueStorage` handed in by the caller.
//!
//! ## Backends
//!
//! - **MemoryStorage**: in-process map with an optional byte quota
//! - **FileStorage**: one file per key, written atomically

pub mod error;
pub mod file;
pub mod memory;

pub use error::{BackendError, BackendResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::logger::EventLogger;

/// Key used by `probe` to test that the backend accepts writes
pub const PROBE_KEY: &str = "__storage_test__";

/// A string key-value store, modelled on browser local storage
///
/// `get` returns `Ok(None)` for a key that was never set.
pub trait KeyValueStorage {
    /// Read the value stored at `key`
    fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Store `value` at `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> BackendResult<()>;

    /// Delete the value at `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> BackendResult<()>;
}

/// Check that the backend accepts a write and a removal
///
/// Returns `false` (and logs `storage.unavailable`) when either fails.
pub fn probe<S: KeyValueStorage + ?Sized>(storage: &mut S, logger: &dyn EventLogger) -> bool {
    let result = storage
        .set(PROBE_KEY, "ok")
        .and_then(|()| storage.remove(PROBE_KEY));

    match result {
        Ok(()) => true,
        Err(e) => {
            logger.warn("storage.unavailable", &[("error", e.to_string())]);
            false
        }
    }
}
