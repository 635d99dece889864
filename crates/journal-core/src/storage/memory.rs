//! In-memory key-value backend

use std::collections::HashMap;

use super::{BackendError, BackendResult, KeyValueStorage};

/// A `HashMap`-backed store
///
/// With a quota, a write is rejected when the total size of all keys and
/// values would exceed it, the way browser local storage behaves.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `limit` bytes
    pub fn with_quota(limit: usize) -> Self {
        Self {
            data: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.data
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> BackendResult<()> {
        if let Some(limit) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(BackendError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> BackendResult<()> {
        self.data.remove(key);
        Ok(())
    }
}
