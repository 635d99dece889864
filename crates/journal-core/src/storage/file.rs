//! File-backed key-value storage
//!
//! Each key is stored as its own file under a data directory.
//! Uses atomic writes (write to temp file, then rename) so a crash never
//! leaves a half-written journal behind.
//!
//! Storage location: `~/.local/share/community-journal/` (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{BackendError, BackendResult, KeyValueStorage};

/// Extension used for stored values
const VALUE_EXTENSION: &str = "json";

/// Key-value storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> BackendResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| BackendError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the stored values
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem_for(key), VALUE_EXTENSION))
    }

    /// Total size in bytes of all stored values
    pub fn total_size(&self) -> u64 {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };
        entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == VALUE_EXTENSION)
                    .unwrap_or(false)
            })
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BackendError::ReadError { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> BackendResult<()> {
        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> BackendResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::from_io(e, path)),
        }
    }
}

/// Map a storage key to a file-name-safe stem
///
/// ASCII alphanumerics and `-` are kept; every other byte is written as
/// `%XX`. Distinct keys always get distinct files.
fn file_stem_for(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> BackendResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BackendError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| BackendError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| BackendError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| BackendError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| BackendError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
