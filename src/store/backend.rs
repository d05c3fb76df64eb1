//! Storage backends: scoped, string-keyed payload storage that survives
//! restarts (the browser-localStorage role).

use crate::core::{Result, SyncError};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Raw payload storage, one opaque string payload per scope.
///
/// Implementations must make a completed `write` visible to the next
/// `read` immediately; the annotation store relies on that to guarantee
/// no completed set is ever lost.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored payload for a scope, or `None` if absent.
    fn read(&self, scope: &str) -> Option<String>;

    /// Replaces the scope's payload. Must be durable before returning.
    fn write(&mut self, scope: &str, payload: &str) -> Result<()>;

    /// Removes the scope's payload entirely. Removing an absent scope is
    /// a no-op.
    fn remove(&mut self, scope: &str) -> Result<()>;
}

// ============================================================================
// File-backed storage
// ============================================================================

/// One JSON file per scope under a data directory.
///
/// Writes go through a temp file in the same directory followed by an
/// atomic rename, so a crash mid-write leaves the previous payload intact.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            SyncError::Storage(format!(
                "Failed to create storage directory '{}': {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Scopes are cart ids or cart tokens (alphanumeric in practice);
    // anything else is flattened to '_' to keep the filename safe.
    fn path_for(&self, scope: &str) -> PathBuf {
        let safe: String = scope
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, scope: &str) -> Option<String> {
        fs::read_to_string(self.path_for(scope)).ok()
    }

    fn write(&mut self, scope: &str, payload: &str) -> Result<()> {
        let path = self.path_for(scope);
        let mut temp = NamedTempFile::new_in(&self.root)
            .map_err(|e| SyncError::Storage(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(payload.as_bytes())
            .map_err(|e| SyncError::Storage(format!("Failed to write payload: {}", e)))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| SyncError::Storage(format!("Failed to sync payload: {}", e)))?;
        temp.persist(&path).map_err(|e| {
            SyncError::Storage(format!(
                "Failed to persist payload to '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn remove(&mut self, scope: &str) -> Result<()> {
        let path = self.path_for(scope);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                SyncError::Storage(format!("Failed to remove '{}': {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Volatile backend for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    payloads: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, scope: &str) -> Option<String> {
        self.payloads.get(scope).cloned()
    }

    fn write(&mut self, scope: &str, payload: &str) -> Result<()> {
        self.payloads.insert(scope.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&mut self, scope: &str) -> Result<()> {
        self.payloads.remove(scope);
        Ok(())
    }
}
