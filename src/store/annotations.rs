//! The annotation store: a thin façade over a [`StorageBackend`] that owns
//! the serialization format and the store invariants.

use crate::core::{AnnotationKey, Result};
use crate::store::backend::StorageBackend;
use log::warn;
use std::collections::HashMap;

/// Scoped key/value cache of free-text annotations.
///
/// One map per scope (quote/cart instance), persisted as a JSON object.
/// Invariants enforced here:
/// - values are trimmed; a key set to an empty value is removed, never
///   stored empty
/// - scopes never share entries implicitly; cross-scope movement is the
///   explicit [`copy_scope`](Self::copy_scope)
/// - a corrupt persisted payload degrades to an empty map for that scope
///   and is logged, never surfaced as an error
pub struct AnnotationStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> AnnotationStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the cached annotation for a key, or `""` if absent.
    pub fn get(&self, scope: &str, key: &AnnotationKey) -> String {
        self.load(scope).remove(key).unwrap_or_default()
    }

    /// Upserts a trimmed annotation; an empty value removes the key.
    ///
    /// The backing payload is persisted before this returns, so a
    /// completed set is never lost to a crash before the next read.
    pub fn set(&mut self, scope: &str, key: &AnnotationKey, value: &str) -> Result<()> {
        let value = value.trim();
        let mut entries = self.load(scope);
        if value.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.clone(), value.to_string());
        }
        self.save(scope, &entries)
    }

    /// Full snapshot of one scope's entries.
    pub fn all_entries(&self, scope: &str) -> HashMap<AnnotationKey, String> {
        self.load(scope)
    }

    /// Overwrites `dest` with a full copy of `source` (not a merge).
    ///
    /// Copying from a scope with no entries is a silent no-op returning
    /// `Ok(false)` — the caller cannot always identify the source scope,
    /// and copying "nothing" must never clobber the destination.
    pub fn copy_scope(&mut self, source: &str, dest: &str) -> Result<bool> {
        let entries = self.load(source);
        if entries.is_empty() {
            return Ok(false);
        }
        self.save(dest, &entries)?;
        Ok(true)
    }

    /// Drops every entry in a scope.
    pub fn clear_scope(&mut self, scope: &str) -> Result<()> {
        self.backend.remove(scope)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn load(&self, scope: &str) -> HashMap<AnnotationKey, String> {
        let Some(payload) = self.backend.read(scope) else {
            return HashMap::new();
        };
        match serde_json::from_str::<HashMap<AnnotationKey, String>>(&payload) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Corrupt annotation payload for scope '{scope}', treating as empty: {e}");
                HashMap::new()
            }
        }
    }

    fn save(&mut self, scope: &str, entries: &HashMap<AnnotationKey, String>) -> Result<()> {
        // Serializing a String-keyed map cannot fail; keep the error path anyway.
        let payload = serde_json::to_string(entries)
            .map_err(|e| crate::core::SyncError::Storage(e.to_string()))?;
        self.backend.write(scope, &payload)
    }
}
