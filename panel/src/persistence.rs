//! Snapshot storage for panel state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store writes a snapshot after every transcript or attachment change.
//! Writes are fire-and-forget from the store's point of view: failures are
//! logged here and never reach the event handler, so a broken disk can cost
//! durability but never a message on screen.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};

use crate::model::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("snapshot io failed for {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Backing storage for one panel instance.
pub trait SnapshotStore: Send + Sync {
    /// Load the stored snapshot, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] when stored data exists but cannot be read.
    fn load(&self) -> Result<Option<Snapshot>, PersistError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] when the snapshot cannot be written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError>;
}

/// Load a snapshot, treating unreadable data as "no snapshot".
pub fn load_or_none(store: &dyn SnapshotStore) -> Option<Snapshot> {
    match store.load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "snapshot load failed; starting empty");
            None
        }
    }
}

/// Save a snapshot without surfacing errors to the caller.
pub fn save_quietly(store: &dyn SnapshotStore, snapshot: &Snapshot) {
    if let Err(e) = store.save(snapshot) {
        warn!(error = %e, messages = snapshot.messages.len(), "snapshot save failed");
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

/// Snapshot stored as a JSON document on disk.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> PersistError {
        PersistError::Io { path: self.path.clone(), source }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let snapshot = serde_json::from_slice(&raw)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let raw = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), messages = snapshot.messages.len(), "snapshot saved");
        Ok(())
    }
}

// =============================================================================
// IN MEMORY
// =============================================================================

/// Snapshot held in memory. Used by tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Snapshot>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self { slot: Mutex::new(Some(snapshot)), saves: AtomicUsize::new(0) }
    }

    /// Last saved (or seeded) snapshot.
    #[must_use]
    pub fn current(&self) -> Option<Snapshot> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let slot = self.slot.lock().map_err(|e| PersistError::Unavailable(e.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let mut slot = self.slot.lock().map_err(|e| PersistError::Unavailable(e.to_string()))?;
        *slot = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
