//! Persistent local cache for collection snapshots.
//!
//! Each collection gets one string-keyed slot holding a JSON-serialized
//! array of entries. The slot is the canonical store while anonymous and the
//! offline mirror while authenticated. Reads are forgiving by design: a
//! missing or unparseable slot decodes as the empty list, never as an error
//! surfaced to the UI.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// The two persisted collection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSlot {
    Cart,
    Wishlist,
}

impl CacheSlot {
    /// File name backing this slot in a [`FileStore`].
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Cart => "cart.json",
            Self::Wishlist => "wishlist.json",
        }
    }
}

/// Errors raised by local cache writes.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry list could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A durable key-value slot per collection, readable and writable
/// synchronously.
pub trait LocalStore {
    /// Read the raw payload for a slot, if one has been written.
    fn read(&self, slot: CacheSlot) -> Option<String>;

    /// Overwrite the payload for a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be persisted.
    fn write(&self, slot: CacheSlot, payload: &str) -> Result<(), CacheError>;

    /// Delete the slot. Removing an absent slot is not an error.
    fn remove(&self, slot: CacheSlot);
}

impl<T: LocalStore + ?Sized> LocalStore for &T {
    fn read(&self, slot: CacheSlot) -> Option<String> {
        (**self).read(slot)
    }

    fn write(&self, slot: CacheSlot, payload: &str) -> Result<(), CacheError> {
        (**self).write(slot, payload)
    }

    fn remove(&self, slot: CacheSlot) {
        (**self).remove(slot);
    }
}

/// Read and decode a slot's entry list.
///
/// A missing slot or a parse failure yields the empty list; the parse
/// failure is logged and the stale payload left in place until the next
/// write.
pub fn read_entries<T: DeserializeOwned>(store: &impl LocalStore, slot: CacheSlot) -> Vec<T> {
    let Some(payload) = store.read(slot) else {
        return Vec::new();
    };
    match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, slot = ?slot, "unparseable local cache slot, treating as empty");
            Vec::new()
        }
    }
}

/// Encode and persist an entry list to a slot.
///
/// Mirror writes are best-effort: a failure is logged and swallowed so the
/// in-memory snapshot stays canonical.
pub fn write_entries<T: Serialize>(store: &impl LocalStore, slot: CacheSlot, entries: &[T]) {
    let result = serde_json::to_string(entries)
        .map_err(CacheError::from)
        .and_then(|payload| store.write(slot, &payload));
    if let Err(error) = result {
        tracing::error!(%error, slot = ?slot, "failed to persist local cache slot");
    }
}

/// File-backed store: one JSON file per slot under a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: CacheSlot) -> PathBuf {
        self.dir.join(slot.file_name())
    }
}

impl LocalStore for FileStore {
    fn read(&self, slot: CacheSlot) -> Option<String> {
        fs::read_to_string(self.slot_path(slot)).ok()
    }

    fn write(&self, slot: CacheSlot, payload: &str) -> Result<(), CacheError> {
        // Write-then-rename so a crash mid-write cannot leave a torn slot
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, slot: CacheSlot) {
        if let Err(error) = fs::remove_file(self.slot_path(slot))
            && error.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(%error, slot = ?slot, "failed to remove local cache slot");
        }
    }
}

/// In-memory store for ephemeral sessions and tests.
///
/// Mirrors the single-writer, single-tab model of the file store without
/// touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<CacheSlot, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn read(&self, slot: CacheSlot) -> Option<String> {
        self.slots.borrow().get(&slot).cloned()
    }

    fn write(&self, slot: CacheSlot, payload: &str) -> Result<(), CacheError> {
        self.slots.borrow_mut().insert(slot, payload.to_string());
        Ok(())
    }

    fn remove(&self, slot: CacheSlot) {
        self.slots.borrow_mut().remove(&slot);
    }
}
