//! Thread-safe GUID to name index with file-backed persistence.
//!
//! One mutex guards the whole index. It is held only for in-memory map
//! operations: saving copies the entries out and releases the lock before
//! encoding or touching the disk, and loading decodes and validates the file
//! completely before taking the lock to swap the contents in.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use guidmap_common::{Guid, GuidHasher, Xxh3GuidHasher};
use tracing::{debug, info, warn};

use crate::codec::{self, DecodedCache};
use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::file;
use crate::layout::Reserved;

#[derive(Default)]
struct StoreState {
    entries: HashMap<Guid, CacheEntry>,
    reserved: Reserved,
}

/// In-memory index from [`Guid`] to [`CacheEntry`].
///
/// Safe to share between worker threads (`Arc<CacheStore>` or a scoped
/// borrow). Reads always return owned copies, so a concurrent insert can never
/// invalidate what a reader holds.
///
/// Two different names that hash to the same GUID are not detected: the most
/// recent [`add`](Self::add) wins.
pub struct CacheStore {
    state: Mutex<StoreState>,
    hasher: Arc<dyn GuidHasher>,
}

impl CacheStore {
    /// Creates an empty store using the default [`Xxh3GuidHasher`].
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Xxh3GuidHasher))
    }

    /// Creates an empty store that derives GUIDs with `hasher`.
    pub fn with_hasher(hasher: Arc<dyn GuidHasher>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            hasher,
        }
    }

    /// Hashes `name` with this store's hasher without inserting it.
    pub fn guid_of(&self, name: &str) -> Guid {
        self.hasher.guid_of(name)
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the entry for `guid`, if any.
    pub fn lookup_guid(&self, guid: Guid) -> Option<CacheEntry> {
        self.lock().entries.get(&guid).cloned()
    }

    /// Returns `true` if `guid` is present.
    pub fn contains(&self, guid: Guid) -> bool {
        self.lock().entries.contains_key(&guid)
    }

    /// Hashes `name` and records it with no container file.
    ///
    /// Returns the GUID. An existing entry for that GUID is overwritten.
    pub fn add(&self, name: &str) -> Guid {
        let guid = self.guid_of(name);
        self.add_entry(CacheEntry::new(guid, name));
        guid
    }

    /// Hashes `name` and records it together with the file that contains it.
    pub fn add_with_file(&self, name: &str, file_name: &str) -> Guid {
        let guid = self.guid_of(name);
        self.add_entry(CacheEntry::new(guid, name).with_file_name(file_name));
        guid
    }

    /// Inserts a fully formed entry, overwriting any entry with the same GUID.
    pub fn add_entry(&self, entry: CacheEntry) {
        self.lock().entries.insert(entry.guid, entry);
    }

    /// Hashes and records every name, taking the lock once.
    ///
    /// Returns the number of names recorded.
    pub fn import_names<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<CacheEntry> = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                CacheEntry::new(self.guid_of(name), name)
            })
            .collect();
        let count = entries.len();
        let mut state = self.lock();
        for entry in entries {
            state.entries.insert(entry.guid, entry);
        }
        count
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Owned copies of every entry, in no particular order.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.lock().entries.values().cloned().collect()
    }

    /// Reserved header words that the next save will write.
    pub fn reserved(&self) -> Reserved {
        self.lock().reserved
    }

    /// Persists the current contents to `path`.
    ///
    /// Returns the number of entries written. On failure any previous file at
    /// `path` is left as it was.
    pub fn save_to_file(&self, path: &Path) -> Result<usize, CacheError> {
        let result = self.save_inner(path);
        match &result {
            Ok(count) => info!(path = %path.display(), entries = count, "saved cache"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to save cache"),
        }
        result
    }

    fn save_inner(&self, path: &Path) -> Result<usize, CacheError> {
        let (entries, reserved) = {
            let state = self.lock();
            (
                state.entries.values().cloned().collect::<Vec<_>>(),
                state.reserved,
            )
        };
        let image = codec::encode(&entries, reserved)?;
        file::write_cache_file(path, &image)?;
        debug!(bytes = image.len(), "wrote cache image");
        Ok(entries.len())
    }

    /// Replaces the contents of the store with an already decoded image.
    ///
    /// Returns the number of distinct entries now held.
    pub fn replace_with(&self, decoded: DecodedCache) -> usize {
        let entries: HashMap<Guid, CacheEntry> = decoded
            .entries
            .into_iter()
            .map(|entry| (entry.guid, entry))
            .collect();
        let count = entries.len();
        let mut state = self.lock();
        state.entries = entries;
        state.reserved = decoded.reserved;
        count
    }

    /// Replaces the contents of the store with the entries in `path`.
    ///
    /// Legacy files are upgraded transparently. Either every record validates
    /// and the store is replaced, or the store is left untouched.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, CacheError> {
        let result = self.load_inner(path);
        if let Err(e) = &result {
            warn!(path = %path.display(), error = %e, "failed to load cache");
        }
        result
    }

    fn load_inner(&self, path: &Path) -> Result<usize, CacheError> {
        let bytes = file::read_cache_file(path)?;
        let decoded = codec::decode(&bytes)?;
        if decoded.was_migrated() {
            warn!(
                path = %path.display(),
                "upgraded legacy cache file; save to rewrite it in the current format"
            );
        }

        let count = self.replace_with(decoded);
        info!(
            path = %path.display(),
            entries = count,
            bytes = bytes.len(),
            "loaded cache"
        );
        Ok(count)
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
