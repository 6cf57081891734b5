//! Saved-unit lists: favorites and compare.
//!
//! Both are the same [`ListStore`] over different storage keys. The compare
//! list is capped at [`MAX_COMPARE_ITEMS`]; adding past the cap fails and
//! the caller is expected to tell the user rather than evict anything.

mod id_list;

use std::fmt;
use std::sync::Arc;

use crate::error::AppError;
use crate::storage::KeyValueStore;

pub use id_list::IdList;

/// Maximum number of units in the compare list.
pub const MAX_COMPARE_ITEMS: usize = 4;

/// Which saved list a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Favorites,
    Compare,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Favorites => "favorites",
            ListKind::Compare => "compare",
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        match self {
            ListKind::Favorites => None,
            ListKind::Compare => Some(MAX_COMPARE_ITEMS),
        }
    }

    /// Storage key under a site prefix, e.g. `terrytownrv-compare`.
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.as_str())
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An [`IdList`] that writes itself to a [`KeyValueStore`] after every change.
///
/// Storage problems never reach the caller: an unreadable or corrupt value
/// loads as an empty list, and failed writes are logged and dropped, leaving
/// the in-memory list authoritative for the rest of the session.
pub struct ListStore {
    kind: ListKind,
    key: String,
    list: IdList,
    storage: Arc<dyn KeyValueStore>,
}

impl ListStore {
    /// Open the favorites list.
    pub fn favorites(storage: Arc<dyn KeyValueStore>, prefix: &str) -> Self {
        Self::open(ListKind::Favorites, storage, prefix)
    }

    /// Open the compare list.
    pub fn compare(storage: Arc<dyn KeyValueStore>, prefix: &str) -> Self {
        Self::open(ListKind::Compare, storage, prefix)
    }

    /// Open a list and load whatever was saved under its key.
    pub fn open(kind: ListKind, storage: Arc<dyn KeyValueStore>, prefix: &str) -> Self {
        let key = kind.storage_key(prefix);
        let list = IdList::restore(load_ids(storage.as_ref(), &key), kind.capacity());

        log::debug!("Loaded {} with {} ids", key, list.len());

        Self {
            kind,
            key,
            list,
            storage,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ids in insertion order (left-to-right for compare).
    pub fn ids(&self) -> &[u64] {
        self.list.ids()
    }

    /// Ids with the most recently added first (favorites grid order).
    pub fn recent_first(&self) -> Vec<u64> {
        self.list.recent_first().collect()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.list.capacity()
    }

    pub fn can_add_more(&self) -> bool {
        self.list.can_add_more()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.list.contains(id)
    }

    /// Add `id`. Returns whether it is now in the list; `false` only when
    /// the list is full.
    pub fn add(&mut self, id: u64) -> bool {
        let was_present = self.list.contains(id);
        let present = self.list.add(id);
        if present && !was_present {
            self.persist();
        } else if !present {
            log::debug!("{} is full, rejected {}", self.key, id);
        }
        present
    }

    /// Remove `id` if present.
    pub fn remove(&mut self, id: u64) {
        if self.list.remove(id) {
            self.persist();
        }
    }

    /// Remove `id` if present, otherwise add it subject to capacity.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.list.contains(id) {
            self.remove(id);
            true
        } else {
            self.add(id)
        }
    }

    pub fn clear(&mut self) {
        if self.list.clear() {
            self.persist();
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(self.list.ids())
            .map_err(AppError::from)
            .and_then(|json| self.storage.write(&self.key, &json));

        if let Err(e) = result {
            log::warn!("Could not save {}: {}", self.key, e);
        }
    }
}

impl fmt::Debug for ListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListStore")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("ids", &self.list.ids())
            .finish()
    }
}

/// Read saved ids, treating every failure as "nothing saved".
fn load_ids(storage: &dyn KeyValueStore, key: &str) -> Vec<u64> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Could not read {}: {}. Starting empty.", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<u64>>(&raw) {
        Ok(ids) => ids,
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", key, e);
            Vec::new()
        }
    }
}
