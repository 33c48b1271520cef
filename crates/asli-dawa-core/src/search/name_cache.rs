//! In-memory snapshot of catalog names for suggestions.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::db::DbResult;
use crate::models::NameCacheEntry;

use super::RecordStore;

/// Snapshot of every record's display name, taken from the store.
///
/// The snapshot is replaced whole on [`NameCache::load`]; readers hold an
/// `Arc` to the slice they started with and never observe a partial load.
/// Entries are not updated when records change afterwards.
#[derive(Debug)]
pub struct NameCache {
    snapshot: RwLock<Arc<[NameCacheEntry]>>,
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NameCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Create a cache holding the given entries.
    pub fn from_entries(entries: Vec<NameCacheEntry>) -> Self {
        Self {
            snapshot: RwLock::new(entries.into()),
        }
    }

    /// Rebuild the snapshot from the store, returning the number of names.
    ///
    /// On error the previous snapshot is left in place.
    pub fn load<S: RecordStore + ?Sized>(&self, store: &S) -> DbResult<usize> {
        let entries: Arc<[NameCacheEntry]> = store.project_all_names()?.into();
        let count = entries.len();

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = entries;

        info!(count, "medicine name cache loaded");
        Ok(count)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<[NameCacheEntry]> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::MedicineRecord;

    #[test]
    fn test_load_from_store() {
        let db = Database::open_in_memory().unwrap();
        db.insert_medicine(&MedicineRecord::new("Dolo 650")).unwrap();
        db.insert_medicine(&MedicineRecord::new("Crocin")).unwrap();

        let cache = NameCache::new();
        assert!(cache.is_empty());

        assert_eq!(cache.load(&db).unwrap(), 2);
        let names: Vec<String> = cache.snapshot().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["Dolo 650", "Crocin"]);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let db = Database::open_in_memory().unwrap();
        db.insert_medicine(&MedicineRecord::new("Dolo 650")).unwrap();

        let cache = NameCache::new();
        cache.load(&db).unwrap();
        let before = cache.snapshot();

        db.insert_medicine(&MedicineRecord::new("Crocin")).unwrap();
        // Not refreshed until an explicit reload.
        assert_eq!(cache.len(), 1);

        cache.load(&db).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(cache.len(), 2);
    }
}
