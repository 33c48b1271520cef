//! Record store contract consumed by the search subsystem.

use crate::db::{Database, DbResult};
use crate::models::{MedicineRecord, NameCacheEntry};

use super::SearchPattern;

/// Read-only queries the search subsystem issues against persisted records.
///
/// Sequence-returning methods yield records in the store's natural order;
/// ranking and truncation happen in the caller.
pub trait RecordStore {
    /// Records whose name contains the pattern, ignoring case.
    fn find_by_name_contains(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>>;

    /// Records with at least one use containing the pattern, ignoring case.
    fn find_by_uses_contains(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>>;

    /// First record whose whole name equals the pattern, ignoring case.
    fn find_by_exact_name(&self, pattern: &SearchPattern) -> DbResult<Option<MedicineRecord>>;

    /// Record with the given id.
    fn find_by_id(&self, id: &str) -> DbResult<Option<MedicineRecord>>;

    /// `(id, name)` of every stored record.
    fn project_all_names(&self) -> DbResult<Vec<NameCacheEntry>>;
}

impl RecordStore for Database {
    fn find_by_name_contains(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>> {
        self.find_medicines_by_name(pattern)
    }

    fn find_by_uses_contains(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>> {
        self.find_medicines_by_use(pattern)
    }

    fn find_by_exact_name(&self, pattern: &SearchPattern) -> DbResult<Option<MedicineRecord>> {
        self.find_medicine_by_exact_name(pattern)
    }

    fn find_by_id(&self, id: &str) -> DbResult<Option<MedicineRecord>> {
        self.get_medicine(id)
    }

    fn project_all_names(&self) -> DbResult<Vec<NameCacheEntry>> {
        self.list_medicine_names()
    }
}
