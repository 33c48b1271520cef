//! Asli Dawa Core Library
//!
//! Medicine lookup and verification: search a catalog by name or treated
//! illness, get a "did you mean" suggestion for misspelled names, and report
//! whether a medicine is genuine.
//!
//! # Architecture
//!
//! ```text
//!   query ──► escape ──► SQLite REGEXP match ──► rank (fewest side effects, top 10)
//!                                                    │
//!                                        hits? ──────┤
//!                                          no        │ yes
//!                                          ▼         ▼
//!                         suggest from NameCache   matches
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite record store
//! - [`models`]: Domain types (MedicineRecord, SearchResult, etc.)
//! - [`search`]: Escaping, matching, ranking and suggestion

pub mod db;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    CatalogStats, GenuinenessReport, MedicineRecord, NameCacheEntry, SearchResult, Verdict,
};
pub use search::{complete_name_search, NameCache, RecordStore, SearchError, Searcher};

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::ErrorCode;
use thiserror::Error;
use tracing::debug;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The database cannot be opened or reached.
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(db::DbError),

    /// Any other storage failure, such as a query error or an unreadable row.
    #[error("Storage error: {0}")]
    Storage(db::DbError),

    #[error("Name cache failed to load: {0}")]
    CachePoisoned(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<db::DbError> for CatalogError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => CatalogError::NotFound(id),
            e if is_unavailable(&e) => CatalogError::StoreUnavailable(e),
            other => CatalogError::Storage(other),
        }
    }
}

/// SQLite failures that mean the database itself cannot be used.
fn is_unavailable(e: &db::DbError) -> bool {
    matches!(
        e,
        db::DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
            if matches!(
                err.code,
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::SystemIoFailure
            )
    )
}

impl From<SearchError> for CatalogError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Database(e) => e.into(),
            SearchError::InvalidQuery(msg) => CatalogError::BadRequest(msg),
            SearchError::NotFound(what) => CatalogError::NotFound(what),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for CatalogError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CatalogError::LockPoisoned(e.to_string())
    }
}

// =========================================================================
// Catalog
// =========================================================================

/// Thread-safe catalog: the record store plus its name cache.
///
/// The name cache is loaded once on construction and only rebuilt by
/// [`Catalog::reload_name_cache`].
pub struct Catalog {
    db: Arc<Mutex<Database>>,
    names: NameCache,
}

impl Catalog {
    /// Open the catalog database at `path` and load the name cache.
    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let db = Database::open(path)?;
        Self::from_database(db)
    }

    /// Create an in-memory catalog (for testing).
    pub fn open_in_memory() -> CatalogResult<Self> {
        let db = Database::open_in_memory()?;
        Self::from_database(db)
    }

    /// Wrap an open database and load the name cache from it.
    pub fn from_database(db: Database) -> CatalogResult<Self> {
        let names = NameCache::new();
        names
            .load(&db)
            .map_err(|e| CatalogError::CachePoisoned(e.to_string()))?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            names,
        })
    }

    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Search by name with suggestion fallback.
    ///
    /// The store lock is released before the suggestion is scored.
    pub fn search_by_name(&self, query: &str) -> CatalogResult<SearchResult> {
        let matches = {
            let db = self.db.lock()?;
            Searcher::new(&*db, &[]).match_by_name(query)?
        };
        let names = self.names.snapshot();
        Ok(complete_name_search(query, matches, &names))
    }

    /// Search by illness or use.
    pub fn search_by_illness(&self, query: &str) -> CatalogResult<Vec<MedicineRecord>> {
        let db = self.db.lock()?;
        Ok(Searcher::new(&*db, &[]).search_by_illness(query)?)
    }

    /// Look up a medicine by exact name, ignoring case.
    pub fn search_by_exact_name(&self, name: &str) -> CatalogResult<MedicineRecord> {
        let db = self.db.lock()?;
        Ok(Searcher::new(&*db, &[]).search_by_exact_name(name)?)
    }

    /// Get a medicine by id.
    pub fn get_by_id(&self, id: &str) -> CatalogResult<MedicineRecord> {
        let db = self.db.lock()?;
        Ok(Searcher::new(&*db, &[]).get_by_id(id)?)
    }

    /// Genuineness report for a medicine.
    pub fn report(&self, id: &str) -> CatalogResult<GenuinenessReport> {
        Ok(self.get_by_id(id)?.into())
    }

    // =========================================================================
    // Catalog Maintenance
    // =========================================================================

    /// Add a medicine. The name cache is not refreshed.
    pub fn add_medicine(&self, medicine: &MedicineRecord) -> CatalogResult<()> {
        let db = self.db.lock()?;
        db.insert_medicine(medicine)?;
        Ok(())
    }

    /// Add several medicines in one transaction. The name cache is not refreshed.
    pub fn add_medicines(&self, medicines: &[MedicineRecord]) -> CatalogResult<()> {
        let mut db = self.db.lock()?;
        db.insert_medicines(medicines)?;
        Ok(())
    }

    /// Replace an existing medicine by id.
    pub fn update_medicine(&self, medicine: &MedicineRecord) -> CatalogResult<()> {
        let db = self.db.lock()?;
        db.update_medicine(medicine)?;
        Ok(())
    }

    /// Delete a medicine by id.
    pub fn delete_medicine(&self, id: &str) -> CatalogResult<()> {
        let db = self.db.lock()?;
        if !db.delete_medicine(id)? {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Rebuild the name cache from the store.
    pub fn reload_name_cache(&self) -> CatalogResult<usize> {
        let db = self.db.lock()?;
        self.names
            .load(&*db)
            .map_err(|e| CatalogError::CachePoisoned(e.to_string()))
    }

    /// Number of names in the current cache snapshot.
    pub fn cached_name_count(&self) -> usize {
        self.names.len()
    }

    /// Catalog-wide counts.
    pub fn stats(&self) -> CatalogResult<CatalogStats> {
        let db = self.db.lock()?;
        let stats = CatalogStats {
            total_medicines: db.count_medicines()?,
            total_counterfeit: db.count_counterfeit()?,
        };
        debug!(
            total = stats.total_medicines,
            counterfeit = stats.total_counterfeit,
            "catalog stats"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_classification() {
        let cant_open = db::DbError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
            None,
        ));
        assert!(matches!(
            CatalogError::from(cant_open),
            CatalogError::StoreUnavailable(_)
        ));

        let missing = db::DbError::NotFound("m1".into());
        assert!(matches!(CatalogError::from(missing), CatalogError::NotFound(_)));

        let bad_sql = db::DbError::Sqlite(rusqlite::Error::InvalidQuery);
        assert!(matches!(CatalogError::from(bad_sql), CatalogError::Storage(_)));
    }

    #[test]
    fn test_corrupt_row_is_storage_error() {
        let catalog = Catalog::open_in_memory().unwrap();
        let record = MedicineRecord::new("Corrupted Syrup");
        catalog.add_medicine(&record).unwrap();

        catalog
            .db
            .lock()
            .unwrap()
            .conn()
            .execute(
                "UPDATE medicines SET uses = 'not json' WHERE id = ?1",
                [&record.id],
            )
            .unwrap();

        assert!(matches!(
            catalog.get_by_id(&record.id),
            Err(CatalogError::Storage(_))
        ));
    }

    #[test]
    fn test_suggestion_needs_no_store_lock() {
        let catalog = Catalog::open_in_memory().unwrap();
        catalog
            .add_medicine(&MedicineRecord::new("Paracetamol 500mg"))
            .unwrap();
        catalog.reload_name_cache().unwrap();

        // Hold the store lock while scoring: only the snapshot is read.
        let _guard = catalog.db.lock().unwrap();
        let names = catalog.names.snapshot();
        let result = complete_name_search("paracetmol", Vec::new(), &names);
        assert_eq!(result.suggestion.as_deref(), Some("Paracetamol 500mg"));
    }
}
