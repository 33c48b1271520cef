//! Medicine search and suggestion.
//!
//! Pipeline: escape → store match → rank by side-effect count → (name search
//! only, on zero hits) suggest the closest cached name.

mod name_cache;
mod pattern;
mod ranker;
mod store;
mod suggester;

pub use name_cache::*;
pub use pattern::*;
pub use ranker::*;
pub use store::*;
pub use suggester::*;

use thiserror::Error;
use tracing::debug;

use crate::db::DbError;
use crate::models::{MedicineRecord, NameCacheEntry, SearchResult};

/// Longest accepted query, in characters, after trimming.
pub const MAX_QUERY_CHARS: usize = 200;

/// Search errors.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Medicine not found: {0}")]
    NotFound(String),
}

/// Trim and escape a raw query, rejecting anything over [`MAX_QUERY_CHARS`].
fn parse_query(raw: &str) -> Result<SearchPattern, SearchError> {
    let query = raw.trim();
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery(format!(
            "Query must be at most {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(SearchPattern::new(query))
}

/// Finish a name search: ranked matches win, otherwise suggest a cached name.
///
/// Touches only the name snapshot, never the store.
pub fn complete_name_search(
    query: &str,
    matches: Vec<MedicineRecord>,
    names: &[NameCacheEntry],
) -> SearchResult {
    if !matches.is_empty() {
        return SearchResult::found(matches);
    }
    SearchResult::suggest(suggest(query, names))
}

/// Runs searches against a record store and a name snapshot.
///
/// Every operation is a pure read.
pub struct Searcher<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    names: &'a [NameCacheEntry],
}

impl<'a, S: RecordStore + ?Sized> Searcher<'a, S> {
    /// Create a searcher over a store and a name cache snapshot.
    pub fn new(store: &'a S, names: &'a [NameCacheEntry]) -> Self {
        Self { store, names }
    }

    /// Search by name, falling back to a suggestion when nothing matches.
    ///
    /// A blank query returns an empty result without touching the store.
    pub fn search_by_name(&self, query: &str) -> Result<SearchResult, SearchError> {
        let matches = self.match_by_name(query)?;
        Ok(complete_name_search(query, matches, self.names))
    }

    /// Ranked name matches, without the suggestion fallback.
    pub fn match_by_name(&self, query: &str) -> Result<Vec<MedicineRecord>, SearchError> {
        let pattern = parse_query(query)?;
        if pattern.is_empty() {
            debug!("blank name query, returning no matches");
            return Ok(Vec::new());
        }

        let matches = rank(self.store.find_by_name_contains(&pattern)?);
        debug!(query, count = matches.len(), "name search");
        Ok(matches)
    }

    /// Search by illness or use. No suggestion fallback.
    pub fn search_by_illness(&self, query: &str) -> Result<Vec<MedicineRecord>, SearchError> {
        let pattern = parse_query(query)?;
        if pattern.is_empty() {
            return Err(SearchError::InvalidQuery(
                "Illness query is required".into(),
            ));
        }

        let matches = rank(self.store.find_by_uses_contains(&pattern)?);
        debug!(query, count = matches.len(), "illness search");
        Ok(matches)
    }

    /// Look up a medicine by its full name, ignoring case.
    pub fn search_by_exact_name(&self, name: &str) -> Result<MedicineRecord, SearchError> {
        let pattern = parse_query(name)?;
        if pattern.is_empty() {
            return Err(SearchError::InvalidQuery(
                "Medicine name query is required".into(),
            ));
        }

        self.store
            .find_by_exact_name(&pattern)?
            .ok_or_else(|| SearchError::NotFound(name.trim().to_string()))
    }

    /// Look up a medicine by id. Ids are opaque; an unknown id is not found.
    pub fn get_by_id(&self, id: &str) -> Result<MedicineRecord, SearchError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| SearchError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();

        db.insert_medicine(
            &MedicineRecord::new("Paracetamol 650mg")
                .with_uses(["Fever", "Pain relief"])
                .with_side_effects(["Nausea", "Allergic reaction"]),
        )
        .unwrap();
        db.insert_medicine(
            &MedicineRecord::new("Paracetamol 500mg")
                .with_uses(["Fever", "Headache"])
                .with_side_effects(["Nausea"]),
        )
        .unwrap();
        db.insert_medicine(
            &MedicineRecord::new("Ibuprofen 400mg")
                .with_uses(["Pain relief", "Inflammation"])
                .with_side_effects(["Heartburn", "Dizziness", "Nausea"]),
        )
        .unwrap();

        db
    }

    #[test]
    fn test_search_by_name_ranks_matches() {
        let db = setup_db();
        let names = db.project_all_names().unwrap();
        let searcher = Searcher::new(&db, &names);

        let result = searcher.search_by_name("paracetamol").unwrap();
        assert_eq!(result.suggestion, None);
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].name, "Paracetamol 500mg");
        assert_eq!(result.matches[1].name, "Paracetamol 650mg");
    }

    #[test]
    fn test_search_by_name_suggests_on_miss() {
        let db = setup_db();
        let names = db.project_all_names().unwrap();
        let searcher = Searcher::new(&db, &names);

        let result = searcher.search_by_name("ibuprofn").unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.suggestion, Some("Ibuprofen 400mg".to_string()));
    }

    #[test]
    fn test_search_by_name_blank() {
        let db = setup_db();
        let names = db.project_all_names().unwrap();
        let searcher = Searcher::new(&db, &names);

        let result = searcher.search_by_name("   ").unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.suggestion, None);
    }

    #[test]
    fn test_search_by_illness() {
        let db = setup_db();
        let searcher = Searcher::new(&db, &[]);

        let results = searcher.search_by_illness("pain").unwrap();
        let names: Vec<&str> = results.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Paracetamol 650mg", "Ibuprofen 400mg"]);

        assert!(searcher.search_by_illness("insomnia").unwrap().is_empty());
        assert!(matches!(
            searcher.search_by_illness(""),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_search_by_exact_name() {
        let db = setup_db();
        let searcher = Searcher::new(&db, &[]);

        let found = searcher.search_by_exact_name("  ibuprofen 400MG ").unwrap();
        assert_eq!(found.name, "Ibuprofen 400mg");

        assert!(matches!(
            searcher.search_by_exact_name("ibuprofen"),
            Err(SearchError::NotFound(_))
        ));
        assert!(matches!(
            searcher.search_by_exact_name(""),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_get_by_id() {
        let db = setup_db();
        let medicine = MedicineRecord::new("Cetirizine 10mg");
        db.insert_medicine(&medicine).unwrap();
        let searcher = Searcher::new(&db, &[]);

        assert_eq!(searcher.get_by_id(&medicine.id).unwrap(), medicine);
        assert!(matches!(
            searcher.get_by_id("not-a-real-id"),
            Err(SearchError::NotFound(_))
        ));
        assert!(matches!(
            searcher.get_by_id("00000000-0000-4000-8000-000000000000"),
            Err(SearchError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_by_id_accepts_opaque_ids() {
        let db = setup_db();
        let mut medicine = MedicineRecord::new("Azithral 500");
        medicine.id = "64f0c2a1b2c3d4e5f6a7b8c9".into();
        db.insert_medicine(&medicine).unwrap();
        let searcher = Searcher::new(&db, &[]);

        assert_eq!(searcher.get_by_id("64f0c2a1b2c3d4e5f6a7b8c9").unwrap(), medicine);
    }

    #[test]
    fn test_overlong_query_is_rejected() {
        let db = setup_db();
        let names = db.project_all_names().unwrap();
        let searcher = Searcher::new(&db, &names);
        let long = "k".repeat(5000);

        assert!(matches!(
            searcher.search_by_name(&long),
            Err(SearchError::InvalidQuery(_))
        ));
        assert!(matches!(
            searcher.search_by_illness(&long),
            Err(SearchError::InvalidQuery(_))
        ));
        assert!(matches!(
            searcher.search_by_exact_name(&long),
            Err(SearchError::InvalidQuery(_))
        ));

        let at_limit = "k".repeat(MAX_QUERY_CHARS);
        assert!(searcher.search_by_name(&at_limit).is_ok());
        let padded = format!("  {at_limit}  ");
        assert!(searcher.search_by_illness(&padded).is_ok());
    }

    #[test]
    fn test_complete_name_search() {
        let names = vec![
            NameCacheEntry {
                id: "a".into(),
                name: "Paracetamol 500mg".into(),
            },
            NameCacheEntry {
                id: "b".into(),
                name: "Ibuprofen 400mg".into(),
            },
        ];

        let result = complete_name_search("paracetmol", Vec::new(), &names);
        assert!(result.matches.is_empty());
        assert_eq!(result.suggestion.as_deref(), Some("Paracetamol 500mg"));

        let hit = MedicineRecord::new("Paracetamol 500mg");
        let result = complete_name_search("paracetmol", vec![hit], &names);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.suggestion, None);

        assert_eq!(complete_name_search("  ", Vec::new(), &names), SearchResult::default());
    }
}
