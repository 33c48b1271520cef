//! Search result models.

use serde::{Deserialize, Serialize};

use super::MedicineRecord;

/// Outcome of a name search.
///
/// Either `matches` is non-empty and `suggestion` is `None`, or `matches` is
/// empty and `suggestion` may carry a single near-miss name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub matches: Vec<MedicineRecord>,
    pub suggestion: Option<String>,
}

impl SearchResult {
    /// Result carrying ranked matches.
    pub fn found(matches: Vec<MedicineRecord>) -> Self {
        Self {
            matches,
            suggestion: None,
        }
    }

    /// Empty result with an optional "did you mean" name.
    pub fn suggest(suggestion: Option<String>) -> Self {
        Self {
            matches: Vec::new(),
            suggestion,
        }
    }
}

/// One entry of the in-memory name cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameCacheEntry {
    pub id: String,
    pub name: String,
}
