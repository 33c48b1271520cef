//! "Did you mean" suggestions for name searches with no hits.
//!
//! Each cached name is scored against the query, ignoring case, by the best of:
//! - Jaro-Winkler blended with normalized Levenshtein on the whole name
//! - the same blend on each whitespace-separated token of the name
//! - an ordered-subsequence score (query letters appear in order in the name),
//!   which rises as the matched span gets tighter
//!
//! The highest score at or above [`MIN_SUGGESTION_SCORE`] wins. Ties go to the
//! earliest entry in the snapshot, so a fixed snapshot and query always give
//! the same answer.

use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::debug;

use crate::models::NameCacheEntry;

/// Minimum score for a name to be suggested.
pub const MIN_SUGGESTION_SCORE: f64 = 0.70;

/// Score given to a subsequence match regardless of how spread out it is.
const SUBSEQUENCE_FLOOR: f64 = 0.60;

/// Pick the single best near-miss name for `query`, if any is close enough.
pub fn suggest(query: &str, names: &[NameCacheEntry]) -> Option<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(&NameCacheEntry, f64)> = None;
    for entry in names {
        let score = similarity(&query, &entry.name.to_lowercase());
        if score < MIN_SUGGESTION_SCORE {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((entry, score));
        }
    }

    if let Some((entry, score)) = best {
        debug!(query = %query, suggestion = %entry.name, score, "suggestion found");
    }
    best.map(|(entry, _)| entry.name.clone())
}

/// Similarity of a lowercased query to a lowercased name (0.0 - 1.0).
pub fn similarity(query: &str, name: &str) -> f64 {
    if query == name {
        return 1.0;
    }

    let whole = fuzzy_match(query, name);
    let token = name
        .split_whitespace()
        .map(|token| fuzzy_match(query, token))
        .fold(0.0, f64::max);
    let subsequence = subsequence_score(query, name).unwrap_or(0.0);

    whole.max(token).max(subsequence)
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler catches typos near the start, Levenshtein overall edits
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

/// Score the query as an ordered subsequence of the name.
///
/// Letters are matched greedily left to right. Returns `None` when some query
/// letter cannot be placed.
fn subsequence_score(query: &str, name: &str) -> Option<f64> {
    let wanted: Vec<char> = query.chars().collect();
    if wanted.is_empty() {
        return None;
    }

    let mut next = 0;
    let mut first = None;
    let mut last = 0;
    for (i, c) in name.chars().enumerate() {
        if c == wanted[next] {
            first.get_or_insert(i);
            last = i;
            next += 1;
            if next == wanted.len() {
                break;
            }
        }
    }

    if next < wanted.len() {
        return None;
    }

    let span = last - first? + 1;
    let compactness = wanted.len() as f64 / span as f64;
    Some(SUBSEQUENCE_FLOOR + (1.0 - SUBSEQUENCE_FLOOR) * compactness)
}
