//! Relevance ranking.
//!
//! Fewer listed side effects is used as a weak proxy for "primary" matches
//! among same-name or same-illness hits. It is a heuristic and makes no
//! claim about clinical relevance.

use crate::models::MedicineRecord;

/// Maximum number of records returned by a search.
pub const RESULT_LIMIT: usize = 10;

/// Order records by ascending side-effect count and keep the first [`RESULT_LIMIT`].
///
/// The sort is stable, so records with equal counts keep the store's order.
pub fn rank(records: Vec<MedicineRecord>) -> Vec<MedicineRecord> {
    rank_with_limit(records, RESULT_LIMIT)
}

/// Same as [`rank`] with an explicit page size.
pub fn rank_with_limit(mut records: Vec<MedicineRecord>, limit: usize) -> Vec<MedicineRecord> {
    records.sort_by_key(MedicineRecord::side_effect_count);
    records.truncate(limit);
    records
}
