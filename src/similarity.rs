//! Similarity lookup: nearest dream records in valence/arousal space.
//!
//! Linear scan over the whole table on every request. Tables are a few
//! thousand rows at most, so no index is kept.

use crate::types::{DreamRecord, Prediction};

/// Default neighbour count.
pub const DEFAULT_NEIGHBORS: usize = 3;

/// A table row selected by [`find_similar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    /// Position of the record in the table.
    pub index: usize,
    /// Euclidean distance to the query point.
    pub distance: f64,
    pub record: &'a DreamRecord,
}

/// Return the `k` records closest to `target`, nearest first.
///
/// Ties keep table order. An empty table or `k == 0` yields an empty result;
/// `k` larger than the table returns every record sorted by distance.
pub fn find_similar(records: &[DreamRecord], target: Prediction, k: usize) -> Vec<Neighbor<'_>> {
    if k == 0 || records.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Neighbor<'_>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| Neighbor {
            index,
            distance: target.distance_to(record.mood_valence, record.mood_arousal),
            record,
        })
        .collect();

    // sort_by is stable. NaN of either sign goes after every number and
    // NaNs compare equal; total_cmp alone would put a negative NaN first.
    scored.sort_by(|a, b| match (a.distance.is_nan(), b.distance.is_nan()) {
        (false, false) => a.distance.total_cmp(&b.distance),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
    scored.truncate(k);
    scored
}
