//! Sort engine. Stable: equal keys keep their relative input order, which
//! is the only tie-break there is.

use std::cmp::Ordering;

use sightline_common::InsightEvent;

use crate::query::{SortBy, SortDir};

/// Order events by the chosen key. `Desc` reverses the ascending
/// comparator; ties stay in input order either way.
pub fn apply_sort(
    mut events: Vec<InsightEvent>,
    sort_by: SortBy,
    sort_dir: SortDir,
) -> Vec<InsightEvent> {
    events.sort_by(|a, b| {
        let ord = match sort_by {
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            // Ordinal table, not the string form.
            SortBy::Severity => a.severity.rank().cmp(&b.severity.rank()),
            SortBy::Score => a
                .metrics
                .score
                .partial_cmp(&b.metrics.score)
                .unwrap_or(Ordering::Equal),
        };
        match sort_dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    events
}
