//! Filter engine: a validated query applied as one AND-composed predicate.
//! Order-preserving; never mutates events; "now" is always an argument.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use sightline_common::InsightEvent;

use crate::query::EventQuery;

/// Keep the events matching every predicate in `query`. The result is a
/// subsequence of the input: no reordering, no duplication.
pub fn apply_filters(
    events: Vec<InsightEvent>,
    query: &EventQuery,
    now: DateTime<Utc>,
) -> Vec<InsightEvent> {
    events
        .into_iter()
        .filter(|event| matches(event, query, now))
        .collect()
}

fn matches(event: &InsightEvent, query: &EventQuery, now: DateTime<Utc>) -> bool {
    if let Some(q) = &query.q {
        let needle = q.to_lowercase();
        let in_title = event.title.to_lowercase().contains(&needle);
        let in_tags = event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle));
        if !in_title && !in_tags {
            return false;
        }
    }

    if let Some(category) = query.category {
        if event.category != category {
            return false;
        }
    }

    if let Some(severity) = query.severity {
        if event.severity != severity {
            return false;
        }
    }

    if let Some(min_score) = query.min_score {
        if event.metrics.score < min_score {
            return false;
        }
    }

    // Relative window wins over explicit bounds when both are present.
    if let Some(days) = query.days {
        let cutoff = now - Duration::days(days);
        if event.created_at < cutoff {
            return false;
        }
    } else if query.start_date.is_some() || query.end_date.is_some() {
        if let Some(start) = query.start_date.as_deref().and_then(parse_bound) {
            if event.created_at < start {
                return false;
            }
        }
        if let Some(end) = query.end_date.as_deref().and_then(parse_bound) {
            if event.created_at > end {
                return false;
            }
        }
    }

    true
}

/// Parse a date bound: RFC 3339, or a bare `YYYY-MM-DD` taken as UTC
/// midnight. Unparseable bounds are ignored, not rejected; validation of
/// the rest of the query already happened upstream.
fn parse_bound(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    s.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
