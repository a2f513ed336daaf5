//! Insight analyzer: categorical breakdowns, a zero-filled daily trend, and
//! three narrative observations. All derivations are pure over the input
//! slice and an explicit `now`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use sightline_common::{Category, InsightEvent, Severity};

pub const DEFAULT_TREND_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Everything the dashboard needs in one pass over the filtered set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub total: usize,
    pub high_count: usize,
    /// Mean score rounded to one decimal; 0 for an empty set.
    pub avg_score: f64,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub severity_breakdown: Vec<BreakdownEntry>,
    pub trend: Vec<TrendPoint>,
    /// Always exactly three strings.
    pub narrative: Vec<String>,
}

/// Count events per category, keys in first-seen order.
pub fn group_by_category(events: &[InsightEvent]) -> Vec<BreakdownEntry> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for event in events {
        bump(&mut counts, event.category);
    }
    counts
        .into_iter()
        .map(|(category, count)| BreakdownEntry {
            name: category.to_string(),
            count,
        })
        .collect()
}

/// Count events per severity, keys in first-seen order.
pub fn group_by_severity(events: &[InsightEvent]) -> Vec<BreakdownEntry> {
    let mut counts: Vec<(Severity, usize)> = Vec::new();
    for event in events {
        bump(&mut counts, event.severity);
    }
    counts
        .into_iter()
        .map(|(severity, count)| BreakdownEntry {
            name: severity.to_string(),
            count,
        })
        .collect()
}

fn bump<K: PartialEq + Copy>(counts: &mut Vec<(K, usize)>, key: K) {
    match counts.iter_mut().find(|(k, _)| *k == key) {
        Some((_, n)) => *n += 1,
        None => counts.push((key, 1)),
    }
}

/// One (date, count) entry per calendar day in the trailing window, oldest
/// first, zero-filled. An event counts when its UTC date is in the window,
/// so the counts always sum to the number of in-window events.
pub fn trend_by_day(
    events: &[InsightEvent],
    window_days: i64,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    let today = now.date_naive();
    let mut points: Vec<TrendPoint> = (0..window_days)
        .rev()
        .map(|i| TrendPoint {
            date: today - Duration::days(i),
            count: 0,
        })
        .collect();

    for event in events {
        let day = event.created_at.date_naive();
        if let Some(point) = points.iter_mut().find(|p| p.date == day) {
            point.count += 1;
        }
    }

    points
}

/// Three observations, always three, even for an empty input.
pub fn narrative_insights(events: &[InsightEvent], now: DateTime<Utc>) -> Vec<String> {
    let mut narrative = Vec::with_capacity(3);

    // A) High severity change vs the previous 7 days.
    let current_start = now - Duration::days(7);
    let prev_start = now - Duration::days(14);
    let high_between = |start: DateTime<Utc>, end: DateTime<Utc>| {
        events
            .iter()
            .filter(|e| e.severity == Severity::High && e.created_at >= start && e.created_at < end)
            .count()
    };
    let current7 = high_between(current_start, now);
    let prev7 = high_between(prev_start, current_start);

    if prev7 == 0 {
        if current7 == 0 {
            narrative.push("High severity events unchanged vs previous 7 days (0).".to_string());
        } else {
            narrative
                .push("High severity events increased (none in the previous 7 days).".to_string());
        }
    } else {
        let pct = ((current7 as f64 - prev7 as f64) / prev7 as f64 * 100.0).round() as i64;
        let sign = if pct > 0 { "+" } else { "" };
        narrative.push(format!("High severity events {sign}{pct}% vs previous 7 days."));
    }

    // B) Top category this week. Ties keep the first-encountered category.
    let week_start = now - Duration::days(7);
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for event in events.iter().filter(|e| e.created_at >= week_start) {
        bump(&mut counts, event.category);
    }
    let top = counts.iter().fold(None::<&(Category, usize)>, |best, entry| {
        match best {
            Some(current) if entry.1 <= current.1 => best,
            _ => Some(entry),
        }
    });
    match top {
        Some((category, count)) => {
            narrative.push(format!("Top category this week: {category} ({count})."));
        }
        None => narrative.push("No category activity in the last 7 days.".to_string()),
    }

    // C) Highest impact event across the full input. Ties keep the earliest.
    let top_impact = events.iter().fold(None::<&InsightEvent>, |best, event| {
        match best {
            Some(current) if event.metrics.impact <= current.metrics.impact => best,
            _ => Some(event),
        }
    });
    match top_impact {
        Some(event) => narrative.push(format!(
            "Highest impact: {} (impact {}).",
            event.title, event.metrics.impact
        )),
        None => narrative.push("No events in scope to compute impact.".to_string()),
    }

    narrative
}

/// Full summary over an event set: KPIs, breakdowns, trend, narrative.
pub fn compute_insights(
    events: &[InsightEvent],
    trend_window_days: i64,
    now: DateTime<Utc>,
) -> InsightSummary {
    let total = events.len();
    let high_count = events
        .iter()
        .filter(|e| e.severity == Severity::High)
        .count();
    let avg_score = if total == 0 {
        0.0
    } else {
        let sum: f64 = events.iter().map(|e| e.metrics.score).sum();
        (sum / total as f64 * 10.0).round() / 10.0
    };

    InsightSummary {
        total,
        high_count,
        avg_score,
        category_breakdown: group_by_category(events),
        severity_breakdown: group_by_severity(events),
        trend: trend_by_day(events, trend_window_days, now),
        narrative: narrative_insights(events, now),
    }
}
