//! Paginator. Out-of-range pages clamp to the nearest valid page instead of
//! erroring.

use serde::Serialize;

use sightline_common::InsightEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// The clamped page actually served.
    pub page: usize,
    pub page_size: usize,
    /// Pre-pagination count.
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub items: Vec<InsightEvent>,
    pub meta: PageMeta,
}

/// Slice one page out of `events`. `total_pages` is never zero, so an empty
/// collection still reports page 1 of 1.
pub fn paginate(events: Vec<InsightEvent>, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total = events.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let current = page.clamp(1, total_pages);
    let start = (current - 1) * page_size;
    let items: Vec<InsightEvent> = events.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        meta: PageMeta {
            page: current,
            page_size,
            total,
            total_pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sightline_common::{Category, EventMetrics, GeoPoint, Severity};

    fn events(n: usize) -> Vec<InsightEvent> {
        (0..n)
            .map(|i| InsightEvent {
                id: format!("evt-{i}"),
                title: format!("event {i}"),
                description: "fixture".to_string(),
                category: Category::Ops,
                severity: Severity::Low,
                created_at: Utc::now(),
                location: GeoPoint { lat: 0.0, lng: 0.0 },
                metrics: EventMetrics {
                    score: 50.0,
                    confidence: 0.5,
                    impact: 1.0,
                },
                tags: vec!["fixture".to_string()],
            })
            .collect()
    }

    #[test]
    fn out_of_range_page_clamps_to_the_last_page() {
        let page = paginate(events(25), 10, 10);
        assert_eq!(page.meta.page, 3);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.total, 25);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, "evt-20");
        assert_eq!(page.items[4].id, "evt-24");
    }

    #[test]
    fn page_zero_clamps_to_the_first_page() {
        let page = paginate(events(25), 0, 10);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.items[0].id, "evt-0");
    }

    #[test]
    fn empty_collection_reports_one_empty_page() {
        let page = paginate(Vec::new(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(
            page.meta,
            PageMeta {
                page: 1,
                page_size: 10,
                total: 0,
                total_pages: 1,
            }
        );
    }

    #[test]
    fn pages_partition_the_collection() {
        let all = events(47);
        let page_size = 10;
        let first = paginate(all.clone(), 1, page_size);
        let mut seen = 0;
        for p in 1..=first.meta.total_pages {
            let page = paginate(all.clone(), p, page_size);
            assert_eq!(page.meta.total, 47);
            seen += page.items.len();
        }
        assert_eq!(seen, 47);
    }
}
