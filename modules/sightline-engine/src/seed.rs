//! Deterministic demo dataset. One seeded 32-bit generator drives every
//! draw, so the same (seed, now) pair always reproduces the identical
//! dataset. Tests and demos depend on that.

use chrono::{DateTime, Duration, Utc};

use sightline_common::{
    dedup_tags, Category, EventMetrics, GeoPoint, InsightEvent, Severity, CATEGORY_OPTIONS,
    SEVERITY_OPTIONS,
};

/// mulberry32: 32-bit integer state, one multiply-xorshift round per draw.
/// Not cryptographically secure. The stream is identical on every platform
/// and build, which the reproducibility contract requires.
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

// Anchors: Mumbai, Delhi, Bengaluru, Hyderabad, Chennai, Kolkata, Pune.
const CITY_ANCHORS: [GeoPoint; 7] = [
    GeoPoint { lat: 19.076, lng: 72.8777 },
    GeoPoint { lat: 28.7041, lng: 77.1025 },
    GeoPoint { lat: 12.9716, lng: 77.5946 },
    GeoPoint { lat: 17.385, lng: 78.4867 },
    GeoPoint { lat: 13.0827, lng: 80.2707 },
    GeoPoint { lat: 22.5726, lng: 88.3639 },
    GeoPoint { lat: 18.5204, lng: 73.8567 },
];

fn tags_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Fraud => &["chargeback", "card", "abuse", "kyc", "anomaly"],
        Category::Ops => &["latency", "throughput", "incident", "ops", "pipeline"],
        Category::Safety => &["safety", "incident", "policy", "alert", "moderation"],
        Category::Sales => &["conversion", "lead", "pipeline", "deal", "crm"],
        Category::Health => &["vitals", "device", "clinic", "reporting", "triage"],
    }
}

fn titles_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Fraud => &[
            "Chargeback spike",
            "Multiple failed OTPs",
            "Unusual refund rate",
            "Velocity alert",
        ],
        Category::Ops => &[
            "Ingress latency",
            "Queue backlog",
            "Worker restart",
            "Data sync delayed",
        ],
        Category::Safety => &[
            "Content violation",
            "Policy breach flagged",
            "Abuse report surge",
            "Escalation queue",
        ],
        Category::Sales => &[
            "Lead drop-off",
            "Campaign anomaly",
            "Checkout conversion dip",
            "High-value lead",
        ],
        Category::Health => &[
            "Device offline",
            "Vitals drift",
            "Report delay",
            "Remote triage needed",
        ],
    }
}

fn descriptions_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Fraud => &[
            "Detected increase in chargeback patterns from a single BIN range.",
            "High velocity of OTP failures indicating possible credential stuffing.",
        ],
        Category::Ops => &[
            "P99 latency elevated on ingestion pipeline affecting live dashboards.",
            "Background workers restarting due to memory pressure on node pool.",
        ],
        Category::Safety => &[
            "Spike in user reports for harassment across multiple channels.",
            "Automated policy breach detection triggered for uploaded content.",
        ],
        Category::Sales => &[
            "Observed decline in checkout conversion for mobile traffic segment.",
            "Leads from new campaign show higher drop-off at qualification stage.",
        ],
        Category::Health => &[
            "Wearable devices reporting stale vitals beyond SLA.",
            "Clinical report ingestion delayed; notify care team.",
        ],
    }
}

fn pick<'a, T>(items: &'a [T], rng: &mut Mulberry32) -> &'a T {
    &items[(rng.next_f64() * items.len() as f64) as usize]
}

/// Uniform draw in [min, max], rounded to 2 decimal places.
fn random_between(min: f64, max: f64, rng: &mut Mulberry32) -> f64 {
    ((min + (max - min) * rng.next_f64()) * 100.0).round() / 100.0
}

/// Generate `count` synthetic events anchored on `now`. Timestamps land in
/// the trailing 30 days; locations jitter around a fixed city catalog.
pub fn seed_events(count: usize, seed: u32, now: DateTime<Utc>) -> Vec<InsightEvent> {
    let mut rng = Mulberry32::new(seed);
    let mut events = Vec::with_capacity(count);

    for i in 0..count {
        let category = *pick(&CATEGORY_OPTIONS, &mut rng);
        let severity = *pick(&SEVERITY_OPTIONS, &mut rng);
        let city = pick(&CITY_ANCHORS, &mut rng);
        let title = *pick(titles_for(category), &mut rng);
        let description = *pick(descriptions_for(category), &mut rng);
        let created_at = now - Duration::days((rng.next_f64() * 30.0) as i64);

        let tag_count = 1 + (rng.next_f64() * 4.0) as usize;
        let tags = dedup_tags(
            (0..tag_count)
                .map(|_| pick(tags_for(category), &mut rng).to_string())
                .collect(),
        );

        let score = random_between(20.0, 95.0, &mut rng).round();
        let confidence = random_between(0.4, 0.95, &mut rng);
        let impact = random_between(20.0, 500.0, &mut rng).round();

        events.push(InsightEvent {
            id: format!("evt-{}", i + 1),
            title: title.to_string(),
            description: description.to_string(),
            category,
            severity,
            created_at,
            location: GeoPoint {
                lat: city.lat + rng.next_f64() * 0.05,
                lng: city.lng + rng.next_f64() * 0.05,
            },
            metrics: EventMetrics {
                score,
                confidence,
                impact,
            },
            tags,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn mulberry32_is_deterministic_and_in_unit_range() {
        let mut a = Mulberry32::new(123456);
        let mut b = Mulberry32::new(123456);
        for _ in 0..1000 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn different_seeds_produce_different_streams() {
        let mut a = Mulberry32::new(1);
        let mut b = Mulberry32::new(2);
        let first: Vec<f64> = (0..8).map(|_| a.next_f64()).collect();
        let second: Vec<f64> = (0..8).map(|_| b.next_f64()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn same_seed_and_now_reproduce_the_identical_dataset() {
        let a = seed_events(40, 123456, fixture_now());
        let b = seed_events(40, 123456, fixture_now());
        assert_eq!(a.len(), 40);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.title, y.title);
            assert_eq!(x.created_at, y.created_at);
            assert_eq!(x.metrics.score, y.metrics.score);
            assert_eq!(x.location.lat, y.location.lat);
            assert_eq!(x.tags, y.tags);
        }

        let other = seed_events(40, 654321, fixture_now());
        assert!(a.iter().zip(&other).any(|(x, y)| x.title != y.title
            || x.created_at != y.created_at
            || x.metrics.score != y.metrics.score));
    }

    #[test]
    fn seeded_events_satisfy_field_invariants() {
        let now = fixture_now();
        for event in seed_events(120, 99, now) {
            assert!(!event.title.is_empty());
            assert!(!event.description.is_empty());
            assert!((0.0..=100.0).contains(&event.metrics.score));
            assert!((0.0..=1.0).contains(&event.metrics.confidence));
            assert!(event.metrics.impact >= 0.0);
            assert!(event.location.is_finite());
            assert!(!event.tags.is_empty());
            assert!(event.tags.iter().all(|t| !t.is_empty()));
            // No duplicate tags.
            let deduped = dedup_tags(event.tags.clone());
            assert_eq!(deduped, event.tags);
            // Within the trailing 30 days.
            assert!(event.created_at <= now);
            assert!(event.created_at >= now - Duration::days(30));
        }
    }

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        for event in seed_events(50, 7, fixture_now()) {
            let scaled = event.metrics.confidence * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
            assert_eq!(event.metrics.score, event.metrics.score.round());
            assert_eq!(event.metrics.impact, event.metrics.impact.round());
        }
    }
}
