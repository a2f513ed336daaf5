use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rbac::Role;

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Both coordinates are finite reals. NaN/infinity never enter the store.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fraud,
    Ops,
    Safety,
    Sales,
    Health,
}

pub const CATEGORY_OPTIONS: [Category; 5] = [
    Category::Fraud,
    Category::Ops,
    Category::Safety,
    Category::Sales,
    Category::Health,
];

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Fraud => write!(f, "Fraud"),
            Category::Ops => write!(f, "Ops"),
            Category::Safety => write!(f, "Safety"),
            Category::Sales => write!(f, "Sales"),
            Category::Health => write!(f, "Health"),
        }
    }
}

impl Category {
    /// Strict parse against the closed set. Unknown values are a caller error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Fraud" => Some(Category::Fraud),
            "Ops" => Some(Category::Ops),
            "Safety" => Some(Category::Safety),
            "Sales" => Some(Category::Sales),
            "Health" => Some(Category::Health),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

pub const SEVERITY_OPTIONS: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

impl Severity {
    /// Fixed ordinal table: Low=1 < Medium=2 < High=3. Sorting uses this,
    /// never the string form.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

// --- Event ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventMetrics {
    /// 0..=100
    pub score: f64,
    /// 0..=1
    pub confidence: f64,
    /// >= 0
    pub impact: f64,
}

/// A recorded anomaly/incident. `id` and `created_at` are assigned once at
/// creation and never change across updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub location: GeoPoint,
    pub metrics: EventMetrics,
    pub tags: Vec<String>,
}

/// Drop duplicate tags, keeping the first occurrence of each.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// --- Users ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ranks_are_totally_ordered() {
        assert!(Severity::Low.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::High.rank());
    }

    #[test]
    fn category_parse_roundtrips_every_option() {
        for cat in CATEGORY_OPTIONS {
            assert_eq!(Category::parse(&cat.to_string()), Some(cat));
        }
        assert_eq!(Category::parse("Finance"), None);
        assert_eq!(Category::parse("fraud"), None);
    }

    #[test]
    fn severity_parse_rejects_unknown_and_case_variants() {
        for sev in SEVERITY_OPTIONS {
            assert_eq!(Severity::parse(&sev.to_string()), Some(sev));
        }
        assert_eq!(Severity::parse("Critical"), None);
        assert_eq!(Severity::parse("high"), None);
    }

    #[test]
    fn dedup_tags_keeps_first_occurrence_order() {
        let tags = vec![
            "latency".to_string(),
            "ops".to_string(),
            "latency".to_string(),
            "incident".to_string(),
            "ops".to_string(),
        ];
        assert_eq!(dedup_tags(tags), vec!["latency", "ops", "incident"]);
    }

    #[test]
    fn event_serializes_with_camel_case_wire_names() {
        let event = InsightEvent {
            id: "evt-1".to_string(),
            title: "Chargeback spike".to_string(),
            description: "Detected increase in chargeback patterns.".to_string(),
            category: Category::Fraud,
            severity: Severity::High,
            created_at: Utc::now(),
            location: GeoPoint {
                lat: 19.076,
                lng: 72.8777,
            },
            metrics: EventMetrics {
                score: 80.0,
                confidence: 0.9,
                impact: 400.0,
            },
            tags: vec!["chargeback".to_string()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["category"], "Fraud");
        assert_eq!(json["severity"], "High");
    }

    #[test]
    fn geo_point_finiteness() {
        assert!(GeoPoint { lat: 0.0, lng: 0.0 }.is_finite());
        assert!(!GeoPoint {
            lat: f64::NAN,
            lng: 0.0
        }
        .is_finite());
        assert!(!GeoPoint {
            lat: 0.0,
            lng: f64::INFINITY
        }
        .is_finite());
    }
}
