//! Repository seams and their in-memory implementations.
//!
//! The engine only ever talks to these traits; what sits behind them
//! (memory here, a database elsewhere) is not the engine's concern. The
//! in-memory stores iterate in creation order, which is what makes the
//! analyzer's first-encountered tie-breaks deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use sightline_common::{
    dedup_tags, Category, EventMetrics, FieldError, GeoPoint, InsightEvent, Role, Severity,
    SightlineError, User,
};

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Fields for a new event. The repository assigns `id` and `created_at`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub location: GeoPoint,
    pub metrics: EventMetrics,
    pub tags: Vec<String>,
}

impl EventDraft {
    /// Field constraints from the data model. Every offending field is
    /// reported; a draft is never partially accepted.
    pub fn validate(&self) -> Result<(), SightlineError> {
        let mut errors = Vec::new();
        check_text("title", &self.title, &mut errors);
        check_text("description", &self.description, &mut errors);
        check_location(&self.location, &mut errors);
        check_metrics(&self.metrics, &mut errors);
        check_tags(&self.tags, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SightlineError::validation(errors))
        }
    }
}

/// A partial update. Only present fields are applied; `id` and
/// `created_at` are never part of the whitelist.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    pub location: Option<GeoPoint>,
    pub metrics: Option<EventMetrics>,
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), SightlineError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_text("title", title, &mut errors);
        }
        if let Some(description) = &self.description {
            check_text("description", description, &mut errors);
        }
        if let Some(location) = &self.location {
            check_location(location, &mut errors);
        }
        if let Some(metrics) = &self.metrics {
            check_metrics(metrics, &mut errors);
        }
        if let Some(tags) = &self.tags {
            check_tags(tags, &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SightlineError::validation(errors))
        }
    }

    /// Merge into an existing event, preserving identity and creation time.
    pub fn apply_to(self, event: &mut InsightEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(severity) = self.severity {
            event.severity = severity;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(metrics) = self.metrics {
            event.metrics = metrics;
        }
        if let Some(tags) = self.tags {
            event.tags = dedup_tags(tags);
        }
    }
}

fn check_text(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    }
}

fn check_location(location: &GeoPoint, errors: &mut Vec<FieldError>) {
    if !location.is_finite() {
        errors.push(FieldError::new("location", "lat and lng must be finite numbers"));
    }
}

fn check_metrics(metrics: &EventMetrics, errors: &mut Vec<FieldError>) {
    if !metrics.score.is_finite() || !(0.0..=100.0).contains(&metrics.score) {
        errors.push(FieldError::new("metrics.score", "must be between 0 and 100"));
    }
    if !metrics.confidence.is_finite() || !(0.0..=1.0).contains(&metrics.confidence) {
        errors.push(FieldError::new("metrics.confidence", "must be between 0 and 1"));
    }
    if !metrics.impact.is_finite() || metrics.impact < 0.0 {
        errors.push(FieldError::new("metrics.impact", "must be zero or greater"));
    }
}

fn check_tags(tags: &[String], errors: &mut Vec<FieldError>) {
    if tags.is_empty() {
        errors.push(FieldError::new("tags", "must contain at least one tag"));
    } else if tags.iter().any(|t| t.trim().is_empty()) {
        errors.push(FieldError::new("tags", "tags must not be empty strings"));
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// CRUD store for events. Single-record operations are atomic; updates are
/// last-write-wins. Iteration order of `list` is creation order.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<InsightEvent>, SightlineError>;
    async fn get(&self, id: &str) -> Result<Option<InsightEvent>, SightlineError>;
    /// Assigns id and `created_at` (= the supplied `now`).
    async fn create(
        &self,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<InsightEvent, SightlineError>;
    async fn update(
        &self,
        id: &str,
        patch: EventPatch,
    ) -> Result<Option<InsightEvent>, SightlineError>;
    async fn delete(&self, id: &str) -> Result<bool, SightlineError>;
}

/// Read/update access to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, SightlineError>;
    async fn get(&self, id: &str) -> Result<Option<User>, SightlineError>;
    async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, SightlineError>;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// Creation-ordered in-memory event store.
#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<InsightEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<InsightEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Replace the whole collection. Test fixtures and demo re-seeding.
    pub async fn reset(&self, events: Vec<InsightEvent>) {
        *self.events.write().await = events;
    }
}

#[async_trait]
impl EventRepository for MemoryEventStore {
    async fn list(&self) -> Result<Vec<InsightEvent>, SightlineError> {
        Ok(self.events.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<InsightEvent>, SightlineError> {
        Ok(self.events.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn create(
        &self,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<InsightEvent, SightlineError> {
        let event = InsightEvent {
            id: format!("evt_{}", Uuid::new_v4().simple()),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            severity: draft.severity,
            created_at: now,
            location: draft.location,
            metrics: draft.metrics,
            tags: dedup_tags(draft.tags),
        };
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        id: &str,
        patch: EventPatch,
    ) -> Result<Option<InsightEvent>, SightlineError> {
        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        patch.apply_to(event);
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, SightlineError> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }
}

/// In-memory user directory seeded with one user per role.
pub struct MemoryUserDirectory {
    users: RwLock<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// The demo directory: one Admin, one Analyst, one Viewer.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            User {
                id: "u-admin".to_string(),
                email: "admin@test.com".to_string(),
                role: Role::Admin,
            },
            User {
                id: "u-analyst".to_string(),
                email: "analyst@test.com".to_string(),
                role: Role::Analyst,
            },
            User {
                id: "u-viewer".to_string(),
                email: "viewer@test.com".to_string(),
                role: Role::Viewer,
            },
        ])
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn list(&self) -> Result<Vec<User>, SightlineError> {
        Ok(self.users.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, SightlineError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, SightlineError> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.role = role;
        Ok(Some(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: "a draft".to_string(),
            category: Category::Ops,
            severity: Severity::Low,
            location: GeoPoint { lat: 1.0, lng: 2.0 },
            metrics: EventMetrics {
                score: 50.0,
                confidence: 0.5,
                impact: 10.0,
            },
            tags: vec!["ops".to_string(), "ops".to_string(), "latency".to_string()],
        }
    }

    fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp_and_dedupes_tags() {
        let store = MemoryEventStore::new();
        let event = store.create(draft("first"), fixture_now()).await.unwrap();
        assert!(event.id.starts_with("evt_"));
        assert_eq!(event.created_at, fixture_now());
        assert_eq!(event.tags, vec!["ops", "latency"]);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, event.id);
    }

    #[tokio::test]
    async fn list_iterates_in_creation_order() {
        let store = MemoryEventStore::new();
        for i in 0..5 {
            store
                .create(draft(&format!("event {i}")), fixture_now())
                .await
                .unwrap();
        }
        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["event 0", "event 1", "event 2", "event 3", "event 4"]);
    }

    #[tokio::test]
    async fn update_preserves_id_and_created_at() {
        let store = MemoryEventStore::new();
        let created = store.create(draft("before"), fixture_now()).await.unwrap();

        let patch = EventPatch {
            title: Some("after".to_string()),
            severity: Some(Severity::High),
            ..EventPatch::default()
        };
        let updated = store.update(&created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.severity, Severity::High);
        // Untouched fields survive.
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none_and_delete_reports_absence() {
        let store = MemoryEventStore::new();
        assert!(store
            .update("missing", EventPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete("missing").await.unwrap());

        let created = store.create(draft("to delete"), fixture_now()).await.unwrap();
        assert!(store.delete(&created.id).await.unwrap());
        assert!(store.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_replaces_the_collection() {
        let store = MemoryEventStore::new();
        store.create(draft("old"), fixture_now()).await.unwrap();
        store.reset(Vec::new()).await;
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn draft_validation_reports_every_bad_field() {
        let bad = EventDraft {
            title: " ".to_string(),
            description: String::new(),
            category: Category::Ops,
            severity: Severity::Low,
            location: GeoPoint {
                lat: f64::NAN,
                lng: 0.0,
            },
            metrics: EventMetrics {
                score: 120.0,
                confidence: -0.2,
                impact: -5.0,
            },
            tags: vec![],
        };
        let err = bad.validate().unwrap_err();
        let SightlineError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 7);
    }

    #[test]
    fn patch_validation_checks_only_present_fields() {
        assert!(EventPatch::default().validate().is_ok());
        let bad = EventPatch {
            metrics: Some(EventMetrics {
                score: 50.0,
                confidence: 1.5,
                impact: 0.0,
            }),
            ..EventPatch::default()
        };
        assert!(bad.validate().is_err());
    }

    #[tokio::test]
    async fn user_directory_updates_roles_in_place() {
        let users = MemoryUserDirectory::with_defaults();
        let updated = users
            .update_role("u-viewer", Role::Analyst)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Analyst);
        assert!(users.update_role("u-ghost", Role::Admin).await.unwrap().is_none());
    }
}
