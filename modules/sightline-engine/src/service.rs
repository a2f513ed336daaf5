//! The permission-gated facade over the pipeline and the repositories.
//! Every operation gates first, validates second, and only then touches the
//! store, so error paths never leave partial writes behind.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use sightline_common::{
    assert_permission, Identity, InsightEvent, Permission, Role, SightlineError, User,
};

use crate::filter::apply_filters;
use crate::insights::{compute_insights, InsightSummary, DEFAULT_TREND_WINDOW_DAYS};
use crate::paginate::{paginate, Page};
use crate::query::{validate_query, EventQuery, MAX_PAGE_SIZE};
use crate::sort::apply_sort;
use crate::store::{EventDraft, EventPatch, EventRepository, UserDirectory};

#[derive(Clone)]
pub struct InsightService {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserDirectory>,
}

impl InsightService {
    pub fn new(events: Arc<dyn EventRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { events, users }
    }

    /// Validated, filtered, sorted, paginated listing.
    pub async fn list_events(
        &self,
        identity: Option<&Identity>,
        raw: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<Page, SightlineError> {
        assert_permission(identity, Permission::EventsRead)?;
        let query = validate_query(raw)?;
        let sorted = self.filtered_sorted(&query, now).await?;
        // Second clamp behind the validator's own page-size ceiling.
        let page_size = query.page_size.min(MAX_PAGE_SIZE);
        Ok(paginate(sorted, query.page, page_size))
    }

    /// The full filtered+sorted sequence, unpaginated. Feeds CSV export.
    pub async fn export_events(
        &self,
        identity: Option<&Identity>,
        raw: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<InsightEvent>, SightlineError> {
        assert_permission(identity, Permission::EventsRead)?;
        let query = validate_query(raw)?;
        self.filtered_sorted(&query, now).await
    }

    /// Analytics over the filtered set. Trend window follows the query's
    /// `days` when present, else 14.
    pub async fn insights(
        &self,
        identity: Option<&Identity>,
        raw: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<InsightSummary, SightlineError> {
        assert_permission(identity, Permission::EventsRead)?;
        let query = validate_query(raw)?;
        let events = self.events.list().await?;
        let filtered = apply_filters(events, &query, now);
        let window = query.days.unwrap_or(DEFAULT_TREND_WINDOW_DAYS);
        Ok(compute_insights(&filtered, window, now))
    }

    pub async fn get_event(
        &self,
        identity: Option<&Identity>,
        id: &str,
    ) -> Result<InsightEvent, SightlineError> {
        assert_permission(identity, Permission::EventsRead)?;
        self.events
            .get(id)
            .await?
            .ok_or_else(|| SightlineError::not_found("event"))
    }

    pub async fn create_event(
        &self,
        identity: Option<&Identity>,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<InsightEvent, SightlineError> {
        assert_permission(identity, Permission::EventsCreate)?;
        draft.validate()?;
        self.events.create(draft, now).await
    }

    pub async fn update_event(
        &self,
        identity: Option<&Identity>,
        id: &str,
        patch: EventPatch,
    ) -> Result<InsightEvent, SightlineError> {
        assert_permission(identity, Permission::EventsUpdate)?;
        patch.validate()?;
        self.events
            .update(id, patch)
            .await?
            .ok_or_else(|| SightlineError::not_found("event"))
    }

    pub async fn delete_event(
        &self,
        identity: Option<&Identity>,
        id: &str,
    ) -> Result<(), SightlineError> {
        assert_permission(identity, Permission::EventsDelete)?;
        if self.events.delete(id).await? {
            Ok(())
        } else {
            Err(SightlineError::not_found("event"))
        }
    }

    pub async fn list_users(
        &self,
        identity: Option<&Identity>,
    ) -> Result<Vec<User>, SightlineError> {
        assert_permission(identity, Permission::UsersRead)?;
        self.users.list().await
    }

    /// Role changes require `users:updateRole` and are never allowed on the
    /// caller's own record, Admin or not.
    pub async fn update_user_role(
        &self,
        identity: Option<&Identity>,
        target_id: &str,
        role: Role,
    ) -> Result<User, SightlineError> {
        let caller = identity.ok_or(SightlineError::Unauthenticated)?;
        assert_permission(Some(caller), Permission::UsersUpdateRole)?;
        if caller.user_id == target_id {
            return Err(SightlineError::SelfRoleChange);
        }
        self.users
            .update_role(target_id, role)
            .await?
            .ok_or_else(|| SightlineError::not_found("user"))
    }

    async fn filtered_sorted(
        &self,
        query: &EventQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<InsightEvent>, SightlineError> {
        let events = self.events.list().await?;
        let filtered = apply_filters(events, query, now);
        Ok(apply_sort(filtered, query.sort_by, query.sort_dir))
    }
}
