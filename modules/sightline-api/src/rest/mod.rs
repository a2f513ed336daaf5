//! REST handlers. Thin: resolve identity, hand the raw input to the
//! service, serialize the result into the `{"data": ...}` envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use sightline_common::{FieldError, InsightEvent, Role, SightlineError};
use sightline_engine::{EventDraft, EventPatch};

use crate::error::ApiError;
use crate::identity::MaybeIdentity;
use crate::AppState;

type RawParams = HashMap<String, String>;

// --- Events ---

pub async fn api_list_events(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<RawParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .service
        .list_events(identity.as_ref(), &params, Utc::now())
        .await?;
    Ok(Json(json!({ "data": { "items": page.items, "meta": page.meta } })))
}

pub async fn api_create_event(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let draft: EventDraft = parse_body(body)?;
    let created = state
        .service
        .create_event(identity.as_ref(), draft, Utc::now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "item": created } })),
    ))
}

pub async fn api_get_event(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.service.get_event(identity.as_ref(), &id).await?;
    Ok(Json(json!({ "data": { "item": event } })))
}

pub async fn api_update_event(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let patch: EventPatch = parse_body(body)?;
    let updated = state
        .service
        .update_event(identity.as_ref(), &id, patch)
        .await?;
    Ok(Json(json!({ "data": { "item": updated } })))
}

pub async fn api_delete_event(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete_event(identity.as_ref(), &id).await?;
    Ok(Json(json!({ "data": { "ok": true } })))
}

// --- Export ---

pub async fn api_export_events(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<RawParams>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let events = state
        .service
        .export_events(identity.as_ref(), &params, now)
        .await?;
    let filename = format!("insight-events_{}.csv", now.format("%Y-%m-%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        events_to_csv(&events),
    ))
}

/// Render the filtered, sorted sequence as CSV. Free-text columns are
/// quoted; embedded quotes double per RFC 4180.
pub fn events_to_csv(events: &[InsightEvent]) -> String {
    let mut rows = Vec::with_capacity(events.len() + 1);
    rows.push("id,title,category,severity,score,confidence,impact,createdAt,tags".to_string());
    for event in events {
        rows.push(
            [
                event.id.clone(),
                wrap(&event.title),
                event.category.to_string(),
                event.severity.to_string(),
                event.metrics.score.to_string(),
                event.metrics.confidence.to_string(),
                event.metrics.impact.to_string(),
                event
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                wrap(&event.tags.join("|")),
            ]
            .join(","),
        );
    }
    rows.join("\n")
}

fn wrap(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// --- Map feed ---

pub async fn api_events_geojson(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<RawParams>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state
        .service
        .export_events(identity.as_ref(), &params, Utc::now())
        .await?;
    Ok(Json(events_to_geojson(&events)))
}

pub fn events_to_geojson(events: &[InsightEvent]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = events
        .iter()
        .map(|event| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [event.location.lng, event.location.lat]
                },
                "properties": {
                    "id": event.id,
                    "title": event.title,
                    "category": event.category.to_string(),
                    "severity": event.severity.to_string(),
                    "score": event.metrics.score,
                    "impact": event.metrics.impact,
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

// --- Insights ---

pub async fn api_insights(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Query(params): Query<RawParams>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .service
        .insights(identity.as_ref(), &params, Utc::now())
        .await?;
    Ok(Json(json!({ "data": summary })))
}

// --- Users ---

pub async fn api_list_users(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.service.list_users(identity.as_ref()).await?;
    Ok(Json(json!({ "data": { "items": users } })))
}

#[derive(Deserialize)]
pub struct RoleBody {
    role: String,
}

pub async fn api_update_user_role(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(id): Path<String>,
    Json(body): Json<RoleBody>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(role) = Role::parse(&body.role) else {
        return Err(SightlineError::validation(vec![FieldError::new(
            "role",
            "must be one of Admin, Analyst, Viewer",
        )])
        .into());
    };
    let updated = state
        .service
        .update_user_role(identity.as_ref(), &id, role)
        .await?;
    Ok(Json(json!({ "data": { "item": updated } })))
}

// --- Helpers ---

/// Deserialize a JSON body, reporting serde failures in the same aggregated
/// shape as query validation.
fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        ApiError(SightlineError::validation(vec![FieldError::new(
            "body",
            e.to_string(),
        )]))
    })
}
