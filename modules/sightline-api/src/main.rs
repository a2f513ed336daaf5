use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, patch};
use axum::Router;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sightline_common::Config;
use sightline_engine::{
    seed_events, InsightService, MemoryEventStore, MemoryUserDirectory, UserDirectory,
};

mod error;
mod identity;
mod rest;

pub struct AppState {
    pub service: InsightService,
    pub users: Arc<dyn UserDirectory>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sightline=info".parse()?))
        .init();

    let config = Config::from_env();

    let events = Arc::new(MemoryEventStore::with_events(seed_events(
        config.seed_count,
        config.seed,
        Utc::now(),
    )));
    let users = Arc::new(MemoryUserDirectory::with_defaults());

    let state = Arc::new(AppState {
        service: InsightService::new(events, users.clone()),
        users,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Events
        .route(
            "/api/events",
            get(rest::api_list_events).post(rest::api_create_event),
        )
        .route("/api/events/export", get(rest::api_export_events))
        .route("/api/events/geojson", get(rest::api_events_geojson))
        .route(
            "/api/events/{id}",
            get(rest::api_get_event)
                .put(rest::api_update_event)
                .delete(rest::api_delete_event),
        )
        // Insights
        .route("/api/insights", get(rest::api_insights))
        // Users
        .route("/api/users", get(rest::api_list_users))
        .route("/api/users/{id}/role", patch(rest::api_update_user_role))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.host, config.port);
    info!("Sightline API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
