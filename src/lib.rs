//! EasyStock API Library
//!
//! Forecasting and periodic-review replenishment planning over an
//! in-process product history store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod dto;
pub mod errors;
pub mod events;
pub mod forecasting;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;
pub mod store;
pub mod tracing;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<store::HistoryStore>,
    pub plan_log: Arc<store::PlanLog>,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub start_time: health::StartTime,
}

/// API v1 routes: the history-store surface, the forecast engine
/// endpoints and the saved-plan log.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/products/:id/history",
            post(handlers::products::append_history),
        )
        .route(
            "/forecast/:product_id",
            post(handlers::forecast::generate_forecast),
        )
        .route(
            "/forecast/:product_id/save",
            post(handlers::forecast::save_forecast),
        )
        .route("/alerts", get(handlers::forecast::list_alerts))
        .route("/alerts/:run_id", delete(handlers::forecast::delete_alert))
}

/// Builds the full application router and state.
///
/// Shared by the server binary and the integration-test harness so both
/// exercise the same middleware stack. Spawns the background event
/// processor on the current runtime; CORS is attached by the binary
/// since it may refuse to start on missing production configuration.
pub fn build_app(config: config::AppConfig) -> (Router, AppState) {
    let store = Arc::new(store::HistoryStore::new());
    let plan_log = Arc::new(store::PlanLog::new());

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(config.event_queue_capacity);
    let event_sender = events::EventSender::new(event_tx);
    tokio::spawn(events::process_events(event_rx));

    let services = handlers::AppServices::new(
        store.clone(),
        plan_log.clone(),
        event_sender.clone(),
        config.forecast.clone(),
    );

    let state = AppState {
        config: config.clone(),
        store,
        plan_log,
        event_sender,
        services,
        start_time: health::StartTime::now(),
    };

    let router = Router::new()
        .route("/", get(|| async { "easystock-api up" }))
        .route(
            "/metrics",
            get(|| async move {
                match metrics::metrics_handler().await {
                    Ok(body) => (StatusCode::OK, body),
                    Err(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        String::from("metrics error"),
                    ),
                }
            }),
        )
        .route(
            "/metrics/json",
            get(|| async move {
                match metrics::metrics_json_handler().await {
                    Ok(json) => (StatusCode::OK, axum::Json(json)),
                    Err(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        axum::Json(serde_json::json!({"error":"metrics error"})),
                    ),
                }
            }),
        )
        .merge(health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        // Engine computation is synchronous-bounded work; cap it per request
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(tracing::request_id_middleware))
        .with_state(state.clone());

    (router, state)
}
