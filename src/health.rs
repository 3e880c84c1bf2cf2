//! Health endpoints: liveness (`/health/live`), readiness
//! (`/health/ready`) and an overall summary (`/health`).

use std::time::{Duration, SystemTime};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub products_tracked: usize,
}

/// Server start time, fixed at state construction for uptime reporting.
#[derive(Clone, Copy, Debug)]
pub struct StartTime(pub SystemTime);

impl StartTime {
    pub fn now() -> Self {
        Self(SystemTime::now())
    }

    pub fn uptime_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(self.0)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let info = HealthInfo {
        status: HealthStatus::Up,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.start_time.uptime_seconds(),
        products_tracked: state.store.len(),
    };
    Json(info)
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "up" })))
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // The store is in-process; being able to count it is being ready.
    (
        StatusCode::OK,
        Json(json!({
            "status": "up",
            "products_tracked": state.store.len(),
        })),
    )
}
