//! In-memory metrics for monitoring engine usage.
//!
//! Exposed in Prometheus text format at `/metrics` and as JSON at
//! `/metrics/json`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to export metrics: {0}")]
    ExportError(String),
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Process-wide business counters.
#[derive(Debug, Default)]
pub struct Metrics {
    pub forecasts_generated: Counter,
    pub forecast_failures: Counter,
    pub plans_saved: Counter,
    pub plans_deleted: Counter,
    pub products_created: Counter,
    pub products_deleted: Counter,
}

pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

fn counters() -> [(&'static str, &'static str, u64); 6] {
    [
        (
            "easystock_forecasts_generated_total",
            "Forecast plans computed",
            METRICS.forecasts_generated.get(),
        ),
        (
            "easystock_forecast_failures_total",
            "Forecast requests that failed",
            METRICS.forecast_failures.get(),
        ),
        (
            "easystock_plans_saved_total",
            "Plans persisted to the plan log",
            METRICS.plans_saved.get(),
        ),
        (
            "easystock_plans_deleted_total",
            "Saved runs removed from the plan log",
            METRICS.plans_deleted.get(),
        ),
        (
            "easystock_products_created_total",
            "Products registered in the history store",
            METRICS.products_created.get(),
        ),
        (
            "easystock_products_deleted_total",
            "Products removed from the history store",
            METRICS.products_deleted.get(),
        ),
    ]
}

/// Prometheus text exposition of every counter.
pub async fn metrics_handler() -> Result<String, MetricsError> {
    let mut out = String::new();
    for (name, help, value) in counters() {
        out.push_str(&format!(
            "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n"
        ));
    }
    Ok(out)
}

pub async fn metrics_json_handler() -> Result<Value, MetricsError> {
    let mut map = serde_json::Map::new();
    for (name, _, value) in counters() {
        map.insert(name.to_string(), json!(value));
    }
    Ok(Value::Object(map))
}
