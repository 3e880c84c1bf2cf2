use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Horizon parameters for one forecast computation.
///
/// The product id travels in the URL path; both fields must be strictly
/// positive or the request is rejected before any component runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, ToSchema)]
pub struct ForecastRequest {
    #[validate(range(min = 1, max = 120))]
    pub months: u32,
    #[validate(range(min = 1, max = 366))]
    pub review_days: u32,
}

/// A single review point in a replenishment plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewPlanEntry {
    pub review_date: NaiveDate,
    pub stock_before: f64,
    pub demand_next: f64,
    pub order_qty: f64,
}

/// Plan-level rollup. Fields that cannot be estimated are `None` and
/// serialize as JSON `null`, never a stand-in zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastSummary {
    #[serde(default)]
    pub next_review_date: Option<NaiveDate>,
    pub total_order_qty: f64,
    #[serde(default)]
    pub accuracy_pct: Option<f64>,
}

/// Canonical engine output: `{"plan": [...], "summary": {...}}`.
///
/// Computed per request and discarded; saving a copy is the plan log's
/// concern, not the engine's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastPlan {
    #[serde(rename = "plan")]
    pub entries: Vec<ReviewPlanEntry>,
    pub summary: ForecastSummary,
}

/// A persisted plan, grouped under one run id in the plan log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedRun {
    pub run_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub months: u32,
    pub review_days: u32,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<ReviewPlanEntry>,
}

/// One flattened saved-plan row as returned by the alerts listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertEntry {
    pub run_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub review_date: NaiveDate,
    pub stock_before: f64,
    pub demand_next: f64,
    pub order_qty: f64,
    pub created_at: DateTime<Utc>,
}
