//! Compatibility adapter for legacy plan payloads.
//!
//! Historical backends answered the forecast endpoint with either the
//! tagged `{plan, summary}` object or a bare entry array. The engine
//! emits only the tagged shape; consumers that still ingest older
//! payloads normalize them here, at the boundary, so the core never sees
//! the ambiguity.

use serde::Deserialize;

use crate::models::{ForecastPlan, ForecastSummary, ReviewPlanEntry};

/// Either historical response shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyPlanPayload {
    Tagged(ForecastPlan),
    Bare(Vec<ReviewPlanEntry>),
}

impl From<LegacyPlanPayload> for ForecastPlan {
    fn from(payload: LegacyPlanPayload) -> Self {
        match payload {
            LegacyPlanPayload::Tagged(plan) => plan,
            LegacyPlanPayload::Bare(entries) => {
                // A bare array carries no accuracy information; the
                // summary is derived, with accuracy left absent.
                let summary = ForecastSummary {
                    next_review_date: entries.first().map(|e| e.review_date),
                    total_order_qty: entries.iter().map(|e| e.order_qty).sum(),
                    accuracy_pct: None,
                };
                ForecastPlan { entries, summary }
            }
        }
    }
}

/// Parses either legacy shape into the canonical plan.
pub fn parse_plan(json: &str) -> Result<ForecastPlan, serde_json::Error> {
    serde_json::from_str::<LegacyPlanPayload>(json).map(Into::into)
}
