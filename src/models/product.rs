use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One day of observed sales and end-of-day stock for a product.
///
/// Dates are unique within a product's history; the store keeps the
/// series sorted ascending by date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    #[validate(range(min = 0.0))]
    pub daily_sales: f64,
    #[validate(range(min = 0.0))]
    pub stock_quantity: f64,
}

/// A tracked product together with its sales history.
///
/// Owned by the history store; the forecasting engine only ever sees a
/// cloned snapshot and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub min_stock_level: f64,
    pub is_active: bool,
    pub history: Vec<HistoryRecord>,
}

impl Product {
    /// Most recent history record, relying on the ascending-date invariant.
    pub fn last_record(&self) -> Option<&HistoryRecord> {
        self.history.last()
    }

    /// Latest known stock level; zero when there is no history at all.
    pub fn latest_stock(&self) -> f64 {
        self.last_record().map(|r| r.stock_quantity).unwrap_or(0.0)
    }

    /// Calendar span of the history in days (0 for empty or single-point).
    pub fn history_span_days(&self) -> i64 {
        match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }
}
