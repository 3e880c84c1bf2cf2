// Domain models shared across services and handlers
pub mod plan;
pub mod product;

pub use plan::{
    AlertEntry, ForecastPlan, ForecastRequest, ForecastSummary, ReviewPlanEntry, SavedRun,
};
pub use product::{HistoryRecord, Product};
