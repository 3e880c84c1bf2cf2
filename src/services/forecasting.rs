use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::ForecastConfig,
    errors::ServiceError,
    events::{Event, EventSender},
    forecasting,
    metrics::METRICS,
    models::{AlertEntry, ForecastPlan, ForecastRequest, SavedRun},
    store::{HistoryStore, PlanLog},
};

/// Service wrapping the replenishment engine: resolves the product
/// snapshot and the request date, runs the pure computation, and owns the
/// saved-plan log.
#[derive(Clone)]
pub struct ForecastingService {
    store: Arc<HistoryStore>,
    plan_log: Arc<PlanLog>,
    event_sender: EventSender,
    config: ForecastConfig,
}

impl ForecastingService {
    pub fn new(
        store: Arc<HistoryStore>,
        plan_log: Arc<PlanLog>,
        event_sender: EventSender,
        config: ForecastConfig,
    ) -> Self {
        Self {
            store,
            plan_log,
            event_sender,
            config,
        }
    }

    /// Computes a replenishment plan for one product.
    ///
    /// Validation and product lookup happen before any engine component
    /// runs; an invalid request or unknown product never triggers a
    /// computation.
    #[instrument(skip(self))]
    pub async fn generate_plan(
        &self,
        product_id: Uuid,
        request: ForecastRequest,
    ) -> Result<ForecastPlan, ServiceError> {
        let (_, plan) = self.compute(product_id, request).await?;

        self.event_sender
            .send(Event::ForecastGenerated {
                product_id,
                reviews: plan.entries.len(),
                total_order_qty: plan.summary.total_order_qty,
            })
            .await
            .map_err(ServiceError::EventError)?;
        info!(
            %product_id,
            reviews = plan.entries.len(),
            total_order_qty = plan.summary.total_order_qty,
            "replenishment plan computed"
        );
        Ok(plan)
    }

    /// Computes a plan and persists it to the plan log under a fresh run
    /// id.
    #[instrument(skip(self))]
    pub async fn save_plan(
        &self,
        product_id: Uuid,
        request: ForecastRequest,
    ) -> Result<(SavedRun, ForecastPlan), ServiceError> {
        let (product_name, plan) = self.compute(product_id, request).await?;

        let run = SavedRun {
            run_id: Uuid::new_v4(),
            product_id,
            product_name,
            months: request.months,
            review_days: request.review_days,
            created_at: Utc::now(),
            entries: plan.entries.clone(),
        };
        self.plan_log.insert(run.clone());
        METRICS.plans_saved.inc();
        self.event_sender
            .send(Event::PlanSaved {
                run_id: run.run_id,
                product_id,
            })
            .await
            .map_err(ServiceError::EventError)?;
        info!(run_id = %run.run_id, %product_id, "replenishment plan saved");
        Ok((run, plan))
    }

    /// Saved-plan entries, newest run first.
    pub fn list_alerts(&self) -> Vec<AlertEntry> {
        self.plan_log.alerts()
    }

    #[instrument(skip(self))]
    pub async fn delete_run(&self, run_id: Uuid) -> Result<(), ServiceError> {
        self.plan_log
            .remove(&run_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Forecast run {} not found", run_id)))?;
        METRICS.plans_deleted.inc();
        self.event_sender
            .send(Event::PlanDeleted { run_id })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }

    async fn compute(
        &self,
        product_id: Uuid,
        request: ForecastRequest,
    ) -> Result<(String, ForecastPlan), ServiceError> {
        request.validate()?;
        let product = self
            .store
            .snapshot(&product_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let today = Utc::now().date_naive();
        match forecasting::build_plan(&product, &request, today, &self.config) {
            Ok(plan) => {
                METRICS.forecasts_generated.inc();
                Ok((product.name, plan))
            }
            Err(err) => {
                METRICS.forecast_failures.inc();
                Err(err)
            }
        }
    }
}
