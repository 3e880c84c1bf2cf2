pub mod forecast;
pub mod products;

use std::sync::Arc;

use crate::{
    config::ForecastConfig,
    events::EventSender,
    services::{forecasting::ForecastingService, products::ProductService},
    store::{HistoryStore, PlanLog},
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub forecasting: Arc<ForecastingService>,
}

impl AppServices {
    pub fn new(
        store: Arc<HistoryStore>,
        plan_log: Arc<PlanLog>,
        event_sender: EventSender,
        forecast_config: ForecastConfig,
    ) -> Self {
        let products = Arc::new(ProductService::new(store.clone(), event_sender.clone()));
        let forecasting = Arc::new(ForecastingService::new(
            store,
            plan_log,
            event_sender,
            forecast_config,
        ));
        Self {
            products,
            forecasting,
        }
    }
}
