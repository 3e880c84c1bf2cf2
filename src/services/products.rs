use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::METRICS,
    models::{HistoryRecord, Product},
    store::{AppendError, HistoryStore},
};

/// Optional field updates for an existing product.
#[derive(Debug, Default, Clone)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub min_stock_level: Option<f64>,
    pub is_active: Option<bool>,
}

/// Service for managing the product catalog and its sales history.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<HistoryStore>,
    event_sender: EventSender,
}

impl ProductService {
    pub fn new(store: Arc<HistoryStore>, event_sender: EventSender) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    /// Registers a product, optionally seeded with history.
    #[instrument(skip(self, history), fields(records = history.len()))]
    pub async fn create_product(
        &self,
        name: String,
        min_stock_level: f64,
        is_active: bool,
        mut history: Vec<HistoryRecord>,
    ) -> Result<Product, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "product name must not be empty".into(),
            ));
        }
        if min_stock_level < 0.0 {
            return Err(ServiceError::ValidationError(
                "min_stock_level must be non-negative".into(),
            ));
        }
        validate_history(&history)?;

        history.sort_by_key(|r| r.date);
        let product = Product {
            id: Uuid::new_v4(),
            name,
            min_stock_level,
            is_active,
            history,
        };
        self.store.insert(product.clone());
        METRICS.products_created.inc();
        self.event_sender
            .send(Event::ProductCreated {
                product_id: product.id,
            })
            .await
            .map_err(ServiceError::EventError)?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.store.list()
    }

    pub fn get_product(&self, product_id: Uuid) -> Result<Product, ServiceError> {
        self.store
            .snapshot(&product_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        product_id: Uuid,
        update: ProductUpdate,
    ) -> Result<Product, ServiceError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "product name must not be empty".into(),
                ));
            }
        }
        if let Some(level) = update.min_stock_level {
            if level < 0.0 {
                return Err(ServiceError::ValidationError(
                    "min_stock_level must be non-negative".into(),
                ));
            }
        }

        let product = self
            .store
            .update(&product_id, |product| {
                if let Some(name) = update.name {
                    product.name = name;
                }
                if let Some(level) = update.min_stock_level {
                    product.min_stock_level = level;
                }
                if let Some(active) = update.is_active {
                    product.is_active = active;
                }
            })
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        self.event_sender
            .send(Event::ProductUpdated { product_id })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), ServiceError> {
        self.store
            .remove(&product_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;
        METRICS.products_deleted.inc();
        self.event_sender
            .send(Event::ProductDeleted { product_id })
            .await
            .map_err(ServiceError::EventError)?;
        info!(product_id = %product_id, "product deleted");
        Ok(())
    }

    /// Appends sales records to a product's history.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn append_history(
        &self,
        product_id: Uuid,
        records: Vec<HistoryRecord>,
    ) -> Result<Product, ServiceError> {
        validate_history(&records)?;
        let count = records.len();

        let product = self
            .store
            .append_history(&product_id, records)
            .map_err(|err| match err {
                AppendError::ProductNotFound => {
                    ServiceError::NotFound(format!("Product {} not found", product_id))
                }
                AppendError::DuplicateDate(date) => ServiceError::Conflict(format!(
                    "history already contains a record for {}",
                    date
                )),
            })?;

        self.event_sender
            .send(Event::HistoryAppended {
                product_id,
                records: count,
            })
            .await
            .map_err(ServiceError::EventError)?;
        Ok(product)
    }
}

/// Rejects non-finite or negative values and duplicate dates within the
/// batch; duplicates against stored history are checked under the store's
/// entry lock.
fn validate_history(records: &[HistoryRecord]) -> Result<(), ServiceError> {
    for record in records {
        record.validate()?;
        if !record.daily_sales.is_finite() || !record.stock_quantity.is_finite() {
            return Err(ServiceError::ValidationError(format!(
                "history record for {} contains a non-finite value",
                record.date
            )));
        }
    }

    let mut dates: Vec<_> = records.iter().map(|r| r.date).collect();
    dates.sort();
    if let Some(pair) = dates.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(ServiceError::ValidationError(format!(
            "duplicate history date {}",
            pair[0]
        )));
    }
    Ok(())
}
