//! In-process collaborators: the history store the engine reads product
//! snapshots from, and the plan log that groups saved runs.
//!
//! Reads hand out clones, so a computation always works on the snapshot
//! taken at request start even while writers touch the same product.

use chrono::NaiveDate;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{AlertEntry, HistoryRecord, Product, SavedRun};

/// Why a history append was rejected.
#[derive(Debug, PartialEq)]
pub enum AppendError {
    ProductNotFound,
    DuplicateDate(NaiveDate),
}

/// Concurrent map of products keyed by id.
#[derive(Debug, Default)]
pub struct HistoryStore {
    products: DashMap<Uuid, Product>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Inserts a product, keeping its history sorted ascending by date.
    pub fn insert(&self, mut product: Product) {
        product.history.sort_by_key(|r| r.date);
        self.products.insert(product.id, product);
    }

    /// Cloned snapshot of one product; the engine computes against this.
    pub fn snapshot(&self, id: &Uuid) -> Option<Product> {
        self.products.get(id).map(|entry| entry.clone())
    }

    /// All products, ordered by name for stable listings.
    pub fn list(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        products
    }

    /// Applies `update` to a product in place and returns the new state.
    pub fn update<F>(&self, id: &Uuid, update: F) -> Option<Product>
    where
        F: FnOnce(&mut Product),
    {
        self.products.get_mut(id).map(|mut entry| {
            update(entry.value_mut());
            entry.value().clone()
        })
    }

    pub fn remove(&self, id: &Uuid) -> Option<Product> {
        self.products.remove(id).map(|(_, product)| product)
    }

    /// Appends history records to a product, holding its entry lock so
    /// the duplicate-date check and the write are one atomic step.
    pub fn append_history(
        &self,
        id: &Uuid,
        records: Vec<HistoryRecord>,
    ) -> Result<Product, AppendError> {
        let mut entry = self.products.get_mut(id).ok_or(AppendError::ProductNotFound)?;
        let product = entry.value_mut();

        let mut seen: Vec<NaiveDate> = product.history.iter().map(|r| r.date).collect();
        for record in &records {
            if seen.contains(&record.date) {
                return Err(AppendError::DuplicateDate(record.date));
            }
            seen.push(record.date);
        }

        product.history.extend(records);
        product.history.sort_by_key(|r| r.date);
        Ok(product.clone())
    }
}

/// Saved replenishment runs, grouped by run id.
#[derive(Debug, Default)]
pub struct PlanLog {
    runs: DashMap<Uuid, SavedRun>,
}

impl PlanLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn insert(&self, run: SavedRun) {
        self.runs.insert(run.run_id, run);
    }

    /// Every saved entry flattened with its run metadata, newest run
    /// first, entries in review-date order within a run.
    pub fn alerts(&self) -> Vec<AlertEntry> {
        let mut runs: Vec<SavedRun> = self.runs.iter().map(|e| e.value().clone()).collect();
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.run_id.cmp(&b.run_id)));

        runs.into_iter()
            .flat_map(|run| {
                run.entries
                    .iter()
                    .map(|entry| AlertEntry {
                        run_id: run.run_id,
                        product_id: run.product_id,
                        product_name: run.product_name.clone(),
                        review_date: entry.review_date,
                        stock_before: entry.stock_before,
                        demand_next: entry.demand_next,
                        order_qty: entry.order_qty,
                        created_at: run.created_at,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn remove(&self, run_id: &Uuid) -> Option<SavedRun> {
        self.runs.remove(run_id).map(|(_, run)| run)
    }
}
