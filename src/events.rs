use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events emitted by the service layer. Consumed by the background
/// processor for structured audit logging; delivery is best effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated {
        product_id: Uuid,
    },
    ProductUpdated {
        product_id: Uuid,
    },
    ProductDeleted {
        product_id: Uuid,
    },
    HistoryAppended {
        product_id: Uuid,
        records: usize,
    },
    ForecastGenerated {
        product_id: Uuid,
        reviews: usize,
        total_order_qty: f64,
    },
    PlanSaved {
        run_id: Uuid,
        product_id: Uuid,
    },
    PlanDeleted {
        run_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ForecastGenerated {
                product_id,
                reviews,
                total_order_qty,
            } => info!(
                %product_id,
                reviews,
                total_order_qty,
                "forecast generated"
            ),
            Event::PlanSaved { run_id, product_id } => {
                info!(%run_id, %product_id, "replenishment plan saved")
            }
            other => info!(event = ?other, "event processed"),
        }
    }
    info!("event channel closed; processor exiting");
}
