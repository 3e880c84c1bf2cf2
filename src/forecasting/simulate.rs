use chrono::NaiveDate;
use tracing::debug;

/// Projected stock movement at one review, before dates are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionStep {
    pub stock_before: f64,
    pub demand_next: f64,
    pub order_qty: f64,
}

/// Walks the review schedule applying the order-up-to policy.
///
/// State carried between reviews is the projected stock level. Demand is
/// consumed at `rate` per day since the previous review (the anchor for
/// the first one); projected stock floors at zero on a stockout. The
/// order target is `min_stock_level + demand_next`, and orders are
/// assumed to arrive instantaneously at the review.
pub fn project(
    schedule: &[NaiveDate],
    anchor: NaiveDate,
    rate: f64,
    review_days: u32,
    initial_stock: f64,
    min_stock_level: f64,
) -> Vec<ProjectionStep> {
    let demand_next = rate * f64::from(review_days);
    let mut current = initial_stock;
    let mut previous = anchor;
    let mut steps = Vec::with_capacity(schedule.len());

    for &review in schedule {
        let elapsed = (review - previous).num_days() as f64;
        let mut stock_before = current - rate * elapsed;
        if stock_before < 0.0 {
            debug!(%review, projected = stock_before, "projected stockout before review");
            stock_before = 0.0;
        }

        let target = min_stock_level + demand_next;
        let order_qty = (target - stock_before).max(0.0);
        steps.push(ProjectionStep {
            stock_before,
            demand_next,
            order_qty,
        });

        current = stock_before + order_qty;
        previous = review;
    }

    steps
}
