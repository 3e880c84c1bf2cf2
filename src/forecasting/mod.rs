//! Forecasting and periodic-review replenishment engine.
//!
//! Stateless and request-scoped: every plan is a pure function of one
//! product snapshot, the requested horizon, the resolved request date and
//! the engine configuration. Concurrent requests need no coordination.

pub mod accuracy;
pub mod demand;
pub mod preprocess;
pub mod schedule;
pub mod simulate;

use chrono::NaiveDate;

use crate::{
    config::{ForecastConfig, ScheduleAnchor},
    errors::ServiceError,
    models::{ForecastPlan, ForecastRequest, ForecastSummary, Product, ReviewPlanEntry},
};

/// Days per plan month; the horizon contract counts fixed 30-day months.
pub const DAYS_PER_MONTH: u32 = 30;

/// Largest horizon in months supported by a history of the given calendar
/// span. Applied only when horizon clamping is enabled.
pub fn max_horizon_months(history_span_days: i64) -> u32 {
    let years = history_span_days as f64 / 365.25;
    if years < 1.0 {
        0
    } else if years < 2.0 {
        3
    } else if years < 3.0 {
        6
    } else if years < 4.0 {
        9
    } else {
        12
    }
}

/// Computes a replenishment plan for one product snapshot.
///
/// `today` is resolved by the caller so that repeated invocations with
/// identical arguments yield identical plans. An empty or too-short
/// history degrades to zero demand and absent accuracy; it is never an
/// error.
pub fn build_plan(
    product: &Product,
    request: &ForecastRequest,
    today: NaiveDate,
    config: &ForecastConfig,
) -> Result<ForecastPlan, ServiceError> {
    let series = preprocess::normalize(&product.history);

    let months = if config.clamp_horizon_to_history {
        request
            .months
            .min(max_horizon_months(product.history_span_days()))
    } else {
        request.months
    };
    let horizon_days = months * DAYS_PER_MONTH;

    let anchor = match config.anchor {
        ScheduleAnchor::LastRecord => product.last_record().map(|r| r.date).unwrap_or(today),
        ScheduleAnchor::Today => today,
    };

    let dates = schedule::review_dates(anchor, horizon_days, request.review_days);
    let estimate = demand::estimate(&series, config.smoothing_alpha);

    // With no history there is no stock snapshot to replenish against:
    // the plan must come back all-zero, not order up to the buffer.
    let min_stock_level = if product.history.is_empty() {
        0.0
    } else {
        product.min_stock_level
    };
    let steps = simulate::project(
        &dates,
        anchor,
        estimate.rate,
        request.review_days,
        product.latest_stock(),
        min_stock_level,
    );
    let accuracy_pct = accuracy::backtest(&series, config.smoothing_alpha);

    assemble(&dates, &steps, accuracy_pct)
}

/// Zips schedule dates with simulator output and rolls up the summary.
///
/// A length mismatch between the two sequences is a defect in the engine,
/// not a data problem; the whole request aborts rather than returning a
/// partial plan.
fn assemble(
    dates: &[NaiveDate],
    steps: &[simulate::ProjectionStep],
    accuracy_pct: Option<f64>,
) -> Result<ForecastPlan, ServiceError> {
    if dates.len() != steps.len() {
        return Err(ServiceError::InternalError(format!(
            "schedule produced {} review dates but simulation produced {} steps",
            dates.len(),
            steps.len()
        )));
    }

    let entries: Vec<ReviewPlanEntry> = dates
        .iter()
        .zip(steps)
        .map(|(&review_date, step)| ReviewPlanEntry {
            review_date,
            stock_before: round1(step.stock_before),
            demand_next: round1(step.demand_next),
            order_qty: round1(step.order_qty),
        })
        .collect();

    let total_order_qty: f64 = entries.iter().map(|e| e.order_qty).sum();
    let summary = ForecastSummary {
        next_review_date: entries.first().map(|e| e.review_date),
        total_order_qty,
        accuracy_pct,
    };

    Ok(ForecastPlan { entries, summary })
}

/// Plan quantities are reported to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryRecord;
    use chrono::Duration;
    use rstest::rstest;
    use uuid::Uuid;

    fn flat_product(days: usize, sales: f64, stock: f64, min_level: f64) -> Product {
        let start: NaiveDate = "2025-05-01".parse().unwrap();
        let history = (0..days)
            .map(|i| HistoryRecord {
                date: start + Duration::days(i as i64),
                daily_sales: sales,
                stock_quantity: stock,
            })
            .collect();
        Product {
            id: Uuid::new_v4(),
            name: "Filter paper".into(),
            min_stock_level: min_level,
            is_active: true,
            history,
        }
    }

    fn today() -> NaiveDate {
        "2025-08-06".parse().unwrap()
    }

    #[test]
    fn worked_example_two_reviews_steady_state() {
        let product = flat_product(30, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 1,
            review_days: 15,
        };
        let plan = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();

        assert_eq!(plan.entries.len(), 2);
        let anchor = product.last_record().unwrap().date;
        assert_eq!(plan.entries[0].review_date, anchor + Duration::days(15));
        assert_eq!(plan.entries[1].review_date, anchor + Duration::days(30));
        for entry in &plan.entries {
            assert_eq!(entry.stock_before, 50.0);
            assert_eq!(entry.demand_next, 150.0);
            assert_eq!(entry.order_qty, 150.0);
        }
        assert_eq!(plan.summary.total_order_qty, 300.0);
        assert_eq!(plan.summary.next_review_date, Some(plan.entries[0].review_date));
        assert_eq!(plan.summary.accuracy_pct, Some(100.0));
    }

    #[test]
    fn empty_history_yields_a_zeroed_plan_not_an_error() {
        let mut product = flat_product(0, 0.0, 0.0, 50.0);
        product.history.clear();
        let request = ForecastRequest {
            months: 2,
            review_days: 10,
        };
        let plan = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();

        assert_eq!(plan.entries.len(), 6);
        assert!(plan.entries.iter().all(|e| e.demand_next == 0.0));
        assert!(plan.entries.iter().all(|e| e.order_qty == 0.0));
        assert!(plan.entries.iter().all(|e| e.stock_before == 0.0));
        assert!(plan.summary.accuracy_pct.is_none());
        // With no history the anchor falls back to the request date.
        assert_eq!(
            plan.entries[0].review_date,
            today() + Duration::days(10)
        );
    }

    #[test]
    fn single_record_history_is_deterministic_and_does_not_fail() {
        let product = flat_product(1, 7.0, 35.0, 10.0);
        let request = ForecastRequest {
            months: 1,
            review_days: 30,
        };
        let a = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();
        let b = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();
        assert_eq!(a, b);
        assert!(a.summary.accuracy_pct.is_none());
        assert_eq!(a.entries[0].demand_next, 210.0);
    }

    #[test]
    fn cadence_beyond_horizon_yields_an_empty_plan() {
        let product = flat_product(30, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 1,
            review_days: 45,
        };
        let plan = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();
        assert!(plan.entries.is_empty());
        assert!(plan.summary.next_review_date.is_none());
        assert_eq!(plan.summary.total_order_qty, 0.0);
    }

    #[rstest]
    #[case(ScheduleAnchor::LastRecord)]
    #[case(ScheduleAnchor::Today)]
    fn both_anchor_modes_space_reviews_identically(#[case] anchor: ScheduleAnchor) {
        let product = flat_product(30, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 1,
            review_days: 15,
        };
        let config = ForecastConfig {
            anchor,
            ..ForecastConfig::default()
        };
        let plan = build_plan(&product, &request, today(), &config).unwrap();

        let expected_anchor = match anchor {
            ScheduleAnchor::LastRecord => product.last_record().unwrap().date,
            ScheduleAnchor::Today => today(),
        };
        assert_eq!(
            plan.entries[0].review_date,
            expected_anchor + Duration::days(15)
        );
        assert_eq!(
            plan.entries[1].review_date,
            expected_anchor + Duration::days(30)
        );
    }

    #[test]
    fn anchor_mode_shifts_dates_but_not_quantities() {
        let product = flat_product(30, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 1,
            review_days: 15,
        };
        let last = build_plan(&product, &request, today(), &ForecastConfig::default()).unwrap();
        let today_cfg = ForecastConfig {
            anchor: ScheduleAnchor::Today,
            ..ForecastConfig::default()
        };
        let today_plan = build_plan(&product, &request, today(), &today_cfg).unwrap();

        let strip =
            |p: &ForecastPlan| -> Vec<(f64, f64, f64)> {
                p.entries
                    .iter()
                    .map(|e| (e.stock_before, e.demand_next, e.order_qty))
                    .collect()
            };
        assert_eq!(strip(&last), strip(&today_plan));
        assert_ne!(last.entries[0].review_date, today_plan.entries[0].review_date);
    }

    #[test]
    fn clamping_caps_a_short_history_at_zero_months() {
        let product = flat_product(90, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 6,
            review_days: 15,
        };
        let config = ForecastConfig {
            clamp_horizon_to_history: true,
            ..ForecastConfig::default()
        };
        let plan = build_plan(&product, &request, today(), &config).unwrap();
        // 90 days of history is under a year: nothing to plan.
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn clamping_trims_but_keeps_a_long_history_plan() {
        let product = flat_product(500, 10.0, 200.0, 50.0);
        let request = ForecastRequest {
            months: 12,
            review_days: 30,
        };
        let config = ForecastConfig {
            clamp_horizon_to_history: true,
            ..ForecastConfig::default()
        };
        let plan = build_plan(&product, &request, today(), &config).unwrap();
        // Between one and two years of history allows three months.
        assert_eq!(plan.entries.len(), 3);
    }

    #[test]
    fn max_horizon_tiers() {
        assert_eq!(max_horizon_months(100), 0);
        assert_eq!(max_horizon_months(400), 3);
        assert_eq!(max_horizon_months(800), 6);
        assert_eq!(max_horizon_months(1200), 9);
        assert_eq!(max_horizon_months(2000), 12);
    }

    #[test]
    fn assemble_rejects_mismatched_component_output() {
        let dates = vec!["2025-06-15".parse().unwrap()];
        let err = assemble(&dates, &[], None).unwrap_err();
        assert!(matches!(err, ServiceError::InternalError(_)));
    }
}
