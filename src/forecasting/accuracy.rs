use super::{demand, preprocess::DailyPoint};

/// Length of the held-out evaluation window, in days.
pub const HOLDOUT_DAYS: usize = 14;

/// Minimum series length for a backtest: one training window of at least
/// the holdout's size plus the holdout itself.
pub const MIN_BACKTEST_POINTS: usize = 2 * HOLDOUT_DAYS;

/// Backtests the demand model against the last [`HOLDOUT_DAYS`] of the
/// series and maps the error to a confidence percentage.
///
/// The model is fit on the training prefix only; its flat daily rate is
/// compared against the held-out actuals via WAPE, and
/// `accuracy = 100 x max(0, 1 - wape)`, clamped to [0, 100] and reported
/// to one decimal. Returns `None` when the series is too short to hold
/// out a window — callers surface absence, never a substitute zero.
pub fn backtest(series: &[DailyPoint], alpha: f64) -> Option<f64> {
    if series.len() < MIN_BACKTEST_POINTS {
        return None;
    }

    let split = series.len() - HOLDOUT_DAYS;
    let (train, holdout) = series.split_at(split);
    let predicted = demand::estimate(train, alpha).rate;

    let actual_total: f64 = holdout.iter().map(|p| p.sales).sum();
    let absolute_error: f64 = holdout.iter().map(|p| (p.sales - predicted).abs()).sum();
    let wape = if actual_total > 0.0 {
        absolute_error / actual_total
    } else {
        0.0
    };

    let pct = (100.0 * (1.0 - wape)).clamp(0.0, 100.0);
    Some((pct * 10.0).round() / 10.0)
}
