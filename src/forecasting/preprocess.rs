use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::models::HistoryRecord;

/// One day of the normalized, gap-free demand series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Window for the centered rolling median used to fill censored days.
const MEDIAN_WINDOW: usize = 7;

/// Normalizes raw history into a contiguous daily sales series.
///
/// Duplicate dates are collapsed by summing. Calendar gaps and sold-out
/// days are treated as censored — observed sales on a day with no stock
/// understate true demand — and take the centered rolling median of their
/// neighbors, falling back to zero when no neighbor was observed.
pub fn normalize(history: &[HistoryRecord]) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in history {
        let slot = by_date.entry(record.date).or_insert((0.0, 0.0));
        slot.0 += record.daily_sales;
        slot.1 += record.stock_quantity;
    }

    let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
        return Vec::new();
    };

    let mut dates = Vec::new();
    let mut observed: Vec<Option<f64>> = Vec::new();
    let mut day = first;
    while day <= last {
        let value = by_date
            .get(&day)
            .and_then(|&(sales, stock)| if stock <= 0.0 { None } else { Some(sales) });
        dates.push(day);
        observed.push(value);
        day += Duration::days(1);
    }

    let filled: Vec<f64> = (0..observed.len())
        .map(|i| match observed[i] {
            Some(value) => value.max(0.0),
            None => rolling_median(&observed, i).unwrap_or(0.0).max(0.0),
        })
        .collect();

    dates
        .into_iter()
        .zip(filled)
        .map(|(date, sales)| DailyPoint { date, sales })
        .collect()
}

/// Median of the observed values in a `MEDIAN_WINDOW`-wide window centered
/// on `center`; `None` when every neighbor is censored too.
fn rolling_median(observed: &[Option<f64>], center: usize) -> Option<f64> {
    let half = MEDIAN_WINDOW / 2;
    let lo = center.saturating_sub(half);
    let hi = (center + half).min(observed.len().saturating_sub(1));
    let mut window: Vec<f64> = observed[lo..=hi].iter().flatten().copied().collect();
    if window.is_empty() {
        return None;
    }
    window.sort_by(f64::total_cmp);
    let mid = window.len() / 2;
    if window.len() % 2 == 1 {
        Some(window[mid])
    } else {
        Some((window[mid - 1] + window[mid]) / 2.0)
    }
}
