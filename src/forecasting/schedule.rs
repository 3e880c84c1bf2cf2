use chrono::{Duration, NaiveDate};

/// Review dates `anchor + k*review_days` for `k = 1..=horizon/review_days`.
///
/// Empty when the cadence exceeds the horizon; `review_days` is validated
/// strictly positive at the request boundary.
pub fn review_dates(anchor: NaiveDate, horizon_days: u32, review_days: u32) -> Vec<NaiveDate> {
    if review_days == 0 {
        return Vec::new();
    }
    let reviews = horizon_days / review_days;
    (1..=reviews)
        .map(|k| anchor + Duration::days(i64::from(k * review_days)))
        .collect()
}
