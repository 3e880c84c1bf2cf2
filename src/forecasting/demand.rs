use super::preprocess::DailyPoint;

/// Deterministic per-day demand estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandEstimate {
    /// Expected demand per day.
    pub rate: f64,
    /// Dispersion of the one-step-ahead residuals. `None` when the series
    /// has fewer than two points and dispersion cannot be measured.
    pub variability: Option<f64>,
}

/// Exponentially weighted moving average over the normalized series.
///
/// `alpha` weights recent observations; the returned rate is the final
/// smoothed level. Identical series always produce identical estimates.
pub fn estimate(series: &[DailyPoint], alpha: f64) -> DemandEstimate {
    match series {
        [] => DemandEstimate {
            rate: 0.0,
            variability: None,
        },
        [only] => DemandEstimate {
            rate: only.sales,
            variability: None,
        },
        [head, rest @ ..] => {
            let mut level = head.sales;
            let mut residuals = Vec::with_capacity(rest.len());
            for point in rest {
                residuals.push(point.sales - level);
                level = alpha * point.sales + (1.0 - alpha) * level;
            }
            DemandEstimate {
                rate: level,
                variability: Some(std_dev(&residuals)),
            }
        }
    }
}

/// Population standard deviation; callers guarantee a non-empty slice.
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
