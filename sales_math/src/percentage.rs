//! Percentage error metrics
//!
//! All results are expressed in percent. Points with a zero denominator are
//! handled according to [`DenominatorPolicy`].

use crate::{check_pair, DenominatorPolicy, MathError, Result};
use serde::Serialize;
use statrs::statistics::{Data, Median};

/// A percentage metric together with how many points it was computed over
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentageError {
    /// Metric value in percent (`NaN` when a degenerate point was propagated)
    pub value: f64,
    /// Number of points that entered the calculation
    pub points: usize,
    /// Number of points with a zero denominator
    pub degenerate: usize,
}

impl PercentageError {
    /// Whether the metric has a usable finite value
    pub fn is_defined(&self) -> bool {
        self.value.is_finite()
    }
}

impl std::fmt::Display for PercentageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_defined() {
            write!(f, "{:.2}%", self.value)
        } else {
            write!(f, "undefined")
        }
    }
}

/// Mean Absolute Percentage Error: `mean(|A - F| / A) * 100`
pub fn mean_absolute_percentage_error(
    actual: &[f64],
    forecast: &[f64],
    policy: DenominatorPolicy,
) -> Result<PercentageError> {
    check_pair(actual, forecast)?;
    aggregate(ape_ratios(actual, forecast), policy, "MAPE", mean)
}

/// Symmetric MAPE: `mean(2 * |A - F| / (A + F)) * 100`
pub fn symmetric_mean_absolute_percentage_error(
    actual: &[f64],
    forecast: &[f64],
    policy: DenominatorPolicy,
) -> Result<PercentageError> {
    check_pair(actual, forecast)?;

    let ratios = actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            let denominator = a + f;
            if denominator == 0.0 {
                None
            } else {
                Some(2.0 * (a - f).abs() / denominator)
            }
        })
        .collect();

    aggregate(ratios, policy, "sMAPE", mean)
}

/// MAPE over the points whose `keep` flag is set.
///
/// A mask that drops every point yields an undefined (`NaN`) value over zero
/// points under either policy.
pub fn masked_mape(
    actual: &[f64],
    forecast: &[f64],
    keep: &[bool],
    policy: DenominatorPolicy,
) -> Result<PercentageError> {
    check_pair(actual, forecast)?;
    if keep.len() != actual.len() {
        return Err(MathError::InvalidInput(format!(
            "Mask length ({}) doesn't match series length ({})",
            keep.len(),
            actual.len()
        )));
    }

    let (kept_actual, kept_forecast): (Vec<f64>, Vec<f64>) = actual
        .iter()
        .zip(forecast.iter())
        .zip(keep.iter())
        .filter(|(_, &k)| k)
        .map(|((&a, &f), _)| (a, f))
        .unzip();

    if kept_actual.is_empty() {
        return Ok(PercentageError {
            value: f64::NAN,
            points: 0,
            degenerate: 0,
        });
    }

    mean_absolute_percentage_error(&kept_actual, &kept_forecast, policy)
}

/// Median of the absolute percentage errors, in percent
pub fn median_absolute_percentage_error(
    actual: &[f64],
    forecast: &[f64],
    policy: DenominatorPolicy,
) -> Result<PercentageError> {
    check_pair(actual, forecast)?;
    aggregate(ape_ratios(actual, forecast), policy, "MdAPE", median)
}

fn ape_ratios(actual: &[f64], forecast: &[f64]) -> Vec<Option<f64>> {
    actual
        .iter()
        .zip(forecast.iter())
        .map(|(&a, &f)| {
            if a == 0.0 {
                None
            } else {
                Some((a - f).abs() / a.abs())
            }
        })
        .collect()
}

fn aggregate(
    ratios: Vec<Option<f64>>,
    policy: DenominatorPolicy,
    metric: &str,
    reduce: fn(Vec<f64>) -> f64,
) -> Result<PercentageError> {
    let total = ratios.len();
    let valid: Vec<f64> = ratios.into_iter().flatten().collect();
    let degenerate = total - valid.len();

    match policy {
        DenominatorPolicy::Propagate if degenerate > 0 => Ok(PercentageError {
            value: f64::NAN,
            points: total,
            degenerate,
        }),
        _ if valid.is_empty() => Err(MathError::DegenerateDenominator(format!(
            "All {} points have a zero denominator for {}",
            total, metric
        ))),
        _ => {
            let points = valid.len();
            Ok(PercentageError {
                value: reduce(valid) * 100.0,
                points,
                degenerate,
            })
        }
    }
}

fn mean(values: Vec<f64>) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: Vec<f64>) -> f64 {
    Data::new(values).median()
}
