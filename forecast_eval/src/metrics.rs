//! Metrics for evaluating forecast accuracy on an aligned table

use crate::align::AlignedTable;
use crate::config::ExclusionSet;
use crate::error::Result;
use sales_math::{
    bias, masked_mape, mean_absolute_error, mean_absolute_percentage_error,
    median_absolute_percentage_error, root_mean_squared_error,
    symmetric_mean_absolute_percentage_error, DenominatorPolicy, PercentageError,
};
use serde::Serialize;
use tracing::warn;

/// Forecast accuracy metrics for one store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// Mean Absolute Percentage Error over every aligned day
    pub mape: PercentageError,
    /// Symmetric Mean Absolute Percentage Error over every aligned day
    pub smape: PercentageError,
    /// MAPE over the days not in the exclusion set
    pub mape_excluding: PercentageError,
    /// Median Absolute Percentage Error
    pub median_ape: PercentageError,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean of forecast minus actual
    pub bias: f64,
    /// Number of aligned days
    pub points: usize,
    /// Number of aligned days that fell in the exclusion set
    pub excluded_points: usize,
    /// Policy used for zero denominators
    pub policy: DenominatorPolicy,
}

/// Evaluate an aligned table.
///
/// Exclusion dates missing from the table leave `mape_excluding` equal to
/// `mape`. When every row is excluded `mape_excluding` is undefined and the
/// other metrics are still reported.
pub fn evaluate_table(
    table: &AlignedTable,
    exclusions: &ExclusionSet,
    policy: DenominatorPolicy,
) -> Result<AccuracyReport> {
    let actual = table.actuals();
    let forecast = table.forecasts();
    let keep = table.keep_mask(exclusions);

    let mape = mean_absolute_percentage_error(&actual, &forecast, policy)?;
    let smape = symmetric_mean_absolute_percentage_error(&actual, &forecast, policy)?;
    let mape_excluding = masked_mape(&actual, &forecast, &keep, policy)?;
    let median_ape = median_absolute_percentage_error(&actual, &forecast, policy)?;

    if mape.degenerate > 0 || smape.degenerate > 0 {
        warn!(
            mape_degenerate = mape.degenerate,
            smape_degenerate = smape.degenerate,
            %policy,
            "zero denominators in percentage metrics"
        );
    }

    Ok(AccuracyReport {
        mape,
        smape,
        mape_excluding,
        median_ape,
        mae: mean_absolute_error(&actual, &forecast)?,
        rmse: root_mean_squared_error(&actual, &forecast)?,
        bias: bias(&actual, &forecast)?,
        points: table.len(),
        excluded_points: table.excluded_count(exclusions),
        policy,
    })
}

impl std::fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MAPE: {}", self.mape)?;
        writeln!(f, "sMAPE: {}", self.smape)?;
        writeln!(
            f,
            "MAPE excluding {} spike day(s): {}",
            self.excluded_points, self.mape_excluding
        )?;
        writeln!(f, "  MdAPE: {}", self.median_ape)?;
        writeln!(f, "  MAE:   {:.2}", self.mae)?;
        writeln!(f, "  RMSE:  {:.2}", self.rmse)?;
        writeln!(f, "  Bias:  {:+.2}", self.bias)?;
        writeln!(f, "  Days:  {}", self.points)?;
        if self.mape.degenerate > 0 || self.smape.degenerate > 0 {
            writeln!(
                f,
                "  Zero denominators ({}): {} MAPE, {} sMAPE",
                self.policy, self.mape.degenerate, self.smape.degenerate
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::data::{ActualSeries, ForecastPoint, ForecastSeries};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn table(dates: &[NaiveDate], actual: &[f64], forecast: &[f64]) -> AlignedTable {
        let a = ActualSeries::from_parts(dates.to_vec(), actual.to_vec()).unwrap();
        let f = ForecastSeries::new(
            dates
                .iter()
                .zip(forecast)
                .map(|(&d, &v)| ForecastPoint::new(d, v))
                .collect(),
        )
        .unwrap();
        align(&a, &f).unwrap()
    }

    #[test]
    fn test_reference_example() {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2023, 10, d).unwrap())
            .collect();
        let t = table(&dates, &[100.0, 120.0, 80.0], &[110.0, 120.0, 100.0]);

        let report = evaluate_table(&t, &ExclusionSet::default(), DenominatorPolicy::Skip).unwrap();
        assert_abs_diff_eq!(report.mape.value, 11.666_666_666, epsilon = 1e-6);
        assert_abs_diff_eq!(report.smape.value, 10.582_010_582, epsilon = 1e-6);
        assert_eq!(report.mape_excluding, report.mape);
        assert_eq!(report.excluded_points, 0);
    }

    #[test]
    fn test_spike_day_excluded() {
        let dates = [
            NaiveDate::from_ymd_opt(2023, 11, 22).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 23).unwrap(),
        ];
        let t = table(&dates, &[100.0, 400.0], &[100.0, 100.0]);

        let report = evaluate_table(&t, &ExclusionSet::default(), DenominatorPolicy::Skip).unwrap();
        assert_abs_diff_eq!(report.mape.value, 37.5, epsilon = 1e-9);
        assert_eq!(report.mape_excluding.value, 0.0);
        assert_eq!(report.excluded_points, 1);
        assert!(report.to_string().contains("MAPE excluding 1 spike day(s): 0.00%"));
    }
}
