//! Scale-dependent error metrics, expressed in sales units

use crate::{check_pair, Result};

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_pair(actual, forecast)?;
    let sum: f64 = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_pair(actual, forecast)?;
    let mse = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Ok(mse.sqrt())
}

/// Mean signed error `mean(F - A)`; positive means over-forecasting
pub fn bias(actual: &[f64], forecast: &[f64]) -> Result<f64> {
    check_pair(actual, forecast)?;
    let sum: f64 = actual.iter().zip(forecast.iter()).map(|(a, f)| f - a).sum();
    Ok(sum / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_regression_metrics() {
        let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let forecast = vec![12.0, 18.0, 33.0, 37.0, 52.0];

        assert_abs_diff_eq!(mean_absolute_error(&actual, &forecast).unwrap(), 2.4);
        assert_abs_diff_eq!(
            root_mean_squared_error(&actual, &forecast).unwrap(),
            (30.0_f64 / 5.0).sqrt(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(bias(&actual, &forecast).unwrap(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(mean_absolute_error(&[], &[]).is_err());
        assert!(root_mean_squared_error(&[1.0], &[]).is_err());
    }
}
