use forecast_eval::error::ForecastError;
use sales_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Math error conversion
    let math_error = MathError::InsufficientData("no rows".to_string());
    let forecast_error = ForecastError::from(math_error);
    assert!(matches!(forecast_error, ForecastError::MathError(_)));

    // JSON error conversion
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::JsonError(_)
    ));

    // TOML errors become config errors
    let toml_error = toml::from_str::<toml::Value>("a = ").unwrap_err();
    assert!(matches!(
        ForecastError::from(toml_error),
        ForecastError::ConfigError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::NotFound {
        store: "actual sales",
        key: "store_3".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "No actual sales series for store key 'store_3'"
    );

    let error = ForecastError::AlignmentEmpty {
        actual_points: 90,
        forecast_points: 30,
    };
    assert_eq!(
        error.to_string(),
        "No overlapping dates between 90 actual and 30 forecast points"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_math_error_keeps_detail() {
    let error = ForecastError::from(MathError::DegenerateDenominator(
        "All 2 points have a zero denominator for MAPE".to_string(),
    ));
    assert_eq!(
        error.to_string(),
        "Math error: Degenerate denominator: All 2 points have a zero denominator for MAPE"
    );
}
