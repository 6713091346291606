use chrono::NaiveDate;
use forecast_eval::data::{DataLoader, ForecastPoint};
use forecast_eval::{ActualSalesStore, ForecastError, ForecastStore};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::Builder;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_actuals_from_csv() {
    let csv = "\
store_key,date,sales
s1,2023-10-02,120.0
s1,2023-10-01,100.0
s2,2023-10-01,80.5
";
    let table = DataLoader::actuals_from_csv(csv.as_bytes()).unwrap();

    assert_eq!(table.keys(), vec!["s1", "s2"]);
    let s1 = table.get("s1").unwrap();
    assert_eq!(s1.dates(), vec![date(2023, 10, 1), date(2023, 10, 2)]);
    assert_eq!(s1.values(), vec![100.0, 120.0]);
}

#[test]
fn test_forecasts_from_csv_with_optional_bounds() {
    let csv = "\
store_key,date,forecast,lower,upper
s1,2023-10-01,105.0,95.0,115.0
s1,2023-10-02,110.0,,
";
    let table = DataLoader::forecasts_from_csv(csv.as_bytes()).unwrap();
    let s1 = table.get("s1").unwrap();

    assert_eq!(
        s1.points(),
        &[
            ForecastPoint::with_interval(date(2023, 10, 1), 105.0, 95.0, 115.0),
            ForecastPoint::new(date(2023, 10, 2), 110.0),
        ]
    );
    assert!(!s1.has_intervals());
}

#[test]
fn test_duplicate_rows_name_the_store() {
    let csv = "\
store_key,date,sales
s9,2023-10-01,1.0
s9,2023-10-01,2.0
";
    match DataLoader::actuals_from_csv(csv.as_bytes()) {
        Err(ForecastError::DataError(msg)) => assert!(msg.contains("s9")),
        other => panic!("expected DataError, got {:?}", other),
    }
}

#[test]
fn test_bad_number_is_csv_error() {
    let csv = "store_key,date,sales\ns1,2023-10-01,lots\n";
    assert!(matches!(
        DataLoader::actuals_from_csv(csv.as_bytes()),
        Err(ForecastError::CsvError(_))
    ));
}

#[test]
fn test_json_bundle_roundtrip_through_files() {
    let json = r#"{
        "store_a": [
            {"date": "2023-12-24", "forecast": 300.0, "lower": 250.0, "upper": 350.0},
            {"date": "2023-12-25", "forecast": 50.0}
        ]
    }"#;
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let table = DataLoader::forecasts_from_path(file.path()).unwrap();
    let series = table.get("store_a").unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.get(date(2023, 12, 25)).unwrap().upper, None);

    let mut out = Vec::new();
    DataLoader::write_forecasts_json(&table, &mut out).unwrap();
    let reloaded = DataLoader::forecasts_from_json(out.as_slice()).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_json_validation_applies() {
    let json = r#"{"s1": [{"date": "2023-10-01", "sales": -5.0}]}"#;
    assert!(matches!(
        DataLoader::actuals_from_json(json.as_bytes()),
        Err(ForecastError::JsonError(_))
    ));
}

#[test]
fn test_loader_error_handling() {
    let result = DataLoader::actuals_from_path("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    let result = DataLoader::actuals_from_path("store.pkl");
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_forecast_json_reloads_exact_values() {
    let mut table = forecast_eval::ForecastTable::new();
    table.insert(
        "s1",
        forecast_eval::ForecastSeries::new(vec![
            ForecastPoint::with_interval(date(2023, 10, 1), 1064.256, 920.0, 1208.512),
            ForecastPoint::new(date(2023, 10, 2), 0.1 + 0.2),
        ])
        .unwrap(),
    );

    let mut buffer = Vec::new();
    DataLoader::write_forecasts_json(&table, &mut buffer).unwrap();
    let reloaded = DataLoader::forecasts_from_json(buffer.as_slice()).unwrap();

    assert_eq!(reloaded, table);
}
