//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ten customers shaped like the Telco churn export.
///
/// Known characteristics:
/// - rows 5 and 9 (1-based) have a blank `TotalCharges` (" ")
/// - 4 of 10 customers churned
/// - Month-to-month: 7 customers, 4 churned; One year: 2, none churned;
///   Two year: 1, not churned
/// - DSL: 6 customers, 1 churned; Fiber optic: 4 customers, 3 churned
/// - seniors are rows 6 and 9, both churned
/// - tenure 2 appears twice (rows 3 and 5), both churned
pub fn create_telco_dataframe() -> DataFrame {
    df! {
        "customerID" => ["7590-VHVEG", "5575-GNVDE", "3668-QPYBK", "7795-CFOCW", "9237-HQITU",
                         "9305-CDSKC", "1452-KIOVK", "6713-OKOMC", "7892-POOKP", "6388-TABGU"],
        "gender" => ["Female", "Male", "Male", "Male", "Female", "Female", "Male", "Female", "Female", "Male"],
        "SeniorCitizen" => [0i64, 0, 0, 0, 0, 1, 0, 0, 1, 0],
        "tenure" => [1i64, 34, 2, 45, 2, 8, 22, 10, 28, 62],
        "InternetService" => ["DSL", "DSL", "DSL", "DSL", "Fiber optic",
                              "Fiber optic", "Fiber optic", "DSL", "Fiber optic", "DSL"],
        "Contract" => ["Month-to-month", "One year", "Month-to-month", "One year", "Month-to-month",
                       "Month-to-month", "Month-to-month", "Month-to-month", "Month-to-month", "Two year"],
        "PaymentMethod" => ["Electronic check", "Mailed check", "Mailed check", "Bank transfer (automatic)",
                            "Electronic check", "Electronic check", "Credit card (automatic)",
                            "Mailed check", "Electronic check", "Bank transfer (automatic)"],
        "MonthlyCharges" => [29.85f64, 56.95, 53.85, 42.30, 70.70, 99.65, 89.10, 29.75, 104.80, 56.15],
        "TotalCharges" => ["29.85", "1889.5", "108.15", "1840.75", " ",
                           "820.5", "1949.4", "301.9", " ", "3487.95"],
        "Churn" => ["No", "No", "Yes", "No", "Yes", "Yes", "No", "No", "Yes", "No"],
    }
    .unwrap()
}

/// Median of the eight valid `TotalCharges` in [`create_telco_dataframe`]
pub const TELCO_TOTAL_CHARGES_MEDIAN: f64 = (820.5 + 1840.75) / 2.0;

/// Random Telco-shaped table for larger tests
pub fn create_large_telco_dataframe(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let contracts = ["Month-to-month", "One year", "Two year"];
    let payments = [
        "Electronic check",
        "Mailed check",
        "Bank transfer (automatic)",
        "Credit card (automatic)",
    ];
    let internet = ["DSL", "Fiber optic", "No"];

    let tenure: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..73)).collect();
    let monthly: Vec<f64> = (0..rows).map(|_| rng.gen_range(18.0..119.0)).collect();
    let total: Vec<String> = tenure
        .iter()
        .zip(&monthly)
        .map(|(t, m)| {
            if *t == 0 {
                " ".to_string()
            } else {
                format!("{:.2}", *t as f64 * m)
            }
        })
        .collect();

    df! {
        "customerID" => (0..rows).map(|i| format!("C{:06}", i)).collect::<Vec<_>>(),
        "SeniorCitizen" => (0..rows).map(|_| rng.gen_range(0i64..2)).collect::<Vec<_>>(),
        "tenure" => tenure,
        "InternetService" => (0..rows).map(|_| internet[rng.gen_range(0..3)]).collect::<Vec<_>>(),
        "Contract" => (0..rows).map(|_| contracts[rng.gen_range(0..3)]).collect::<Vec<_>>(),
        "PaymentMethod" => (0..rows).map(|_| payments[rng.gen_range(0..4)]).collect::<Vec<_>>(),
        "MonthlyCharges" => monthly,
        "TotalCharges" => total,
        "Churn" => (0..rows).map(|_| if rng.gen_bool(0.27) { "Yes" } else { "No" }).collect::<Vec<_>>(),
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("telco.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("telco.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Churn column of a cleaned table as plain options
pub fn churn_column(df: &DataFrame) -> Vec<Option<i32>> {
    df.column("Churn")
        .unwrap()
        .cast(&DataType::Int32)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .collect()
}

/// Approximate float comparison with a readable failure message
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
