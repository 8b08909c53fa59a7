//! Tests for dataset loading and the cleaned dataset wrapper

use churnscope::pipeline::{
    load_dataset, load_dataset_with_progress, ChurnDataset, CleaningOptions, FilterField,
    PipelineError,
};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, stats) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(stats.rows, 2, "Should have 2 data rows");
    assert_eq!(stats.columns, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(stats.memory_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_telco_dataframe();
    let (_dir, path) = common::create_temp_parquet(&mut df);

    let loaded = load_dataset(&path, 100).unwrap();
    common::assert_shape(&loaded, 10, 10);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "not really a spreadsheet").unwrap();

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(
        err.to_string().contains("Unsupported file format"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.csv");

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.csv"));
}

#[test]
fn test_full_scan_schema_inference() {
    let mut df = common::create_telco_dataframe();
    let (_dir, path) = common::create_temp_csv(&mut df);

    let loaded = load_dataset(&path, 0).unwrap();
    common::assert_shape(&loaded, 10, 10);
}

#[test]
fn test_dataset_load_cleans_csv() {
    let mut df = common::create_telco_dataframe();
    let (_dir, path) = common::create_temp_csv(&mut df);

    let (dataset, stats) = ChurnDataset::load(&path, 10000, &CleaningOptions::default()).unwrap();

    assert_eq!(stats.rows, 10);
    assert_eq!(dataset.height(), 10);
    assert_eq!(dataset.source(), Some(path.as_path()));
    common::assert_missing_columns(dataset.frame(), &["customerID"]);

    let report = dataset.cleaning_report();
    assert_eq!(report.total_charges_imputed, 2);
    common::assert_close(
        report.total_charges_median.unwrap(),
        common::TELCO_TOTAL_CHARGES_MEDIAN,
        "TotalCharges median",
    );
    assert_eq!(report.churn_events, 4);
    assert_eq!(report.churn_non_events, 6);
    assert!(report.identifier_dropped);

    let charges = dataset.frame().column("TotalCharges").unwrap();
    assert_eq!(charges.dtype(), &DataType::Float64);
    assert_eq!(charges.null_count(), 0);
}

#[test]
fn test_dataset_universes_in_first_appearance_order() {
    let dataset =
        ChurnDataset::from_frame(&common::create_telco_dataframe(), &CleaningOptions::default())
            .unwrap();

    assert_eq!(
        dataset.universe(FilterField::Contract),
        &["Month-to-month", "One year", "Two year"]
    );
    assert_eq!(
        dataset.universe(FilterField::InternetService),
        &["DSL", "Fiber optic"]
    );
    assert_eq!(dataset.universe(FilterField::SeniorCitizen), &["0", "1"]);
    assert_eq!(dataset.universe(FilterField::PaymentMethod).len(), 4);
}

#[test]
fn test_dataset_requires_columns() {
    let df = common::create_telco_dataframe()
        .drop("Contract")
        .unwrap()
        .drop("tenure")
        .unwrap();

    let err = ChurnDataset::from_frame(&df, &CleaningOptions::default()).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MissingColumns(missing)) => {
            assert!(missing.contains(&"Contract".to_string()));
            assert!(missing.contains(&"tenure".to_string()));
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}
