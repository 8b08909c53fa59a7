//! Benchmarks for dashboard recomputation: filtering, correlation and the full view
//!
//! Run with: cargo bench --bench dashboard_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use churnscope::pipeline::{
    apply_filters, compute_dashboard, correlation_matrix_fast, correlation_matrix_pairwise,
    AggregationOptions, ChurnDataset, CleaningOptions, FilterField, FilterSelection,
};

const CONTRACTS: [&str; 3] = ["Month-to-month", "One year", "Two year"];
const PAYMENTS: [&str; 4] = [
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];
const INTERNET: [&str; 3] = ["DSL", "Fiber optic", "No"];

/// Generate a Telco-shaped raw table
fn generate_telco_dataframe(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let tenure: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..73)).collect();
    let monthly: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(18.0..119.0)).collect();
    // New customers have a blank total, as in the public export
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
    let senior: Vec<i64> = (0..n_rows).map(|_| i64::from(rng.gen_bool(0.16))).collect();
    let contract: Vec<&str> = (0..n_rows).map(|_| CONTRACTS[rng.gen_range(0..3)]).collect();
    let payment: Vec<&str> = (0..n_rows).map(|_| PAYMENTS[rng.gen_range(0..4)]).collect();
    let internet: Vec<&str> = (0..n_rows).map(|_| INTERNET[rng.gen_range(0..3)]).collect();
    let churn: Vec<&str> = (0..n_rows)
        .map(|_| if rng.gen_bool(0.27) { "Yes" } else { "No" })
        .collect();

    df! {
        "customerID" => (0..n_rows).map(|i| format!("C{:07}", i)).collect::<Vec<_>>(),
        "SeniorCitizen" => senior,
        "tenure" => tenure,
        "InternetService" => internet,
        "Contract" => contract,
        "PaymentMethod" => payment,
        "MonthlyCharges" => monthly,
        "TotalCharges" => total,
        "Churn" => churn,
    }
    .expect("Failed to create DataFrame")
}

fn build_dataset(n_rows: usize) -> ChurnDataset {
    ChurnDataset::from_frame(&generate_telco_dataframe(n_rows, 42), &CleaningOptions::default())
        .expect("Failed to clean dataset")
}

fn narrow_selection(dataset: &ChurnDataset) -> FilterSelection {
    let mut selection = FilterSelection::all(dataset);
    selection.set(FilterField::Contract, ["Month-to-month"]);
    selection.set(FilterField::InternetService, ["Fiber optic", "DSL"]);
    selection
}

/// Benchmark filtering for varying row counts
fn benchmark_filter_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_by_rows");
    group.sample_size(30);

    for n_rows in [1_000, 7_043, 50_000, 200_000] {
        let dataset = build_dataset(n_rows);
        let selection = narrow_selection(&dataset);

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(
            BenchmarkId::new("apply_filters", n_rows),
            &(&dataset, &selection),
            |b, (dataset, selection)| {
                b.iter(|| {
                    let _ = apply_filters(black_box(dataset.frame()), black_box(*selection));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark pairwise vs matrix correlation on the cleaned numeric columns
fn benchmark_correlation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_rows");
    group.sample_size(20);

    for n_rows in [1_000, 7_043, 50_000, 200_000] {
        let dataset = build_dataset(n_rows);

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("pairwise", n_rows), &dataset, |b, dataset| {
            b.iter(|| {
                let _ = correlation_matrix_pairwise(black_box(dataset.frame()));
            });
        });

        group.bench_with_input(BenchmarkId::new("matrix", n_rows), &dataset, |b, dataset| {
            b.iter(|| {
                let _ = correlation_matrix_fast(black_box(dataset.frame()));
            });
        });
    }

    group.finish();
}

/// Benchmark one full recomputation, as triggered by a filter change
fn benchmark_full_dashboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_dashboard");
    group.sample_size(20);

    let options = AggregationOptions::default();

    for n_rows in [7_043, 50_000] {
        let dataset = build_dataset(n_rows);
        let everything = FilterSelection::all(&dataset);
        let narrow = narrow_selection(&dataset);

        group.bench_with_input(
            BenchmarkId::new("all_selected", n_rows),
            &(&dataset, &everything),
            |b, (dataset, selection)| {
                b.iter(|| {
                    let _ = compute_dashboard(
                        black_box(*dataset),
                        black_box(*selection),
                        black_box(&options),
                    );
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("narrow_selection", n_rows),
            &(&dataset, &narrow),
            |b, (dataset, selection)| {
                b.iter(|| {
                    let _ = compute_dashboard(
                        black_box(*dataset),
                        black_box(*selection),
                        black_box(&options),
                    );
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filter_by_rows,
    benchmark_correlation_by_rows,
    benchmark_full_dashboard
);
criterion_main!(benches);
