//! One recomputation of every dashboard panel for a filter selection

use anyhow::Result;
use serde::Serialize;

use super::aggregate::{churn_rate_by, key_metrics, GroupRate, KeyMetrics};
use super::correlation::{correlation_matrix, CorrelationMatrix};
use super::dataset::ChurnDataset;
use super::filter::{apply_filters, FilterSelection};
use super::histogram::{charge_histogram, ChargeHistogram, DEFAULT_HISTOGRAM_BINS};
use super::schema::{CONTRACT, INTERNET_SERVICE, TENURE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    pub histogram_bins: usize,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Everything the front-ends draw for one selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Metrics over the whole cleaned table
    pub overall: KeyMetrics,
    /// Metrics over the filtered rows
    pub selection: KeyMetrics,
    pub churn_by_contract: Vec<GroupRate>,
    pub monthly_charges: ChargeHistogram,
    pub churn_by_tenure: Vec<GroupRate>,
    pub correlation: CorrelationMatrix,
    pub churn_by_internet_service: Vec<GroupRate>,
}

impl DashboardView {
    pub fn matched_rows(&self) -> usize {
        self.selection.customers
    }
}

/// Filter the dataset and run every aggregation on the result.
///
/// An empty selection is not special-cased: rates and correlations come out
/// as NaN and the group lists are empty.
pub fn compute_dashboard(
    dataset: &ChurnDataset,
    selection: &FilterSelection,
    options: &AggregationOptions,
) -> Result<DashboardView> {
    let filtered = apply_filters(dataset.frame(), selection)?;
    log::debug!(
        "recomputing dashboard: {} of {} rows selected",
        filtered.height(),
        dataset.height()
    );

    Ok(DashboardView {
        overall: key_metrics(dataset.frame())?,
        selection: key_metrics(&filtered)?,
        churn_by_contract: churn_rate_by(&filtered, CONTRACT)?,
        monthly_charges: charge_histogram(&filtered, options.histogram_bins)?,
        churn_by_tenure: churn_rate_by(&filtered, TENURE)?,
        correlation: correlation_matrix(&filtered)?,
        churn_by_internet_service: churn_rate_by(&filtered, INTERNET_SERVICE)?,
    })
}
