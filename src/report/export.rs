//! JSON export of a dashboard view

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningReport, DashboardView, FilterSelection};

/// Metadata about the run
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (RFC 3339)
    pub timestamp: String,
    /// churnscope version
    pub version: String,
    /// Input file path, if the data came from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    pub total_rows: usize,
    pub matched_rows: usize,
}

/// Complete export: metadata, active filters, cleaning outcome and every panel
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub metadata: ExportMetadata,
    pub filters: &'a FilterSelection,
    pub cleaning: &'a CleaningReport,
    pub dashboard: &'a DashboardView,
}

impl<'a> DashboardExport<'a> {
    pub fn new(
        input_file: Option<String>,
        filters: &'a FilterSelection,
        cleaning: &'a CleaningReport,
        dashboard: &'a DashboardView,
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                input_file,
                total_rows: dashboard.overall.customers,
                matched_rows: dashboard.matched_rows(),
            },
            filters,
            cleaning,
            dashboard,
        }
    }

    /// Pretty JSON. NaN and infinite values become `null`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize dashboard to JSON")
    }

    /// Write the pretty JSON followed by a newline
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let json = self.to_json()?;
        writeln!(writer, "{}", json).context("Failed to write dashboard JSON")?;
        Ok(())
    }
}
