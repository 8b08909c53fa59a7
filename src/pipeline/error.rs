//! Typed errors raised by the cleaning and filtering pipeline.
//!
//! I/O and polars failures travel as `anyhow::Error` with context attached;
//! these variants cover the cases a caller may want to match on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dataset lacks one or more columns the pipeline reads.
    #[error("dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Target labels outside the event/non-event mapping, under the `reject` policy.
    #[error(
        "column '{column}' has {count} value(s) outside the label mapping (e.g. {})",
        .examples.join(", ")
    )]
    UnmappedLabels {
        column: String,
        count: usize,
        examples: Vec<String>,
    },
}
