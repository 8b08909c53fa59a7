//! churnscope: Telco customer churn dashboard
//!
//! Loads a churn dataset, cleans it, and computes filtered churn
//! aggregations for a terminal dashboard, printed tables or JSON.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
