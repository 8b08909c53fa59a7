//! Pipeline module - loading, cleaning, filtering and aggregation

pub mod aggregate;
pub mod clean;
pub mod correlation;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod missing;
pub mod schema;
pub mod target;

pub use aggregate::*;
pub use clean::*;
pub use correlation::*;
pub use dashboard::*;
pub use dataset::*;
pub use error::*;
pub use filter::*;
pub use histogram::*;
pub use loader::*;
pub use missing::*;
pub use schema::*;
pub use target::*;
