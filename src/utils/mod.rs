//! Terminal helpers shared by the front-ends

pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
