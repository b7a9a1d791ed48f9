//! Domain models for patient records.

mod metrics;
mod patient;
mod update;

pub use metrics::*;
pub use patient::*;
pub use update::*;
