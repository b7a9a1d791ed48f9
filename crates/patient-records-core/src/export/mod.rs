//! JSON/CSV export and JSON import of patient records.

mod snapshot;

pub use snapshot::*;
