//! Patient Records Core Library
//!
//! Record model, BMI derivation and the SQLite-backed record store behind the
//! patient records service.
//!
//! # Architecture
//!
//! ```text
//!   NewPatient ──validate──► PatientRecord { bmi, verdict }
//!                                   │
//!                     ┌─────────────▼─────────────┐
//!                     │        RecordStore        │
//!                     │  create / get / list_all  │
//!                     │  update / delete / sort   │
//!                     └─────────────┬─────────────┘
//!                                   │  (single writer, Mutex)
//!                     ┌─────────────▼─────────────┐
//!                     │    Database (SQLite)      │
//!                     │  patients table, keyed id │
//!                     └───────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Derived metrics are never stored.** BMI and verdict are recomputed from
//! height and weight whenever a record is built, merged or loaded.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, Gender, Verdict, PatientUpdate)
//! - [`db`]: SQLite persistence layer
//! - [`store`]: CRUD service with uniqueness and existence guarantees
//! - [`export`]: JSON/CSV export and JSON import

pub mod db;
pub mod export;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use export::{ImportError, PatientExport};
pub use models::{
    compute_bmi, Gender, NewPatient, PatientRecord, PatientUpdate, ValidationError, Verdict,
};
pub use store::{ImportSummary, RecordStore, SortKey, SortOrder, StoreError, StoreResult};
