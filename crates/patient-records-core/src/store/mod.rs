//! Record store service: CRUD over patient records with uniqueness and
//! existence guarantees.
//!
//! Each record is either absent or present:
//!
//! ```text
//! create:  absent  → present   (else Conflict)
//! update:  present → present   (else NotFound)
//! delete:  present → absent    (else NotFound)
//! get/list: no state change
//! ```
//!
//! The store owns its [`Database`] behind a mutex. Every operation holds the
//! lock for its whole read-check-write sequence, so concurrent callers see a
//! single writer at a time.

mod sort;

pub use sort::*;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use crate::db::{Database, DbError};
use crate::export::{parse_import, ImportError, PatientExport};
use crate::models::{NewPatient, PatientRecord, PatientUpdate, ValidationError};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Patient already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(e: PoisonError<T>) -> Self {
        StoreError::LockPoisoned(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records written
    pub imported: usize,
    /// Records whose id was already present
    pub skipped: usize,
}

/// Thread-safe patient record store.
pub struct RecordStore {
    db: Mutex<Database>,
}

impl RecordStore {
    /// Wrap an open database.
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open a file-backed store, creating the database if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// All records keyed by id.
    pub fn list_all(&self) -> StoreResult<BTreeMap<String, PatientRecord>> {
        let db = self.db.lock()?;
        let records = db.list_patients()?;
        debug!(count = records.len(), "listed patients");
        Ok(records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect())
    }

    /// All records ordered by a numeric field.
    pub fn list_sorted(&self, key: SortKey, order: SortOrder) -> StoreResult<Vec<PatientRecord>> {
        let db = self.db.lock()?;
        let mut records = db.list_patients()?;
        sort_records(&mut records, key, order);
        debug!(%key, ?order, count = records.len(), "listed patients sorted");
        Ok(records)
    }

    /// Get a single record.
    pub fn get(&self, id: &str) -> StoreResult<PatientRecord> {
        let db = self.db.lock()?;
        db.get_patient(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Number of stored records.
    pub fn len(&self) -> StoreResult<usize> {
        let db = self.db.lock()?;
        Ok(db.count_patients()?)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Validate and insert a new record, returning it with derived fields.
    pub fn create(&self, input: NewPatient) -> StoreResult<PatientRecord> {
        let record = PatientRecord::new(input)?;

        let db = self.db.lock()?;
        if db.patient_exists(record.id())? {
            return Err(StoreError::Conflict(record.id().to_string()));
        }
        db.insert_patient(&record)?;

        info!(id = record.id(), bmi = record.bmi(), verdict = %record.verdict(), "created patient");
        Ok(record)
    }

    /// Merge provided fields into an existing record and persist the result.
    ///
    /// An update with no fields set returns the stored record without writing.
    pub fn update(&self, id: &str, update: PatientUpdate) -> StoreResult<PatientRecord> {
        let db = self.db.lock()?;
        let current = db
            .get_patient(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if update.is_empty() {
            debug!(id, "empty update, nothing to write");
            return Ok(current);
        }

        let updated = current.apply(update)?;
        if !db.update_patient(&updated)? {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!(id, bmi = updated.bmi(), verdict = %updated.verdict(), "updated patient");
        Ok(updated)
    }

    /// Remove a record.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let db = self.db.lock()?;
        if !db.delete_patient(id)? {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!(id, "deleted patient");
        Ok(())
    }

    /// Import a JSON document keyed by id. Ids already present are skipped.
    ///
    /// The document is fully parsed and validated before anything is written,
    /// and new rows are inserted in a single transaction.
    pub fn import_json(&self, json: &str) -> StoreResult<ImportSummary> {
        let records = parse_import(json)?;

        let mut db = self.db.lock()?;
        let mut fresh = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            if db.patient_exists(record.id())? {
                debug!(id = record.id(), "skipping existing patient on import");
                skipped += 1;
            } else {
                fresh.push(record);
            }
        }
        let imported = db.insert_patients(&fresh)?;

        info!(imported, skipped, "imported patients");
        Ok(ImportSummary { imported, skipped })
    }

    /// Snapshot every record for export.
    pub fn export(&self) -> StoreResult<PatientExport> {
        let db = self.db.lock()?;
        Ok(PatientExport::from_records(db.list_patients()?))
    }
}
