//! Patient record snapshots.
//!
//! The JSON form is an object keyed by patient id, the same shape served by
//! the listing endpoint, so an export can be fed straight back into an import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Gender, NewPatient, PatientRecord, ValidationError};

/// Import errors.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid record {id}: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: ValidationError,
    },
}

pub type ImportResult<T> = Result<T, ImportError>;

/// One entry of an import document. The id comes from the object key; any
/// `id`, `bmi` or `verdict` keys in the value are ignored.
#[derive(Debug, Clone, Deserialize)]
struct ImportEntry {
    name: String,
    city: String,
    age: u32,
    gender: Gender,
    height: f64,
    weight: f64,
}

/// Parse and validate an import document, returning records ordered by id.
pub fn parse_import(json: &str) -> ImportResult<Vec<PatientRecord>> {
    let entries: BTreeMap<String, ImportEntry> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .map(|(id, entry)| {
            let input = NewPatient {
                id: id.clone(),
                name: entry.name,
                city: entry.city,
                age: entry.age,
                gender: entry.gender,
                height: entry.height,
                weight: entry.weight,
            };
            PatientRecord::new(input).map_err(|source| ImportError::InvalidRecord { id, source })
        })
        .collect()
}

/// Export of every stored record.
#[derive(Debug, Clone, Serialize)]
pub struct PatientExport {
    /// Export timestamp
    pub exported_at: String,
    /// Records ordered by id
    pub patients: Vec<PatientRecord>,
}

impl PatientExport {
    /// Build an export from stored records.
    pub fn from_records(mut patients: Vec<PatientRecord>) -> Self {
        patients.sort_by(|a, b| a.id().cmp(b.id()));
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            patients,
        }
    }

    /// Number of exported records.
    pub fn count(&self) -> usize {
        self.patients.len()
    }

    /// Export to JSON, keyed by id.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let keyed: BTreeMap<&str, &PatientRecord> =
            self.patients.iter().map(|p| (p.id(), p)).collect();
        serde_json::to_string_pretty(&keyed)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("id,name,city,age,gender,height,weight,bmi,verdict\n");

        for patient in &self.patients {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape_csv(patient.id()),
                escape_csv(patient.name()),
                escape_csv(patient.city()),
                patient.age(),
                patient.gender(),
                patient.height(),
                patient.weight(),
                patient.bmi(),
                patient.verdict(),
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
