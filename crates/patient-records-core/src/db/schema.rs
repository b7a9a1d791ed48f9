//! SQLite schema definition.

/// Complete database schema for the patient record store.
///
/// Derived metrics (BMI, verdict) are not stored; they are recomputed from
/// height and weight whenever a row is loaded.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0),
    name TEXT NOT NULL,
    city TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age > 0),
    gender TEXT NOT NULL CHECK (gender IN ('male', 'female', 'other')),
    height REAL NOT NULL CHECK (height > 0),                -- meters
    weight REAL NOT NULL CHECK (weight > 0),                -- kilograms
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
"#;
