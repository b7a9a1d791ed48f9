//! Patient database operations.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Gender, NewPatient, PatientRecord};

const SELECT_COLUMNS: &str = "SELECT id, name, city, age, gender, height, weight FROM patients";

impl ToSql for Gender {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Gender {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Build a record from a row selected with [`SELECT_COLUMNS`], rederiving BMI.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PatientRecord> {
    let input = NewPatient {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        height: row.get(5)?,
        weight: row.get(6)?,
    };
    PatientRecord::new(input).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn insert_row(conn: &Connection, record: &PatientRecord) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT INTO patients (id, name, city, age, gender, height, weight)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            record.id(),
            record.name(),
            record.city(),
            record.age(),
            record.gender(),
            record.height(),
            record.weight(),
        ],
    )
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, record: &PatientRecord) -> DbResult<()> {
        insert_row(&self.conn, record)?;
        Ok(())
    }

    /// Insert several patients in one transaction; either all rows land or none.
    pub fn insert_patients(&mut self, records: &[PatientRecord]) -> DbResult<usize> {
        let tx = self.transaction()?;
        for record in records {
            insert_row(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Update an existing patient. Returns false if no row has this id.
    pub fn update_patient(&self, record: &PatientRecord) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                city = ?3,
                age = ?4,
                gender = ?5,
                height = ?6,
                weight = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                record.id(),
                record.name(),
                record.city(),
                record.age(),
                record.gender(),
                record.height(),
                record.weight(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                [id],
                row_to_record,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether a patient with this id exists.
    pub fn patient_exists(&self, id: &str) -> DbResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List all patients, ordered by id.
    pub fn list_patients(&self) -> DbResult<Vec<PatientRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;

        let rows = stmt.query_map([], row_to_record)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count stored patients.
    pub fn count_patients(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete a patient. Returns false if no row has this id.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
