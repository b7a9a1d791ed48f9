//! Partial updates to patient records.

use serde::{Deserialize, Serialize};

use super::patient::{Gender, PatientRecord, ValidationResult};

/// A partial set of mutable patient fields.
///
/// Absent fields keep their current value. The id is not mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl PatientUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.height.is_none()
            && self.weight.is_none()
    }
}

impl PatientRecord {
    /// Merge `update` into a copy of this record, revalidate, and rederive BMI.
    pub fn apply(&self, update: PatientUpdate) -> ValidationResult<PatientRecord> {
        let mut input = self.to_input();
        if let Some(name) = update.name {
            input.name = name;
        }
        if let Some(city) = update.city {
            input.city = city;
        }
        if let Some(age) = update.age {
            input.age = age;
        }
        if let Some(gender) = update.gender {
            input.gender = gender;
        }
        if let Some(height) = update.height {
            input.height = height;
        }
        if let Some(weight) = update.weight {
            input.weight = weight;
        }
        PatientRecord::new(input)
    }
}
