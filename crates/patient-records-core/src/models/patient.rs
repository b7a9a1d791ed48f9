//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::{compute_bmi, Verdict};

/// Field-level validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Patient id must not be blank")]
    BlankId,

    #[error("Age must be greater than 0, got {0}")]
    InvalidAge(u32),

    #[error("Height must be a positive number of meters, got {0}")]
    InvalidHeight(f64),

    #[error("Weight must be a positive number of kilograms, got {0}")]
    InvalidWeight(f64),

    #[error("Gender must be one of male, female, other; got {0:?}")]
    InvalidGender(String),

    #[error("Height and weight give a BMI outside the representable range: {0}")]
    BmiOutOfRange(f64),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Patient gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(alias = "others")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" | "others" => Ok(Gender::Other),
            _ => Err(ValidationError::InvalidGender(s.to_string())),
        }
    }
}

/// Input fields for a patient record, before validation and derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    /// Unique patient identifier (e.g. "P001")
    pub id: String,
    pub name: String,
    pub city: String,
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Height in meters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
}

impl NewPatient {
    /// Check every field constraint.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::BlankId);
        }
        if self.age == 0 {
            return Err(ValidationError::InvalidAge(self.age));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ValidationError::InvalidHeight(self.height));
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(ValidationError::InvalidWeight(self.weight));
        }
        Ok(())
    }
}

/// A validated patient record with derived BMI and verdict.
///
/// Fields are read-only; the only way to change a record is to build a new one
/// (see [`PatientRecord::apply`]), which keeps `bmi` and `verdict` consistent
/// with `height` and `weight`. Deserializing goes through [`NewPatient`], so any
/// `bmi`/`verdict` present in the input is ignored and recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "NewPatient")]
pub struct PatientRecord {
    id: String,
    name: String,
    city: String,
    age: u32,
    gender: Gender,
    height: f64,
    weight: f64,
    bmi: f64,
    verdict: Verdict,
}

impl PatientRecord {
    /// Validate input fields and derive BMI and verdict.
    pub fn new(input: NewPatient) -> ValidationResult<Self> {
        input.validate()?;
        let bmi = compute_bmi(input.height, input.weight);
        if !bmi.is_finite() {
            return Err(ValidationError::BmiOutOfRange(bmi));
        }
        Ok(Self {
            id: input.id,
            name: input.name,
            city: input.city,
            age: input.age,
            gender: input.gender,
            height: input.height,
            weight: input.weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Height in meters.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Recover the input fields of this record.
    pub fn to_input(&self) -> NewPatient {
        NewPatient {
            id: self.id.clone(),
            name: self.name.clone(),
            city: self.city.clone(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
        }
    }
}

impl TryFrom<NewPatient> for PatientRecord {
    type Error = ValidationError;

    fn try_from(input: NewPatient) -> Result<Self, Self::Error> {
        PatientRecord::new(input)
    }
}
