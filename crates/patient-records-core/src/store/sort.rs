//! Sort keys for ordered patient listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PatientRecord;

/// Unrecognized sort parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortParseError {
    #[error("Invalid field {0:?}, select from [height, weight, bmi]")]
    InvalidKey(String),

    #[error("Invalid order {0:?}, select between asc and desc")]
    InvalidOrder(String),
}

/// Numeric field to sort patients by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Height,
    Weight,
    Bmi,
}

impl SortKey {
    fn value(&self, record: &PatientRecord) -> f64 {
        match self {
            SortKey::Height => record.height(),
            SortKey::Weight => record.weight(),
            SortKey::Bmi => record.bmi(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Height => "height",
            SortKey::Weight => "weight",
            SortKey::Bmi => "bmi",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(SortKey::Height),
            "weight" => Ok(SortKey::Weight),
            "bmi" => Ok(SortKey::Bmi),
            _ => Err(SortParseError::InvalidKey(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(SortParseError::InvalidOrder(s.to_string())),
        }
    }
}

/// Sort records in place. Ties keep their existing (id) order.
pub fn sort_records(records: &mut [PatientRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = key.value(a).total_cmp(&key.value(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
