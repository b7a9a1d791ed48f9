//! Body-mass-index derivation and classification.

use std::fmt;

use serde::Serialize;

/// Lower bound of the "Normal" band.
pub const NORMAL_LOWER: f64 = 18.5;
/// Lower bound of the "Overweight" band.
pub const OVERWEIGHT_LOWER: f64 = 25.0;
/// Lower bound of the "Obese" band.
pub const OBESE_LOWER: f64 = 30.0;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute BMI from height (m) and weight (kg), rounded to two decimals.
///
/// Callers are expected to have validated both inputs as finite and positive.
/// Extreme inputs can still yield a non-finite result.
pub fn compute_bmi(height_m: f64, weight_kg: f64) -> f64 {
    round2(weight_kg / (height_m * height_m))
}

/// Categorical health verdict derived from a BMI value.
///
/// Bands are inclusive at the lower bound and exclusive at the upper bound;
/// `Obese` is unbounded above.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    /// Classify a BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < NORMAL_LOWER {
            Verdict::Underweight
        } else if bmi < OVERWEIGHT_LOWER {
            Verdict::Normal
        } else if bmi < OBESE_LOWER {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
