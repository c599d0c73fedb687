//! Feature Vector - validated model input
//!
//! The layout below is the order the model was trained on.
//! Raw request values never reach a classifier without passing through
//! [`FeatureVector::new`].

use ndarray::Array2;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// LAYOUT
// ============================================================================

/// Number of features the model expects per sample
pub const FEATURE_COUNT: usize = 4;

/// Feature names in the order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "sepal_length_cm", // 0
    "sepal_width_cm",  // 1
    "petal_length_cm", // 2
    "petal_width_cm",  // 3
];

// ============================================================================
// ERRORS
// ============================================================================

/// Rejection reasons for a candidate feature sequence
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Expected {expected} features, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("Features cannot contain NaN or Inf values (feature {index} is {value})")]
    NonFinite { index: usize, value: f64 },
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// A feature sequence that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Validate a candidate sequence.
    ///
    /// Length is checked first so a short vector containing NaN reports
    /// the count mismatch.
    pub fn new(values: &[f64]) -> Result<Self, ValidationError> {
        let values: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
            ValidationError::WrongLength {
                expected: FEATURE_COUNT,
                actual: values.len(),
            }
        })?;

        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NonFinite { index, value });
        }

        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Reshape into the single-sample `(1, FEATURE_COUNT)` matrix classifiers take
    pub fn to_sample(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| self.values[j])
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = ValidationError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}
