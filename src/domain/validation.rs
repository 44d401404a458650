//! Validation verdicts.

use std::fmt;

use serde::Serialize;

/// Outcome code of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    Valid,
    ValidationFailed,
    MovementNull,
}

impl ValidationCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::MovementNull => "MOVEMENT_NULL",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail verdict attached to exactly one resolved movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    code: ValidationCode,
    message: Option<String>,
}

impl ValidationResult {
    #[must_use]
    pub const fn success() -> Self {
        Self {
            valid: true,
            code: ValidationCode::Valid,
            message: None,
        }
    }

    pub fn failure(code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            code,
            message: Some(message.into()),
        }
    }

    /// Join accumulated errors into one result, or succeed when there are none.
    #[must_use]
    pub fn from_errors(errors: &[String]) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failure(ValidationCode::ValidationFailed, errors.join("; "))
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub const fn code(&self) -> ValidationCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Aggregate over a batch of validation results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total_validated: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Percentage of valid results, 0.0 for an empty batch.
    pub validation_rate: f64,
}

impl ValidationSummary {
    #[must_use]
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let total_validated = results.len();
        let valid_count = results.iter().filter(|r| r.is_valid()).count();
        let validation_rate = if total_validated == 0 {
            0.0
        } else {
            valid_count as f64 / total_validated as f64 * 100.0
        };

        Self {
            total_validated,
            valid_count,
            invalid_count: total_validated - valid_count,
            validation_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_errors_joins_with_semicolons() {
        let result = ValidationResult::from_errors(&[
            "Destination is required".to_string(),
            "Timestamp is required".to_string(),
        ]);
        assert!(!result.is_valid());
        assert_eq!(result.code(), ValidationCode::ValidationFailed);
        assert_eq!(
            result.message(),
            Some("Destination is required; Timestamp is required")
        );
    }

    #[test]
    fn from_errors_without_errors_is_valid() {
        let result = ValidationResult::from_errors(&[]);
        assert!(result.is_valid());
        assert_eq!(result.code().as_str(), "VALID");
        assert!(result.message().is_none());
    }

    #[test]
    fn summary_counts_every_result() {
        let results = vec![
            ValidationResult::success(),
            ValidationResult::failure(ValidationCode::ValidationFailed, "bad"),
            ValidationResult::success(),
            ValidationResult::success(),
        ];
        let summary = ValidationSummary::from_results(&results);
        assert_eq!(summary.total_validated, 4);
        assert_eq!(summary.valid_count, 3);
        assert_eq!(summary.invalid_count, 1);
        assert!((summary.validation_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_empty_batch_is_zero() {
        let summary = ValidationSummary::from_results(&[]);
        assert_eq!(summary.total_validated, 0);
        assert_eq!(summary.validation_rate, 0.0);
    }
}
