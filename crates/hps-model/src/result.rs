//! Validation result shape.

use serde::Serialize;

/// Outcome of validating one record.
///
/// `valid` is derived from `errors` at construction, so the two can never
/// disagree. `sanitized` is always populated, even for invalid input, so a
/// form can preview the cleaned values next to the error list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult<T> {
    valid: bool,
    errors: Vec<String>,
    sanitized: T,
}

impl<T> ValidationResult<T> {
    /// Builds a result from the collected error messages.
    pub fn new(errors: Vec<String>, sanitized: T) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            sanitized,
        }
    }

    /// True when no rule reported a problem.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Error messages in rule order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The cleaned copy of the input.
    pub fn sanitized(&self) -> &T {
        &self.sanitized
    }

    pub fn into_sanitized(self) -> T {
        self.sanitized
    }

    /// Converts the sanitized payload, keeping the errors.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        ValidationResult {
            valid: self.valid,
            errors: self.errors,
            sanitized: f(self.sanitized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tracks_errors() {
        let ok = ValidationResult::new(Vec::new(), ());
        assert!(ok.is_valid());

        let bad = ValidationResult::new(vec!["x".to_string()], ());
        assert!(!bad.is_valid());
        assert_eq!(bad.errors(), ["x".to_string()]);
    }

    #[test]
    fn test_serializes_all_three_keys() {
        let result = ValidationResult::new(vec!["missing".to_string()], 5);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0], "missing");
        assert_eq!(value["sanitized"], 5);
    }
}
