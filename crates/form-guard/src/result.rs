use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The outcome of validating one value.
///
/// `sanitized` is filled in even when the value is rejected, so callers can
/// choose between writing it back and refusing the submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` exactly when `errors` is empty.
    pub is_valid: bool,
    pub sanitized: String,
    /// Human-readable messages in the order the checks ran.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result from a sanitized value and the errors collected for
    /// it.
    pub fn from_errors(sanitized: String, errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            sanitized,
            errors,
        }
    }

    /// A rejected result with an empty sanitized value and a single error.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::from_errors(String::new(), vec![error.into()])
    }
}

/// The outcome of [`crate::validate_batch`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// `true` when every field result is valid (and when there are none).
    pub is_valid: bool,
    pub results: BTreeMap<String, ValidationResult>,
}

impl BatchResult {
    /// Aggregate per-field results.
    pub fn from_results(results: BTreeMap<String, ValidationResult>) -> Self {
        Self {
            is_valid: results.values().all(|r| r.is_valid),
            results,
        }
    }

    /// Names of the fields that failed, in field order.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|(_, r)| !r.is_valid)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_errors() {
        assert!(ValidationResult::from_errors("ok".into(), Vec::new()).is_valid);
        let bad = ValidationResult::from_errors("x".into(), vec!["nope".into()]);
        assert!(!bad.is_valid);
        assert_eq!(bad.sanitized, "x");
    }

    #[test]
    fn rejected_has_empty_value() {
        let r = ValidationResult::rejected("Unknown validation type");
        assert!(!r.is_valid);
        assert!(r.sanitized.is_empty());
        assert_eq!(r.errors, vec!["Unknown validation type"]);
    }

    #[test]
    fn empty_batch_is_valid() {
        let batch = BatchResult::from_results(BTreeMap::new());
        assert!(batch.is_valid);
        assert_eq!(batch.invalid_fields().count(), 0);
    }

    #[test]
    fn batch_is_and_of_fields() {
        let mut results = BTreeMap::new();
        results.insert("a".to_string(), ValidationResult::from_errors("a".into(), Vec::new()));
        results.insert("b".to_string(), ValidationResult::rejected("bad"));
        let batch = BatchResult::from_results(results);
        assert!(!batch.is_valid);
        assert_eq!(batch.invalid_fields().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ValidationResult::rejected("x")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isValid": false, "sanitized": "", "errors": ["x"]})
        );
    }
}
