use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::result::{BatchResult, ValidationResult};
use crate::rules::{RuleMap, ValidationRule};
use crate::validator::{validate_email, validate_text, validate_textarea};

/// Error recorded for a field whose rule kind is not recognised.
pub const UNKNOWN_RULE: &str = "Unknown validation type";

/// Field name to raw submitted value.
pub type InputMap = BTreeMap<String, Value>;

/// Apply one rule to one raw value. Anything but a JSON string counts as a
/// missing value.
pub fn validate_field(input: Option<&Value>, rule: &ValidationRule) -> ValidationResult {
    let text = input.and_then(Value::as_str);
    match rule {
        ValidationRule::Text { options } => validate_text(text, options),
        ValidationRule::Textarea { options } => validate_textarea(text, options),
        ValidationRule::Email => validate_email(text),
        ValidationRule::Unknown => ValidationResult::rejected(UNKNOWN_RULE),
    }
}

/// Validate every field named in `rules`.
///
/// Fields without an input are validated as missing; inputs without a rule
/// are ignored. The batch is valid when every field is, and trivially valid
/// when `rules` is empty.
pub fn validate_batch(inputs: &InputMap, rules: &RuleMap) -> BatchResult {
    let results: BTreeMap<String, ValidationResult> = rules
        .iter()
        .map(|(name, rule)| {
            if *rule == ValidationRule::Unknown {
                warn!(field = %name, "unknown validation type");
            }
            let result = validate_field(inputs.get(name), rule);
            debug!(
                field = %name,
                kind = rule.kind(),
                valid = result.is_valid,
                "field validated"
            );
            (name.clone(), result)
        })
        .collect();

    BatchResult::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{TextOptions, TextareaOptions};
    use crate::validator::{EMAIL_REQUIRED, INPUT_REQUIRED, MALICIOUS_SQL};
    use serde_json::json;

    fn inputs(value: Value) -> InputMap {
        serde_json::from_value(value).unwrap()
    }

    fn contact_rules() -> RuleMap {
        let mut rules = RuleMap::new();
        rules.insert(
            "name".to_string(),
            ValidationRule::Text {
                options: TextOptions {
                    max_length: 100,
                    allow_spaces: true,
                    ..TextOptions::default()
                },
            },
        );
        rules.insert("email".to_string(), ValidationRule::Email);
        rules.insert(
            "description".to_string(),
            ValidationRule::Textarea {
                options: TextareaOptions {
                    max_length: 500,
                    allow_newlines: true,
                    ..TextareaOptions::default()
                },
            },
        );
        rules
    }

    #[test]
    fn empty_rules_are_valid() {
        let batch = validate_batch(&inputs(json!({"name": "ignored"})), &RuleMap::new());
        assert!(batch.is_valid);
        assert!(batch.results.is_empty());
    }

    #[test]
    fn contact_form_with_multiline_description() {
        let batch = validate_batch(
            &inputs(json!({
                "name": "John Doe",
                "email": "john@example.com",
                "description": "This is a description with\nmultiple lines."
            })),
            &contact_rules(),
        );
        assert!(batch.results["name"].is_valid);
        assert!(batch.results["email"].is_valid);
        assert_eq!(batch.results["description"].errors, vec![MALICIOUS_SQL]);
        assert!(!batch.is_valid);
        assert_eq!(batch.invalid_fields().collect::<Vec<_>>(), vec!["description"]);
    }

    #[test]
    fn clean_contact_form_is_valid() {
        let batch = validate_batch(
            &inputs(json!({
                "name": "Jane Roe",
                "email": "Jane@Example.com",
                "description": "Please call me back about the quote.",
                "extra": "<script>ignored</script>"
            })),
            &contact_rules(),
        );
        assert!(batch.is_valid, "{batch:?}");
        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.results["email"].sanitized, "jane@example.com");
    }

    #[test]
    fn unknown_kind_fails_the_batch() {
        let mut rules = RuleMap::new();
        rules.insert("consent".to_string(), ValidationRule::Unknown);
        let batch = validate_batch(&inputs(json!({"consent": "on"})), &rules);
        assert!(!batch.is_valid);
        let field = &batch.results["consent"];
        assert!(!field.is_valid);
        assert!(field.sanitized.is_empty());
        assert_eq!(field.errors, vec![UNKNOWN_RULE]);
    }

    #[test]
    fn absent_and_non_string_inputs_are_missing() {
        let batch = validate_batch(
            &inputs(json!({"name": 42, "description": null})),
            &contact_rules(),
        );
        assert!(!batch.is_valid);
        assert_eq!(batch.results["name"].errors, vec![INPUT_REQUIRED]);
        assert_eq!(batch.results["description"].errors, vec![INPUT_REQUIRED]);
        assert_eq!(batch.results["email"].errors, vec![EMAIL_REQUIRED]);
    }

    #[test]
    fn batch_result_serializes() {
        let batch = validate_batch(&inputs(json!({})), &RuleMap::new());
        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({"isValid": true, "results": {}})
        );
    }
}
