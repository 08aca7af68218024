//! Checkbox and radio-group checks.
//!
//! These controls carry no text, so they sit outside the `form-guard` rule
//! kinds. A rule file may list them under an optional `selections:` section
//! next to `fields:`; the core loader ignores that section.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use form_guard::{sanitize, BatchResult, InputMap, RuleMap, ValidationResult};

pub const CONSENT_REQUIRED: &str = "This field is required";
pub const SELECTION_REQUIRED: &str = "Please select an option";

/// A required checkbox or a required choice from a radio group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// Must be ticked: JSON `true` or the browser's default `"on"`.
    Checked,
    /// Must name one of `choices`. An empty list accepts any non-empty value.
    OneOf {
        #[serde(default)]
        choices: Vec<String>,
    },
}

pub type SelectionMap = BTreeMap<String, Selection>;

#[derive(Debug, Default, Deserialize)]
struct SelectionSection {
    #[serde(default)]
    selections: SelectionMap,
}

/// Read the `selections:` section of a rule file. A file without one yields
/// an empty map.
pub fn parse_selections(yaml: &str) -> Result<SelectionMap> {
    let section: SelectionSection =
        serde_yml::from_str(yaml).context("invalid selections section")?;
    Ok(section.selections)
}

/// Reject selections that reuse a field name or have an empty name.
pub fn check_names(selections: &SelectionMap, fields: &RuleMap) -> Result<()> {
    for name in selections.keys() {
        if name.trim().is_empty() {
            bail!("selection name must not be empty");
        }
        if fields.contains_key(name) {
            bail!("'{name}' is declared both as a field and as a selection");
        }
    }
    Ok(())
}

/// Check one control against its selection.
pub fn check_selection(input: Option<&Value>, selection: &Selection) -> ValidationResult {
    match selection {
        Selection::Checked => {
            let ticked = matches!(input, Some(Value::Bool(true)))
                || matches!(input, Some(Value::String(s)) if s == "on");
            if ticked {
                ValidationResult::from_errors("on".to_string(), Vec::new())
            } else {
                ValidationResult::rejected(CONSENT_REQUIRED)
            }
        }
        Selection::OneOf { choices } => {
            let picked = input
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .filter(|s| choices.is_empty() || choices.iter().any(|c| c == s));
            match picked {
                Some(choice) => ValidationResult::from_errors(sanitize(choice), Vec::new()),
                None => ValidationResult::rejected(SELECTION_REQUIRED),
            }
        }
    }
}

/// Add the selection results to a field report and recompute its verdict.
pub fn merge_selections(
    report: BatchResult,
    inputs: &InputMap,
    selections: &SelectionMap,
) -> BatchResult {
    let mut results = report.results;
    for (name, selection) in selections {
        let result = check_selection(inputs.get(name), selection);
        debug!(field = %name, valid = result.is_valid, "checked selection");
        results.insert(name.clone(), result);
    }
    BatchResult::from_results(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_guard::{validate_batch, ValidationRule};

    const RULES: &str = r#"
version: "1.0"
fields:
  first_name: { type: text }
selections:
  consent: { kind: checked }
  query:
    kind: one_of
    choices: [general, support]
"#;

    #[test]
    fn parses_section_next_to_fields() {
        let selections = parse_selections(RULES).unwrap();
        assert_eq!(selections["consent"], Selection::Checked);
        assert_eq!(
            selections["query"],
            Selection::OneOf {
                choices: vec!["general".into(), "support".into()]
            }
        );

        let rules = form_guard::load_rules_from_str(RULES).unwrap();
        assert_eq!(rules.fields.len(), 1);
        check_names(&selections, &rules.fields).unwrap();
    }

    #[test]
    fn missing_section_is_empty() {
        let selections = parse_selections("version: \"1.0\"\nfields: {}\n").unwrap();
        assert!(selections.is_empty());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = parse_selections("selections:\n  consent: { kind: maybe }\n").unwrap_err();
        assert!(err.to_string().contains("invalid selections section"), "{err}");
    }

    #[test]
    fn clashing_or_empty_names_are_rejected() {
        let mut fields = RuleMap::new();
        fields.insert("consent".into(), ValidationRule::text());
        let mut selections = SelectionMap::new();
        selections.insert("consent".into(), Selection::Checked);
        let err = check_names(&selections, &fields).unwrap_err();
        assert!(err.to_string().contains("both as a field"), "{err}");

        let mut selections = SelectionMap::new();
        selections.insert(" ".into(), Selection::Checked);
        assert!(check_names(&selections, &RuleMap::new()).is_err());
    }

    #[test]
    fn checkbox_must_be_ticked() {
        for ticked in [Value::Bool(true), Value::from("on")] {
            let r = check_selection(Some(&ticked), &Selection::Checked);
            assert!(r.is_valid, "{ticked:?}");
            assert_eq!(r.sanitized, "on");
        }
        for unticked in [None, Some(Value::Bool(false)), Some(Value::from("off")), Some(Value::Null)] {
            let r = check_selection(unticked.as_ref(), &Selection::Checked);
            assert_eq!(r.errors, vec![CONSENT_REQUIRED], "{unticked:?}");
        }
    }

    #[test]
    fn choice_must_be_listed() {
        let query = Selection::OneOf {
            choices: vec!["general".into(), "support".into()],
        };
        let r = check_selection(Some(&Value::from("support")), &query);
        assert!(r.is_valid);
        assert_eq!(r.sanitized, "support");

        for bad in [None, Some(Value::from("")), Some(Value::from("sales")), Some(Value::from(1))] {
            let r = check_selection(bad.as_ref(), &query);
            assert_eq!(r.errors, vec![SELECTION_REQUIRED], "{bad:?}");
        }
    }

    #[test]
    fn open_choice_accepts_any_value_sanitized() {
        let open = Selection::OneOf { choices: Vec::new() };
        let r = check_selection(Some(&Value::from("<b>")), &open);
        assert!(r.is_valid);
        assert_eq!(r.sanitized, "&lt;b&gt;");
    }

    #[test]
    fn merge_recomputes_verdict() {
        let rules = form_guard::load_rules_from_str(RULES).unwrap();
        let selections = parse_selections(RULES).unwrap();
        let mut inputs = InputMap::new();
        inputs.insert("first_name".into(), Value::from("Ada"));
        inputs.insert("query".into(), Value::from("general"));

        let fields_only = validate_batch(&inputs, &rules.fields);
        assert!(fields_only.is_valid);

        let report = merge_selections(fields_only, &inputs, &selections);
        assert!(!report.is_valid);
        assert_eq!(report.invalid_fields().collect::<Vec<_>>(), vec!["consent"]);
        assert_eq!(report.results.len(), 3);

        inputs.insert("consent".into(), Value::Bool(true));
        let report = merge_selections(validate_batch(&inputs, &rules.fields), &inputs, &selections);
        assert!(report.is_valid, "{report:?}");
    }
}
