use std::path::{Path, PathBuf};

use crate::rules::RuleSet;

/// The only rule-file schema version understood by this crate.
pub const SUPPORTED_VERSION: &str = "1.0";

/// Errors raised while reading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("failed to read rule file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML deserialization failed: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("unsupported rule file version '{0}'; only '1.0' is supported")]
    UnsupportedVersion(String),
    #[error("field name must not be empty")]
    EmptyFieldName,
}

/// Load a [`RuleSet`] from a YAML file on disk.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, RuleSetError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| RuleSetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_rules_from_str(&contents)
}

/// Parse and validate a [`RuleSet`] from a YAML string.
pub fn load_rules_from_str(yaml: &str) -> Result<RuleSet, RuleSetError> {
    let rules: RuleSet = serde_yml::from_str(yaml)?;
    validate(&rules)?;
    Ok(rules)
}

/// Checks serde cannot express: version gate and non-empty field names.
fn validate(rules: &RuleSet) -> Result<(), RuleSetError> {
    if rules.version != SUPPORTED_VERSION {
        return Err(RuleSetError::UnsupportedVersion(rules.version.clone()));
    }
    if rules.fields.keys().any(|name| name.trim().is_empty()) {
        return Err(RuleSetError::EmptyFieldName);
    }
    Ok(())
}
