use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Options for [`crate::validate_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    #[serde(alias = "minLength")]
    pub min_length: usize,
    #[serde(alias = "maxLength")]
    pub max_length: usize,
    /// Admit ASCII digits.
    #[serde(alias = "allowNumbers")]
    pub allow_numbers: bool,
    /// Admit whitespace, line breaks included.
    #[serde(alias = "allowSpaces")]
    pub allow_spaces: bool,
    /// Admit [`crate::validator::BASIC_PUNCTUATION`].
    #[serde(alias = "allowBasicPunctuation")]
    pub allow_basic_punctuation: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 100,
            allow_numbers: false,
            allow_spaces: true,
            allow_basic_punctuation: true,
        }
    }
}

/// Options for [`crate::validate_textarea`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextareaOptions {
    #[serde(alias = "minLength")]
    pub min_length: usize,
    #[serde(alias = "maxLength")]
    pub max_length: usize,
    /// Keep allow-listed formatting tags instead of escaping everything.
    #[serde(alias = "allowHTML", alias = "allowHtml")]
    pub allow_html: bool,
    /// When `false`, every line break is folded into a single space.
    #[serde(alias = "allowNewlines")]
    pub allow_newlines: bool,
}

impl Default for TextareaOptions {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 5000,
            allow_html: false,
            allow_newlines: true,
        }
    }
}

/// How a single field is validated.
///
/// Deserializes from `{ type: text|textarea|email, options: {...} }`. Any
/// other `type` (including a non-string one), a missing `type`, or an entry
/// that is not a mapping at all
/// becomes [`ValidationRule::Unknown`], which the batch runner reports as a
/// field error instead of failing the whole rule set. Malformed options of a
/// known kind are still a deserialization error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationRule {
    Text {
        options: TextOptions,
    },
    Textarea {
        options: TextareaOptions,
    },
    Email,
    Unknown,
}

/// Wire shape of a rule that carries a `type` key.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedRule {
    Text {
        #[serde(default)]
        options: TextOptions,
    },
    Textarea {
        #[serde(default)]
        options: TextareaOptions,
    },
    Email,
    #[serde(other)]
    Unknown,
}

impl From<TaggedRule> for ValidationRule {
    fn from(rule: TaggedRule) -> Self {
        match rule {
            TaggedRule::Text { options } => Self::Text { options },
            TaggedRule::Textarea { options } => Self::Textarea { options },
            TaggedRule::Email => Self::Email,
            TaggedRule::Unknown => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for ValidationRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        if !raw.get("type").is_some_and(Value::is_string) {
            return Ok(Self::Unknown);
        }
        TaggedRule::deserialize(raw)
            .map(Self::from)
            .map_err(D::Error::custom)
    }
}

impl ValidationRule {
    /// A text rule with default options.
    pub fn text() -> Self {
        Self::Text {
            options: TextOptions::default(),
        }
    }

    /// A textarea rule with default options.
    pub fn textarea() -> Self {
        Self::Textarea {
            options: TextareaOptions::default(),
        }
    }

    /// Lower-case kind name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Textarea { .. } => "textarea",
            Self::Email => "email",
            Self::Unknown => "unknown",
        }
    }
}

/// Field name to rule.
pub type RuleMap = BTreeMap<String, ValidationRule>;

/// A rule file: a schema version plus the rules for every field of a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Schema version; currently must be "1.0".
    pub version: String,
    #[serde(default)]
    pub fields: RuleMap,
}
