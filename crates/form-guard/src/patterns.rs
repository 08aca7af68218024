//! Detection pattern library.
//!
//! Two static catalogues of regex rules: [`MARKUP_PATTERNS`] flags script and
//! markup injection, [`SQL_PATTERNS`] flags SQL-injection-style payloads.
//! Each entry carries a short name for logs and findings, a
//! [`PatternCategory`], and a regex string compiled once by
//! [`crate::detector::Detector`].
//!
//! Rules are independent of each other; a text is flagged when any rule of a
//! catalogue matches. Adding a rule means adding an entry here, nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Which detector a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternCategory {
    /// Script blocks, embedding tags, dangerous URI schemes and inline event
    /// handlers.
    UnsafeMarkup,
    /// SQL metacharacters and statement keywords.
    SqlInjection,
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsafeMarkup => write!(f, "UnsafeMarkup"),
            Self::SqlInjection => write!(f, "SqlInjection"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern definition
// ---------------------------------------------------------------------------

/// A single detection rule.
#[derive(Debug)]
pub struct DetectionPattern {
    /// Short, snake_case identifier used in logs and findings.
    pub name: &'static str,
    /// The detector this rule feeds.
    pub category: PatternCategory,
    /// Regex source. Case-insensitivity is part of the pattern itself.
    pub pattern: &'static str,
}

const fn markup(name: &'static str, pattern: &'static str) -> DetectionPattern {
    DetectionPattern {
        name,
        category: PatternCategory::UnsafeMarkup,
        pattern,
    }
}

const fn sql(name: &'static str, pattern: &'static str) -> DetectionPattern {
    DetectionPattern {
        name,
        category: PatternCategory::SqlInjection,
        pattern,
    }
}

// ---------------------------------------------------------------------------
// Catalogues
// ---------------------------------------------------------------------------

/// Unsafe markup rules, in the order [`crate::sanitizer::sanitize_markup`]
/// strips them.
///
/// Block rules stop at the first closing tag of the same element and span
/// line breaks.
pub static MARKUP_PATTERNS: &[DetectionPattern] = &[
    // ---- Blocks removed together with their content ----------------------
    markup("script_block", r"(?is)<script\b.*?</script>"),
    markup("iframe_block", r"(?is)<iframe\b.*?</iframe>"),
    markup("object_block", r"(?is)<object\b.*?</object>"),
    markup("embed_block", r"(?is)<embed\b.*?</embed>"),
    markup("applet_block", r"(?is)<applet\b.*?</applet>"),
    // ---- Standalone tags -------------------------------------------------
    markup("meta_tag", r"(?i)<meta\b[^<]*>"),
    markup("link_tag", r"(?i)<link\b[^<]*>"),
    // ---- URI schemes -----------------------------------------------------
    markup("javascript_uri", r"(?i)javascript:"),
    markup("vbscript_uri", r"(?i)vbscript:"),
    // ---- Inline event handlers -------------------------------------------
    markup("onload_handler", r"(?i)onload\s*="),
    markup("onclick_handler", r"(?i)onclick\s*="),
    markup("onerror_handler", r"(?i)onerror\s*="),
    markup("onmouseover_handler", r"(?i)onmouseover\s*="),
    markup("onfocus_handler", r"(?i)onfocus\s*="),
    markup("onblur_handler", r"(?i)onblur\s*="),
    markup("onchange_handler", r"(?i)onchange\s*="),
    markup("onsubmit_handler", r"(?i)onsubmit\s*="),
];

/// SQL-injection heuristics.
///
/// The metacharacter rule alone flags any quote, semicolon, percent sign and
/// similar punctuation, so plenty of harmless text trips it.
pub static SQL_PATTERNS: &[DetectionPattern] = &[
    sql(
        "sql_metacharacter",
        r"'|\\'|--|;|\||\*|%|\+|\\|\n|\r|\t|\x00|\x1a",
    ),
    sql("union_select", r"(?i)union\s+select"),
    sql("select_from", r"(?i)select\s+.*?\s+from"),
    sql("insert_into", r"(?i)insert\s+into"),
    sql("delete_from", r"(?i)delete\s+from"),
    sql("update_set", r"(?i)update\s+.*?\s+set"),
    sql("drop_table", r"(?i)drop\s+table"),
    sql("create_table", r"(?i)create\s+table"),
    sql("alter_table", r"(?i)alter\s+table"),
    sql("exec_call", r"(?i)exec\s*\("),
    sql("execute_call", r"(?i)execute\s*\("),
    sql("or_tautology", r"(?i)\bor\b\s*1\s*=\s*1"),
    sql("and_tautology", r"(?i)\band\b\s*1\s*=\s*1"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_patterns() -> impl Iterator<Item = &'static DetectionPattern> {
        MARKUP_PATTERNS.iter().chain(SQL_PATTERNS.iter())
    }

    #[test]
    fn all_patterns_compile() {
        for pat in all_patterns() {
            regex::Regex::new(pat.pattern)
                .unwrap_or_else(|e| panic!("pattern '{}' failed to compile: {e}", pat.name));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for pat in all_patterns() {
            assert!(seen.insert(pat.name), "duplicate pattern name: {}", pat.name);
        }
    }

    #[test]
    fn catalogues_are_not_mixed() {
        assert!(MARKUP_PATTERNS
            .iter()
            .all(|p| p.category == PatternCategory::UnsafeMarkup));
        assert!(SQL_PATTERNS
            .iter()
            .all(|p| p.category == PatternCategory::SqlInjection));
    }

    #[test]
    fn category_display() {
        assert_eq!(PatternCategory::UnsafeMarkup.to_string(), "UnsafeMarkup");
        assert_eq!(PatternCategory::SqlInjection.to_string(), "SqlInjection");
    }
}
