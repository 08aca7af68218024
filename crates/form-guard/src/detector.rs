//! Compiled pattern detectors.
//!
//! A [`Detector`] compiles one pattern catalogue into a [`RegexSet`] for the
//! yes/no question and keeps the individual regexes around for findings and
//! stripping. The two built-in detectors live in process-wide statics and are
//! compiled on first use.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::patterns::{DetectionPattern, MARKUP_PATTERNS, SQL_PATTERNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while constructing a [`Detector`].
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("failed to compile regex pattern: {0}")]
    RegexCompile(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// A single match produced by [`Detector::scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The `name` of the [`DetectionPattern`] that matched.
    pub pattern_name: String,
    /// Category string (e.g. `"SqlInjection"`).
    pub category: String,
    /// The literal substring that triggered the match.
    pub matched_text: String,
    /// Byte offset of the match within the scanned text.
    pub offset: usize,
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// One compiled pattern catalogue.
pub struct Detector {
    patterns: &'static [DetectionPattern],
    regex_set: RegexSet,
    /// Same order as `patterns`.
    individual: Vec<Regex>,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("num_patterns", &self.individual.len())
            .finish()
    }
}

impl Detector {
    /// Compile every pattern of `patterns`.
    pub fn new(patterns: &'static [DetectionPattern]) -> Result<Self, DetectorError> {
        let sources: Vec<&str> = patterns.iter().map(|p| p.pattern).collect();

        let regex_set = RegexSet::new(&sources)?;
        let individual = sources
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            regex_set,
            individual,
        })
    }

    /// Returns `true` when any pattern matches anywhere in `text`.
    ///
    /// Empty text is never flagged.
    pub fn is_match(&self, text: &str) -> bool {
        !text.is_empty() && self.regex_set.is_match(text)
    }

    /// Return every match of every pattern, sorted by byte offset.
    pub fn scan(&self, text: &str) -> Vec<Finding> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut findings: Vec<Finding> = Vec::new();

        for idx in self.regex_set.matches(text).into_iter() {
            let def = &self.patterns[idx];
            for m in self.individual[idx].find_iter(text) {
                findings.push(Finding {
                    pattern_name: def.name.to_string(),
                    category: def.category.to_string(),
                    matched_text: m.as_str().to_string(),
                    offset: m.start(),
                });
            }
        }

        findings.sort_by_key(|f| f.offset);
        findings
    }

    /// Remove all matches of each pattern, one pattern at a time in catalogue
    /// order. Text exposed by an earlier removal is seen by later patterns.
    pub fn strip(&self, text: &str) -> String {
        self.individual
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }

    /// Returns the number of patterns in the compiled set.
    pub fn pattern_count(&self) -> usize {
        self.individual.len()
    }
}

// ---------------------------------------------------------------------------
// Built-in detectors
// ---------------------------------------------------------------------------

static MARKUP_DETECTOR: LazyLock<Detector> = LazyLock::new(|| {
    Detector::new(MARKUP_PATTERNS).expect("built-in markup patterns must compile")
});

static SQL_DETECTOR: LazyLock<Detector> = LazyLock::new(|| {
    Detector::new(SQL_PATTERNS).expect("built-in SQL patterns must compile")
});

/// The shared unsafe-markup detector.
///
/// # Panics
///
/// Panics on first use if the built-in catalogue fails to compile (covered by
/// the pattern tests).
pub fn markup_detector() -> &'static Detector {
    &MARKUP_DETECTOR
}

/// The shared SQL-indicator detector.
///
/// # Panics
///
/// Panics on first use if the built-in catalogue fails to compile.
pub fn sql_detector() -> &'static Detector {
    &SQL_DETECTOR
}

/// Returns `true` if `text` contains script, embedding markup, a dangerous
/// URI scheme or an inline event handler.
pub fn contains_unsafe_markup(text: &str) -> bool {
    markup_detector().is_match(text)
}

/// Returns `true` if `text` contains SQL metacharacters or statement
/// keywords.
pub fn contains_sql_indicators(text: &str) -> bool {
    sql_detector().is_match(text)
}
