//! Field validators.
//!
//! Every validator sanitizes first and then runs its checks against the
//! sanitized value. Checks are cumulative: one failure never hides another,
//! except for a missing value, which is reported alone. Nothing here panics
//! or returns `Err`; a rejected value is an ordinary [`ValidationResult`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::detector::{markup_detector, sql_detector, Detector, Finding};
use crate::result::ValidationResult;
use crate::rules::{TextOptions, TextareaOptions};
use crate::sanitizer::{sanitize, sanitize_markup};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const INPUT_REQUIRED: &str = "Input is required and must be a string";
pub const INVALID_CHARACTERS: &str = "Input contains invalid characters";
pub const MALICIOUS_CONTENT: &str = "Input contains potentially malicious content";
pub const MALICIOUS_SQL: &str = "Input contains potentially malicious SQL content";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const EMAIL_TOO_LONG: &str = "Email too long";

fn too_short(min: usize) -> String {
    format!("Input must be at least {min} characters long")
}

fn too_long(max: usize) -> String {
    format!("Input must not exceed {max} characters")
}

// ---------------------------------------------------------------------------
// Fixed character sets and formats
// ---------------------------------------------------------------------------

/// Punctuation admitted by [`TextOptions::allow_basic_punctuation`].
///
/// `;` and `&` are excluded. Every escape sequence produced by
/// [`sanitize`] contains both, so escaped markup and quotes never pass.
pub const BASIC_PUNCTUATION: &str = ".,-/()[]{}:!@#$%^*+'";

/// Longest accepted email address, in characters.
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern must compile")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|\r\n|\r").expect("line break pattern must compile"));

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

/// An absent or empty value counts as missing.
fn present(input: Option<&str>) -> Option<&str> {
    input.filter(|s| !s.is_empty())
}

/// Record length errors and cut `value` down to `max` characters.
///
/// Lengths count Unicode scalar values, not UTF-16 code units, so a
/// character outside the Basic Multilingual Plane counts once.
fn check_length(value: &mut String, min: usize, max: usize, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len < min {
        errors.push(too_short(min));
    }
    if len > max {
        errors.push(too_long(max));
        if let Some((cut, _)) = value.char_indices().nth(max) {
            value.truncate(cut);
        }
    }
}

/// Whitespace is Unicode `White_Space` ([`char::is_whitespace`]): U+0085
/// counts as a space, U+FEFF does not.
fn is_allowed_char(c: char, options: &TextOptions) -> bool {
    c.is_ascii_alphabetic()
        || (options.allow_numbers && c.is_ascii_digit())
        || (options.allow_spaces && c.is_whitespace())
        || (options.allow_basic_punctuation && BASIC_PUNCTUATION.contains(c))
}

/// The whole value must be non-empty and drawn from the allowed class.
fn has_only_allowed_chars(value: &str, options: &TextOptions) -> bool {
    !value.is_empty() && value.chars().all(|c| is_allowed_char(c, options))
}

fn report_findings(detector: &Detector, value: &str) -> bool {
    let findings: Vec<Finding> = detector.scan(value);
    for f in &findings {
        warn!(
            pattern = %f.pattern_name,
            category = %f.category,
            offset = f.offset,
            "suspicious input pattern detected"
        );
    }
    !findings.is_empty()
}

/// Run both detectors and record one error per detector that fires.
fn check_injection(value: &str, errors: &mut Vec<String>) {
    if report_findings(markup_detector(), value) {
        errors.push(MALICIOUS_CONTENT.to_string());
    }
    if report_findings(sql_detector(), value) {
        errors.push(MALICIOUS_SQL.to_string());
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate a single-line text value such as a name.
pub fn validate_text(input: Option<&str>, options: &TextOptions) -> ValidationResult {
    let Some(raw) = present(input) else {
        return ValidationResult::rejected(INPUT_REQUIRED);
    };

    let mut sanitized = sanitize(raw);
    let mut errors = Vec::new();

    check_length(&mut sanitized, options.min_length, options.max_length, &mut errors);
    if !has_only_allowed_chars(&sanitized, options) {
        errors.push(INVALID_CHARACTERS.to_string());
    }
    check_injection(&sanitized, &mut errors);

    debug!(kind = "text", errors = errors.len(), "validated input");
    ValidationResult::from_errors(sanitized, errors)
}

/// Validate free-form multi-line text such as a message body.
///
/// No character class applies; only length and the injection detectors.
pub fn validate_textarea(input: Option<&str>, options: &TextareaOptions) -> ValidationResult {
    let Some(raw) = present(input) else {
        return ValidationResult::rejected(INPUT_REQUIRED);
    };

    let mut sanitized = if options.allow_html {
        sanitize_markup(raw)
    } else {
        sanitize(raw)
    };
    if !options.allow_newlines {
        sanitized = LINE_BREAK.replace_all(&sanitized, " ").into_owned();
    }

    let mut errors = Vec::new();
    check_length(&mut sanitized, options.min_length, options.max_length, &mut errors);
    check_injection(&sanitized, &mut errors);

    debug!(kind = "textarea", errors = errors.len(), "validated input");
    ValidationResult::from_errors(sanitized, errors)
}

/// Validate an email address.
///
/// The value is lower-cased before sanitizing. Only the address shape and
/// length are checked; the injection detectors do not run here.
pub fn validate_email(input: Option<&str>) -> ValidationResult {
    let Some(raw) = present(input) else {
        return ValidationResult::rejected(EMAIL_REQUIRED);
    };

    let sanitized = sanitize(&raw.to_lowercase());
    let mut errors = Vec::new();

    if !EMAIL.is_match(&sanitized) {
        errors.push(INVALID_EMAIL.to_string());
    }
    if sanitized.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(EMAIL_TOO_LONG.to_string());
    }

    debug!(kind = "email", errors = errors.len(), "validated input");
    ValidationResult::from_errors(sanitized, errors)
}
