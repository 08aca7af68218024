//! # form-guard
//!
//! Sanitizes and validates values submitted through contact-style forms:
//! names, email addresses and free-form messages.
//!
//! The crate is organised in layers:
//!
//! 1. **[`patterns`]** -- static catalogues of unsafe-markup and SQL
//!    injection rules.
//! 2. **[`detector`]** -- compiles each catalogue once into a shared
//!    [`Detector`](detector::Detector).
//! 3. **[`sanitizer`]** -- HTML escaping and allow-list markup stripping.
//! 4. **[`validator`]** -- text, textarea and email validators producing a
//!    [`ValidationResult`].
//! 5. **[`batch`]** -- runs a [`RuleMap`] over a whole submission.
//!
//! Rule maps can be written by hand or read from YAML with [`loader`].
//!
//! ## Quick start
//!
//! ```rust
//! use form_guard::{validate_email, validate_text, TextOptions};
//!
//! let name = validate_text(Some("Ada Lovelace"), &TextOptions::default());
//! assert!(name.is_valid);
//!
//! let email = validate_email(Some("not-an-email"));
//! assert_eq!(email.errors, vec!["Invalid email format"]);
//! ```

pub mod batch;
pub mod detector;
pub mod loader;
pub mod patterns;
mod result;
mod rules;
pub mod sanitizer;
pub mod validator;

pub use batch::{validate_batch, validate_field, InputMap, UNKNOWN_RULE};
pub use detector::{contains_sql_indicators, contains_unsafe_markup, DetectorError, Finding};
pub use loader::{load_rules, load_rules_from_str, RuleSetError};
pub use patterns::{DetectionPattern, PatternCategory, MARKUP_PATTERNS, SQL_PATTERNS};
pub use result::{BatchResult, ValidationResult};
pub use rules::{RuleMap, RuleSet, TextOptions, TextareaOptions, ValidationRule};
pub use sanitizer::{sanitize, sanitize_markup};
pub use validator::{validate_email, validate_text, validate_textarea};
