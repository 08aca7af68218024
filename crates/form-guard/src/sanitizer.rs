//! Text sanitization.
//!
//! [`sanitize`] neutralises a value for an HTML text context by escaping;
//! it never rejects input. [`sanitize_markup`] is the permissive variant for
//! fields that accept a little formatting.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::detector::markup_detector;

/// Formatting tags that survive [`sanitize_markup`], attributes removed.
pub const ALLOWED_TAGS: &[&str] = &["b", "i", "u", "strong", "em", "br", "p"];

/// Replacement table for [`sanitize`]. `&` must stay first so the
/// ampersands inserted by later entries are not escaped again.
const HTML_ESCAPES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
];

/// Any remaining opening or closing tag: slash, name, attributes.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z0-9_]+)([^>]*)>").expect("tag pattern must compile")
});

/// Control characters removed by [`sanitize`]. Tab, line feed and carriage
/// return are kept.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Trim, drop control characters and HTML-escape `& < > " ' /`.
///
/// Not idempotent: sanitizing an already escaped string escapes its
/// ampersands a second time.
///
/// Trimming uses Unicode `White_Space` ([`str::trim`]): U+0085 (next line)
/// is trimmed, U+FEFF (byte order mark) is not and survives as content.
///
/// ```rust
/// use form_guard::sanitize;
///
/// assert_eq!(sanitize("  <b>Tom & Jerry</b> "), "&lt;b&gt;Tom &amp; Jerry&lt;&#x2F;b&gt;");
/// ```
pub fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|&c| !is_stripped_control(c))
        .collect();

    HTML_ESCAPES
        .iter()
        .fold(cleaned, |acc, (from, to)| acc.replace(*from, to))
}

/// Strip dangerous markup and reduce every other tag to the allow-list.
///
/// Script-like blocks, `meta`/`link` tags, `javascript:`/`vbscript:` and the
/// common inline event handlers are removed first. Each remaining tag is
/// then either rewritten as a bare lower-case allowed tag or dropped. Text
/// between tags is left unescaped.
pub fn sanitize_markup(input: &str) -> String {
    let stripped = markup_detector().strip(input.trim());

    TAG.replace_all(&stripped, |caps: &Captures<'_>| {
        let name = caps[2].to_ascii_lowercase();
        if ALLOWED_TAGS.contains(&name.as_str()) {
            format!("<{}{}>", &caps[1], name)
        } else {
            String::new()
        }
    })
    .into_owned()
}
