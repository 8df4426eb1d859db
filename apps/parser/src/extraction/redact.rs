//! Contact redaction applied before text leaves the process for downstream
//! extraction.

use regex::{NoExpand, RegexBuilder};

use crate::extraction::contact::ContactHints;

pub const NAME_TOKEN: &str = "[NAME_REDACTED]";
pub const EMAIL_TOKEN: &str = "[EMAIL_REDACTED]";
pub const PHONE_TOKEN: &str = "[PHONE_REDACTED]";

/// Replaces every case-insensitive occurrence of the supplied name, email
/// and phone (in that order) with placeholder tokens. Missing or blank hints
/// leave the text untouched.
pub fn redact_contact(text: &str, hints: &ContactHints) -> String {
    if hints.is_empty() {
        return text.to_string();
    }

    let mut redacted = text.to_string();
    let replacements = [
        (hints.name(), NAME_TOKEN),
        (hints.email(), EMAIL_TOKEN),
        (hints.phone(), PHONE_TOKEN),
    ];

    for (value, token) in replacements {
        if let Some(value) = value {
            redacted = replace_literal(&redacted, value, token);
        }
    }
    redacted
}

fn replace_literal(haystack: &str, needle: &str, token: &str) -> String {
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(haystack, NoExpand(token)).into_owned(),
        // Only reachable when the escaped literal exceeds the regex size limit.
        Err(_) => haystack.replace(needle, token),
    }
}
