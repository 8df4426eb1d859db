//! Contact identifiers: email, phone and a best-guess person name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Only the first few non-empty lines are considered for the name.
const NAME_SCAN_LINES: usize = 5;

const NAME_EXCLUDED_WORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum",
    "vitae",
    "experience",
    "education",
    "skills",
    "profile",
];

/// Contact identifiers the caller already knows. Supplied values win over
/// the text heuristics and drive redaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHints {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactHints {
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.email().is_none() && self.phone().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First `local@domain.tld` address in the text.
pub fn extract_email(text: &str) -> Option<String> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
    });

    RE.find(text).map(|m| m.as_str().to_string())
}

/// First North-American style number: optional `+1`, optional parenthesized
/// area code, 3-3-4 digits separated by `-`, `.` or whitespace.
pub fn extract_phone(text: &str) -> Option<String> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(\+?1?[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})").unwrap()
    });

    // The optional prefix group can swallow a leading separator.
    RE.find(text)
        .map(|m| m.as_str().trim_start_matches([' ', '\t', '\n', '\r', '-', '.']))
        .map(str::to_string)
}

/// First of the leading non-empty lines that looks like a person's name.
pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| is_likely_name(line))
        .map(str::to_string)
}

/// Name heuristic:
/// - 2 to 4 whitespace-separated tokens
/// - no resume keywords (case-insensitive substring)
/// - not entirely uppercase (section headers usually are)
/// - no digits, no symbols other than `.` and `'`
/// - every token is `Capital` + lowercase letters + optional trailing period
pub fn is_likely_name(line: &str) -> bool {
    static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]*\.?$").unwrap());

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&tokens.len()) {
        return false;
    }

    let lower = line.to_lowercase();
    if NAME_EXCLUDED_WORDS.iter().any(|w| lower.contains(w)) {
        return false;
    }

    if line == line.to_uppercase() {
        return false;
    }

    let has_forbidden = line.chars().any(|c| {
        c.is_ascii_digit() || !(c.is_alphabetic() || c.is_whitespace() || c == '.' || c == '\'')
    });
    if has_forbidden {
        return false;
    }

    tokens.iter().all(|t| TOKEN_RE.is_match(t))
}
