//! Summary / objective block.

use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted summaries are strictly longer than this...
pub const MIN_SUMMARY_CHARS: usize = 50;
/// ...and strictly shorter than this.
pub const MAX_SUMMARY_CHARS: usize = 1000;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:SUMMARY|OBJECTIVE|PROFILE|ABOUT)\b").unwrap());

/// The block after the first summary-like heading, up to the next blank line,
/// the next all-caps heading line or end of text. Blank lines right after the
/// heading are skipped. Returns `None` unless the block length is within
/// bounds.
pub fn extract_summary(text: &str) -> Option<String> {
    let heading = HEADING_RE.find(text)?;
    let mut lines = text[heading.end()..].split('\n');

    let mut block: Vec<&str> = Vec::new();
    let remainder = lines.next().unwrap_or_default().trim_start_matches(is_separator);
    if !remainder.trim().is_empty() {
        block.push(remainder);
    }

    for line in lines {
        if line.trim().is_empty() {
            if block.is_empty() {
                continue;
            }
            break;
        }
        if is_heading_line(line) {
            break;
        }
        block.push(line);
    }

    let summary = block.join("\n").trim().to_string();
    let len = summary.chars().count();
    (len > MIN_SUMMARY_CHARS && len < MAX_SUMMARY_CHARS).then_some(summary)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || c == '–' || c == '—'
}

/// An all-caps line such as `EXPERIENCE` or `SKILLS & TOOLS:`.
fn is_heading_line(line: &str) -> bool {
    let line = line.trim().trim_end_matches(':');
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= 3
        && line
            .chars()
            .all(|c| c.is_uppercase() || c == ' ' || c == '&' || c == '/')
}
