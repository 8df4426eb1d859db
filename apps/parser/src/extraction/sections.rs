//! Shared section segmentation used by the experience and education rules.
//!
//! The text is split before every heading occurrence; the segment that starts
//! at the first heading (heading included) is the section. The section is then
//! cut at blank lines into candidate entries.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// The segment starting at the first `heading` match and running up to the
/// next match (or end of text). `None` when the heading never occurs.
pub(crate) fn first_section<'a>(text: &'a str, heading: &Regex) -> Option<&'a str> {
    let first = heading.find(text)?;
    let end = heading
        .find_at(text, first.end())
        .map(|next| next.start())
        .unwrap_or(text.len());
    Some(&text[first.start()..end])
}

/// Blank-line separated chunks whose trimmed length is at least `min_chars`.
pub(crate) fn candidate_entries(section: &str, min_chars: usize) -> Vec<&str> {
    BLANK_LINE_RE
        .split(section)
        .filter(|entry| entry.trim().chars().count() >= min_chars)
        .collect()
}

/// Non-empty trimmed lines of an entry.
pub(crate) fn entry_lines(entry: &str) -> Vec<&str> {
    entry
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading() -> Regex {
        Regex::new(r"(?i)\bEDUCATION\b").unwrap()
    }

    #[test]
    fn test_no_heading_no_section() {
        assert_eq!(first_section("nothing relevant", &heading()), None);
    }

    #[test]
    fn test_section_keeps_heading_and_stops_at_next_occurrence() {
        let text = "intro\nEducation\nBSc\n\nmore education notes";
        assert_eq!(
            first_section(text, &heading()),
            Some("Education\nBSc\n\nmore ")
        );
    }

    #[test]
    fn test_section_runs_to_end_without_second_heading() {
        let text = "EDUCATION\nBSc Physics";
        assert_eq!(first_section(text, &heading()), Some(text));
    }

    #[test]
    fn test_candidate_entries_split_on_blank_lines() {
        let section = "first entry long enough\n \n\nshort\n\nsecond entry long enough";
        assert_eq!(
            candidate_entries(section, 10),
            vec!["first entry long enough", "second entry long enough"]
        );
    }

    #[test]
    fn test_candidate_minimum_is_inclusive() {
        assert_eq!(candidate_entries("12345", 5), vec!["12345"]);
        assert!(candidate_entries("1234", 5).is_empty());
    }

    #[test]
    fn test_entry_lines_trim_and_skip_empty() {
        assert_eq!(entry_lines("  a  \n\n b\r\n"), vec!["a", "b"]);
    }
}
