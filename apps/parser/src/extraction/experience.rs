//! Work experience segmentation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::sections::{candidate_entries, entry_lines, first_section};
use crate::extraction::skills::extract_skills;
use crate::models::record::ExperienceItem;

/// Entries shorter than this (trimmed, in characters) are dropped.
pub const MIN_EXPERIENCE_ENTRY_CHARS: usize = 50;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:WORK EXPERIENCE|PROFESSIONAL EXPERIENCE|EXPERIENCE|EMPLOYMENT)\b")
        .unwrap()
});

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]{4})\s*[-–—]\s*([0-9]{4}|present|current)").unwrap()
});

/// Employment entries under the first experience heading. Empty when no
/// heading exists.
pub fn extract_experience(text: &str) -> Vec<ExperienceItem> {
    let Some(section) = first_section(text, &HEADING_RE) else {
        return Vec::new();
    };

    candidate_entries(section, MIN_EXPERIENCE_ENTRY_CHARS)
        .into_iter()
        .filter_map(parse_entry)
        .collect()
}

/// Line 0 is the title, line 1 the company, the rest the description.
fn parse_entry(entry: &str) -> Option<ExperienceItem> {
    let lines = entry_lines(entry);
    if lines.len() < 2 {
        return None;
    }

    let (start_date, end_date) = match date_range(entry) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    Some(ExperienceItem {
        title: lines[0].to_string(),
        company: lines[1].to_string(),
        start_date,
        end_date,
        description: lines[2..].join(" "),
        skills: extract_skills(entry),
    })
}

/// `YYYY - YYYY|present|current`; open-ended ranges end in `"Present"`.
fn date_range(entry: &str) -> Option<(String, String)> {
    let caps = DATE_RANGE_RE.captures(entry)?;
    let start = caps[1].to_string();
    let end = &caps[2];
    let end = if end.eq_ignore_ascii_case("present") || end.eq_ignore_ascii_case("current") {
        "Present".to_string()
    } else {
        end.to_string()
    };
    Some((start, end))
}
