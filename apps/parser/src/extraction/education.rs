//! Education segmentation. Same structure as experience, with a lower
//! entry minimum and a field-of-study lookup.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::sections::{candidate_entries, entry_lines, first_section};
use crate::models::record::EducationItem;

pub const MIN_EDUCATION_ENTRY_CHARS: usize = 20;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:EDUCATION|ACADEMIC|QUALIFICATIONS)\b").unwrap());

static YEAR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})\s*[-–—]\s*([0-9]{4})").unwrap());

// Capitalized words on the same line after the connective.
static FIELD_IN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:in)[ \t]+([A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*)").unwrap()
});
static FIELD_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:of)[ \t]+([A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*)").unwrap()
});

pub fn extract_education(text: &str) -> Vec<EducationItem> {
    let Some(section) = first_section(text, &HEADING_RE) else {
        return Vec::new();
    };

    candidate_entries(section, MIN_EDUCATION_ENTRY_CHARS)
        .into_iter()
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Option<EducationItem> {
    let lines = entry_lines(entry);
    if lines.len() < 2 {
        return None;
    }

    let (start_date, end_date) = match YEAR_RANGE_RE.captures(entry) {
        Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
        None => (None, None),
    };

    Some(EducationItem {
        degree: lines[0].to_string(),
        institution: lines[1].to_string(),
        field: field_of_study(entry),
        start_date,
        end_date,
    })
}

/// Prefers `in <Field>` ("BSc in Computer Science"); falls back to
/// `of <Field>` ("Bachelor of Arts").
pub fn field_of_study(entry: &str) -> Option<String> {
    FIELD_IN_RE
        .captures(entry)
        .or_else(|| FIELD_OF_RE.captures(entry))
        .map(|caps| caps[1].trim().to_string())
}
