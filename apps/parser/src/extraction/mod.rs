//! Field extraction: turns plain text into an [`ExtractedRecord`].
//!
//! # Architecture
//!
//! Each field is produced by an independent rule. Rules only read the text
//! and write their own field, so their order never changes the result. The
//! rule table is public so callers can enumerate or selectively run rules.
//!
//! Rules never fail: a rule that finds nothing leaves its field empty.

pub mod contact;
pub mod education;
pub mod experience;
pub mod redact;
pub(crate) mod sections;
pub mod skills;
pub mod summary;

pub use contact::{extract_email, extract_name, extract_phone, is_likely_name, ContactHints};
pub use education::extract_education;
pub use experience::extract_experience;
pub use redact::redact_contact;
pub use skills::{extract_skills, SKILL_VOCABULARY};
pub use summary::extract_summary;

use tracing::debug;

use crate::models::record::ExtractedRecord;

/// A named field rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str, &mut ExtractedRecord),
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

pub const RULES: &[Rule] = &[
    Rule { name: "email", apply: email_rule },
    Rule { name: "phone", apply: phone_rule },
    Rule { name: "name", apply: name_rule },
    Rule { name: "skills", apply: skills_rule },
    Rule { name: "experience", apply: experience_rule },
    Rule { name: "education", apply: education_rule },
    Rule { name: "summary", apply: summary_rule },
];

fn email_rule(text: &str, record: &mut ExtractedRecord) {
    record.email = extract_email(text);
}

fn phone_rule(text: &str, record: &mut ExtractedRecord) {
    record.phone = extract_phone(text);
}

fn name_rule(text: &str, record: &mut ExtractedRecord) {
    record.name = extract_name(text);
}

fn skills_rule(text: &str, record: &mut ExtractedRecord) {
    record.skills = extract_skills(text);
}

fn experience_rule(text: &str, record: &mut ExtractedRecord) {
    record.experience = extract_experience(text);
}

fn education_rule(text: &str, record: &mut ExtractedRecord) {
    record.education = extract_education(text);
}

fn summary_rule(text: &str, record: &mut ExtractedRecord) {
    record.summary = extract_summary(text);
}

/// Runs every rule over `text`.
pub fn extract_record(text: &str) -> ExtractedRecord {
    extract_record_with_contact(text, &ContactHints::default())
}

/// Like [`extract_record`], but caller-supplied contact values replace the
/// corresponding heuristic rules.
pub fn extract_record_with_contact(text: &str, hints: &ContactHints) -> ExtractedRecord {
    let mut record = ExtractedRecord::default();
    if !hints.is_empty() {
        debug!("Applying caller-supplied contact details");
    }

    for rule in RULES {
        let supplied = match rule.name {
            "name" => hints.name().is_some(),
            "email" => hints.email().is_some(),
            "phone" => hints.phone().is_some(),
            _ => false,
        };
        if supplied {
            continue;
        }
        (rule.apply)(text, &mut record);
    }

    if let Some(name) = hints.name() {
        record.name = Some(name.to_string());
    }
    if let Some(email) = hints.email() {
        record.email = Some(email.to_string());
    }
    if let Some(phone) = hints.phone() {
        record.phone = Some(phone.to_string());
    }

    debug!(
        has_name = record.name.is_some(),
        has_email = record.email.is_some(),
        has_phone = record.phone.is_some(),
        skills = record.skills.len(),
        experience = record.experience.len(),
        education = record.education.len(),
        has_summary = record.summary.is_some(),
        "Record extracted"
    );

    record
}
