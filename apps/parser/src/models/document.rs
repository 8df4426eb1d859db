use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::{redact_contact, ContactHints};
use crate::models::record::ExtractedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_name: String,
    /// Exact byte length of the input buffer.
    pub file_size: usize,
    /// The declared MIME type, as given by the caller.
    pub file_type: String,
    pub parsed_at: DateTime<Utc>,
}

/// Result of one `parse` call. `text` is never modified after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    text: String,
    pub metadata: DocumentMetadata,
    pub extracted_data: ExtractedRecord,
}

/// Response body for upload callers: the full text is withheld and only its
/// length is reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub file_name: String,
    pub file_size: usize,
    pub parsed_at: DateTime<Utc>,
    pub extracted_data: ExtractedRecord,
    pub text_length: usize,
}

/// What an external AI-assisted extractor receives: redacted linear text plus
/// the original byte length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionHandoff {
    pub text: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
    pub text_length: usize,
}

impl ParsedDocument {
    pub(crate) fn new(
        text: String,
        metadata: DocumentMetadata,
        extracted_data: ExtractedRecord,
    ) -> Self {
        Self {
            text,
            metadata,
            extracted_data,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of `text` in Unicode scalar values.
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            file_name: self.metadata.file_name.clone(),
            file_size: self.metadata.file_size,
            parsed_at: self.metadata.parsed_at,
            extracted_data: self.extracted_data.clone(),
            text_length: self.text_length(),
        }
    }

    pub fn handoff(&self, hints: &ContactHints) -> ExtractionHandoff {
        let text = redact_contact(&self.text, hints);
        let text_length = text.chars().count();
        ExtractionHandoff {
            text,
            file_name: self.metadata.file_name.clone(),
            file_type: self.metadata.file_type.clone(),
            file_size: self.metadata.file_size,
            text_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedDocument {
        ParsedDocument::new(
            "Jane Doe\njane@example.com\nnaïve café".to_string(),
            DocumentMetadata {
                file_name: "jane.docx".to_string(),
                file_size: 1234,
                file_type: "application/pdf".to_string(),
                parsed_at: Utc::now(),
            },
            ExtractedRecord::default(),
        )
    }

    #[test]
    fn test_text_length_counts_chars_not_bytes() {
        let doc = sample();
        assert_eq!(doc.text_length(), 36);
        assert!(doc.text().len() > doc.text_length());
    }

    #[test]
    fn test_summary_withholds_text() {
        let json = serde_json::to_value(sample().summary()).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["textLength"], 36);
        assert_eq!(json["fileSize"], 1234);
        assert_eq!(json["fileName"], "jane.docx");
    }

    #[test]
    fn test_handoff_redacts_supplied_contact() {
        let hints = ContactHints {
            name: Some("Jane Doe".to_string()),
            email: Some("JANE@example.com".to_string()),
            phone: None,
        };
        let handoff = sample().handoff(&hints);
        assert!(handoff.text.starts_with("[NAME_REDACTED]\n[EMAIL_REDACTED]"));
        assert_eq!(handoff.file_size, 1234);
        assert_eq!(handoff.text_length, handoff.text.chars().count());
    }
}
