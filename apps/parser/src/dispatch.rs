//! Format dispatch and the top-level `parse` entry point.
//!
//! # Architecture
//!
//! ```text
//! bytes + declared MIME
//!   └─ DocumentKind::from_mime ──(unknown)──> UnsupportedFormat
//!        ├─ Pdf        → PageDecoder → LayoutReconstructor → text
//!        ├─ Docx       → ContainerDecoder → text
//!        └─ LegacyWord → ZIP signature? Docx path : UnsupportedFormat
//!   text → extraction::RULES → ExtractedRecord
//! ```
//!
//! The declared type is trusted; bytes are only sniffed for legacy Word
//! uploads, which are often mislabelled `.docx` files.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::container::{container_text, looks_like_container, ContainerDecoder, DocxDecoder};
use crate::errors::ParseError;
use crate::extraction::{extract_record_with_contact, ContactHints};
use crate::layout::{LayoutReconstructor, PageDecoder, PdfExtractDecoder};
use crate::models::document::{DocumentMetadata, ParsedDocument};

pub const PDF_MIME: &str = "application/pdf";
pub const LEGACY_WORD_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Supported document families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    LegacyWord,
    Docx,
}

impl DocumentKind {
    /// Exact, case-sensitive match on the three accepted MIME identifiers.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            PDF_MIME => Some(Self::Pdf),
            LEGACY_WORD_MIME => Some(Self::LegacyWord),
            DOCX_MIME => Some(Self::Docx),
            _ => None,
        }
    }

    /// Best-effort guess from a file name, for callers without a MIME type.
    pub fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::LegacyWord),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::LegacyWord => LEGACY_WORD_MIME,
            Self::Docx => DOCX_MIME,
        }
    }
}

/// Stateless parser. Safe to share across threads; every call is
/// independent.
#[derive(Clone)]
pub struct ResumeParser {
    page_decoder: Arc<dyn PageDecoder>,
    container_decoder: Arc<dyn ContainerDecoder>,
    config: ParserConfig,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ResumeParser {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_decoders(Arc::new(PdfExtractDecoder), Arc::new(DocxDecoder), config)
    }

    pub fn with_decoders(
        page_decoder: Arc<dyn PageDecoder>,
        container_decoder: Arc<dyn ContainerDecoder>,
        config: ParserConfig,
    ) -> Self {
        Self {
            page_decoder,
            container_decoder,
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(
        &self,
        bytes: &[u8],
        file_name: &str,
        declared_type: &str,
    ) -> Result<ParsedDocument, ParseError> {
        self.parse_with_contact(bytes, file_name, declared_type, &ContactHints::default())
    }

    pub fn parse_with_contact(
        &self,
        bytes: &[u8],
        file_name: &str,
        declared_type: &str,
        hints: &ContactHints,
    ) -> Result<ParsedDocument, ParseError> {
        let Some(kind) = DocumentKind::from_mime(declared_type) else {
            warn!(file_name, declared_type, "Rejected unsupported document type");
            return Err(ParseError::UnsupportedFormat(declared_type.to_string()));
        };

        let text = self.linearize(kind, bytes)?;
        let extracted_data = extract_record_with_contact(&text, hints);

        info!(
            file_name,
            file_type = declared_type,
            file_size = bytes.len(),
            text_chars = text.chars().count(),
            skills = extracted_data.skills.len(),
            experience = extracted_data.experience.len(),
            education = extracted_data.education.len(),
            "Resume parsed"
        );

        let metadata = DocumentMetadata {
            file_name: file_name.to_string(),
            file_size: bytes.len(),
            file_type: declared_type.to_string(),
            parsed_at: Utc::now(),
        };
        Ok(ParsedDocument::new(text, metadata, extracted_data))
    }

    /// Linear text for `bytes`, routed by document kind.
    pub fn linearize(&self, kind: DocumentKind, bytes: &[u8]) -> Result<String, ParseError> {
        match kind {
            DocumentKind::Pdf => {
                let mut sink = LayoutReconstructor::from_config(&self.config);
                self.page_decoder.decode(bytes, &mut sink)?;
                debug!(fragments = sink.len(), "Page fragments buffered");
                Ok(sink.finish())
            }
            DocumentKind::Docx => container_text(self.container_decoder.as_ref(), bytes),
            DocumentKind::LegacyWord => {
                if looks_like_container(bytes) {
                    debug!("Legacy Word upload carries a ZIP container; decoding as DOCX");
                    container_text(self.container_decoder.as_ref(), bytes)
                } else {
                    warn!("Binary .doc upload rejected; only ZIP-based Word files are decoded");
                    Err(ParseError::UnsupportedFormat(LEGACY_WORD_MIME.to_string()))
                }
            }
        }
    }
}

/// One-shot parse with the default decoders and configuration.
pub fn parse(bytes: &[u8], file_name: &str, declared_type: &str) -> Result<ParsedDocument, ParseError> {
    ResumeParser::default().parse(bytes, file_name, declared_type)
}

pub fn parse_with_contact(
    bytes: &[u8],
    file_name: &str,
    declared_type: &str,
    hints: &ContactHints,
) -> Result<ParsedDocument, ParseError> {
    ResumeParser::default().parse_with_contact(bytes, file_name, declared_type, hints)
}
