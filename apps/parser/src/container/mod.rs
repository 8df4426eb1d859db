// Container (word-processor) text extraction.
// The container format already linearizes paragraphs; this layer only joins them.

pub mod docx;

pub use docx::{looks_like_container, DocxDecoder};

use crate::errors::ParseError;

/// Trait for word-processor container decoders.
///
/// Implementors own the binary format and return paragraph text in document
/// order. Swap the implementation in `ResumeParser` without touching callers.
pub trait ContainerDecoder: Send + Sync {
    fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, ParseError>;
}

/// Flattens a container document into linear text: one paragraph per line,
/// empty paragraphs kept as blank lines, outer whitespace trimmed.
pub fn container_text(decoder: &dyn ContainerDecoder, bytes: &[u8]) -> Result<String, ParseError> {
    let paragraphs = decoder.paragraphs(bytes)?;
    Ok(paragraphs.join("\n").trim().to_string())
}
