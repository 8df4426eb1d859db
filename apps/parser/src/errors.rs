use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;

/// Library-level error type.
///
/// Only `UnsupportedFormat` and `DecodeFailure` come out of `parse` itself.
/// The remaining variants belong to the caller-side helpers (`intake`,
/// `runtime`) so a web layer can map every failure through one type.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode document: {0}")]
    DecodeFailure(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("File is empty")]
    EmptyFile,

    #[error("Parse timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ParseError::DecodeFailure(_) => "DECODE_FAILURE",
            ParseError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ParseError::EmptyFile => "EMPTY_FILE",
            ParseError::TimedOut(_) => "TIMED_OUT",
            ParseError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status a web caller should answer with.
    pub fn status(&self) -> u16 {
        match self {
            ParseError::UnsupportedFormat(_) | ParseError::EmptyFile => 400,
            ParseError::DecodeFailure(_) => 422,
            ParseError::FileTooLarge { .. } => 413,
            ParseError::TimedOut(_) => 504,
            ParseError::Internal(_) => 500,
        }
    }

    /// Renders `{"error": {"code", "message"}}`.
    ///
    /// Internal failures are logged here and replaced by a generic message.
    pub fn to_body(&self) -> Value {
        let message = match self {
            ParseError::UnsupportedFormat(mime) => format!(
                "Invalid file type '{mime}'. Please upload a PDF or Word document."
            ),
            ParseError::DecodeFailure(cause) => {
                tracing::warn!("Decode failure: {cause}");
                format!("Failed to parse resume: {cause}")
            }
            ParseError::FileTooLarge { limit, .. } => format!(
                "File too large. Maximum size is {}MB.",
                limit / (1024 * 1024)
            ),
            ParseError::EmptyFile => "No file provided".to_string(),
            ParseError::TimedOut(after) => {
                tracing::warn!("Parse timed out after {after:?}");
                "Parsing took too long and was abandoned".to_string()
            }
            ParseError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                "An internal error occurred".to_string()
            }
        };

        json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        })
    }
}
