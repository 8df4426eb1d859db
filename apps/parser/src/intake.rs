//! Upload checks a caller runs before handing bytes to `parse`.

use crate::config::DEFAULT_MAX_FILE_BYTES;
use crate::dispatch::DocumentKind;
use crate::errors::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Rejects empty uploads, unknown types and oversized files, in that order.
/// The size limit is inclusive.
pub fn validate_upload(
    len: usize,
    declared_type: &str,
    limits: &UploadLimits,
) -> Result<DocumentKind, ParseError> {
    if len == 0 {
        return Err(ParseError::EmptyFile);
    }

    let kind = DocumentKind::from_mime(declared_type)
        .ok_or_else(|| ParseError::UnsupportedFormat(declared_type.to_string()))?;

    if len > limits.max_bytes {
        return Err(ParseError::FileTooLarge {
            size: len,
            limit: limits.max_bytes,
        });
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DOCX_MIME, PDF_MIME};

    #[test]
    fn test_accepts_supported_upload() {
        let kind = validate_upload(1024, PDF_MIME, &UploadLimits::default()).unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_empty_upload() {
        let err = validate_upload(0, PDF_MIME, &UploadLimits::default()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyFile));
    }

    #[test]
    fn test_unknown_type_checked_before_size() {
        let limits = UploadLimits { max_bytes: 10 };
        let err = validate_upload(100, "image/png", &limits).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let limits = UploadLimits { max_bytes: 10 };
        assert!(validate_upload(10, DOCX_MIME, &limits).is_ok());

        let err = validate_upload(11, DOCX_MIME, &limits).unwrap_err();
        assert!(matches!(err, ParseError::FileTooLarge { size: 11, limit: 10 }));
        assert_eq!(err.status(), 413);
    }
}
