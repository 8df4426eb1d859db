//! Async entry point: runs the blocking parse on the blocking pool with a
//! deadline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::dispatch::ResumeParser;
use crate::errors::ParseError;
use crate::extraction::ContactHints;
use crate::models::document::ParsedDocument;

pub async fn parse_with_timeout(
    parser: Arc<ResumeParser>,
    bytes: Vec<u8>,
    file_name: String,
    declared_type: String,
    timeout: Duration,
) -> Result<ParsedDocument, ParseError> {
    parse_with_contact_timeout(
        parser,
        bytes,
        file_name,
        declared_type,
        ContactHints::default(),
        timeout,
    )
    .await
}

/// On timeout the blocking task is left to finish on its own; its result is
/// dropped.
pub async fn parse_with_contact_timeout(
    parser: Arc<ResumeParser>,
    bytes: Vec<u8>,
    file_name: String,
    declared_type: String,
    hints: ContactHints,
    timeout: Duration,
) -> Result<ParsedDocument, ParseError> {
    let task = tokio::task::spawn_blocking(move || {
        parser.parse_with_contact(&bytes, &file_name, &declared_type, &hints)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!("Parse task failed: {e}");
            Err(ParseError::Internal(format!("parse task failed: {e}")))
        }
        Err(_) => {
            warn!("Parse exceeded {timeout:?}");
            Err(ParseError::TimedOut(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::container::docx::{build_docx, paragraph};
    use crate::container::ContainerDecoder;
    use crate::dispatch::{DOCX_MIME, PDF_MIME};
    use crate::layout::PdfExtractDecoder;

    struct SlowContainer;

    impl ContainerDecoder for SlowContainer {
        fn paragraphs(&self, _bytes: &[u8]) -> Result<Vec<String>, ParseError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        }
    }

    struct PanickingContainer;

    impl ContainerDecoder for PanickingContainer {
        fn paragraphs(&self, _bytes: &[u8]) -> Result<Vec<String>, ParseError> {
            panic!("decoder bug");
        }
    }

    fn parser_with(container: impl ContainerDecoder + 'static) -> Arc<ResumeParser> {
        Arc::new(ResumeParser::with_decoders(
            Arc::new(PdfExtractDecoder),
            Arc::new(container),
            ParserConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let bytes = build_docx(&paragraph("Jane Doe"));
        let doc = parse_with_timeout(
            Arc::new(ResumeParser::default()),
            bytes,
            "jane.docx".to_string(),
            DOCX_MIME.to_string(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(doc.text(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_slow_decode_times_out() {
        let err = parse_with_timeout(
            parser_with(SlowContainer),
            vec![1, 2, 3],
            "slow.docx".to_string(),
            DOCX_MIME.to_string(),
            Duration::from_millis(20),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ParseError::TimedOut(d) if d == Duration::from_millis(20)));
        assert_eq!(err.status(), 504);
    }

    #[tokio::test]
    async fn test_panicking_decoder_is_internal_error() {
        let err = parse_with_timeout(
            parser_with(PanickingContainer),
            vec![1],
            "bad.docx".to_string(),
            DOCX_MIME.to_string(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ParseError::Internal(_)));
    }

    #[tokio::test]
    async fn test_parse_errors_pass_through() {
        let err = parse_with_timeout(
            Arc::new(ResumeParser::default()),
            b"garbage".to_vec(),
            "bad.pdf".to_string(),
            PDF_MIME.to_string(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ParseError::DecodeFailure(_)));
    }
}
