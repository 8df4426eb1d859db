//! WordprocessingML container decoding.
//!
//! A `.docx` file is a ZIP archive; the body lives in `word/document.xml`.
//! Paragraphs (`<w:p>`) come out one per entry in document order. Inside
//! runs, `<w:t>` contributes text, `<w:tab/>` a tab and `<w:br/>`/`<w:cr/>`
//! a newline. Deleted text and field instructions are ignored.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::container::ContainerDecoder;
use crate::errors::ParseError;

const DOCUMENT_PART: &str = "word/document.xml";
/// Upper bound on the decompressed body part.
const MAX_DOCUMENT_XML_BYTES: u64 = 64 * 1024 * 1024;

/// ZIP local file header signature, shared by every OOXML container.
pub const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

pub fn looks_like_container(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_SIGNATURE)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocxDecoder;

impl ContainerDecoder for DocxDecoder {
    fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, ParseError> {
        let xml = read_document_part(bytes)?;
        let paragraphs = parse_paragraphs(&xml)?;
        debug!(paragraphs = paragraphs.len(), "DOCX paragraphs decoded");
        Ok(paragraphs)
    }
}

fn read_document_part(bytes: &[u8]) -> Result<Vec<u8>, ParseError> {
    read_document_part_limited(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn read_document_part_limited(bytes: &[u8], limit: u64) -> Result<Vec<u8>, ParseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ParseError::DecodeFailure(format!("Failed to open DOCX container: {e}")))?;

    let file = archive.by_name(DOCUMENT_PART).map_err(|e| {
        ParseError::DecodeFailure(format!("DOCX container has no {DOCUMENT_PART}: {e}"))
    })?;

    // One byte past the limit tells a full-size part from a truncated one.
    let mut xml = Vec::new();
    file.take(limit + 1)
        .read_to_end(&mut xml)
        .map_err(|e| ParseError::DecodeFailure(format!("Failed to read {DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > limit {
        return Err(ParseError::DecodeFailure(format!(
            "{DOCUMENT_PART} exceeds {limit} bytes"
        )));
    }
    Ok(xml)
}

fn parse_paragraphs(xml: &[u8]) -> Result<Vec<String>, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    // Slots are reserved when a paragraph opens, so output follows start-tag
    // order even for paragraphs nested in text boxes.
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                name if run_depth > 0 => push_control(current(&mut paragraphs, &open), name),
                _ => {}
            },

            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                name if run_depth > 0 => push_control(current(&mut paragraphs, &open), name),
                _ => {}
            },

            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().map_err(|err| {
                        ParseError::DecodeFailure(format!("Bad text in {DOCUMENT_PART}: {err}"))
                    })?;
                    if let Some(paragraph) = current(&mut paragraphs, &open) {
                        paragraph.push_str(&text);
                    }
                }
            }

            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"p" => {
                    open.pop();
                }
                _ => {}
            },

            Ok(Event::Eof) => break,

            Err(e) => {
                return Err(ParseError::DecodeFailure(format!(
                    "Malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }

            _ => {}
        }

        buf.clear();
    }

    Ok(paragraphs)
}

/// The innermost open paragraph, if any.
fn current<'a>(paragraphs: &'a mut [String], open: &[usize]) -> Option<&'a mut String> {
    let index = *open.last()?;
    paragraphs.get_mut(index)
}

fn push_control(paragraph: Option<&mut String>, name: &[u8]) {
    let Some(paragraph) = paragraph else {
        return;
    };
    match name {
        b"tab" => paragraph.push('\t'),
        b"br" | b"cr" => paragraph.push('\n'),
        _ => {}
    }
}

#[cfg(test)]
pub(crate) fn build_docx(body: &str) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
        .unwrap();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
pub(crate) fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_in_order() {
        let bytes = build_docx(&[paragraph("Jane Doe"), paragraph("Engineer")].concat());
        let paras = DocxDecoder.paragraphs(&bytes).unwrap();
        assert_eq!(paras, vec!["Jane Doe", "Engineer"]);
    }

    #[test]
    fn test_runs_concatenate_within_paragraph() {
        let body = "<w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Engineer</w:t></w:r></w:p>";
        let paras = DocxDecoder.paragraphs(&build_docx(body)).unwrap();
        assert_eq!(paras, vec!["Senior Engineer"]);
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let body = "<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2019</w:t><w:br/><w:t>Next</w:t></w:r></w:p>";
        let paras = DocxDecoder.paragraphs(&build_docx(body)).unwrap();
        assert_eq!(paras, vec!["R&D\t2019\nNext"]);
    }

    #[test]
    fn test_tab_stops_in_paragraph_properties_are_ignored() {
        let body = "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>";
        let paras = DocxDecoder.paragraphs(&build_docx(body)).unwrap();
        assert_eq!(paras, vec!["Title"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let body = format!("{}<w:p/><w:p></w:p>{}", paragraph("A"), paragraph("B"));
        let paras = DocxDecoder.paragraphs(&build_docx(&body)).unwrap();
        assert_eq!(paras, vec!["A", "", "", "B"]);
    }

    #[test]
    fn test_deleted_text_is_ignored() {
        let body = "<w:p><w:del><w:r><w:delText>old</w:delText></w:r></w:del><w:r><w:t>new</w:t></w:r></w:p>";
        let paras = DocxDecoder.paragraphs(&build_docx(body)).unwrap();
        assert_eq!(paras, vec!["new"]);
    }

    #[test]
    fn test_table_cells_linearized_in_order() {
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            paragraph("2019 - 2023"),
            paragraph("Acme Corp"),
            paragraph("After")
        );
        let paras = DocxDecoder.paragraphs(&build_docx(&body)).unwrap();
        assert_eq!(paras, vec!["2019 - 2023", "Acme Corp", "After"]);
    }

    #[test]
    fn test_text_box_paragraphs_follow_start_order() {
        let body = "<w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:pict><w:txbxContent>\
<w:p/><w:p><w:r><w:t>Inner</w:t></w:r></w:p>\
</w:txbxContent></w:pict></w:r><w:r><w:t> tail</w:t></w:r></w:p>";
        let paras = DocxDecoder.paragraphs(&build_docx(body)).unwrap();
        assert_eq!(paras, vec!["Outer tail", "", "Inner"]);
    }

    #[test]
    fn test_oversized_document_part_is_rejected() {
        let bytes = build_docx(&paragraph("Jane Doe"));
        let full = read_document_part(&bytes).unwrap();
        let limit = full.len() as u64;

        assert_eq!(read_document_part_limited(&bytes, limit).unwrap(), full);
        let err = read_document_part_limited(&bytes, limit - 1).unwrap_err();
        assert!(matches!(err, ParseError::DecodeFailure(ref m) if m.contains("exceeds")));
    }

    #[test]
    fn test_not_a_zip_is_decode_failure() {
        let err = DocxDecoder.paragraphs(b"plain text").unwrap_err();
        assert!(matches!(err, ParseError::DecodeFailure(_)));
    }

    #[test]
    fn test_zip_without_document_part_is_decode_failure() {
        use std::io::Write;
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = DocxDecoder.paragraphs(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_container_signature() {
        assert!(looks_like_container(&build_docx("")));
        assert!(!looks_like_container(b"\xD0\xCF\x11\xE0legacy"));
    }
}
