//! Page-description decoding: turns PDF glyph callbacks into positioned
//! fragments for the reconstructor.
//!
//! pdf-extract drives an `OutputDev` with one callback per glyph. The
//! collector below merges glyphs on the same baseline into runs, splits at
//! whitespace glyphs and stacks pages into a single coordinate space (page 2
//! sits directly below page 1, and so on).

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use pdf_extract::{output_doc, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, warn};

use crate::errors::ParseError;
use crate::layout::fragment::PositionedFragment;
use crate::layout::reconstruct::LayoutReconstructor;

/// Horizontal gap, as a fraction of the rendered font size, that still
/// counts as the same run.
const RUN_GAP_RATIO: f64 = 0.3;

/// Trait for page-description decoders.
///
/// Implementors push every fragment of the document into `sink`; returning
/// `Ok(())` is the end-of-stream signal. On `Err` the sink is discarded.
pub trait PageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], sink: &mut LayoutReconstructor) -> Result<(), ParseError>;
}

/// Default decoder backed by pdf-extract / lopdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractDecoder;

impl PageDecoder for PdfExtractDecoder {
    fn decode(&self, bytes: &[u8], sink: &mut LayoutReconstructor) -> Result<(), ParseError> {
        let document = Document::load_mem(bytes)
            .map_err(|e| ParseError::DecodeFailure(format!("invalid PDF: {e}")))?;

        let tolerance = sink.tolerance();
        let mut collector = FragmentCollector::new(sink, tolerance);

        // pdf-extract panics on some malformed content streams.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            output_doc(&document, &mut collector)
        }));

        match outcome {
            Ok(Ok(())) => {
                collector.flush();
                debug!(
                    pages = collector.pages_seen,
                    fragments = collector.emitted,
                    "PDF fragments collected"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("PDF text extraction failed: {e:?}");
                Err(ParseError::DecodeFailure(format!(
                    "PDF text extraction failed: {e:?}"
                )))
            }
            Err(_) => {
                warn!("PDF decoder panicked");
                Err(ParseError::DecodeFailure(
                    "PDF content stream could not be decoded".to_string(),
                ))
            }
        }
    }
}

/// A run of glyphs being accumulated.
#[derive(Debug)]
struct Run {
    text: String,
    x: f64,
    y: f64,
    end_x: f64,
    size: f64,
}

struct FragmentCollector<'a> {
    sink: &'a mut LayoutReconstructor,
    tolerance: f64,
    /// Page bottom of the current page in its own coordinates.
    page_bottom: f64,
    /// Sum of heights of every page after the first, up to the current one.
    page_offset: f64,
    pages_seen: u32,
    emitted: usize,
    current: Option<Run>,
}

impl<'a> FragmentCollector<'a> {
    fn new(sink: &'a mut LayoutReconstructor, tolerance: f64) -> Self {
        Self {
            sink,
            tolerance,
            page_bottom: 0.0,
            page_offset: 0.0,
            pages_seen: 0,
            emitted: 0,
            current: None,
        }
    }

    fn start_page(&mut self, bottom: f64, top: f64) {
        self.flush();
        if self.pages_seen > 0 {
            self.page_offset += (top - bottom).abs();
        }
        self.page_bottom = bottom;
        self.pages_seen += 1;
    }

    /// `x`/`y` are page-local; `advance` and `size` are already scaled.
    fn push_glyph(&mut self, glyph: &str, x: f64, y: f64, advance: f64, size: f64) {
        if glyph.trim().is_empty() {
            self.flush();
            return;
        }

        let y = y - self.page_bottom - self.page_offset;

        if let Some(run) = self.current.as_mut() {
            let same_baseline = (run.y - y).abs() <= self.tolerance;
            let adjacent = (x - run.end_x).abs() <= run.size.max(size) * RUN_GAP_RATIO;
            if same_baseline && adjacent {
                run.text.push_str(glyph);
                run.end_x = x + advance;
                return;
            }
        }

        self.flush();
        self.current = Some(Run {
            text: glyph.to_string(),
            x,
            y,
            end_x: x + advance,
            size,
        });
    }

    fn flush(&mut self) {
        if let Some(run) = self.current.take() {
            self.sink
                .push(PositionedFragment::new(run.text, run.x, run.y));
            self.emitted += 1;
        }
    }
}

impl OutputDev for FragmentCollector<'_> {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.start_page(media_box.lly, media_box.ury);
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scale = match trm.m11.hypot(trm.m12) {
            s if s > 0.0 => s,
            _ => 1.0,
        };
        let advance = (width * font_size + spacing) * scale;
        self.push_glyph(char, trm.m31, trm.m32, advance, font_size * scale);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    // Runs may continue across show-text operators (kerned TJ arrays), so
    // word boundaries are decided geometrically in `push_glyph`.
    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a one-page PDF with Helvetica text at the given positions.
    fn build_pdf(lines: &[(&str, i64, i64)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = Vec::new();
        for (text, x, y) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn collect(glyphs: &[(&str, f64, f64)]) -> String {
        let mut sink = LayoutReconstructor::new(0.1);
        {
            let mut collector = FragmentCollector::new(&mut sink, 0.1);
            collector.start_page(0.0, 792.0);
            for (g, x, y) in glyphs {
                collector.push_glyph(g, *x, *y, 6.0, 12.0);
            }
            collector.flush();
        }
        sink.finish()
    }

    #[test]
    fn test_adjacent_glyphs_form_one_run() {
        let text = collect(&[("H", 0.0, 700.0), ("i", 6.0, 700.0), ("!", 12.0, 700.0)]);
        assert_eq!(text, "Hi!");
    }

    #[test]
    fn test_space_glyph_splits_runs() {
        let text = collect(&[
            ("J", 0.0, 700.0),
            ("o", 6.0, 700.0),
            (" ", 12.0, 700.0),
            ("D", 18.0, 700.0),
        ]);
        assert_eq!(text, "Jo D");
    }

    #[test]
    fn test_large_gap_splits_runs() {
        let text = collect(&[("A", 0.0, 700.0), ("B", 200.0, 700.0)]);
        assert_eq!(text, "A B");
    }

    #[test]
    fn test_pages_stack_top_to_bottom() {
        let mut sink = LayoutReconstructor::new(0.1);
        {
            let mut collector = FragmentCollector::new(&mut sink, 0.1);
            collector.start_page(0.0, 792.0);
            collector.push_glyph("1", 72.0, 100.0, 6.0, 12.0);
            collector.start_page(0.0, 792.0);
            collector.push_glyph("2", 72.0, 700.0, 6.0, 12.0);
            collector.flush();
        }
        assert_eq!(sink.finish(), "1\n2");
    }

    #[test]
    fn test_garbage_bytes_are_decode_failure() {
        let mut sink = LayoutReconstructor::new(0.1);
        let err = PdfExtractDecoder
            .decode(b"definitely not a pdf", &mut sink)
            .unwrap_err();
        assert!(matches!(err, ParseError::DecodeFailure(_)));
    }

    #[test]
    fn test_decodes_generated_pdf_in_reading_order() {
        let bytes = build_pdf(&[("Engineer", 72, 700), ("Jane Doe", 72, 720)]);
        let mut sink = LayoutReconstructor::new(0.1);
        PdfExtractDecoder.decode(&bytes, &mut sink).unwrap();
        assert_eq!(sink.finish(), "Jane Doe\nEngineer");
    }
}
