use serde::{Deserialize, Serialize};

/// One run of characters at a document-space coordinate.
///
/// `y` grows upward (bottom-left origin), so the top of the page has the
/// largest `y`. Multi-page documents are stacked into one coordinate space by
/// the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}
