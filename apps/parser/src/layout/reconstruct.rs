//! Reading-order reconstruction from unordered positioned fragments.
//!
//! # Algorithm
//! 1. Buffer every fragment until the decoder signals the end (`finish`).
//! 2. Sort by descending `y`, then ascending `x` (text breaks exact ties so the
//!    order is total and independent of arrival order).
//! 3. Walk the sorted fragments: a `y` step larger than the tolerance starts a
//!    new line. Each line is re-sorted by `x`.
//! 4. Join fragments with one space (unless the line already ends in
//!    whitespace), join lines with `\n`, trim the result.
//!
//! Optionally a vertical gap well above the median line gap becomes a blank
//! line, so downstream blank-line segmentation sees paragraphs.
//!
//! The whole document is held in memory at once. Inputs are bounded to a few
//! megabytes by the caller, so fragments are not streamed.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::{ParserConfig, DEFAULT_LINE_TOLERANCE};
use crate::layout::fragment::PositionedFragment;

/// Minimum number of lines before paragraph gaps are estimated.
const MIN_LINES_FOR_PARAGRAPHS: usize = 3;

/// Push-driven buffer: the decoder pushes fragments, then `finish` sorts and
/// renders them.
#[derive(Debug, Clone)]
pub struct LayoutReconstructor {
    tolerance: f64,
    paragraph_gap_ratio: Option<f64>,
    fragments: Vec<PositionedFragment>,
}

/// One reconstructed line: its band `y` (top-most fragment) and its text.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    y: f64,
    text: String,
}

impl Default for LayoutReconstructor {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_TOLERANCE)
    }
}

impl LayoutReconstructor {
    /// Plain line grouping: lines are joined with a single newline.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            paragraph_gap_ratio: None,
            fragments: Vec::new(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.line_tolerance).with_paragraph_gap_ratio(config.paragraph_gap_ratio)
    }

    /// Enables blank lines between paragraphs. `None` or a non-positive
    /// ratio disables it.
    pub fn with_paragraph_gap_ratio(mut self, ratio: Option<f64>) -> Self {
        self.paragraph_gap_ratio = ratio.filter(|r| *r > 0.0);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn push(&mut self, fragment: PositionedFragment) {
        self.fragments.push(fragment);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// End-of-stream signal. Consumes the buffer and returns the text.
    pub fn finish(mut self) -> String {
        if self.fragments.is_empty() {
            return String::new();
        }

        self.fragments.sort_by(reading_order);
        let lines = group_lines(std::mem::take(&mut self.fragments), self.tolerance);
        debug!(lines = lines.len(), "Layout lines grouped");

        let breaks = self
            .paragraph_gap_ratio
            .map(|ratio| paragraph_breaks(&lines, ratio))
            .unwrap_or_default();

        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                if breaks.contains(&i) {
                    out.push('\n');
                }
            }
            out.push_str(&line.text);
        }

        out.trim().to_string()
    }
}

/// Convenience wrapper for an already materialized fragment list.
pub fn reconstruct_text<I>(fragments: I, tolerance: f64) -> String
where
    I: IntoIterator<Item = PositionedFragment>,
{
    let mut reconstructor = LayoutReconstructor::new(tolerance);
    for fragment in fragments {
        reconstructor.push(fragment);
    }
    reconstructor.finish()
}

fn reading_order(a: &PositionedFragment, b: &PositionedFragment) -> Ordering {
    b.y.total_cmp(&a.y)
        .then_with(|| a.x.total_cmp(&b.x))
        .then_with(|| a.text.cmp(&b.text))
}

fn left_to_right(a: &PositionedFragment, b: &PositionedFragment) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.text.cmp(&b.text))
}

/// Splits y-sorted fragments into bands. A new band starts when the `y` step
/// from the previous fragment exceeds `tolerance`.
fn group_lines(sorted: Vec<PositionedFragment>, tolerance: f64) -> Vec<Line> {
    let mut bands: Vec<Vec<PositionedFragment>> = Vec::new();
    let mut prev_y: Option<f64> = None;

    for fragment in sorted {
        let same_line = prev_y.is_some_and(|py| (py - fragment.y).abs() <= tolerance);
        prev_y = Some(fragment.y);
        match bands.last_mut() {
            Some(band) if same_line => band.push(fragment),
            _ => bands.push(vec![fragment]),
        }
    }

    bands
        .into_iter()
        .map(|mut band| {
            let y = band.first().map(|f| f.y).unwrap_or_default();
            band.sort_by(left_to_right);
            Line {
                y,
                text: join_fragments(&band),
            }
        })
        .collect()
}

fn join_fragments(band: &[PositionedFragment]) -> String {
    let mut text = String::new();
    for fragment in band {
        if !text.is_empty() && !text.ends_with(char::is_whitespace) {
            text.push(' ');
        }
        text.push_str(&fragment.text);
    }
    text
}

/// Indices of lines that start a new paragraph: the gap above them exceeds
/// `ratio` times the (lower) median inter-line gap.
fn paragraph_breaks(lines: &[Line], ratio: f64) -> Vec<usize> {
    if lines.len() < MIN_LINES_FOR_PARAGRAPHS {
        return Vec::new();
    }

    let gaps: Vec<f64> = lines.windows(2).map(|w| w[0].y - w[1].y).collect();
    let mut sorted = gaps.clone();
    sorted.sort_by(f64::total_cmp);
    let median = sorted[(sorted.len() - 1) / 2];
    if !median.is_finite() || median <= 0.0 {
        return Vec::new();
    }

    let threshold = median * ratio;
    gaps.iter()
        .enumerate()
        .filter(|(_, gap)| **gap > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}
