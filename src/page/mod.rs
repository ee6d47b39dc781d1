//! Recognition data model — words, lines, and the page result.
//!
//! These are the value types every other module consumes. A `PageResult` is
//! produced once per request by the recognition gateway and discarded after
//! the derived outputs (text, overlay, table) exist.

use serde::Serialize;

/// Axis-aligned bounding box for a recognized word, in page pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    /// Always >= 0.
    pub width: i32,
    /// Always >= 0.
    pub height: i32,
}

impl BoundingBox {
    /// Vertical midpoint of the box — where the overlay anchors label text.
    pub fn mid_y(&self) -> i32 {
        self.y + self.height / 2
    }
}

/// A single recognized word with its location on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedWord {
    pub text: String,
    pub bbox: BoundingBox,
}

/// One line of recognized words, left-to-right reading order.
///
/// Word order is significant and preserved through every transformation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedLine {
    pub words: Vec<RecognizedWord>,
}

impl RecognizedLine {
    /// The line's text — words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The full page, lines in top-to-bottom reading order. Immutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    lines: Vec<RecognizedLine>,
}

impl PageResult {
    pub fn new(lines: Vec<RecognizedLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[RecognizedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Canonical text form: one line per recognized line, words space-joined,
    /// trailing newline after the last line. This is the exact byte format
    /// written to the durable artifact.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out
    }
}
