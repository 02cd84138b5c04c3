//! Region-level types.

use super::TextLine;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Region type used when the source omits one.
pub const DEFAULT_REGION_TYPE: &str = "paragraph";

/// A text region: a block of lines with its own transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Region id, unique within its page
    pub id: String,

    /// Semantic type tag, e.g. "paragraph" or "heading"
    #[serde(rename = "type")]
    pub region_type: String,

    /// Outline polygon (empty when the source has no coordinates)
    pub coords: Vec<Point>,

    /// Lines in reading order
    pub text_lines: Vec<TextLine>,

    /// Sort key from the page's reading-order table
    pub reading_order: u32,

    /// The region's own transcription.
    ///
    /// Read from the region's TextEquiv, not assembled from its lines; the
    /// two can disagree and both are kept.
    pub full_text: String,
}

impl TextRegion {
    /// Create an empty paragraph region.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region_type: DEFAULT_REGION_TYPE.to_string(),
            coords: Vec::new(),
            text_lines: Vec::new(),
            reading_order: 0,
            full_text: String::new(),
        }
    }

    /// Set the region type.
    pub fn with_type(mut self, region_type: impl Into<String>) -> Self {
        self.region_type = region_type.into();
        self
    }

    /// Set the outline polygon.
    pub fn with_coords(mut self, coords: Vec<Point>) -> Self {
        self.coords = coords;
        self
    }

    /// Set the region transcription.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.full_text = text.into();
        self
    }

    /// Set the reading order.
    pub fn with_reading_order(mut self, order: u32) -> Self {
        self.reading_order = order;
        self
    }

    /// Append a line, taking ownership of it for this region.
    pub fn add_line(&mut self, line: TextLine) {
        self.text_lines.push(line.with_region(self.id.clone()));
    }

    /// Number of lines in the region.
    pub fn line_count(&self) -> usize {
        self.text_lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_defaults() {
        let region = TextRegion::new("r1");
        assert_eq!(region.region_type, "paragraph");
        assert_eq!(region.reading_order, 0);
        assert!(region.coords.is_empty());
    }

    #[test]
    fn test_add_line_sets_back_reference() {
        let mut region = TextRegion::new("r1");
        region.add_line(TextLine::new("l1", "first"));
        assert_eq!(region.text_lines[0].region_id, "r1");
    }

    #[test]
    fn test_region_text_is_independent_of_lines() {
        let mut region = TextRegion::new("r1").with_text("corrected text");
        region.add_line(TextLine::new("l1", "raw"));
        region.add_line(TextLine::new("l2", "lines"));
        assert_eq!(region.full_text, "corrected text");
        assert_eq!(region.text_lines[1].text, "lines");
    }
}
