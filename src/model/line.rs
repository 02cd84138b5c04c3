//! Line-level types.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// One transcribed text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Line id, unique within its region
    pub id: String,

    /// Transcription (may be empty)
    pub text: String,

    /// Outline polygon (empty when the source has no coordinates)
    pub coords: Vec<Point>,

    /// Baseline polyline, if the source has one
    pub baseline: Option<Vec<Point>>,

    /// Sort key from the line's `custom` attribute
    pub reading_order: u32,

    /// Id of the owning region
    pub region_id: String,
}

impl TextLine {
    /// Create a line with text and no geometry.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            coords: Vec::new(),
            baseline: None,
            reading_order: 0,
            region_id: String::new(),
        }
    }

    /// Set the outline polygon.
    pub fn with_coords(mut self, coords: Vec<Point>) -> Self {
        self.coords = coords;
        self
    }

    /// Set the baseline.
    pub fn with_baseline(mut self, baseline: Vec<Point>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Set the reading order.
    pub fn with_reading_order(mut self, order: u32) -> Self {
        self.reading_order = order;
        self
    }

    /// Set the owning region id.
    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = region_id.into();
        self
    }

    /// Whether the line has an outline to crop.
    pub fn has_geometry(&self) -> bool {
        !self.coords.is_empty()
    }
}
