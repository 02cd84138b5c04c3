//! Page-level types.

use super::TextRegion;
use serde::{Deserialize, Serialize};

/// A single parsed PAGE document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Filename of the page image, as written in the document
    pub image_filename: String,

    /// Image width in pixels (0 if missing)
    pub image_width: u32,

    /// Image height in pixels (0 if missing)
    pub image_height: u32,

    /// Regions in reading order
    pub regions: Vec<TextRegion>,

    /// The decoded document, verbatim
    pub xml_content: String,

    /// Top-level archive directory the document came from
    pub project_name: String,
}

impl PageData {
    /// Create a new page with no regions.
    pub fn new(image_filename: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            image_filename: image_filename.into(),
            image_width: 0,
            image_height: 0,
            regions: Vec::new(),
            xml_content: String::new(),
            project_name: project_name.into(),
        }
    }

    /// Set the image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Add a region to the page.
    pub fn add_region(&mut self, region: TextRegion) {
        self.regions.push(region);
    }

    /// Region transcriptions joined by newlines, skipping empty ones.
    pub fn plain_text(&self) -> String {
        self.regions
            .iter()
            .filter(|r| !r.full_text.is_empty())
            .map(|r| r.full_text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of regions on the page.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of lines across all regions.
    pub fn line_count(&self) -> usize {
        self.regions.iter().map(TextRegion::line_count).sum()
    }

    /// Whether the page has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
