//! Per-run tallies for the archive walk and for exports.
//!
//! Nothing scoped to a single document, page or record aborts a run; it is
//! counted here instead, with a bounded sample of messages for the summary.

use serde::{Deserialize, Serialize};

/// Number of failure messages kept by default.
pub const DEFAULT_FAILURE_SAMPLE: usize = 5;

/// Failure counter that keeps only the first few messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureLog {
    /// Total failures recorded
    pub total: usize,

    /// First `limit` messages
    pub sample: Vec<String>,

    /// Maximum sample length
    pub limit: usize,
}

impl FailureLog {
    /// Create an empty log keeping at most `limit` messages.
    pub fn new(limit: usize) -> Self {
        Self {
            total: 0,
            sample: Vec::new(),
            limit,
        }
    }

    /// Record one failure.
    pub fn record(&mut self, message: impl Into<String>) {
        self.total += 1;
        if self.sample.len() < self.limit {
            self.sample.push(message.into());
        }
    }

    /// Failures beyond the sample.
    pub fn omitted(&self) -> usize {
        self.total - self.sample.len()
    }

    /// Whether nothing failed.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }


    fn write_sample(&self, f: &mut std::fmt::Formatter<'_>, heading: &str) -> std::fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        writeln!(f, "  {}:", heading)?;
        for message in &self.sample {
            writeln!(f, "    {}", message)?;
        }
        if self.omitted() > 0 {
            writeln!(f, "    ... and {} more", self.omitted())?;
        }
        Ok(())
    }
}

impl Default for FailureLog {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_SAMPLE)
    }
}

/// Outcome counts of one archive walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkReport {
    /// Projects found in the archive
    pub project_count: usize,

    /// Candidate PAGE documents attempted
    pub candidates: usize,

    /// Documents parsed into pages
    pub parsed: usize,

    /// Entries that could not be read from the archive
    pub unreadable: usize,

    /// Entries no encoding could decode
    pub undecodable: usize,

    /// Malformed XML documents
    pub parse_failures: usize,

    /// Well-formed documents without a PAGE root
    pub not_a_page: usize,

    /// Sample of failure messages
    pub failures: FailureLog,
}

impl WalkReport {
    /// Create an empty report keeping `sample` failure messages.
    pub fn new(sample: usize) -> Self {
        Self {
            failures: FailureLog::new(sample),
            ..Default::default()
        }
    }

    /// Documents skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.unreadable + self.undecodable + self.parse_failures + self.not_a_page
    }
}

impl std::fmt::Display for WalkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Parsing Summary:")?;
        writeln!(f, "  Projects: {}", self.project_count)?;
        writeln!(f, "  Documents attempted: {}", self.candidates)?;
        writeln!(f, "  Pages parsed: {}", self.parsed)?;
        writeln!(
            f,
            "  Skipped: {} (unreadable {}, undecodable {}, malformed {}, not PAGE {})",
            self.skipped(),
            self.unreadable,
            self.undecodable,
            self.parse_failures,
            self.not_a_page
        )?;
        self.failures.write_sample(f, "Failed documents")
    }
}

/// Outcome counts of one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Pages offered to the exporter
    pub pages_attempted: usize,

    /// Records emitted
    pub emitted: usize,

    /// Pages whose image is not in the archive
    pub missing_images: usize,

    /// Pages whose image failed to decode
    pub image_decode_failures: usize,

    /// Regions, lines or windows skipped for degenerate geometry
    pub invalid_crops: usize,

    /// Sample of failure messages
    pub failures: FailureLog,
}

impl ExportReport {
    /// Create an empty report keeping `sample` failure messages.
    pub fn new(sample: usize) -> Self {
        Self {
            failures: FailureLog::new(sample),
            ..Default::default()
        }
    }

    /// Count one emitted record.
    pub fn add_emitted(&mut self) {
        self.emitted += 1;
    }

    /// Count a page with no image in the archive.
    pub fn add_missing_image(&mut self, filename: &str) {
        self.missing_images += 1;
        self.failures
            .record(format!("{}: image not found in archive", filename));
    }

    /// Count a page whose image failed to decode.
    pub fn add_image_failure(&mut self, path: &str, error: &str) {
        self.image_decode_failures += 1;
        self.failures.record(format!("{}: {}", path, error));
    }

    /// Count one record skipped for its geometry.
    pub fn add_invalid_crop(&mut self, what: String) {
        self.invalid_crops += 1;
        self.failures.record(what);
    }

    /// Items skipped for any reason.
    pub fn skipped(&self) -> usize {
        self.missing_images + self.image_decode_failures + self.invalid_crops
    }
}

impl std::fmt::Display for ExportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Processing Summary:")?;
        writeln!(f, "  Pages attempted: {}", self.pages_attempted)?;
        writeln!(f, "  Successfully processed: {}", self.emitted)?;
        writeln!(
            f,
            "  Skipped due to errors: {} (missing images {}, undecodable images {}, invalid crops {})",
            self.skipped(),
            self.missing_images,
            self.image_decode_failures,
            self.invalid_crops
        )?;
        self.failures.write_sample(f, "Failures")
    }
}
