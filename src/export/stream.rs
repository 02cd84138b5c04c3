//! Lazy record stream over the pages of an archive.
//!
//! Records are produced page by page: the page image is decoded, cut into
//! records and dropped before the next page is touched, so at most one page
//! raster is alive at a time.
//!
//! # Example
//!
//! ```no_run
//! use unpage::export::{build_exporter, ExportMode, ExportOptions, RecordStream};
//! use unpage::parser::{ArchiveWalker, PageArchive};
//!
//! fn main() -> unpage::Result<()> {
//!     let mut archive = PageArchive::open("export_job.zip")?;
//!     let walk = ArchiveWalker::new().walk(&mut archive);
//!     let options = ExportOptions::default();
//!     let exporter = build_exporter(ExportMode::Line, &options);
//!
//!     let mut stream = RecordStream::new(exporter, &walk.pages, archive, &options);
//!     for record in stream.by_ref() {
//!         println!("{}", record.text());
//!     }
//!     println!("{}", stream.report());
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;

use crate::error::Error;
use crate::model::PageData;
use crate::parser::PageArchive;
use crate::report::ExportReport;

use super::options::ExportOptions;
use super::raster::load_page_image;
use super::record::{Record, Schema};
use super::{ExportMode, Exporter};

/// Iterator over the records of one export run.
pub struct RecordStream<'a> {
    exporter: Box<dyn Exporter>,
    pages: &'a [PageData],
    archive: PageArchive,
    next_page: usize,
    pending: VecDeque<Record>,
    report: ExportReport,
    finished: bool,
}

impl<'a> RecordStream<'a> {
    /// Create a stream exporting `pages`, with images read from `archive`.
    pub fn new(
        exporter: Box<dyn Exporter>,
        pages: &'a [PageData],
        archive: PageArchive,
        options: &ExportOptions,
    ) -> Self {
        Self {
            exporter,
            pages,
            archive,
            next_page: 0,
            pending: VecDeque::new(),
            report: ExportReport::new(options.failure_sample),
            finished: false,
        }
    }

    /// The export mode of this stream.
    pub fn mode(&self) -> ExportMode {
        self.exporter.mode()
    }

    /// Schema of the records this stream yields.
    pub fn schema(&self) -> Schema {
        self.exporter.schema()
    }

    /// Tallies so far; complete once the stream is exhausted.
    pub fn report(&self) -> &ExportReport {
        &self.report
    }

    /// Whether every page has been processed.
    pub fn is_done(&self) -> bool {
        self.finished
    }

    /// Drain the stream into memory.
    pub fn collect_output(mut self) -> ExportOutput {
        let records: Vec<Record> = self.by_ref().collect();
        ExportOutput {
            mode: self.exporter.mode(),
            schema: self.exporter.schema(),
            records,
            report: self.report,
        }
    }

    fn process_next_page(&mut self) -> bool {
        let pages = self.pages;
        let Some(page) = pages.get(self.next_page) else {
            return false;
        };
        self.next_page += 1;
        self.report.pages_attempted += 1;

        match load_page_image(&mut self.archive, page) {
            Ok(image) => {
                let records = self.exporter.page_records(page, &image, &mut self.report);
                self.pending.extend(records);
            }
            Err(Error::MissingImage(filename)) => {
                log::warn!("Image not found for {} in {}", filename, page.project_name);
                self.report.add_missing_image(&filename);
            }
            Err(e) => {
                log::warn!("Error loading image for {}: {}", page.image_filename, e);
                self.report
                    .add_image_failure(&page.image_filename, &e.to_string());
            }
        }
        true
    }
}

impl<'a> Iterator for RecordStream<'a> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                self.report.add_emitted();
                return Some(record);
            }
            if self.finished {
                return None;
            }
            if !self.process_next_page() {
                self.finished = true;
                log::info!(
                    "{} export: {} records from {} pages, {} skipped",
                    self.exporter.mode(),
                    self.report.emitted,
                    self.report.pages_attempted,
                    self.report.skipped()
                );
            }
        }
    }
}

/// Records of a finished export with its tallies.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Mode that produced the records
    pub mode: ExportMode,

    /// Record schema
    pub schema: Schema,

    /// Emitted records, in page then reading order
    pub records: Vec<Record>,

    /// What was emitted and skipped
    pub report: ExportReport,
}

impl ExportOutput {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
