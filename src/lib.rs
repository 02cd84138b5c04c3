//! # unpage
//!
//! Convert archives of PAGE-XML transcriptions into machine-learning
//! datasets.
//!
//! An archive holds one or more projects, each with PAGE documents under a
//! `page/` directory and the scanned page images next to them. The library
//! parses every document into a reading-ordered model of regions and lines,
//! then projects the corpus into records of one export mode: whole pages,
//! regions, lines, polygon-masked crops or sliding windows of lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unpage::{export_archive, ExportMode, ExportOptions};
//!
//! fn main() -> unpage::Result<()> {
//!     let output = export_archive("export_job.zip", ExportMode::Line, &ExportOptions::default())?;
//!     for record in &output.records {
//!         println!("{}: {}", record.filename(), record.text());
//!     }
//!     println!("{}", output.report);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Seven export modes**: raw XML, text, region, line, window, polygon region, polygon line
//! - **Reading order**: regions from the page's ordering table, lines from their `custom` attribute
//! - **Encoding recovery**: UTF-8, statistical detection, then legacy fallbacks
//! - **Error isolation**: bad documents, images or crops are counted and skipped
//! - **Streaming export**: one page image in memory at a time

pub mod convert;
pub mod detect;
pub mod encoding;
pub mod error;
pub mod export;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod report;

// Re-export commonly used types
pub use convert::{
    CorpusStats, Converter, Credentials, DatasetHandle, DatasetSink, LocalDatasetSink,
    SplitOptions, Visibility,
};
pub use encoding::DecodeOptions;
pub use error::{Error, Result};
pub use export::{
    build_exporter, ExportMode, ExportOptions, ExportOutput, Exporter, Record, RecordStream,
    Schema, WindowConfig,
};
pub use geometry::{BoundingBox, Point};
pub use model::{PageData, TextLine, TextRegion};
pub use parser::{ArchiveWalker, PageArchive, PageXmlParser, ParseOptions, Walk};
pub use report::{ExportReport, WalkReport};

use std::path::Path;

/// Parse every PAGE document of an archive.
///
/// # Example
///
/// ```no_run
/// use unpage::parse_archive;
///
/// let walk = parse_archive("export_job.zip").unwrap();
/// println!("Pages: {}", walk.pages.len());
/// println!("{}", walk.report);
/// ```
pub fn parse_archive<P: AsRef<Path>>(path: P) -> Result<Walk> {
    parse_archive_with_options(path, ParseOptions::default())
}

/// Parse an archive with custom options.
///
/// # Example
///
/// ```no_run
/// use unpage::{parse_archive_with_options, DecodeOptions, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_page_dir("page")
///     .with_decode(DecodeOptions::new().with_detection(false));
/// let walk = parse_archive_with_options("export_job.zip", options).unwrap();
/// ```
pub fn parse_archive_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Walk> {
    let mut archive = PageArchive::open(path)?;
    Ok(ArchiveWalker::with_options(options).walk(&mut archive))
}

/// Parse an archive held in memory.
///
/// # Example
///
/// ```no_run
/// use unpage::parse_archive_bytes;
///
/// let data = std::fs::read("export_job.zip").unwrap();
/// let walk = parse_archive_bytes(data).unwrap();
/// ```
pub fn parse_archive_bytes(data: impl Into<std::sync::Arc<[u8]>>) -> Result<Walk> {
    let mut archive = PageArchive::from_bytes(data)?;
    Ok(ArchiveWalker::new().walk(&mut archive))
}

/// Corpus statistics of an archive.
///
/// # Example
///
/// ```no_run
/// use unpage::archive_stats;
///
/// let stats = archive_stats("export_job.zip").unwrap();
/// println!("{}", stats);
/// ```
pub fn archive_stats<P: AsRef<Path>>(path: P) -> Result<CorpusStats> {
    Converter::open(path).stats()
}

/// Parse an archive and export it in one mode.
///
/// # Example
///
/// ```no_run
/// use unpage::{export_archive, ExportMode, ExportOptions, WindowConfig};
///
/// let options = ExportOptions::new().with_window(WindowConfig::new(3, 1).unwrap());
/// let output = export_archive("export_job.zip", ExportMode::Window, &options).unwrap();
/// println!("{} windows", output.len());
/// ```
pub fn export_archive<P: AsRef<Path>>(
    path: P,
    mode: ExportMode,
    options: &ExportOptions,
) -> Result<ExportOutput> {
    Converter::open(path).convert(mode, options)
}

/// Export an archive held in memory.
pub fn export_archive_bytes(
    data: impl Into<std::sync::Arc<[u8]>>,
    mode: ExportMode,
    options: &ExportOptions,
) -> Result<ExportOutput> {
    Converter::from_bytes(data).convert(mode, options)
}
