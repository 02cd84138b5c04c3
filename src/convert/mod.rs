//! Converter facade: one archive, parsed once, exported in any mode.
//!
//! # Example
//!
//! ```no_run
//! use unpage::convert::{Converter, DatasetHandle, LocalDatasetSink};
//! use unpage::export::{ExportMode, ExportOptions};
//! use std::path::Path;
//!
//! fn main() -> unpage::Result<()> {
//!     let converter = Converter::open("export_job.zip");
//!     println!("{}", converter.stats()?);
//!
//!     let dataset = converter.convert_into(
//!         &LocalDatasetSink::new(),
//!         ExportMode::Line,
//!         &ExportOptions::default(),
//!     )?;
//!     dataset.persist(Path::new("./unpage_dataset_line"))?;
//!     Ok(())
//! }
//! ```

mod sink;
mod split;
mod stats;

pub use sink::{
    Credentials, DatasetHandle, DatasetSink, LocalDataset, LocalDatasetSink, Visibility,
    TOKEN_ENV,
};
pub use split::{split_records, SplitOptions, SplitOutput, DEFAULT_SPLIT_SEED};
pub use stats::CorpusStats;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::export::{
    build_exporter, window_count, ExportMode, ExportOptions, ExportOutput, RecordStream,
    WindowConfig,
};
use crate::model::PageData;
use crate::parser::{ArchiveWalker, PageArchive, ParseOptions, Walk};
use crate::report::WalkReport;

/// Where the archive bytes come from.
#[derive(Debug, Clone)]
enum ArchiveSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl ArchiveSource {
    fn open(&self) -> Result<PageArchive> {
        match self {
            ArchiveSource::Path(path) => PageArchive::open(path),
            ArchiveSource::Memory(data) => PageArchive::from_bytes(Arc::clone(data)),
        }
    }
}

/// Entry point for converting one transcription archive.
///
/// The archive is parsed on first use and the pages are cached for the
/// lifetime of the converter. Every export re-opens the archive to read
/// page images.
pub struct Converter {
    source: ArchiveSource,
    options: ParseOptions,
    walk: OnceCell<Walk>,
}

impl Converter {
    /// Converter for an archive on disk. Nothing is read until first use.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_source(ArchiveSource::Path(path.as_ref().to_path_buf()))
    }

    /// Converter for an archive held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self::with_source(ArchiveSource::Memory(data.into()))
    }

    fn with_source(source: ArchiveSource) -> Self {
        Self {
            source,
            options: ParseOptions::default(),
            walk: OnceCell::new(),
        }
    }

    /// Set parse options. Must be called before the first parse.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self.walk = OnceCell::new();
        self
    }

    /// Parse the archive, or return the cached result.
    ///
    /// # Errors
    /// * `Error::Archive` / `Error::Io` if the archive cannot be opened
    pub fn parse(&self) -> Result<&Walk> {
        if let Some(walk) = self.walk.get() {
            return Ok(walk);
        }
        let mut archive = self.source.open()?;
        let walk = ArchiveWalker::with_options(self.options.clone()).walk(&mut archive);
        Ok(self.walk.get_or_init(|| walk))
    }

    /// Parsed pages in archive order.
    pub fn pages(&self) -> Result<&[PageData]> {
        Ok(&self.parse()?.pages)
    }

    /// Tallies of the archive walk.
    pub fn walk_report(&self) -> Result<&WalkReport> {
        Ok(&self.parse()?.report)
    }

    /// Page, region and line counts of the corpus.
    pub fn stats(&self) -> Result<CorpusStats> {
        Ok(CorpusStats::from_pages(self.pages()?))
    }

    /// Windows a window export would cut from the corpus, before image and
    /// geometry checks.
    pub fn window_count(&self, config: WindowConfig) -> Result<usize> {
        Ok(self
            .pages()?
            .iter()
            .flat_map(|page| &page.regions)
            .map(|region| window_count(region.text_lines.len(), config))
            .sum())
    }

    /// Lazily export the corpus, one page image in memory at a time.
    pub fn stream(&self, mode: ExportMode, options: &ExportOptions) -> Result<RecordStream<'_>> {
        let pages = self.pages()?;
        let archive = self.source.open()?;
        match mode {
            ExportMode::Window => log::info!(
                "Converting to {} format (window_size={}, overlap={})",
                mode,
                options.window.size(),
                options.window.overlap()
            ),
            _ => log::info!("Converting to {} format", mode),
        }
        Ok(RecordStream::new(
            build_exporter(mode, options),
            pages,
            archive,
            options,
        ))
    }

    /// Export the corpus into memory.
    pub fn convert(&self, mode: ExportMode, options: &ExportOptions) -> Result<ExportOutput> {
        Ok(self.stream(mode, options)?.collect_output())
    }

    /// Export the corpus and split the records into train and test.
    pub fn convert_split(
        &self,
        mode: ExportMode,
        options: &ExportOptions,
        split: &SplitOptions,
    ) -> Result<SplitOutput> {
        SplitOutput::from_output(self.convert(mode, options)?, split)
    }

    /// Export the corpus and hand the records to a sink.
    pub fn convert_into<S: DatasetSink>(
        &self,
        sink: &S,
        mode: ExportMode,
        options: &ExportOptions,
    ) -> Result<S::Handle> {
        sink.accept(self.convert(mode, options)?)
    }
}

/// Default output directory for a mode: `./unpage_dataset_{mode}`, with a
/// `_w{size}_o{overlap}` suffix in window mode.
pub fn default_output_dir(mode: ExportMode, window: WindowConfig) -> PathBuf {
    let mut name = format!("unpage_dataset_{}", mode);
    if mode == ExportMode::Window {
        name.push_str(&format!("_w{}_o{}", window.size(), window.overlap()));
    }
    PathBuf::from(".").join(name)
}
