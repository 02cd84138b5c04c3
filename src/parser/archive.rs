//! ZIP archive access and the archive walk.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use zip::ZipArchive;

use crate::detect::{is_page_entry, project_of};
use crate::encoding::decode_entry;
use crate::error::{Error, Result};
use crate::model::PageData;
use crate::report::WalkReport;

use super::options::ParseOptions;
use super::page_xml::PageXmlParser;

/// Byte source behind a [`PageArchive`].
enum ArchiveReader {
    File(BufReader<File>),
    Memory(Cursor<Arc<[u8]>>),
}

impl Read for ArchiveReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            ArchiveReader::File(r) => r.read(buf),
            ArchiveReader::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for ArchiveReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            ArchiveReader::File(r) => r.seek(pos),
            ArchiveReader::Memory(r) => r.seek(pos),
        }
    }
}

/// An open transcription archive.
///
/// Entry names are read once at open time and kept in central-directory
/// order. The handle is released when dropped.
pub struct PageArchive {
    zip: ZipArchive<ArchiveReader>,
    names: Vec<String>,
    lookup: HashSet<String>,
}

impl PageArchive {
    /// Open an archive file.
    ///
    /// # Errors
    /// * `Error::Io` if the file cannot be opened
    /// * `Error::Archive` if it is not a readable ZIP container
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(ArchiveReader::File(BufReader::new(file)))
    }

    /// Open an archive held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::from_reader(ArchiveReader::Memory(Cursor::new(data.into())))
    }

    fn from_reader(reader: ArchiveReader) -> Result<Self> {
        let mut zip = ZipArchive::new(reader)?;
        let mut names = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            names.push(zip.by_index_raw(i)?.name().to_string());
        }
        let lookup = names.iter().cloned().collect();
        Ok(Self { zip, names, lookup })
    }

    /// All entry names in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// Whether an entry with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Read one entry fully into memory.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self.zip.by_name(name)?;
        let mut data = Vec::with_capacity(entry.size().min(64 * 1024 * 1024) as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Group entry names by their top-level directory, keeping first-seen order
/// for projects and archive order within each project.
pub fn group_by_project(names: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        let Some(project) = project_of(name) else {
            continue;
        };
        let slot = *index.entry(project.to_string()).or_insert_with(|| {
            groups.push((project.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(name.clone());
    }
    groups
}

/// Result of walking one archive.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    /// Successfully parsed pages, in archive order
    pub pages: Vec<PageData>,

    /// What was attempted and skipped
    pub report: WalkReport,
}

/// Drives the PAGE parser over every candidate document of an archive.
///
/// # Example
///
/// ```no_run
/// use unpage::parser::{ArchiveWalker, PageArchive};
///
/// let mut archive = PageArchive::open("export_job.zip")?;
/// let walk = ArchiveWalker::new().walk(&mut archive);
/// println!("{} pages", walk.pages.len());
/// # Ok::<(), unpage::Error>(())
/// ```
pub struct ArchiveWalker {
    parser: PageXmlParser,
    options: ParseOptions,
}

impl ArchiveWalker {
    /// Create a walker with default options.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a walker with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            parser: PageXmlParser::new(),
            options,
        }
    }

    /// Walk every project and parse every candidate document.
    ///
    /// Per-document failures are logged, counted and skipped; the walk
    /// itself never fails once the archive is open.
    pub fn walk(&self, archive: &mut PageArchive) -> Walk {
        let mut walk = Walk {
            pages: Vec::new(),
            report: WalkReport::new(self.options.failure_sample),
        };

        let projects = group_by_project(archive.entry_names());
        walk.report.project_count = projects.len();

        for (project, entries) in &projects {
            for entry in entries
                .iter()
                .filter(|e| is_page_entry(e, &self.options.page_dir))
            {
                walk.report.candidates += 1;
                match self.parse_entry(archive, entry, project) {
                    Ok(page) => {
                        walk.report.parsed += 1;
                        walk.pages.push(page);
                    }
                    Err(e) => self.record_failure(&mut walk.report, entry, e),
                }
            }
        }

        log::info!(
            "Parsed {} pages from {} documents in {} projects",
            walk.report.parsed,
            walk.report.candidates,
            walk.report.project_count
        );
        walk
    }

    fn parse_entry(
        &self,
        archive: &mut PageArchive,
        entry: &str,
        project: &str,
    ) -> Result<PageData> {
        let bytes = archive.read_entry(entry)?;
        let (xml, decoded_with) = decode_entry(entry, &bytes, &self.options.decode)?;
        log::debug!("{}: decoded as {}", entry, decoded_with);
        self.parser.parse(&xml, project)
    }

    fn record_failure(&self, report: &mut WalkReport, entry: &str, error: Error) {
        match error {
            Error::NotAPage => {
                log::debug!("{}: no PAGE root, skipping", entry);
                report.not_a_page += 1;
                return;
            }
            Error::Undecodable(_) => report.undecodable += 1,
            Error::XmlParse(_) => report.parse_failures += 1,
            _ => report.unreadable += 1,
        }
        log::warn!("Error parsing {}: {}", entry, error);
        report.failures.record(format!("{}: {}", entry, error));
    }
}

impl Default for ArchiveWalker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_by_project_keeps_order() {
        let entries = names(&[
            "b/page/1.xml",
            "a/page/1.xml",
            "root.xml",
            "b/page/2.xml",
            "a/image.jpg",
        ]);
        let groups = group_by_project(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "b");
        assert_eq!(groups[0].1, names(&["b/page/1.xml", "b/page/2.xml"]));
        assert_eq!(groups[1].0, "a");
        assert_eq!(groups[1].1, names(&["a/page/1.xml", "a/image.jpg"]));
    }

    #[test]
    fn test_not_a_zip_is_fatal() {
        let result = PageArchive::from_bytes(b"definitely not a zip".to_vec());
        assert!(matches!(result, Err(Error::Archive(_))));
    }
}
