//! Archive format detection and entry classification.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Magic of an empty archive (end of central directory only).
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";

/// Directory macOS adds when compressing folders.
const MACOS_METADATA_DIR: &str = "__MACOSX";
/// Prefix of AppleDouble resource-fork files.
const APPLE_DOUBLE_PREFIX: &str = "._";
/// Extension of transcription documents.
pub const PAGE_EXTENSION: &str = ".xml";
/// Directory that holds the PAGE documents of a project.
pub const PAGE_DIR: &str = "page";

/// Check the leading bytes for a ZIP signature.
///
/// # Example
/// ```
/// use unpage::detect::is_zip_bytes;
///
/// assert!(is_zip_bytes(b"PK\x03\x04\x14\x00"));
/// assert!(!is_zip_bytes(b"<PcGts/>"));
/// ```
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC)
}

/// Check whether a file starts with a ZIP signature.
///
/// # Errors
/// * `Error::Io` if the file cannot be read
/// * `Error::Other` if the file is not a ZIP archive
pub fn detect_zip_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    let read = reader.read(&mut header)?;
    if is_zip_bytes(&header[..read]) {
        Ok(())
    } else {
        Err(Error::Other(format!(
            "{} is not a ZIP archive",
            path.display()
        )))
    }
}

/// Decide whether an archive path is platform noise rather than content.
///
/// Noise is anything under `__MACOSX`, any AppleDouble `._name` file, and
/// any other dot-prefixed path component unless the path is an `.xml` file.
///
/// # Example
/// ```
/// use unpage::detect::is_container_noise;
///
/// assert!(is_container_noise("__MACOSX/page/foo.xml"));
/// assert!(is_container_noise("project/._page.xml"));
/// assert!(!is_container_noise("project/page/valid.xml"));
/// ```
pub fn is_container_noise(path: &str) -> bool {
    if path.contains(MACOS_METADATA_DIR) {
        return true;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name.starts_with(APPLE_DOUBLE_PREFIX) {
        return true;
    }

    let has_dot_segment = path.split('/').any(|segment| segment.starts_with('.'));
    has_dot_segment && !path.ends_with(PAGE_EXTENSION)
}

/// Project name of an entry: its first path segment.
///
/// Entries at the archive root belong to no project.
pub fn project_of(path: &str) -> Option<&str> {
    match path.split_once('/') {
        Some((project, _)) if !project.is_empty() => Some(project),
        _ => None,
    }
}

/// Whether an entry is a candidate PAGE document: an `.xml` file below a
/// directory named `page_dir`, and not container noise.
pub fn is_page_entry(path: &str, page_dir: &str) -> bool {
    if !path.ends_with(PAGE_EXTENSION) || is_container_noise(path) {
        return false;
    }
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();
    segments.iter().any(|segment| *segment == page_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_magic() {
        assert!(is_zip_bytes(b"PK\x03\x04rest"));
        assert!(is_zip_bytes(b"PK\x05\x06"));
        assert!(!is_zip_bytes(b"PK"));
        assert!(!is_zip_bytes(b""));
    }

    #[test]
    fn test_macos_metadata_filtering() {
        assert!(is_container_noise("__MACOSX/file.xml"));
        assert!(is_container_noise("__MACOSX/page/foo.xml"));
        assert!(is_container_noise("._file.xml"));
        assert!(is_container_noise("project/._page.xml"));
        assert!(is_container_noise("project/.DS_Store"));
        assert!(is_container_noise("project/.hidden/image.jpg"));
    }

    #[test]
    fn test_content_passes() {
        assert!(!is_container_noise("project/page/file.xml"));
        assert!(!is_container_noise("project/page/valid.xml"));
        assert!(!is_container_noise("normal_file.xml"));
        assert!(!is_container_noise("project/.cache/page/kept.xml"));
    }

    #[test]
    fn test_project_of() {
        assert_eq!(project_of("proj/page/a.xml"), Some("proj"));
        assert_eq!(project_of("proj/"), Some("proj"));
        assert_eq!(project_of("loose.xml"), None);
        assert_eq!(project_of("/abs.xml"), None);
    }

    #[test]
    fn test_page_entry() {
        assert!(is_page_entry("proj/page/a.xml", PAGE_DIR));
        assert!(is_page_entry("proj/doc1/page/a.xml", PAGE_DIR));
        assert!(!is_page_entry("proj/pages/a.xml", PAGE_DIR));
        assert!(!is_page_entry("proj/page/a.jpg", PAGE_DIR));
        assert!(!is_page_entry("proj/page.xml", PAGE_DIR));
        assert!(!is_page_entry("proj/page/._a.xml", PAGE_DIR));
        assert!(!is_page_entry("proj/metadata.xml", PAGE_DIR));
    }
}
