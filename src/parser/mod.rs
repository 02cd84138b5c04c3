//! PAGE-XML parsing module.

mod archive;
mod options;
mod page_xml;

pub use archive::{group_by_project, ArchiveWalker, PageArchive, Walk};
pub use options::ParseOptions;
pub use page_xml::{PageXmlParser, PAGE_NAMESPACE};
