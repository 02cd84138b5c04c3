//! Integration tests for the archive walk.

mod common;

use common::*;
use unpage::encoding::DecodeOptions;
use unpage::parser::{ArchiveWalker, PageArchive, ParseOptions};
use unpage::{parse_archive_bytes, Error};

#[test]
fn test_walk_sample_archive() {
    let walk = parse_archive_bytes(sample_archive()).unwrap();

    assert_eq!(walk.pages.len(), 1);
    assert_eq!(walk.report.project_count, 1);
    assert_eq!(walk.report.candidates, 1);
    assert_eq!(walk.report.skipped(), 0);

    let page = &walk.pages[0];
    assert_eq!(page.project_name, "proj");
    assert_eq!(page.image_filename, "scan_001.png");
    assert_eq!((page.image_width, page.image_height), (100, 100));

    let regions: Vec<_> = page.regions.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(regions, vec!["r1", "r2"]);
    let lines: Vec<_> = page.regions[0]
        .text_lines
        .iter()
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(lines, vec!["first", "second", "third"]);
}

#[test]
fn test_noise_and_non_page_entries_are_ignored() {
    let data = build_zip(&[
        ("proj/page/a.xml", sample_page().into_bytes()),
        ("__MACOSX/proj/page/._a.xml", b"\x00\x05\x16\x07".to_vec()),
        ("proj/page/._a.xml", b"\x00\x05\x16\x07".to_vec()),
        ("proj/metadata.xml", b"<trpDoc/>".to_vec()),
        ("proj/page/notes.txt", b"hello".to_vec()),
        ("loose.xml", sample_page().into_bytes()),
    ]);
    let walk = parse_archive_bytes(data).unwrap();

    assert_eq!(walk.report.candidates, 1);
    assert_eq!(walk.pages.len(), 1);
}

#[test]
fn test_bad_documents_are_isolated() {
    let wrong_ns = sample_page().replace("2013-07-15", "2019-07-15");
    let data = build_zip(&[
        ("a/page/1.xml", sample_page().into_bytes()),
        ("a/page/2.xml", b"<PcGts><Page>".to_vec()),
        ("a/page/3.xml", wrong_ns.into_bytes()),
        ("b/page/1.xml", sample_page().into_bytes()),
    ]);
    let walk = parse_archive_bytes(data).unwrap();

    assert_eq!(walk.report.project_count, 2);
    assert_eq!(walk.report.candidates, 4);
    assert_eq!(walk.pages.len(), 2);
    assert_eq!(walk.report.parse_failures, 1);
    assert_eq!(walk.report.not_a_page, 1);
    // Only the malformed document is sampled; NOT_A_PAGE is silent.
    assert_eq!(walk.report.failures.total, 1);
    assert!(walk.report.failures.sample[0].starts_with("a/page/2.xml"));

    let projects: Vec<_> = walk.pages.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(projects, vec!["a", "b"]);
}

#[test]
fn test_legacy_encoding_is_decoded() {
    let xml = page_xml(
        "a.png",
        10,
        10,
        &["r"],
        &[region("r", &rect(0, 0, 5, 5), &[], "Caf\u{e9}")],
    );
    let bytes: Vec<u8> = xml.chars().map(|c| c as u32 as u8).collect();
    assert!(std::str::from_utf8(&bytes).is_err());

    let walk = parse_archive_bytes(build_zip(&[("p/page/a.xml", bytes)])).unwrap();
    assert_eq!(walk.pages.len(), 1);
    assert_eq!(walk.pages[0].regions[0].full_text, "Caf\u{e9}");
}

#[test]
fn test_undecodable_entry_is_skipped() {
    let mut bad = sample_page().into_bytes();
    bad.extend_from_slice(b"<!-- \xff\xfe -->");
    let data = build_zip(&[
        ("p/page/bad.xml", bad),
        ("p/page/good.xml", sample_page().into_bytes()),
    ]);

    let options = ParseOptions::new().with_decode(
        DecodeOptions::new()
            .with_detection(false)
            .with_fallbacks(Vec::<String>::new()),
    );
    let mut archive = PageArchive::from_bytes(data).unwrap();
    let walk = ArchiveWalker::with_options(options).walk(&mut archive);

    assert_eq!(walk.report.undecodable, 1);
    assert_eq!(walk.pages.len(), 1);
}

#[test]
fn test_custom_page_dir() {
    let data = build_zip(&[("p/xml/a.xml", sample_page().into_bytes())]);

    let mut archive = PageArchive::from_bytes(data.clone()).unwrap();
    assert!(ArchiveWalker::new().walk(&mut archive).pages.is_empty());

    let mut archive = PageArchive::from_bytes(data).unwrap();
    let walk = ArchiveWalker::with_options(ParseOptions::new().with_page_dir("xml"))
        .walk(&mut archive);
    assert_eq!(walk.pages.len(), 1);
}

#[test]
fn test_unreadable_archive() {
    let result = parse_archive_bytes(b"PK\x03\x04 truncated".to_vec());
    assert!(matches!(result, Err(Error::Archive(_))));
}

#[test]
fn test_archive_entry_listing() {
    let archive = PageArchive::from_bytes(sample_archive()).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.contains("proj/scan_001.png"));
    assert!(!archive.contains("scan_001.png"));
    assert_eq!(archive.entry_names()[0], "proj/page/scan_001.xml");
}
