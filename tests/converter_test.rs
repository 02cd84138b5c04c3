//! Integration tests for the converter facade and dataset persistence.

mod common;

use std::fs;

use common::*;
use unpage::convert::{Converter, DatasetHandle, LocalDatasetSink, SplitOptions};
use unpage::export::{ExportMode, ExportOptions, WindowConfig};
use unpage::Error;

fn two_page_archive() -> Vec<u8> {
    build_zip(&[
        ("alpha/page/1.xml", sample_page().into_bytes()),
        ("beta/page/1.xml", sample_page().into_bytes()),
        ("alpha/scan_001.png", png(100, 100)),
        ("beta/scan_001.png", png(100, 100)),
    ])
}

#[test]
fn test_stats() {
    let converter = Converter::from_bytes(two_page_archive());
    let stats = converter.stats().unwrap();

    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.total_regions, 4);
    assert_eq!(stats.total_lines, 8);
    assert_eq!(stats.projects, vec!["alpha", "beta"]);
    assert!((stats.avg_regions_per_page - 2.0).abs() < f64::EPSILON);
    assert!((stats.avg_lines_per_page - 4.0).abs() < f64::EPSILON);
}

#[test]
fn test_window_count_matches_export() {
    let converter = Converter::from_bytes(two_page_archive());
    for (size, overlap) in [(1, 0), (2, 0), (2, 1), (3, 1), (5, 4)] {
        let window = WindowConfig::new(size, overlap).unwrap();
        let options = ExportOptions::new().with_window(window);
        let output = converter.convert(ExportMode::Window, &options).unwrap();
        assert_eq!(converter.window_count(window).unwrap(), output.len());
    }
}

#[test]
fn test_pages_are_parsed_once() {
    let converter = Converter::from_bytes(two_page_archive());
    let first = converter.pages().unwrap().as_ptr();
    converter
        .convert(ExportMode::Text, &ExportOptions::default())
        .unwrap();
    let second = converter.pages().unwrap().as_ptr();
    assert_eq!(first, second);
    assert_eq!(converter.walk_report().unwrap().parsed, 2);
}

#[test]
fn test_convert_split() {
    let converter = Converter::from_bytes(two_page_archive());
    let split = converter
        .convert_split(
            ExportMode::Line,
            &ExportOptions::default(),
            &SplitOptions::new(0.75).with_shuffle(true),
        )
        .unwrap();
    assert_eq!(split.train.len(), 6);
    assert_eq!(split.test.len(), 2);
    assert_eq!(split.report.emitted, 8);

    let err = converter
        .convert_split(
            ExportMode::Line,
            &ExportOptions::default(),
            &SplitOptions::new(1.0),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSplit(_)));
}

#[test]
fn test_persist_local_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("dataset");

    let converter = Converter::from_bytes(two_page_archive());
    let dataset = converter
        .convert_into(
            &LocalDatasetSink::new(),
            ExportMode::Region,
            &ExportOptions::default(),
        )
        .unwrap();
    assert_eq!(dataset.len(), 4);
    dataset.persist(&out).unwrap();

    let jsonl = fs::read_to_string(out.join("records.jsonl")).unwrap();
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["image"], "images/000000.png");
    assert_eq!(rows[0]["region_id"], "r1");
    assert_eq!(rows[0]["project"], "alpha");
    assert!(out.join("images/000003.png").exists());

    let saved = image::open(out.join("images/000000.png")).unwrap();
    assert_eq!((saved.width(), saved.height()), (90, 40));

    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("dataset_info.json")).unwrap()).unwrap();
    assert_eq!(info["mode"], "region");
    assert_eq!(info["num_records"], 4);
    assert_eq!(info["schema"]["fields"][0]["kind"], "image");
    assert!(info["created_at"].is_string());
}

#[test]
fn test_missing_archive_file() {
    let converter = Converter::open("/nonexistent/archive.zip");
    let err = converter
        .convert(ExportMode::Text, &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
