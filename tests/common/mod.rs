//! Synthetic archive builders shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use image::{ImageFormat, Rgb, RgbImage};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const NS: &str = "http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15";

/// Zip the given entries, in order.
pub fn build_zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A solid-colour PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 80, 120]));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Coords element for an axis-aligned rectangle.
pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> String {
    format!(
        r#"<Coords points="{x0},{y0} {x1},{y0} {x1},{y1} {x0},{y1}"/>"#
    )
}

/// A text line with a rectangle outline and a reading-order index.
pub fn line(id: &str, index: u32, y: i32, text: &str) -> String {
    format!(
        r#"<TextLine id="{id}" custom="readingOrder {{index:{index};}}">{coords}<Baseline points="10,{base} 90,{base}"/><TextEquiv><Unicode>{text}</Unicode></TextEquiv></TextLine>"#,
        coords = rect(10, y, 90, y + 8),
        base = y + 7,
    )
}

/// A region holding the given lines and its own transcription.
pub fn region(id: &str, coords: &str, lines: &[String], text: &str) -> String {
    format!(
        r#"<TextRegion id="{id}" type="paragraph">{coords}{lines}<TextEquiv><Unicode>{text}</Unicode></TextEquiv></TextRegion>"#,
        lines = lines.concat(),
    )
}

/// A PAGE document; `order` lists region ids in reading order.
pub fn page_xml(filename: &str, width: u32, height: u32, order: &[&str], regions: &[String]) -> String {
    let refs: String = order
        .iter()
        .enumerate()
        .map(|(i, id)| format!(r#"<RegionRefIndexed index="{i}" regionRef="{id}"/>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="{NS}"><Page imageFilename="{filename}" imageWidth="{width}" imageHeight="{height}"><ReadingOrder><OrderedGroup id="ro">{refs}</OrderedGroup></ReadingOrder>{regions}</Page></PcGts>"#,
        regions = regions.concat(),
    )
}

/// One project with a single 100x100 page: two regions in reversed document
/// order, three lines in the first, one line in the second.
pub fn sample_page() -> String {
    let first = region(
        "r1",
        &rect(5, 5, 95, 45),
        &[
            line("l3", 2, 30, "third"),
            line("l1", 0, 10, "first"),
            line("l2", 1, 20, "second"),
        ],
        "first\nsecond\nthird",
    );
    let second = region(
        "r2",
        &rect(5, 60, 95, 80),
        &[line("l4", 0, 65, "fourth")],
        "fourth",
    );
    page_xml("scan_001.png", 100, 100, &["r1", "r2"], &[second, first])
}

/// Archive with one project, one page and its image.
pub fn sample_archive() -> Vec<u8> {
    build_zip(&[
        ("proj/page/scan_001.xml", sample_page().into_bytes()),
        ("proj/scan_001.png", png(100, 100)),
    ])
}
