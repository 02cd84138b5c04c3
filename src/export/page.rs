//! Whole-page exporters.

use image::RgbImage;

use crate::model::PageData;
use crate::report::ExportReport;

use super::record::{RawXmlRecord, Record, TextRecord};
use super::{ExportMode, Exporter};

/// One record per page: the full image and the verbatim document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawXmlExporter;

impl Exporter for RawXmlExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::RawXml
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        _report: &mut ExportReport,
    ) -> Vec<Record> {
        vec![Record::RawXml(RawXmlRecord {
            image: image.clone(),
            xml: page.xml_content.clone(),
            filename: page.image_filename.clone(),
            project: page.project_name.clone(),
        })]
    }
}

/// One record per page: the full image and the region texts joined in
/// reading order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::Text
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        _report: &mut ExportReport,
    ) -> Vec<Record> {
        vec![Record::Text(TextRecord {
            image: image.clone(),
            text: page.plain_text(),
            filename: page.image_filename.clone(),
            project: page.project_name.clone(),
        })]
    }
}
