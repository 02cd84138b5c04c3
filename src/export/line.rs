//! Line exporters.

use image::RgbImage;

use crate::model::{PageData, TextLine, TextRegion};
use crate::report::ExportReport;

use super::raster::{crop_points, crop_polygon};
use super::record::{LineRecord, Record};
use super::{skip_invalid, ExportMode, Exporter};

fn line_record(
    page: &PageData,
    region: &TextRegion,
    line: &TextLine,
    image: RgbImage,
    polygon: bool,
) -> Record {
    Record::Line(LineRecord {
        image,
        text: line.text.clone(),
        line_id: line.id.clone(),
        line_reading_order: line.reading_order,
        region_id: region.id.clone(),
        region_reading_order: region.reading_order,
        region_type: region.region_type.clone(),
        filename: page.image_filename.clone(),
        project: page.project_name.clone(),
        coords: polygon.then(|| line.coords.clone()),
        baseline: polygon.then(|| line.baseline.clone()),
    })
}

/// One record per line, cropped to the line's bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineExporter;

impl Exporter for LineExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::Line
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(page.line_count());
        for region in &page.regions {
            for line in &region.text_lines {
                match crop_points(image, &line.coords) {
                    Ok(crop) => records.push(line_record(page, region, line, crop, false)),
                    Err(e) => skip_invalid(report, page, "line", &line.id, &e),
                }
            }
        }
        records
    }
}

/// One record per line, masked to the line polygon on a white background,
/// with the raw polygon and baseline attached.
#[derive(Debug, Clone, Copy)]
pub struct PolygonLineExporter {
    padding: u32,
}

impl PolygonLineExporter {
    /// Create an exporter padding each crop by `padding` pixels.
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }
}

impl Exporter for PolygonLineExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::PolygonLine
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(page.line_count());
        for region in &page.regions {
            for line in &region.text_lines {
                match crop_polygon(image, &line.coords, self.padding) {
                    Ok(crop) => records.push(line_record(page, region, line, crop, true)),
                    Err(e) => skip_invalid(report, page, "line", &line.id, &e),
                }
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn page() -> PageData {
        let mut region = TextRegion::new("r1")
            .with_type("heading")
            .with_reading_order(3);
        region.add_line(
            TextLine::new("l1", "Line one")
                .with_coords(vec![
                    Point::new(0, 0),
                    Point::new(20, 0),
                    Point::new(20, 8),
                    Point::new(0, 8),
                ])
                .with_baseline(vec![Point::new(0, 7), Point::new(20, 7)]),
        );
        region.add_line(TextLine::new("l2", "No geometry").with_reading_order(1));

        let mut page = PageData::new("a.png", "proj");
        page.add_region(region);
        page
    }

    #[test]
    fn test_line_records_carry_region_context() {
        let mut report = ExportReport::new(5);
        let records = LineExporter.page_records(&page(), &RgbImage::new(40, 40), &mut report);

        assert_eq!(records.len(), 1);
        assert_eq!(report.invalid_crops, 1);
        let Record::Line(record) = &records[0] else {
            panic!("expected line record");
        };
        assert_eq!(record.text, "Line one");
        assert_eq!(record.region_id, "r1");
        assert_eq!(record.region_type, "heading");
        assert_eq!(record.region_reading_order, 3);
        assert_eq!(record.image.dimensions(), (20, 8));
        assert!(record.baseline.is_none());
    }

    #[test]
    fn test_polygon_line_has_baseline() {
        let mut report = ExportReport::new(5);
        let records =
            PolygonLineExporter::new(0).page_records(&page(), &RgbImage::new(40, 40), &mut report);

        let Record::Line(record) = &records[0] else {
            panic!("expected line record");
        };
        assert_eq!(record.coords.as_ref().map(Vec::len), Some(4));
        assert_eq!(
            record.baseline,
            Some(Some(vec![Point::new(0, 7), Point::new(20, 7)]))
        );
        assert!(report.failures.sample[0].contains("line l2"));
    }
}
