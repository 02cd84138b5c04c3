//! Region exporters.

use image::RgbImage;

use crate::model::{PageData, TextRegion};
use crate::report::ExportReport;

use super::raster::{crop_points, crop_polygon};
use super::record::{Record, RegionRecord};
use super::{skip_invalid, ExportMode, Exporter};

fn region_record(
    page: &PageData,
    region: &TextRegion,
    image: RgbImage,
    polygon: bool,
) -> Record {
    Record::Region(RegionRecord {
        image,
        text: region.full_text.clone(),
        region_type: region.region_type.clone(),
        region_id: region.id.clone(),
        reading_order: region.reading_order,
        filename: page.image_filename.clone(),
        project: page.project_name.clone(),
        coords: polygon.then(|| region.coords.clone()),
    })
}

/// One record per region, cropped to the region's bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionExporter;

impl Exporter for RegionExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::Region
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(page.regions.len());
        for region in &page.regions {
            match crop_points(image, &region.coords) {
                Ok(crop) => records.push(region_record(page, region, crop, false)),
                Err(e) => skip_invalid(report, page, "region", &region.id, &e),
            }
        }
        records
    }
}

/// One record per region, masked to the region polygon on a white
/// background.
#[derive(Debug, Clone, Copy)]
pub struct PolygonRegionExporter {
    padding: u32,
}

impl PolygonRegionExporter {
    /// Create an exporter padding each crop by `padding` pixels.
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }
}

impl Exporter for PolygonRegionExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::PolygonRegion
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(page.regions.len());
        for region in &page.regions {
            match crop_polygon(image, &region.coords, self.padding) {
                Ok(crop) => records.push(region_record(page, region, crop, true)),
                Err(e) => skip_invalid(report, page, "region", &region.id, &e),
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn page() -> PageData {
        let mut page = PageData::new("a.png", "proj");
        page.add_region(
            TextRegion::new("r1")
                .with_coords(rect(0, 0, 10, 5))
                .with_text("Kept")
                .with_reading_order(0),
        );
        page.add_region(
            TextRegion::new("r2")
                .with_coords(rect(100, 100, 120, 120))
                .with_reading_order(1),
        );
        page.add_region(TextRegion::new("r3").with_reading_order(2));
        page
    }

    #[test]
    fn test_degenerate_regions_skip_only_themselves() {
        let image = RgbImage::new(50, 50);
        let mut report = ExportReport::new(5);
        let records = RegionExporter.page_records(&page(), &image, &mut report);

        assert_eq!(records.len(), 1);
        assert_eq!(report.invalid_crops, 2);
        let Record::Region(record) = &records[0] else {
            panic!("expected region record");
        };
        assert_eq!(record.region_id, "r1");
        assert_eq!(record.text, "Kept");
        assert_eq!(record.image.dimensions(), (10, 5));
        assert!(record.coords.is_none());
    }

    #[test]
    fn test_polygon_region_carries_coords() {
        let image = RgbImage::new(50, 50);
        let mut report = ExportReport::new(5);
        let records = PolygonRegionExporter::new(5).page_records(&page(), &image, &mut report);

        assert_eq!(records.len(), 1);
        let Record::Region(record) = &records[0] else {
            panic!("expected region record");
        };
        assert_eq!(record.coords.as_deref(), Some(rect(0, 0, 10, 5).as_slice()));
        // Padding is clipped at the top-left image edge.
        assert_eq!(record.image.dimensions(), (15, 10));
    }
}
