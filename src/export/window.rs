//! Sliding windows of consecutive lines within a region.

use image::RgbImage;

use crate::geometry::{union_bounding_box, Point};
use crate::model::{PageData, TextLine, TextRegion};
use crate::report::ExportReport;

use super::options::WindowConfig;
use super::raster::crop_bbox;
use super::record::{Record, WindowRecord};
use super::{skip_invalid, ExportMode, Exporter};

/// Split lines into windows starting at `0, step, 2*step, ...` while the
/// start is inside the slice. The last windows may be shorter than the
/// configured size.
///
/// # Example
/// ```
/// use unpage::export::{create_windows, WindowConfig};
/// use unpage::model::TextLine;
///
/// let lines: Vec<TextLine> = (0..5).map(|i| TextLine::new(i.to_string(), "")).collect();
/// let windows = create_windows(&lines, WindowConfig::new(3, 1).unwrap());
/// let lengths: Vec<usize> = windows.iter().map(|w| w.len()).collect();
/// assert_eq!(lengths, vec![3, 3, 1]);
/// ```
pub fn create_windows(lines: &[TextLine], config: WindowConfig) -> Vec<&[TextLine]> {
    (0..lines.len())
        .step_by(config.step())
        .map(|start| &lines[start..(start + config.size()).min(lines.len())])
        .collect()
}

/// Number of windows [`create_windows`] yields for `line_count` lines.
pub fn window_count(line_count: usize, config: WindowConfig) -> usize {
    line_count.div_ceil(config.step())
}

/// One record per window of consecutive lines, cropped to the union of the
/// lines' bounding boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowExporter {
    config: WindowConfig,
}

impl WindowExporter {
    /// Create an exporter with validated window parameters.
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }

    /// The window parameters in use.
    pub fn config(&self) -> WindowConfig {
        self.config
    }

    fn window_record(
        &self,
        page: &PageData,
        region: &TextRegion,
        index: usize,
        lines: &[TextLine],
        image: &RgbImage,
    ) -> crate::Result<Record> {
        let coords: Vec<&[Point]> = lines
            .iter()
            .filter(|l| l.has_geometry())
            .map(|l| l.coords.as_slice())
            .collect();
        let bbox = union_bounding_box(&coords)
            .ok_or_else(|| crate::Error::InvalidCrop("no line coordinates".into()))?;
        let crop = crop_bbox(image, bbox)?;

        let text = lines
            .iter()
            .filter(|l| !l.text.is_empty())
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let line_ids = lines
            .iter()
            .map(|l| l.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let line_reading_orders = lines
            .iter()
            .map(|l| l.reading_order.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Record::Window(WindowRecord {
            image: crop,
            text,
            window_size: lines.len() as u32,
            window_index: index as u32,
            line_ids,
            line_reading_orders,
            region_id: region.id.clone(),
            region_reading_order: region.reading_order,
            region_type: region.region_type.clone(),
            filename: page.image_filename.clone(),
            project: page.project_name.clone(),
        }))
    }
}

impl Exporter for WindowExporter {
    fn mode(&self) -> ExportMode {
        ExportMode::Window
    }

    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record> {
        let mut records = Vec::new();
        for region in &page.regions {
            for (index, lines) in create_windows(&region.text_lines, self.config)
                .into_iter()
                .enumerate()
            {
                match self.window_record(page, region, index, lines, image) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        let what = format!("{} window {}", region.id, index);
                        skip_invalid(report, page, "region", &what, &e);
                    }
                }
            }
        }
        records
    }
}
