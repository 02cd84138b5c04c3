//! Exporters turning parsed pages into dataset records.
//!
//! Each [`ExportMode`] maps to one [`Exporter`]. Exporters see one page and
//! its decoded image at a time and return that page's records; a
//! [`RecordStream`] drives them over a whole archive.
//!
//! # Example
//!
//! ```no_run
//! use unpage::export::{ExportMode, ExportOptions, WindowConfig};
//! use unpage::Converter;
//!
//! fn main() -> unpage::Result<()> {
//!     let mode: ExportMode = "window".parse()?;
//!     let options = ExportOptions::new().with_window(WindowConfig::new(3, 1)?);
//!
//!     let output = Converter::open("export_job.zip").convert(mode, &options)?;
//!     println!("{} records", output.len());
//!     Ok(())
//! }
//! ```

mod line;
mod options;
mod page;
mod raster;
mod record;
mod region;
mod stream;
mod window;

pub use line::{LineExporter, PolygonLineExporter};
pub use options::{
    ExportOptions, WindowConfig, DEFAULT_POLYGON_PADDING, DEFAULT_WINDOW_SIZE,
};
pub use page::{RawXmlExporter, TextExporter};
pub use raster::{crop_bbox, crop_points, crop_polygon, find_image_path, load_page_image};
pub use record::{
    Field, FieldKind, LineRecord, RawXmlRecord, Record, RegionRecord, Schema, TextRecord,
    WindowRecord,
};
pub use region::{PolygonRegionExporter, RegionExporter};
pub use stream::{ExportOutput, RecordStream};
pub use window::{create_windows, window_count, WindowExporter};

use std::str::FromStr;

use image::RgbImage;

use crate::error::Error;
use crate::model::PageData;
use crate::report::ExportReport;

/// Turns one page into records.
///
/// Implementations never fail a page: an entity whose geometry cannot be
/// cropped is counted in the report and skipped.
pub trait Exporter {
    /// The mode this exporter implements.
    fn mode(&self) -> ExportMode;

    /// Schema of the records this exporter emits.
    fn schema(&self) -> Schema {
        self.mode().schema()
    }

    /// Records of one page, in reading order.
    fn page_records(
        &self,
        page: &PageData,
        image: &RgbImage,
        report: &mut ExportReport,
    ) -> Vec<Record>;
}

/// Available export modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// Full page image with the verbatim PAGE document
    RawXml,

    /// Full page image with the page transcription
    Text,

    /// Region crops
    Region,

    /// Line crops
    Line,

    /// Crops of consecutive line windows
    Window,

    /// Polygon-masked region crops
    PolygonRegion,

    /// Polygon-masked line crops with baselines
    PolygonLine,
}

impl ExportMode {
    /// Every mode, in canonical order.
    pub const ALL: [ExportMode; 7] = [
        ExportMode::RawXml,
        ExportMode::Text,
        ExportMode::Region,
        ExportMode::Line,
        ExportMode::Window,
        ExportMode::PolygonRegion,
        ExportMode::PolygonLine,
    ];

    /// Canonical mode name.
    pub fn name(&self) -> &'static str {
        match self {
            ExportMode::RawXml => "raw_xml",
            ExportMode::Text => "text",
            ExportMode::Region => "region",
            ExportMode::Line => "line",
            ExportMode::Window => "window",
            ExportMode::PolygonRegion => "polygon_region",
            ExportMode::PolygonLine => "polygon_line",
        }
    }

    /// Record schema of this mode.
    pub fn schema(&self) -> Schema {
        match self {
            ExportMode::RawXml => Schema::raw_xml(),
            ExportMode::Text => Schema::text(),
            ExportMode::Region => Schema::region(),
            ExportMode::Line => Schema::line(),
            ExportMode::Window => Schema::window(),
            ExportMode::PolygonRegion => Schema::polygon_region(),
            ExportMode::PolygonLine => Schema::polygon_line(),
        }
    }

    /// Comma-separated list of every mode name.
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(ExportMode::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::InvalidMode(s.to_string(), Self::available()))
    }
}

/// Construct the exporter for a mode.
pub fn build_exporter(mode: ExportMode, options: &ExportOptions) -> Box<dyn Exporter> {
    match mode {
        ExportMode::RawXml => Box::new(RawXmlExporter),
        ExportMode::Text => Box::new(TextExporter),
        ExportMode::Region => Box::new(RegionExporter),
        ExportMode::Line => Box::new(LineExporter),
        ExportMode::Window => Box::new(WindowExporter::new(options.window)),
        ExportMode::PolygonRegion => Box::new(PolygonRegionExporter::new(options.polygon_padding)),
        ExportMode::PolygonLine => Box::new(PolygonLineExporter::new(options.polygon_padding)),
    }
}

/// Count and log one entity skipped for its geometry.
pub(crate) fn skip_invalid(
    report: &mut ExportReport,
    page: &PageData,
    kind: &str,
    id: &str,
    error: &Error,
) {
    let message = format!("{} {} {}: {}", page.image_filename, kind, id, error);
    log::warn!("{}", message);
    report.add_invalid_crop(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in ExportMode::ALL {
            assert_eq!(mode.name().parse::<ExportMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_mode_lists_available() {
        let err = "pages".parse::<ExportMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidMode(_, _)));
        let message = err.to_string();
        assert!(message.contains("pages"));
        assert!(message.contains("raw_xml, text, region, line, window, polygon_region, polygon_line"));
    }

    #[test]
    fn test_build_exporter_matches_mode() {
        let options = ExportOptions::default();
        for mode in ExportMode::ALL {
            let exporter = build_exporter(mode, &options);
            assert_eq!(exporter.mode(), mode);
            assert_eq!(exporter.schema(), mode.schema());
        }
    }
}
