//! Typed records and their schemas.

use image::RgbImage;
use serde::Serialize;

use crate::geometry::Point;

/// Kind of a record field, as handed to a dataset sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// RGB raster
    Image,
    /// UTF-8 string
    String,
    /// 32-bit integer
    Int32,
    /// List of points
    Points,
    /// List of points, possibly absent
    OptionalPoints,
}

/// One named field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// Ordered field list describing the records of one export mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    fn of(fields: &[Field]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    /// Field names in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn raw_xml() -> Self {
        use FieldKind::*;
        Self::of(&[
            field("image", Image),
            field("xml", String),
            field("filename", String),
            field("project", String),
        ])
    }

    pub(crate) fn text() -> Self {
        use FieldKind::*;
        Self::of(&[
            field("image", Image),
            field("text", String),
            field("filename", String),
            field("project", String),
        ])
    }

    pub(crate) fn region() -> Self {
        use FieldKind::*;
        Self::of(&[
            field("image", Image),
            field("text", String),
            field("region_type", String),
            field("region_id", String),
            field("reading_order", Int32),
            field("filename", String),
            field("project", String),
        ])
    }

    pub(crate) fn line() -> Self {
        use FieldKind::*;
        Self::of(&[
            field("image", Image),
            field("text", String),
            field("line_id", String),
            field("line_reading_order", Int32),
            field("region_id", String),
            field("region_reading_order", Int32),
            field("region_type", String),
            field("filename", String),
            field("project", String),
        ])
    }

    pub(crate) fn polygon_region() -> Self {
        let mut schema = Self::region();
        schema.fields.push(field("coords", FieldKind::Points));
        schema
    }

    pub(crate) fn polygon_line() -> Self {
        let mut schema = Self::line();
        schema.fields.push(field("coords", FieldKind::Points));
        schema
            .fields
            .push(field("baseline", FieldKind::OptionalPoints));
        schema
    }

    pub(crate) fn window() -> Self {
        use FieldKind::*;
        Self::of(&[
            field("image", Image),
            field("text", String),
            field("window_size", Int32),
            field("window_index", Int32),
            field("line_ids", String),
            field("line_reading_orders", String),
            field("region_id", String),
            field("region_reading_order", Int32),
            field("region_type", String),
            field("filename", String),
            field("project", String),
        ])
    }
}

/// Full page image with the verbatim document.
#[derive(Debug, Clone, Serialize)]
pub struct RawXmlRecord {
    #[serde(skip)]
    pub image: RgbImage,
    pub xml: String,
    pub filename: String,
    pub project: String,
}

/// Full page image with the page transcription.
#[derive(Debug, Clone, Serialize)]
pub struct TextRecord {
    #[serde(skip)]
    pub image: RgbImage,
    pub text: String,
    pub filename: String,
    pub project: String,
}

/// One cropped region. `coords` is set by the polygon exporter only.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRecord {
    #[serde(skip)]
    pub image: RgbImage,
    pub text: String,
    pub region_type: String,
    pub region_id: String,
    pub reading_order: u32,
    pub filename: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Vec<Point>>,
}

/// One cropped line. `coords` and `baseline` are set by the polygon
/// exporter only.
#[derive(Debug, Clone, Serialize)]
pub struct LineRecord {
    #[serde(skip)]
    pub image: RgbImage,
    pub text: String,
    pub line_id: String,
    pub line_reading_order: u32,
    pub region_id: String,
    pub region_reading_order: u32,
    pub region_type: String,
    pub filename: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Option<Vec<Point>>>,
}

/// A run of consecutive lines from one region.
#[derive(Debug, Clone, Serialize)]
pub struct WindowRecord {
    #[serde(skip)]
    pub image: RgbImage,
    pub text: String,
    pub window_size: u32,
    pub window_index: u32,
    pub line_ids: String,
    pub line_reading_orders: String,
    pub region_id: String,
    pub region_reading_order: u32,
    pub region_type: String,
    pub filename: String,
    pub project: String,
}

/// A record emitted by one of the exporters.
///
/// Serializes to its metadata fields only; the raster is reached through
/// [`Record::image`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Record {
    RawXml(RawXmlRecord),
    Text(TextRecord),
    Region(RegionRecord),
    Line(LineRecord),
    Window(WindowRecord),
}

impl Record {
    /// The record's raster.
    pub fn image(&self) -> &RgbImage {
        match self {
            Record::RawXml(r) => &r.image,
            Record::Text(r) => &r.image,
            Record::Region(r) => &r.image,
            Record::Line(r) => &r.image,
            Record::Window(r) => &r.image,
        }
    }

    /// The record's text field (the document itself for raw XML records).
    pub fn text(&self) -> &str {
        match self {
            Record::RawXml(r) => &r.xml,
            Record::Text(r) => &r.text,
            Record::Region(r) => &r.text,
            Record::Line(r) => &r.text,
            Record::Window(r) => &r.text,
        }
    }

    /// Image filename of the source page.
    pub fn filename(&self) -> &str {
        match self {
            Record::RawXml(r) => &r.filename,
            Record::Text(r) => &r.filename,
            Record::Region(r) => &r.filename,
            Record::Line(r) => &r.filename,
            Record::Window(r) => &r.filename,
        }
    }

    /// Project of the source page.
    pub fn project(&self) -> &str {
        match self {
            Record::RawXml(r) => &r.project,
            Record::Text(r) => &r.project,
            Record::Region(r) => &r.project,
            Record::Line(r) => &r.project,
            Record::Window(r) => &r.project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_field_order() {
        assert_eq!(
            Schema::raw_xml().names(),
            vec!["image", "xml", "filename", "project"]
        );
        let polygon = Schema::polygon_line();
        assert_eq!(polygon.names().last(), Some(&"baseline"));
        assert_eq!(
            polygon.field("baseline").map(|f| f.kind),
            Some(FieldKind::OptionalPoints)
        );
    }

    #[test]
    fn test_record_serializes_without_image() {
        let record = Record::Text(TextRecord {
            image: RgbImage::new(2, 2),
            text: "Hello".into(),
            filename: "a.jpg".into(),
            project: "p".into(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "Hello", "filename": "a.jpg", "project": "p"})
        );
    }

    #[test]
    fn test_polygon_line_baseline_serializes_null_when_absent() {
        let record = Record::Line(LineRecord {
            image: RgbImage::new(1, 1),
            text: String::new(),
            line_id: "l1".into(),
            line_reading_order: 0,
            region_id: "r1".into(),
            region_reading_order: 0,
            region_type: "paragraph".into(),
            filename: "a.jpg".into(),
            project: "p".into(),
            coords: Some(vec![Point::new(1, 2)]),
            baseline: Some(None),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["baseline"], serde_json::Value::Null);
        assert_eq!(json["coords"][0]["x"], 1);
    }
}
