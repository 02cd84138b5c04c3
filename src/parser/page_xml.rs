//! PAGE-XML document parser using roxmltree.

use std::collections::HashMap;

use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{Error, Result};
use crate::geometry::{parse_points, Point};
use crate::model::{PageData, TextLine, TextRegion, DEFAULT_REGION_TYPE};

/// The only PAGE schema version this parser accepts.
pub const PAGE_NAMESPACE: &str =
    "http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15";

/// Parser for single PAGE documents.
///
/// Regions are ordered by the page's `ReadingOrder` table, lines by the
/// `readingOrder {index:N;}` entry of their `custom` attribute. The two
/// sources are used independently, each at its own level. Missing or
/// unparseable attributes fall back to defaults; only malformed XML and a
/// missing `Page` element are errors.
pub struct PageXmlParser {
    custom_order: Regex,
}

impl PageXmlParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            custom_order: Regex::new(r"readingOrder\s*\{\s*index\s*:\s*(\d+)")
                .expect("readingOrder pattern is valid"),
        }
    }

    /// Parse one decoded document belonging to `project`.
    ///
    /// # Errors
    /// * `Error::XmlParse` if the markup is malformed
    /// * `Error::NotAPage` if the root has no `Page` child in [`PAGE_NAMESPACE`]
    pub fn parse(&self, xml: &str, project: &str) -> Result<PageData> {
        let opts = ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = Document::parse_with_options(xml, opts)?;
        let root = doc.root_element();
        let page = find_child(root, "Page").ok_or(Error::NotAPage)?;

        let mut data = PageData::new(page.attribute("imageFilename").unwrap_or(""), project)
            .with_dimensions(
                parse_u32(page.attribute("imageWidth")),
                parse_u32(page.attribute("imageHeight")),
            );
        data.xml_content = xml.to_string();

        let order = reading_order_table(root);
        data.regions = root
            .descendants()
            .filter(|n| is_page_element(*n, "TextRegion"))
            .map(|n| self.parse_region(n, &order))
            .collect();
        data.regions.sort_by_key(|r| r.reading_order);

        log::debug!(
            "Parsed {} ({} regions, {} lines)",
            data.image_filename,
            data.region_count(),
            data.line_count()
        );
        Ok(data)
    }

    fn parse_region(&self, node: Node<'_, '_>, order: &HashMap<String, u32>) -> TextRegion {
        let id = node.attribute("id").unwrap_or("");
        let mut region = TextRegion::new(id)
            .with_type(node.attribute("type").unwrap_or(DEFAULT_REGION_TYPE))
            .with_coords(coords_of(node))
            .with_text(text_equiv(node))
            .with_reading_order(order.get(id).copied().unwrap_or(0));

        for line in find_children(node, "TextLine") {
            region.add_line(self.parse_line(line));
        }
        region.text_lines.sort_by_key(|l| l.reading_order);
        region
    }

    fn parse_line(&self, node: Node<'_, '_>) -> TextLine {
        let mut line = TextLine::new(node.attribute("id").unwrap_or(""), text_equiv(node))
            .with_coords(coords_of(node))
            .with_reading_order(self.custom_reading_order(node.attribute("custom")));

        if let Some(baseline) = find_child(node, "Baseline").map(points_of) {
            if !baseline.is_empty() {
                line = line.with_baseline(baseline);
            }
        }
        line
    }

    /// Index from a `custom` attribute such as
    /// `readingOrder {index:3;} structure {type:heading;}`.
    fn custom_reading_order(&self, custom: Option<&str>) -> u32 {
        custom
            .and_then(|c| self.custom_order.captures(c))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }
}

impl Default for PageXmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map region id to index from the first `ReadingOrder` element.
fn reading_order_table(root: Node<'_, '_>) -> HashMap<String, u32> {
    let mut table = HashMap::new();
    let Some(order) = root
        .descendants()
        .find(|n| is_page_element(*n, "ReadingOrder"))
    else {
        return table;
    };

    for entry in order
        .descendants()
        .filter(|n| is_page_element(*n, "RegionRefIndexed"))
    {
        let region = entry.attribute("regionRef").unwrap_or("");
        table.insert(region.to_string(), parse_u32(entry.attribute("index")));
    }
    table
}

fn is_page_element(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(PAGE_NAMESPACE)
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_page_element(*child, name))
}

fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| is_page_element(*child, name))
}

fn points_of(node: Node<'_, '_>) -> Vec<Point> {
    parse_points(node.attribute("points").unwrap_or(""))
}

fn coords_of(node: Node<'_, '_>) -> Vec<Point> {
    find_child(node, "Coords").map(points_of).unwrap_or_default()
}

/// Text of the element's own `TextEquiv/Unicode`, never its descendants'.
fn text_equiv(node: Node<'_, '_>) -> String {
    find_child(node, "TextEquiv")
        .and_then(|equiv| find_child(equiv, "Unicode"))
        .and_then(|unicode| unicode.text())
        .unwrap_or("")
        .to_string()
}

fn parse_u32(value: Option<&str>) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
