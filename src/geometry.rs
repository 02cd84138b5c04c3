//! Point lists and axis-aligned boxes.
//!
//! PAGE-XML stores every outline as a `points` attribute of the form
//! `"x1,y1 x2,y2 ..."`. These helpers turn such strings into coordinates and
//! derive the rectangles used for cropping.

use serde::{Deserialize, Serialize};

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Axis-aligned rectangle, min corner inclusive, max corner exclusive when
/// used as a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width in pixels (0 if degenerate).
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    /// Height in pixels (0 if degenerate).
    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }

    /// Whether the box encloses no pixels.
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Grow the box by `padding` pixels on every side.
    pub fn expand(&self, padding: u32) -> Self {
        let pad = padding.min(i32::MAX as u32) as i32;
        Self {
            min_x: self.min_x.saturating_sub(pad),
            min_y: self.min_y.saturating_sub(pad),
            max_x: self.max_x.saturating_add(pad),
            max_y: self.max_y.saturating_add(pad),
        }
    }

}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Parse a PAGE `points` attribute.
///
/// Tokens are whitespace-separated `x,y` pairs. A token without exactly one
/// comma or with a non-integer half is dropped, so stray separators in the
/// source never fail a document.
///
/// # Example
/// ```
/// use unpage::geometry::{parse_points, Point};
///
/// let points = parse_points("5,3 100,3 oops 100,50");
/// assert_eq!(points, vec![Point::new(5, 3), Point::new(100, 3), Point::new(100, 50)]);
/// ```
pub fn parse_points(raw: &str) -> Vec<Point> {
    raw.split_whitespace().filter_map(parse_point).collect()
}

fn parse_point(token: &str) -> Option<Point> {
    let (x, y) = token.split_once(',')?;
    if y.contains(',') {
        return None;
    }
    Some(Point::new(x.parse().ok()?, y.parse().ok()?))
}

/// Min/max over all points; `None` for an empty slice.
pub fn bounding_box(points: &[Point]) -> Option<BoundingBox> {
    let first = points.first()?;
    let init = BoundingBox::new(first.x, first.y, first.x, first.y);
    Some(points.iter().fold(init, |b, p| BoundingBox {
        min_x: b.min_x.min(p.x),
        min_y: b.min_y.min(p.y),
        max_x: b.max_x.max(p.x),
        max_y: b.max_y.max(p.y),
    }))
}

/// Bounding box enclosing every point of every group.
///
/// Returns `None` when the groups contain no points at all.
pub fn union_bounding_box<P: AsRef<[Point]>>(groups: &[P]) -> Option<BoundingBox> {
    let all: Vec<Point> = groups
        .iter()
        .flat_map(|g| g.as_ref().iter().copied())
        .collect();
    bounding_box(&all)
}

/// Clamp a box to `[0, width] x [0, height]`.
///
/// Returns `None` when nothing of the box remains inside the image.
pub fn clip_to_image(bbox: BoundingBox, width: u32, height: u32) -> Option<BoundingBox> {
    let w = width.min(i32::MAX as u32) as i32;
    let h = height.min(i32::MAX as u32) as i32;
    let clipped = BoundingBox {
        min_x: bbox.min_x.max(0),
        min_y: bbox.min_y.max(0),
        max_x: bbox.max_x.min(w),
        max_y: bbox.max_y.min(h),
    };
    if clipped.is_empty() {
        None
    } else {
        Some(clipped)
    }
}
