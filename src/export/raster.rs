//! Page image lookup, decoding and cropping.

use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;

use crate::error::{Error, Result};
use crate::geometry::{bounding_box, clip_to_image, BoundingBox, Point};
use crate::model::PageData;
use crate::parser::PageArchive;

/// Locate the image entry of a page.
///
/// Tried in order: `{project}/{filename}`, `{project}/images/{filename}`,
/// `{filename}`, then the first entry whose path ends with `{filename}`.
pub fn find_image_path(archive: &PageArchive, project: &str, filename: &str) -> Option<String> {
    if filename.is_empty() {
        return None;
    }

    let candidates = [
        format!("{}/{}", project, filename),
        format!("{}/images/{}", project, filename),
        filename.to_string(),
    ];
    if let Some(found) = candidates.into_iter().find(|c| archive.contains(c)) {
        return Some(found);
    }

    archive
        .entry_names()
        .iter()
        .find(|name| name.ends_with(filename))
        .cloned()
}

/// Find, read and decode the image of a page as RGB.
///
/// # Errors
/// * `Error::MissingImage` if no entry matches the page's filename
/// * `Error::ImageDecode` if the entry is not a decodable image
pub fn load_page_image(archive: &mut PageArchive, page: &PageData) -> Result<RgbImage> {
    let path = find_image_path(archive, &page.project_name, &page.image_filename)
        .ok_or_else(|| Error::MissingImage(page.image_filename.clone()))?;
    let bytes = archive.read_entry(&path)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| Error::ImageDecode {
            path: path.clone(),
            source,
        })?
        .to_rgb8();
    log::debug!("Loaded {} ({}x{})", path, image.width(), image.height());
    Ok(image)
}

/// Crop a box out of an image after clipping it to the image bounds.
///
/// # Errors
/// * `Error::InvalidCrop` if nothing of the box lies inside the image
pub fn crop_bbox(image: &RgbImage, bbox: BoundingBox) -> Result<RgbImage> {
    let clipped = clip(image, bbox)?;
    Ok(imageops::crop_imm(
        image,
        clipped.min_x as u32,
        clipped.min_y as u32,
        clipped.width(),
        clipped.height(),
    )
    .to_image())
}

/// Crop the bounding box of a polygon.
pub fn crop_points(image: &RgbImage, points: &[Point]) -> Result<RgbImage> {
    let bbox = bounding_box(points).ok_or_else(|| Error::InvalidCrop("no coordinates".into()))?;
    crop_bbox(image, bbox)
}

/// Crop a polygon: the padded bounding box, with every pixel outside the
/// polygon painted white.
///
/// # Errors
/// * `Error::InvalidCrop` if the polygon has fewer than three distinct
///   vertices or lies outside the image
pub fn crop_polygon(image: &RgbImage, points: &[Point], padding: u32) -> Result<RgbImage> {
    let polygon = distinct_vertices(points);
    if polygon.len() < 3 {
        return Err(Error::InvalidCrop(format!(
            "polygon needs at least 3 distinct points, got {}",
            polygon.len()
        )));
    }

    let bbox = bounding_box(&polygon).ok_or_else(|| Error::InvalidCrop("no coordinates".into()))?;
    // The polygon itself must reach into the image; padding alone does not count.
    clip(image, bbox)?;
    let clipped = clip(image, bbox.expand(padding))?;
    let (width, height) = (clipped.width(), clipped.height());
    let region = imageops::crop_imm(
        image,
        clipped.min_x as u32,
        clipped.min_y as u32,
        width,
        height,
    )
    .to_image();

    let local: Vec<PixelPoint<i32>> = polygon
        .iter()
        .map(|p| PixelPoint::new(p.x - clipped.min_x, p.y - clipped.min_y))
        .collect();
    let mut mask = GrayImage::new(width, height);
    draw_polygon_mut(&mut mask, &local, Luma([255u8]));

    let mut out = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] > 0 {
            out.put_pixel(x, y, *region.get_pixel(x, y));
        }
    }
    Ok(out)
}

fn clip(image: &RgbImage, bbox: BoundingBox) -> Result<BoundingBox> {
    clip_to_image(bbox, image.width(), image.height()).ok_or_else(|| {
        Error::InvalidCrop(format!(
            "box {} is empty inside {}x{} image",
            bbox,
            image.width(),
            image.height()
        ))
    })
}

/// Drop consecutive repeats and a closing vertex equal to the first.
fn distinct_vertices(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}
