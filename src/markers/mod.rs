//! Red marker detection.
//!
//! Hand-drawn red dots serve as a fallback skeleton when the pose model finds
//! nobody in the picture. Detection is plain color thresholding followed by
//! border tracing:
//!
//! 1. Pixels whose RGB values fall inside a [`ColorRange`] form a binary mask.
//! 2. Outer borders of the mask's connected regions are traced with
//!    [`imageproc::contours::find_contours`].
//! 3. Regions whose polygon area does not exceed [`MarkerParams::min_area`]
//!    are treated as noise.
//! 4. Each survivor is reduced to the centroid of its border polygon.
//!
//! # Ordering
//!
//! Markers are sorted top-left to bottom-right by bounding box (top edge,
//! then left edge) before indices are assigned, so `Mark_0` is always the
//! marker nearest the top of the image regardless of tracing order.

mod moments;

pub use moments::PolygonMoments;

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use log::debug;

use crate::coord::{Coord, Pixel};
use crate::draw;

/// Marker circle radius in pixels.
pub const MARKER_RADIUS: i32 = 5;

/// Offset of the label anchor from the marker centroid.
pub const LABEL_OFFSET: (i32, i32) = (10, -10);

/// Overlay color for markers and their labels.
pub const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Inclusive per-channel color bounds, in RGB channel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    /// Saturated red: high red channel, low green and blue.
    pub const RED: ColorRange = ColorRange {
        lower: [150, 0, 0],
        upper: [255, 50, 50],
    };

    /// Returns true if every channel of `px` lies within the bounds.
    #[inline]
    pub fn contains(&self, px: &Rgb<u8>) -> bool {
        px.0.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&v, (&lo, &hi))| lo <= v && v <= hi)
    }

    /// Builds a binary mask (255 inside the range, 0 elsewhere).
    pub fn mask(&self, image: &RgbImage) -> GrayImage {
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            if self.contains(image.get_pixel(x, y)) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::RED
    }
}

/// Parameters for marker detection.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerParams {
    /// Color bounds selecting marker pixels.
    pub range: ColorRange,
    /// Regions with polygon area at or below this are rejected as noise.
    pub min_area: f64,
}

impl Default for MarkerParams {
    fn default() -> Self {
        Self {
            range: ColorRange::RED,
            min_area: 10.0,
        }
    }
}

/// Axis-aligned bounds of a traced region, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// A detected red region reduced to its centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// Position in the top-left to bottom-right ordering.
    pub index: usize,
    /// Centroid truncated to whole pixels.
    pub centroid: Coord<Pixel>,
    /// Polygon area of the region border.
    pub area: f64,
    pub bounds: RegionBounds,
}

impl Marker {
    /// The label written to the CSV and drawn on the image.
    pub fn label(&self) -> String {
        format!("Mark_{}", self.index)
    }
}

/// Finds red marker regions in `image`.
///
/// The returned markers are ordered by bounding box (top edge, then left
/// edge) and indexed in that order.
pub fn detect_markers(image: &RgbImage, params: &MarkerParams) -> Vec<Marker> {
    let mask = params.range.mask(image);
    let contours = find_contours::<i32>(&mask);

    let mut found: Vec<(RegionBounds, Coord<Pixel>, f64)> = Vec::new();
    for contour in contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
    {
        let moments = PolygonMoments::from_points(&contour.points);
        let area = moments.area();
        if area <= params.min_area {
            continue;
        }
        let Some((cx, cy)) = moments.centroid() else {
            continue;
        };

        let bounds = contour.points.iter().fold(
            RegionBounds {
                min_x: i32::MAX,
                min_y: i32::MAX,
                max_x: i32::MIN,
                max_y: i32::MIN,
            },
            |b, p| RegionBounds {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        );

        let centroid = Coord::new(cx.trunc(), cy.trunc());
        found.push((bounds, centroid, area));
    }

    found.sort_by(|a, b| {
        (a.0.min_y, a.0.min_x)
            .cmp(&(b.0.min_y, b.0.min_x))
            .then_with(|| a.1.y.total_cmp(&b.1.y))
            .then_with(|| a.1.x.total_cmp(&b.1.x))
    });

    debug!(
        "marker scan: {} contours traced, {} markers kept (min area {})",
        contours.len(),
        found.len(),
        params.min_area
    );

    found
        .into_iter()
        .enumerate()
        .map(|(index, (bounds, centroid, area))| Marker {
            index,
            centroid,
            area,
            bounds,
        })
        .collect()
}

/// Draws each marker as a filled circle with its `Mark_<index>` label.
pub fn annotate_markers(image: &mut RgbImage, markers: &[Marker]) {
    for marker in markers {
        let (x, y) = marker.centroid.to_i32();
        draw::filled_circle(image, (x, y), MARKER_RADIUS, MARKER_COLOR);
        draw::label(
            image,
            (x + LABEL_OFFSET.0, y + LABEL_OFFSET.1),
            &marker.label(),
            MARKER_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, color);
            }
        }
    }

    #[test]
    fn red_range_matches_saturated_red_only() {
        let range = ColorRange::RED;
        assert!(range.contains(&Rgb([200, 10, 10])));
        assert!(range.contains(&Rgb([150, 50, 50])));
        assert!(!range.contains(&Rgb([149, 0, 0])));
        assert!(!range.contains(&Rgb([255, 51, 0])));
        assert!(!range.contains(&Rgb([255, 255, 255])));
    }

    #[test]
    fn mask_marks_in_range_pixels() {
        let mut img = blank(4, 4);
        img.put_pixel(1, 2, Rgb([220, 0, 0]));
        let mask = ColorRange::RED.mask(&img);
        assert_eq!(mask.get_pixel(1, 2).0[0], 255);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn blank_image_has_no_markers() {
        let markers = detect_markers(&blank(64, 64), &MarkerParams::default());
        assert!(markers.is_empty());
    }

    #[test]
    fn small_blob_is_rejected_as_noise() {
        let mut img = blank(64, 64);
        // 3x3 pixels: border polygon area 4
        fill_rect(&mut img, 20, 20, 3, 3, Rgb([255, 0, 0]));
        assert!(detect_markers(&img, &MarkerParams::default()).is_empty());
    }

    #[test]
    fn square_blob_reduces_to_its_center() {
        let mut img = blank(64, 64);
        // 9x9 pixels spanning 26..=34: border polygon area 64
        fill_rect(&mut img, 26, 26, 9, 9, Rgb([230, 20, 20]));
        let markers = detect_markers(&img, &MarkerParams::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].centroid.to_i32(), (30, 30));
        assert_eq!(markers[0].area, 64.0);
        assert_eq!(markers[0].label(), "Mark_0");
    }

    #[test]
    fn markers_are_ordered_top_to_bottom() {
        let mut img = blank(100, 100);
        fill_rect(&mut img, 10, 70, 8, 8, Rgb([255, 0, 0]));
        fill_rect(&mut img, 70, 10, 8, 8, Rgb([255, 0, 0]));
        fill_rect(&mut img, 10, 10, 8, 8, Rgb([255, 0, 0]));

        let markers = detect_markers(&img, &MarkerParams::default());
        let tops: Vec<(i32, i32)> = markers
            .iter()
            .map(|m| (m.bounds.min_y, m.bounds.min_x))
            .collect();
        assert_eq!(tops, vec![(10, 10), (10, 70), (70, 10)]);
        let indices: Vec<usize> = markers.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn annotation_paints_marker_color_at_centroid() {
        let mut img = blank(64, 64);
        fill_rect(&mut img, 26, 26, 9, 9, Rgb([230, 20, 20]));
        let markers = detect_markers(&img, &MarkerParams::default());
        annotate_markers(&mut img, &markers);
        assert_eq!(*img.get_pixel(30, 30), MARKER_COLOR);
    }

    #[test]
    fn label_is_drawn_up_and_right_of_the_marker() {
        let mut img = blank(160, 100);
        // 11x11 pixels spanning 45..=55: centroid (50, 50)
        fill_rect(&mut img, 45, 45, 11, 11, Rgb([230, 20, 20]));
        let markers = detect_markers(&img, &MarkerParams::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].centroid.to_i32(), (50, 50));
        annotate_markers(&mut img, &markers);

        // "Mark_0" sits on the baseline y = 40 starting at x = 60
        let label_pixels = (60..160)
            .flat_map(|x| (26..40).map(move |y| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) == MARKER_COLOR)
            .count();
        assert!(label_pixels > 50, "label pixels = {label_pixels}");
        // top-left dot of the 'M'
        assert_eq!(*img.get_pixel(60, 26), MARKER_COLOR);
        // nothing green left of the circle or below the baseline
        assert!((0..44).all(|x| *img.get_pixel(x, 30) != MARKER_COLOR));
        assert!((60..160).all(|x| *img.get_pixel(x, 41) != MARKER_COLOR));
    }
}
