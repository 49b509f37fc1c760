//! Polygon moments for traced region borders.
//!
//! Area and centroid follow Green's theorem over the closed polygon formed by
//! the border points, so a region's area is measured between pixel centers
//! (a 3x3 block has area 4, not 9).

use imageproc::point::Point;

/// Zeroth and first order moments of a closed polygon.
///
/// Stored as the raw signed cross-product sums (`2 * m00`, `6 * m10`,
/// `6 * m01`) so integer inputs stay exact until the final division.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolygonMoments {
    sum00: f64,
    sum10: f64,
    sum01: f64,
}

impl PolygonMoments {
    /// Accumulates the moments of the polygon through `points`.
    ///
    /// The polygon is closed implicitly (last point joins the first). Fewer
    /// than three points yield all-zero moments.
    pub fn from_points(points: &[Point<i32>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut sum00 = 0.0;
        let mut sum10 = 0.0;
        let mut sum01 = 0.0;

        let mut prev = points[points.len() - 1];
        for &curr in points {
            let (x0, y0) = (f64::from(prev.x), f64::from(prev.y));
            let (x1, y1) = (f64::from(curr.x), f64::from(curr.y));
            let cross = x0 * y1 - x1 * y0;
            sum00 += cross;
            sum10 += (x0 + x1) * cross;
            sum01 += (y0 + y1) * cross;
            prev = curr;
        }

        Self {
            sum00,
            sum10,
            sum01,
        }
    }

    /// Signed zeroth moment (area, negative for clockwise traversal).
    #[inline]
    pub fn m00(&self) -> f64 {
        self.sum00 / 2.0
    }

    /// Unsigned enclosed area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.m00().abs()
    }

    /// Area-weighted centroid, or `None` for degenerate polygons.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.sum00 == 0.0 {
            return None;
        }
        let denom = 3.0 * self.sum00;
        Some((self.sum10 / denom, self.sum01 / denom))
    }
}
