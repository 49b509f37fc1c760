//! Typed coordinate values.
//!
//! Markers live in pixel space and pose joints in normalized space. Both use
//! [`Coord`], parameterized by a zero-sized space marker so the two cannot be
//! mixed without an explicit conversion.

use std::fmt;
use std::marker::PhantomData;

/// Marker type for pixel coordinates (absolute values, origin top-left).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates (0.0 to 1.0 of the image size).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// A 2D coordinate with a type-level marker for the coordinate space.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }
}

impl Coord<Pixel> {
    /// Integer pixel position, truncating toward zero.
    #[inline]
    pub fn to_i32(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

impl Coord<Normalized> {
    /// Returns true if the point lies inside the unit square.
    #[inline]
    pub fn is_in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Scales the point into pixel space for an image of the given size.
    #[inline]
    pub fn to_pixel(&self, width: u32, height: u32) -> Coord<Pixel> {
        Coord::new(self.x * f64::from(width), self.y * f64::from(height))
    }

    /// Like [`to_pixel`](Self::to_pixel), floored to whole pixels and clamped
    /// so that 1.0 lands on the last row or column instead of past it.
    pub fn to_pixel_clamped(&self, width: u32, height: u32) -> Coord<Pixel> {
        let p = self.to_pixel(width, height);
        let max_x = f64::from(width.saturating_sub(1));
        let max_y = f64::from(height.saturating_sub(1));
        Coord::new(p.x.floor().clamp(0.0, max_x), p.y.floor().clamp(0.0, max_y))
    }
}

impl<TSpace> fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}
