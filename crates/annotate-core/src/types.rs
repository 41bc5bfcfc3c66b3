// File: crates/annotate-core/src/types.rs
// Summary: Shared coordinate types (domain points, pixels, client rects, surface sizes).

use chrono::{DateTime, TimeZone, Utc};

/// Logical time coordinate (UTC epoch seconds for market data).
pub type Time = f64;
/// Price coordinate.
pub type Price = f64;

/// A point in chart domain space. Drawings are stored only in this form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainPoint {
    pub time: Time,
    pub price: Price,
}

impl DomainPoint {
    pub const fn new(time: Time, price: Price) -> Self {
        Self { time, price }
    }

    pub fn at(when: DateTime<Utc>, price: Price) -> Self {
        Self { time: when.timestamp() as f64, price }
    }

    /// Wall-clock time of this point, when `time` is a valid epoch-seconds value.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        if !self.time.is_finite() { return None; }
        Utc.timestamp_opt(self.time.floor() as i64, 0).single()
    }
}

/// Surface-local pixel position (logical pixels, origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel {
    pub x: f32,
    pub y: f32,
}

impl Pixel {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelRect {
    /// Axis-aligned rect spanning two corners given in any order.
    pub fn from_corners(a: Pixel, b: Pixel) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
}

/// Bounding rectangle of the overlay surface in client (window) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Translate a client-space position into surface-local pixels.
    pub fn to_local(&self, client_x: f64, client_y: f64) -> Pixel {
        Pixel::new((client_x - self.left) as f32, (client_y - self.top) as f32)
    }
}

/// Layout size of the drawing surface plus the device pixel ratio.
/// Contract: width/height are non-negative, pixel_ratio is positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        Self { width: width.max(0.0), height: height.max(0.0), pixel_ratio: ratio }
    }

    /// Backing-store size in device pixels.
    pub fn physical(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).floor() as u32,
            (self.height * self.pixel_ratio).floor() as u32,
        )
    }
}
