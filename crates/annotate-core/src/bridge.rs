// File: crates/annotate-core/src/bridge.rs
// Summary: Coordinate bridge between chart domain space (time, price) and surface pixels.

use crate::types::{DomainPoint, Pixel, Price, Time};

/// Domain <-> pixel mapping supplied by the chart.
///
/// Every method answers for the viewport as it is *now*; implementations must not
/// cache results across pan/zoom/resize. `None` means the coordinate is currently
/// indeterminate (outside the resolvable time range or the active price mapping)
/// and callers skip it.
pub trait CoordinateBridge {
    fn time_to_x(&self, time: Time) -> Option<f32>;
    fn price_to_y(&self, price: Price) -> Option<f32>;
    fn x_to_time(&self, x: f32) -> Option<Time>;
    fn y_to_price(&self, y: f32) -> Option<Price>;

    fn to_pixel(&self, point: DomainPoint) -> Option<Pixel> {
        Some(Pixel::new(self.time_to_x(point.time)?, self.price_to_y(point.price)?))
    }

    fn to_domain(&self, pixel: Pixel) -> Option<DomainPoint> {
        Some(DomainPoint::new(self.x_to_time(pixel.x)?, self.y_to_price(pixel.y)?))
    }
}

impl<B: CoordinateBridge + ?Sized> CoordinateBridge for &B {
    fn time_to_x(&self, time: Time) -> Option<f32> { (**self).time_to_x(time) }
    fn price_to_y(&self, price: Price) -> Option<f32> { (**self).price_to_y(price) }
    fn x_to_time(&self, x: f32) -> Option<Time> { (**self).x_to_time(x) }
    fn y_to_price(&self, y: f32) -> Option<Price> { (**self).y_to_price(y) }
}

/// Project a point list, dropping points that are currently indeterminate.
pub fn project_points<B: CoordinateBridge + ?Sized>(bridge: &B, points: &[DomainPoint]) -> Vec<Pixel> {
    points.iter().filter_map(|p| bridge.to_pixel(*p)).collect()
}
