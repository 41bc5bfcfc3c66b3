// File: crates/annotate-core/src/viewport.rs
// Summary: Reference chart viewport: time/value scales, pan/zoom/resize and change notification.

use log::trace;

use crate::bridge::CoordinateBridge;
use crate::notifier::{ViewportChange, ViewportNotifier};
use crate::scale::{TimeScale, ValueScale};
use crate::types::{Pixel, Price, Time};

/// Visible time/price window of a chart surface.
///
/// Every mutation notifies subscribers; the mapping is recomputed on each query.
#[derive(Debug)]
pub struct ChartViewport {
    width: f32,
    height: f32,
    time: TimeScale,
    value: ValueScale,
    notifier: ViewportNotifier,
}

impl ChartViewport {
    pub fn new(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        Self {
            width,
            height,
            time: TimeScale::new(0.0, 0.0, 1.0),
            value: ValueScale::new_linear(0.0, height, 0.0, 100.0),
            notifier: ViewportNotifier::new(),
        }
    }

    pub fn with_log_prices(mut self) -> Self {
        self.value = ValueScale::new_log10(0.0, self.height, self.value.vmin, self.value.vmax);
        self
    }

    pub fn width(&self) -> f32 { self.width }
    pub fn height(&self) -> f32 { self.height }
    pub fn time_scale(&self) -> &TimeScale { &self.time }
    pub fn value_scale(&self) -> &ValueScale { &self.value }
    pub fn notifier(&self) -> &ViewportNotifier { &self.notifier }

    /// Show `[first, last]` across the full width and the price range with a 2% margin
    /// (multiplicative on a log scale).
    /// The time range also becomes the resolvable range.
    pub fn fit(&mut self, first: Time, last: Time, price_min: Price, price_max: Price) {
        self.time.fit(first, last, self.width);
        self.time.set_bounds(Some((first, last)));
        let (mut lo, mut hi) = (price_min.min(price_max), price_min.max(price_max));
        if (hi - lo).abs() < 1e-9 { hi = lo + 1.0; }
        if self.value.log && lo > 0.0 {
            lo *= 0.98;
            hi *= 1.02;
        } else {
            let m = (hi - lo) * 0.02;
            lo -= m;
            hi += m;
        }
        self.value.set_range(lo, hi);
        self.changed(ViewportChange::Fit);
    }

    /// Replace the resolvable time range without moving the view.
    pub fn set_time_bounds(&mut self, bounds: Option<(Time, Time)>) {
        self.time.set_bounds(bounds);
        self.changed(ViewportChange::Fit);
    }

    /// Drag by a pixel delta; content follows the pointer.
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32) {
        self.time.pan_px(dx);
        self.value.pan_px(dy);
        self.changed(ViewportChange::Pan);
    }

    /// Zoom both axes by `factor` (> 1 zooms in) around `cursor`.
    pub fn zoom_at(&mut self, cursor: Pixel, factor: f32) {
        let cx = cursor.x.clamp(0.0, self.width);
        let cy = cursor.y.clamp(0.0, self.height);
        self.time.zoom_at(cx, factor);
        self.value.zoom_at(cy, factor);
        self.changed(ViewportChange::Zoom);
    }

    /// Resize keeping the visible time span and price range.
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        if width == self.width && height == self.height { return; }
        let first = self.time.from_px(0.0);
        let last = self.time.from_px(self.width);
        self.width = width;
        self.height = height;
        self.time.fit(first, last, width);
        self.value.set_pixels(0.0, height);
        self.changed(ViewportChange::Resize);
    }

    fn changed(&self, change: ViewportChange) {
        let n = self.notifier.emit(change);
        trace!("viewport {:?} delivered to {} subscriber(s)", change, n);
    }
}

impl CoordinateBridge for ChartViewport {
    fn time_to_x(&self, time: Time) -> Option<f32> {
        if !self.time.resolves(time) { return None; }
        Some(self.time.to_px(time))
    }

    fn price_to_y(&self, price: Price) -> Option<f32> {
        if !self.value.resolves(price) { return None; }
        Some(self.value.to_px(price))
    }

    fn x_to_time(&self, x: f32) -> Option<Time> {
        if !x.is_finite() { return None; }
        let t = self.time.from_px(x);
        self.time.resolves(t).then_some(t)
    }

    fn y_to_price(&self, y: f32) -> Option<Price> {
        if !y.is_finite() { return None; }
        let p = self.value.from_px(y);
        self.value.resolves(p).then_some(p)
    }
}
