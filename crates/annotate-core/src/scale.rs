// File: crates/annotate-core/src/scale.rs
// Summary: Time (X) and Value (Y) scale transforms with zoom/pan hooks.

use crate::types::{Price, Time};

/// Horizontal time scale controlled via a start time and pixel spacing per time unit.
/// Times outside `bounds` (the resolvable logical range) do not map to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f32,
    pub start: Time,
    pub px_per_unit: f64,
    bounds: Option<(Time, Time)>,
}

impl TimeScale {
    pub fn new(left_px: f32, start: Time, px_per_unit: f64) -> Self {
        Self { left_px, start, px_per_unit: sanitize_spacing(px_per_unit), bounds: None }
    }

    pub fn with_bounds(mut self, first: Time, last: Time) -> Self {
        self.set_bounds(Some((first, last)));
        self
    }

    pub fn set_bounds(&mut self, bounds: Option<(Time, Time)>) {
        self.bounds = bounds.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
    }

    pub fn bounds(&self) -> Option<(Time, Time)> { self.bounds }

    /// Whether `t` lies in the resolvable range.
    pub fn resolves(&self, t: Time) -> bool {
        if !t.is_finite() { return false; }
        match self.bounds {
            Some((lo, hi)) => t >= lo && t <= hi,
            None => true,
        }
    }

    #[inline]
    pub fn to_px(&self, t: Time) -> f32 {
        self.left_px + ((t - self.start) * self.px_per_unit) as f32
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> Time {
        self.start + (px - self.left_px) as f64 / self.px_per_unit
    }

    /// Zoom by `factor` (> 1 zooms in) keeping the time under `cursor_px` fixed.
    pub fn zoom_at(&mut self, cursor_px: f32, factor: f32) {
        let anchor = self.from_px(cursor_px);
        self.px_per_unit = sanitize_spacing(self.px_per_unit * factor.clamp(0.1, 10.0) as f64);
        // keep anchor under cursor: solve for new start so to_px(anchor) == cursor_px
        self.start = anchor - (cursor_px - self.left_px) as f64 / self.px_per_unit;
    }

    pub fn pan_px(&mut self, dx_px: f32) {
        self.start -= dx_px as f64 / self.px_per_unit;
    }

    /// Map `[first, last]` onto `width_px` pixels starting at `left_px`.
    pub fn fit(&mut self, first: Time, last: Time, width_px: f32) {
        let span = (last - first).abs().max(1e-9);
        self.start = first.min(last);
        self.px_per_unit = sanitize_spacing(width_px.max(1.0) as f64 / span);
    }
}

fn sanitize_spacing(spacing: f64) -> f64 {
    if spacing.is_finite() && spacing > 0.0 { spacing.max(1e-12) } else { 1.0 }
}

/// Vertical value scale mapping a price range to [top, bottom] pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: Price,
    pub vmax: Price,
    pub log: bool,
    // cached log endpoints when log is true
    log_min: f64,
    log_max: f64,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: Price, vmax: Price) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax, log: false, log_min: 0.0, log_max: 0.0 };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }

    pub fn new_log10(top_px: f32, bottom_px: f32, mut vmin: Price, mut vmax: Price) -> Self {
        // Ensure strictly positive range for log scale
        let eps = 1e-12;
        vmin = if vmin <= eps { eps } else { vmin };
        vmax = if vmax <= vmin { vmin * 10.0 } else { vmax };
        Self { top_px, bottom_px, vmin, vmax, log: true, log_min: vmin.log10(), log_max: vmax.log10() }
    }

    fn height(&self) -> f64 {
        ((self.bottom_px - self.top_px) as f64).max(1.0)
    }

    /// Prices the active mapping cannot place (non-finite, or non-positive on log).
    pub fn resolves(&self, y: Price) -> bool {
        y.is_finite() && (!self.log || y > 0.0)
    }

    #[inline]
    pub fn to_px(&self, y: Price) -> f32 {
        let frac = if self.log {
            let span = (self.log_max - self.log_min).max(1e-12);
            (y.max(1e-12).log10() - self.log_min) / span
        } else {
            let span = (self.vmax - self.vmin).max(1e-12);
            (y - self.vmin) / span
        };
        (self.bottom_px as f64 - frac * self.height()) as f32
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> Price {
        let frac = (self.bottom_px - py) as f64 / self.height();
        if self.log {
            let span = (self.log_max - self.log_min).max(1e-12);
            10f64.powf(self.log_min + frac * span)
        } else {
            let span = (self.vmax - self.vmin).max(1e-12);
            self.vmin + frac * span
        }
    }

    pub fn set_pixels(&mut self, top_px: f32, bottom_px: f32) {
        self.top_px = top_px;
        self.bottom_px = bottom_px.max(top_px + 1.0);
    }

    pub fn set_range(&mut self, vmin: Price, vmax: Price) {
        *self = if self.log {
            Self::new_log10(self.top_px, self.bottom_px, vmin, vmax)
        } else {
            Self::new_linear(self.top_px, self.bottom_px, vmin, vmax)
        };
    }

    pub fn pan_px(&mut self, dy_px: f32) {
        let frac = dy_px as f64 / self.height();
        if self.log {
            // Pan in log domain
            let delta = (self.log_max - self.log_min).max(1e-12) * frac;
            self.log_min += delta;
            self.log_max += delta;
            self.vmin = 10f64.powf(self.log_min);
            self.vmax = 10f64.powf(self.log_max);
        } else {
            let delta = (self.vmax - self.vmin).max(1e-12) * frac;
            self.vmin += delta;
            self.vmax += delta;
        }
    }

    /// Zoom by `factor` (> 1 zooms in) keeping the price under `cursor_px` fixed.
    pub fn zoom_at(&mut self, cursor_px: f32, factor: f32) {
        let factor = factor.clamp(0.1, 10.0) as f64;
        let frac = ((self.bottom_px - cursor_px) as f64 / self.height()).clamp(0.0, 1.0);
        if self.log {
            let anchor = self.from_px(cursor_px).max(1e-12).log10();
            let new_span = ((self.log_max - self.log_min) / factor).max(1e-9);
            self.log_min = anchor - frac * new_span;
            self.log_max = self.log_min + new_span;
            self.vmin = 10f64.powf(self.log_min);
            self.vmax = 10f64.powf(self.log_max);
        } else {
            let anchor = self.from_px(cursor_px);
            let new_span = ((self.vmax - self.vmin) / factor).max(1e-9);
            self.vmin = anchor - frac * new_span;
            self.vmax = self.vmin + new_span;
        }
    }
}
