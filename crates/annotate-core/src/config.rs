// File: crates/annotate-core/src/config.rs
// Summary: Overlay configuration loaded from TOML (palette, theme, stroke and ray settings).

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::color::{default_palette, Rgba};
use crate::error::{OverlayError, Result};
use crate::theme::{self, Theme};
use crate::tool::ToolKind;

/// Root configuration. Every field has a default, so an empty file is valid.
///
/// ```toml
/// theme = "light"
/// default_tool = "trendline"
/// palette = ["#38bdf8", "#f472b6", "rgba(250, 204, 21, 0.9)"]
///
/// [stroke]
/// line_width = 1.75
/// brush_width = 2.0
/// guide_dash = [6.0, 4.0]
///
/// [ray]
/// extension = 1.5
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub theme: String,
    /// Tool active when the overlay is created.
    pub default_tool: ToolKind,
    pub palette: Vec<Rgba>,
    /// Palette slot used for the first finalized drawing.
    pub start_color_index: usize,
    pub stroke: StrokeConfig,
    pub ray: RayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub line_width: f32,
    pub brush_width: f32,
    /// On/off lengths for horizontal and vertical guide lines.
    pub guide_dash: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayConfig {
    /// Ray length as a multiple of the surface width.
    pub extension: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            default_tool: ToolKind::None,
            palette: default_palette(),
            start_color_index: 0,
            stroke: StrokeConfig::default(),
            ray: RayConfig::default(),
        }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self { line_width: 1.75, brush_width: 2.0, guide_dash: vec![6.0, 4.0] }
    }
}

impl Default for RayConfig {
    fn default() -> Self { Self { extension: 1.5 } }
}

impl OverlayConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: OverlayConfig = toml::from_str(raw)?;
        config.validate_and_clamp()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| OverlayError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        debug!("loaded overlay config from {}", path.display());
        Ok(config)
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }

    /// Clamp numeric settings into usable ranges; an empty palette is rejected.
    pub fn validate_and_clamp(&mut self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(OverlayError::EmptyPalette);
        }

        if !(0.5..=10.0).contains(&self.stroke.line_width) {
            warn!("Invalid line_width {:.2}, clamping to 0.5-10.0 range", self.stroke.line_width);
            self.stroke.line_width = clamp_or(self.stroke.line_width, 0.5, 10.0, 1.75);
        }
        if !(0.5..=10.0).contains(&self.stroke.brush_width) {
            warn!("Invalid brush_width {:.2}, clamping to 0.5-10.0 range", self.stroke.brush_width);
            self.stroke.brush_width = clamp_or(self.stroke.brush_width, 0.5, 10.0, 2.0);
        }
        if !(1.0..=10.0).contains(&self.ray.extension) {
            warn!("Invalid ray extension {:.2}, clamping to 1.0-10.0 range", self.ray.extension);
            self.ray.extension = clamp_or(self.ray.extension, 1.0, 10.0, 1.5);
        }

        // A dash pattern needs an even number of positive lengths.
        let dash_ok = self.stroke.guide_dash.is_empty()
            || (self.stroke.guide_dash.len() % 2 == 0
                && self.stroke.guide_dash.iter().all(|v| v.is_finite() && *v > 0.0));
        if !dash_ok {
            warn!("Invalid guide_dash {:?}, falling back to [6, 4]", self.stroke.guide_dash);
            self.stroke.guide_dash = StrokeConfig::default().guide_dash;
        }

        if !theme::presets().iter().any(|t| t.name.eq_ignore_ascii_case(&self.theme)) {
            warn!("Unknown theme '{}', using dark", self.theme);
            self.theme = "dark".to_string();
        }
        Ok(())
    }
}

fn clamp_or(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(lo, hi) }
}
