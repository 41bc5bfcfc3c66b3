// File: crates/annotate-core/src/render.rs
// Summary: Drawing renderer: projects domain points through the bridge and emits tool geometry.

use log::trace;

use crate::bridge::{project_points, CoordinateBridge};
use crate::color::Rgba;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::gesture::Draft;
use crate::store::Drawing;
use crate::theme::Theme;
use crate::tool::DrawingTool;
use crate::types::{DomainPoint, Pixel, PixelRect, SurfaceSize};

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    /// On/off dash lengths; `None` draws solid.
    pub dash: Option<Vec<f32>>,
}

/// Renderer-agnostic paint command in surface-local logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line { from: Pixel, to: Pixel, stroke: StrokeStyle },
    Polyline { points: Vec<Pixel>, stroke: StrokeStyle },
    Rect { rect: PixelRect, stroke: StrokeStyle, fill: Option<Rgba> },
}

impl Primitive {
    pub fn stroke(&self) -> &StrokeStyle {
        match self {
            Primitive::Line { stroke, .. }
            | Primitive::Polyline { stroke, .. }
            | Primitive::Rect { stroke, .. } => stroke,
        }
    }
}

/// Pixel target for the overlay layer.
pub trait Surface {
    /// Current logical size and pixel ratio.
    fn size(&self) -> SurfaceSize;
    /// Reallocate the backing store for `size`; drawing stays in logical pixels.
    fn resize(&mut self, size: SurfaceSize) -> Result<()>;
    /// Erase to fully transparent.
    fn clear(&mut self);
    fn draw(&mut self, primitive: &Primitive);
}

/// In-memory display list; keeps only the most recent frame.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: SurfaceSize,
    primitives: Vec<Primitive>,
    clears: usize,
    resizes: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { size: SurfaceSize::new(width, height, 1.0), primitives: Vec::new(), clears: 0, resizes: 0 }
    }
    pub fn primitives(&self) -> &[Primitive] { &self.primitives }
    pub fn clear_count(&self) -> usize { self.clears }
    pub fn resize_count(&self) -> usize { self.resizes }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize { self.size }

    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        self.size = size;
        self.resizes += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.primitives.clear();
        self.clears += 1;
    }

    fn draw(&mut self, primitive: &Primitive) {
        self.primitives.push(primitive.clone());
    }
}

/// Stroke settings shared by every pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub line_width: f32,
    pub brush_width: f32,
    pub guide_dash: Vec<f32>,
    pub ray_extension: f32,
    pub theme: Theme,
}

impl Default for RenderStyle {
    fn default() -> Self { Self::from_config(&OverlayConfig::default()) }
}

impl RenderStyle {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            line_width: config.stroke.line_width,
            brush_width: config.stroke.brush_width,
            guide_dash: config.stroke.guide_dash.clone(),
            ray_extension: config.ray.extension,
            theme: config.theme(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Stored drawings painted this pass.
    pub painted: usize,
    /// Stored drawings left out because too few points projected.
    pub skipped: usize,
    pub draft_painted: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self { Self { style } }

    pub fn style(&self) -> &RenderStyle { &self.style }

    pub fn set_theme(&mut self, theme: Theme) { self.style.theme = theme; }

    /// Full pass: clear, then stored drawings in insertion order, then the draft on top.
    pub fn paint<S, B>(&self, surface: &mut S, drawings: &[Drawing], draft: Option<&Draft>, bridge: &B) -> FrameStats
    where
        S: Surface + ?Sized,
        B: CoordinateBridge + ?Sized,
    {
        surface.clear();
        let size = surface.size();
        let mut stats = FrameStats::default();

        for d in drawings {
            match self.primitive(d.tool(), d.points(), d.color(), size, bridge) {
                Some(p) => {
                    surface.draw(&p);
                    stats.painted += 1;
                }
                None => stats.skipped += 1,
            }
        }

        if let Some(draft) = draft {
            if let Some(p) = self.primitive(draft.tool(), draft.points(), self.style.theme.preview, size, bridge) {
                surface.draw(&p);
                stats.draft_painted = true;
            }
        }

        trace!("render pass: {} painted, {} skipped, draft={}", stats.painted, stats.skipped, stats.draft_painted);
        stats
    }

    /// Project `points` and build the tool geometry; `None` when too few points resolve.
    pub fn primitive<B>(&self, tool: DrawingTool, points: &[DomainPoint], color: Rgba, size: SurfaceSize, bridge: &B) -> Option<Primitive>
    where
        B: CoordinateBridge + ?Sized,
    {
        let pixels = project_points(bridge, points);
        self.geometry(tool, &pixels, color, size)
    }

    /// Tool-specific geometry for already projected points.
    pub fn geometry(&self, tool: DrawingTool, pixels: &[Pixel], color: Rgba, size: SurfaceSize) -> Option<Primitive> {
        if pixels.len() < tool.arity().min() {
            return None;
        }
        let geometry = match tool {
            DrawingTool::Trendline => self.trendline(pixels, color),
            DrawingTool::Ray => self.ray(pixels, color, size),
            DrawingTool::HorizontalLine => self.horizontal_guide(pixels[0], color, size),
            DrawingTool::VerticalLine => self.vertical_guide(pixels[0], color, size),
            DrawingTool::Rectangle => self.rectangle(pixels, color),
            DrawingTool::Brush => self.brush(pixels, color),
        };
        Some(geometry)
    }

    fn solid(&self, color: Rgba, width: f32) -> StrokeStyle {
        StrokeStyle { color, width, dash: None }
    }

    fn dashed(&self, color: Rgba) -> StrokeStyle {
        let dash = (!self.style.guide_dash.is_empty()).then(|| self.style.guide_dash.clone());
        StrokeStyle { color: color.with_alpha_factor(self.style.theme.guide_alpha), width: self.style.line_width, dash }
    }

    fn trendline(&self, p: &[Pixel], color: Rgba) -> Primitive {
        Primitive::Line { from: p[0], to: p[1], stroke: self.solid(color, self.style.line_width) }
    }

    // Ray length is a multiple of the surface width rather than an exact clip.
    fn ray(&self, p: &[Pixel], color: Rgba, size: SurfaceSize) -> Primitive {
        let (start, through) = (p[0], p[1]);
        let angle = (through.y - start.y).atan2(through.x - start.x);
        let len = size.width * self.style.ray_extension;
        let end = Pixel::new(start.x + angle.cos() * len, start.y + angle.sin() * len);
        Primitive::Line { from: start, to: end, stroke: self.solid(color, self.style.line_width) }
    }

    fn horizontal_guide(&self, at: Pixel, color: Rgba, size: SurfaceSize) -> Primitive {
        Primitive::Line { from: Pixel::new(0.0, at.y), to: Pixel::new(size.width, at.y), stroke: self.dashed(color) }
    }

    fn vertical_guide(&self, at: Pixel, color: Rgba, size: SurfaceSize) -> Primitive {
        Primitive::Line { from: Pixel::new(at.x, 0.0), to: Pixel::new(at.x, size.height), stroke: self.dashed(color) }
    }

    fn rectangle(&self, p: &[Pixel], color: Rgba) -> Primitive {
        Primitive::Rect {
            rect: PixelRect::from_corners(p[0], p[1]),
            stroke: self.solid(color, self.style.line_width),
            fill: Some(color.with_alpha_factor(self.style.theme.rect_fill_alpha)),
        }
    }

    fn brush(&self, p: &[Pixel], color: Rgba) -> Primitive {
        Primitive::Polyline { points: p.to_vec(), stroke: self.solid(color, self.style.brush_width) }
    }
}
