// File: crates/annotate-render-skia/src/lib.rs
// Summary: Skia CPU raster surface implementing the overlay `Surface` trait, with PNG and RGBA8 read-back.

use std::path::Path;

use annotate_core::render::{Primitive, StrokeStyle, Surface};
use annotate_core::{OverlayError, Rgba, SurfaceSize};
use log::debug;
use skia_safe as skia;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkiaSurfaceError {
    #[error("failed to create raster surface {width}x{height}")]
    Allocate { width: i32, height: i32 },
    #[error("encode PNG failed")]
    Encode,
    #[error("failed to read back surface pixels")]
    ReadPixels,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<SkiaSurfaceError> for OverlayError {
    fn from(e: SkiaSurfaceError) -> Self {
        OverlayError::Surface(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SkiaSurfaceError>;

/// Tightly packed RGBA8 (unpremultiplied) frame.
#[derive(Clone, Debug)]
pub struct Rgba8Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: usize,
}

impl Rgba8Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height { return None; }
        let i = y as usize * self.stride + x as usize * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }
}

/// Overlay layer backed by a Skia CPU raster surface.
///
/// The backing store is `floor(width * ratio) x floor(height * ratio)` device pixels;
/// primitives arrive in logical pixels and are scaled by the ratio when drawn.
pub struct SkiaSurface {
    size: SurfaceSize,
    surface: skia::Surface,
}

impl SkiaSurface {
    pub fn new(size: SurfaceSize) -> Result<Self> {
        let surface = allocate(size)?;
        Ok(Self { size, surface })
    }

    /// Backing-store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.surface.width() as u32, self.surface.height() as u32)
    }

    pub fn encode_png(&mut self) -> Result<Vec<u8>> {
        let image = self.surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or(SkiaSurfaceError::Encode)?;
        Ok(data.as_bytes().to_vec())
    }

    /// Write the current frame as PNG, creating parent directories as needed.
    pub fn write_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.encode_png()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), bytes)?;
        debug!("wrote overlay frame to {}", path.as_ref().display());
        Ok(())
    }

    pub fn to_rgba8(&mut self) -> Result<Rgba8Frame> {
        let (w, h) = (self.surface.width(), self.surface.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut pixels = vec![0u8; stride * h as usize];
        if !self.surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
            return Err(SkiaSurfaceError::ReadPixels);
        }
        Ok(Rgba8Frame { pixels, width: w as u32, height: h as u32, stride })
    }
}

impl Surface for SkiaSurface {
    fn size(&self) -> SurfaceSize { self.size }

    fn resize(&mut self, size: SurfaceSize) -> annotate_core::Result<()> {
        if size.physical() != self.size.physical() {
            self.surface = allocate(size)?;
        }
        self.size = size;
        Ok(())
    }

    fn clear(&mut self) {
        self.surface.canvas().clear(skia::Color::TRANSPARENT);
    }

    fn draw(&mut self, primitive: &Primitive) {
        let ratio = self.size.pixel_ratio;
        let canvas = self.surface.canvas();
        canvas.save();
        canvas.scale((ratio, ratio));
        match primitive {
            Primitive::Line { from, to, stroke } => {
                canvas.draw_line((from.x, from.y), (to.x, to.y), &stroke_paint(stroke));
            }
            Primitive::Polyline { points, stroke } => {
                if let Some((first, rest)) = points.split_first() {
                    let mut path = skia::Path::new();
                    path.move_to((first.x, first.y));
                    for p in rest {
                        path.line_to((p.x, p.y));
                    }
                    let mut paint = stroke_paint(stroke);
                    paint.set_stroke_join(skia::paint::Join::Round);
                    paint.set_stroke_cap(skia::paint::Cap::Round);
                    canvas.draw_path(&path, &paint);
                }
            }
            Primitive::Rect { rect, stroke, fill } => {
                let r = skia::Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom);
                if let Some(fill) = fill {
                    let mut body = skia::Paint::default();
                    body.set_anti_alias(true);
                    body.set_style(skia::paint::Style::Fill);
                    body.set_color(to_skia(*fill));
                    canvas.draw_rect(r, &body);
                }
                canvas.draw_rect(r, &stroke_paint(stroke));
            }
        }
        canvas.restore();
    }
}

fn allocate(size: SurfaceSize) -> Result<skia::Surface> {
    let (w, h) = size.physical();
    // Skia refuses empty surfaces; keep a 1x1 store for collapsed layouts.
    let (w, h) = (w.max(1) as i32, h.max(1) as i32);
    let surface = skia::surfaces::raster_n32_premul((w, h))
        .ok_or(SkiaSurfaceError::Allocate { width: w, height: h })?;
    debug!("allocated {}x{} overlay surface (ratio {})", w, h, size.pixel_ratio);
    Ok(surface)
}

fn to_skia(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn stroke_paint(stroke: &StrokeStyle) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(stroke.width);
    paint.set_color(to_skia(stroke.color));
    if let Some(dash) = &stroke.dash {
        paint.set_path_effect(skia::PathEffect::dash(dash, 0.0));
    }
    paint
}
