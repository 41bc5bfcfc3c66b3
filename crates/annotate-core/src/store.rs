// File: crates/annotate-core/src/store.rs
// Summary: Insertion-ordered store of finalized drawings with round-robin palette colors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::color::{default_palette, Rgba};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::tool::DrawingTool;
use crate::types::DomainPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawingId(Uuid);

impl DrawingId {
    fn fresh() -> Self { Self(Uuid::new_v4()) }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.simple()) }
}

impl FromStr for DrawingId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
}

/// A committed annotation. Immutable once stored; only removal changes the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    id: DrawingId,
    tool: DrawingTool,
    points: Vec<DomainPoint>,
    color: Rgba,
    created_at: DateTime<Utc>,
}

impl Drawing {
    pub fn id(&self) -> DrawingId { self.id }
    pub fn tool(&self) -> DrawingTool { self.tool }
    pub fn points(&self) -> &[DomainPoint] { &self.points }
    pub fn color(&self) -> Rgba { self.color }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
}

#[derive(Clone, Debug)]
pub struct DrawingStore {
    drawings: Vec<Drawing>,
    palette: Vec<Rgba>,
    color_index: usize,
}

impl Default for DrawingStore {
    fn default() -> Self {
        Self { drawings: Vec::new(), palette: default_palette(), color_index: 0 }
    }
}

impl DrawingStore {
    pub fn new(palette: Vec<Rgba>) -> Result<Self> {
        Self::with_color_index(palette, 0)
    }

    /// Start the palette counter at `start` instead of the first slot.
    pub fn with_color_index(palette: Vec<Rgba>, start: usize) -> Result<Self> {
        if palette.is_empty() {
            return Err(OverlayError::EmptyPalette);
        }
        Ok(Self { drawings: Vec::new(), palette, color_index: start })
    }

    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        Self::with_color_index(config.palette.clone(), config.start_color_index)
    }

    /// Commit a drawing, assigning a fresh id and the next palette color.
    /// The color counter only advances on success.
    pub fn add_drawing(&mut self, tool: DrawingTool, points: Vec<DomainPoint>) -> Result<&Drawing> {
        let required = tool.arity();
        if !required.accepts(points.len()) {
            return Err(OverlayError::Arity { tool, required, got: points.len() });
        }
        let color = self.next_color();
        self.color_index = self.color_index.wrapping_add(1);
        let drawing = Drawing { id: DrawingId::fresh(), tool, points, color, created_at: Utc::now() };
        debug!("committed {} {} with {} point(s), color {}", drawing.tool, drawing.id, drawing.points.len(), color);
        self.drawings.push(drawing);
        Ok(&self.drawings[self.drawings.len() - 1])
    }

    pub fn remove_drawing(&mut self, id: DrawingId) -> Option<Drawing> {
        let pos = self.drawings.iter().position(|d| d.id == id)?;
        let removed = self.drawings.remove(pos);
        debug!("removed {} {}", removed.tool, removed.id);
        Some(removed)
    }

    /// Drop every drawing; the palette counter keeps running.
    pub fn clear(&mut self) -> usize {
        let n = self.drawings.len();
        self.drawings.clear();
        if n > 0 { debug!("cleared {} drawing(s)", n); }
        n
    }

    pub fn get(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drawing> { self.drawings.iter() }
    pub fn as_slice(&self) -> &[Drawing] { &self.drawings }
    pub fn len(&self) -> usize { self.drawings.len() }
    pub fn is_empty(&self) -> bool { self.drawings.is_empty() }

    pub fn palette(&self) -> &[Rgba] { &self.palette }
    pub fn color_index(&self) -> usize { self.color_index }

    /// Color the next committed drawing will receive.
    pub fn next_color(&self) -> Rgba {
        self.palette[self.color_index % self.palette.len()]
    }
}

impl<'a> IntoIterator for &'a DrawingStore {
    type Item = &'a Drawing;
    type IntoIter = std::slice::Iter<'a, Drawing>;
    fn into_iter(self) -> Self::IntoIter { self.drawings.iter() }
}
