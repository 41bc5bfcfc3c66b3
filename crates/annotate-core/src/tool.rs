// File: crates/annotate-core/src/tool.rs
// Summary: Tool selection (including the non-drawing mode) and per-tool point arity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Active tool as chosen in the toolbar. `None` is selection mode and never draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    #[serde(alias = "select")]
    None,
    Trendline,
    Ray,
    HorizontalLine,
    VerticalLine,
    Rectangle,
    Brush,
}

/// Tools that produce a drawing. This is what stored drawings and drafts carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawingTool {
    Trendline,
    Ray,
    HorizontalLine,
    VerticalLine,
    Rectangle,
    Brush,
}

/// Number of control points a tool accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub const fn min(&self) -> usize {
        match *self {
            Arity::Exactly(n) | Arity::AtLeast(n) => n,
        }
    }

    pub const fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl DrawingTool {
    pub const ALL: [DrawingTool; 6] = [
        DrawingTool::Trendline,
        DrawingTool::Ray,
        DrawingTool::HorizontalLine,
        DrawingTool::VerticalLine,
        DrawingTool::Rectangle,
        DrawingTool::Brush,
    ];

    pub const fn arity(&self) -> Arity {
        match self {
            DrawingTool::Trendline | DrawingTool::Ray | DrawingTool::Rectangle => Arity::Exactly(2),
            DrawingTool::HorizontalLine | DrawingTool::VerticalLine => Arity::Exactly(1),
            DrawingTool::Brush => Arity::AtLeast(2),
        }
    }

    /// Single-point tools commit on pointer down without a draft phase.
    pub const fn is_single_point(&self) -> bool {
        matches!(self, DrawingTool::HorizontalLine | DrawingTool::VerticalLine)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DrawingTool::Trendline => "trendline",
            DrawingTool::Ray => "ray",
            DrawingTool::HorizontalLine => "horizontal-line",
            DrawingTool::VerticalLine => "vertical-line",
            DrawingTool::Rectangle => "rectangle",
            DrawingTool::Brush => "brush",
        }
    }
}

impl ToolKind {
    pub const fn drawing_tool(&self) -> Option<DrawingTool> {
        match self {
            ToolKind::None => None,
            ToolKind::Trendline => Some(DrawingTool::Trendline),
            ToolKind::Ray => Some(DrawingTool::Ray),
            ToolKind::HorizontalLine => Some(DrawingTool::HorizontalLine),
            ToolKind::VerticalLine => Some(DrawingTool::VerticalLine),
            ToolKind::Rectangle => Some(DrawingTool::Rectangle),
            ToolKind::Brush => Some(DrawingTool::Brush),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self.drawing_tool() {
            Some(tool) => tool.as_str(),
            None => "none",
        }
    }
}

impl From<DrawingTool> for ToolKind {
    fn from(tool: DrawingTool) -> Self {
        match tool {
            DrawingTool::Trendline => ToolKind::Trendline,
            DrawingTool::Ray => ToolKind::Ray,
            DrawingTool::HorizontalLine => ToolKind::HorizontalLine,
            DrawingTool::VerticalLine => ToolKind::VerticalLine,
            DrawingTool::Rectangle => ToolKind::Rectangle,
            DrawingTool::Brush => ToolKind::Brush,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl fmt::Display for DrawingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ToolKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "none" || key == "select" {
            return Ok(ToolKind::None);
        }
        DrawingTool::ALL
            .iter()
            .find(|t| t.as_str() == key)
            .map(|&t| ToolKind::from(t))
            .ok_or_else(|| OverlayError::UnknownTool(s.to_string()))
    }
}
