// File: crates/annotate-core/src/theme.rs
// Summary: Light/Dark theming for the drawing layer (draft preview and rectangle fill).

use crate::color::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Stroke color for the in-progress draft. Never part of the palette.
    pub preview: Rgba,
    /// Fill opacity applied to the drawing color inside rectangles.
    pub rect_fill_alpha: f32,
    /// Opacity multiplier for horizontal/vertical guide lines.
    pub guide_alpha: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            preview: Rgba::new(148, 163, 184, 204), // slate-400 @ 0.8
            rect_fill_alpha: 0.08,
            guide_alpha: 1.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            preview: Rgba::new(100, 116, 139, 204), // slate-500 @ 0.8
            rect_fill_alpha: 0.12,
            guide_alpha: 0.9,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::dark() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::dark()
}
