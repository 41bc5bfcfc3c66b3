// File: crates/annotate-core/src/color.rs
// Summary: 8-bit RGBA color with CSS-style parsing and the default drawing palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::OverlayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `factor` (0..=1).
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() { return None; }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    // rgb(r, g, b) or rgba(r, g, b, a) with a in 0..=1
    fn parse_functional(body: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected { return None; }
        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = if with_alpha {
            let a = parts[3].parse::<f32>().ok()?;
            if !(0.0..=1.0).contains(&a) { return None; }
            (a * 255.0).round() as u8
        } else {
            255
        };
        Some(Self::new(r, g, b, a))
    }
}

impl FromStr for Rgba {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let parsed = if let Some(hex) = t.strip_prefix('#') {
            Self::parse_hex(hex)
        } else if let Some(body) = t.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            Self::parse_functional(body, true)
        } else if let Some(body) = t.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            Self::parse_functional(body, false)
        } else {
            None
        };
        parsed.ok_or_else(|| OverlayError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Round-robin palette for finalized drawings.
pub fn default_palette() -> Vec<Rgba> {
    vec![
        Rgba::opaque(0x38, 0xbd, 0xf8), // sky
        Rgba::opaque(0xf4, 0x72, 0xb6), // pink
        Rgba::opaque(0xfa, 0xcc, 0x15), // amber
        Rgba::opaque(0x34, 0xd3, 0x99), // emerald
        Rgba::opaque(0xa7, 0x8b, 0xfa), // violet
        Rgba::opaque(0xfb, 0x92, 0x3c), // orange
        Rgba::opaque(0xf8, 0x71, 0x71), // red
        Rgba::opaque(0x22, 0xd3, 0xee), // cyan
    ]
}
