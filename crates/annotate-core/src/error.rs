// File: crates/annotate-core/src/error.rs
// Summary: Error type for the overlay engine (configuration, store and surface failures).

use thiserror::Error;

use crate::tool::{Arity, DrawingTool};

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("{tool} requires {required} point(s), got {got}")]
    Arity { tool: DrawingTool, required: Arity, got: usize },

    #[error("drawing palette must contain at least one color")]
    EmptyPalette,

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("unknown drawing tool '{0}'")]
    UnknownTool(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("surface error: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
