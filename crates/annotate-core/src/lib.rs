// File: crates/annotate-core/src/lib.rs
// Summary: Annotation overlay engine entry point; exports the drawing, gesture and rendering API.

pub mod bridge;
pub mod color;
pub mod config;
pub mod error;
pub mod gesture;
pub mod notifier;
pub mod overlay;
pub mod render;
pub mod scale;
pub mod store;
pub mod theme;
pub mod tool;
pub mod types;
pub mod viewport;

pub use bridge::CoordinateBridge;
pub use color::Rgba;
pub use config::OverlayConfig;
pub use error::{OverlayError, Result};
pub use gesture::{Draft, GestureMachine, GestureState, Transition};
pub use notifier::{Subscription, ViewportChange, ViewportNotifier};
pub use overlay::{DrawingOverlay, PointerEvent};
pub use render::{FrameStats, Primitive, RecordingSurface, Renderer, StrokeStyle, Surface};
pub use store::{Drawing, DrawingId, DrawingStore};
pub use theme::Theme;
pub use tool::{Arity, DrawingTool, ToolKind};
pub use types::{ClientRect, DomainPoint, Pixel, PixelRect, SurfaceSize};
pub use viewport::ChartViewport;
