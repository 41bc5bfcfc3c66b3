// File: crates/annotate-core/src/overlay.rs
// Summary: Drawing overlay facade wiring pointer input, gesture machine, store, renderer and surface.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};

use crate::bridge::CoordinateBridge;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::gesture::{Draft, GestureMachine, Transition};
use crate::notifier::{Subscription, ViewportNotifier};
use crate::render::{FrameStats, RenderStyle, Renderer, Surface};
use crate::store::{Drawing, DrawingId, DrawingStore};
use crate::theme::Theme;
use crate::tool::{DrawingTool, ToolKind};
use crate::types::{ClientRect, DomainPoint, SurfaceSize};

/// Raw pointer input in client (window) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave,
}

/// Annotation layer on top of a chart.
///
/// Single-threaded: every call runs to completion. Anything that changes what is on
/// screen (store, draft, theme, bounds, viewport) marks the overlay dirty; the host
/// calls [`DrawingOverlay::render_if_needed`] once per frame.
pub struct DrawingOverlay<S: Surface> {
    store: DrawingStore,
    gesture: GestureMachine,
    renderer: Renderer,
    surface: Option<S>,
    bounds: Option<ClientRect>,
    size: Option<SurfaceSize>,
    dirty: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}

impl<S: Surface> DrawingOverlay<S> {
    pub fn new(config: &OverlayConfig) -> Result<Self> {
        Ok(Self {
            store: DrawingStore::from_config(config)?,
            gesture: GestureMachine::new(config.default_tool),
            renderer: Renderer::new(RenderStyle::from_config(config)),
            surface: None,
            bounds: None,
            size: None,
            dirty: Rc::new(Cell::new(true)),
            subscription: None,
        })
    }

    // ---- lifecycle ---------------------------------------------------------

    /// Follow `notifier`: each viewport change only marks the overlay dirty. Nothing
    /// is painted from inside the notification; the host must call
    /// [`DrawingOverlay::render_if_needed`] each frame to pick the change up.
    /// Replaces any previous attachment. The registration lives until `detach` or drop.
    pub fn attach(&mut self, notifier: &ViewportNotifier) {
        let dirty = Rc::clone(&self.dirty);
        self.subscription = Some(notifier.subscribe(move |_| dirty.set(true)));
        self.dirty.set(true);
        debug!("overlay attached to viewport");
    }

    pub fn detach(&mut self) -> bool {
        let was = self.subscription.take().is_some();
        if was { debug!("overlay detached from viewport"); }
        was
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.as_ref().map(Subscription::is_active).unwrap_or(false)
    }

    /// Install the pixel surface, sized to the last known bounds.
    pub fn set_surface(&mut self, mut surface: S) -> Result<Option<S>> {
        if let Some(size) = self.size {
            surface.resize(size)?;
        }
        self.dirty.set(true);
        Ok(self.surface.replace(surface))
    }

    pub fn take_surface(&mut self) -> Option<S> { self.surface.take() }
    pub fn surface(&self) -> Option<&S> { self.surface.as_ref() }
    pub fn surface_mut(&mut self) -> Option<&mut S> { self.surface.as_mut() }

    /// Track the surface's client rect and pixel ratio. Returns true when the
    /// backing size changed (surface resized and a re-render scheduled).
    pub fn set_bounds(&mut self, rect: ClientRect, pixel_ratio: f32) -> Result<bool> {
        self.bounds = Some(rect);
        let size = SurfaceSize::new(rect.width as f32, rect.height as f32, pixel_ratio);
        if self.size == Some(size) {
            return Ok(false);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(size)?;
        }
        self.size = Some(size);
        self.dirty.set(true);
        Ok(true)
    }

    // ---- input -------------------------------------------------------------

    pub fn active_tool(&self) -> ToolKind { self.gesture.active_tool() }

    pub fn set_active_tool(&mut self, tool: ToolKind) -> Transition {
        let t = self.gesture.set_active_tool(tool);
        if !t.is_ignored() { self.dirty.set(true); }
        t
    }

    /// Feed one pointer event. Positions that do not resolve to a domain point are
    /// ignored on down/move; on up the draft finalizes with what it has.
    pub fn handle_pointer<B>(&mut self, event: PointerEvent, bridge: &B) -> Transition
    where
        B: CoordinateBridge + ?Sized,
    {
        let transition = match event {
            PointerEvent::Down { x, y } => match self.resolve(x, y, bridge) {
                Some(p) => self.gesture.pointer_down(p),
                None => Transition::Ignored,
            },
            PointerEvent::Move { x, y } => match self.resolve(x, y, bridge) {
                Some(p) => self.gesture.pointer_move(p),
                None => Transition::Ignored,
            },
            PointerEvent::Up { x, y } => {
                let p = self.resolve(x, y, bridge);
                self.gesture.pointer_up(p)
            }
            PointerEvent::Leave => self.gesture.pointer_leave(),
        };

        if let Transition::Finalized(done) = &transition {
            if let Err(e) = self.store.add_drawing(done.tool, done.points.clone()) {
                warn!("finalized {} rejected by store: {e}", done.tool);
            }
        }
        if !transition.is_ignored() {
            self.dirty.set(true);
        }
        transition
    }

    fn resolve<B>(&self, client_x: f64, client_y: f64, bridge: &B) -> Option<DomainPoint>
    where
        B: CoordinateBridge + ?Sized,
    {
        let local = self.bounds?.to_local(client_x, client_y);
        bridge.to_domain(local)
    }

    // ---- drawings ----------------------------------------------------------

    pub fn add_drawing(&mut self, tool: DrawingTool, points: Vec<DomainPoint>) -> Result<DrawingId> {
        let id = self.store.add_drawing(tool, points)?.id();
        self.dirty.set(true);
        Ok(id)
    }

    pub fn remove_drawing(&mut self, id: DrawingId) -> Option<Drawing> {
        let removed = self.store.remove_drawing(id);
        if removed.is_some() { self.dirty.set(true); }
        removed
    }

    pub fn clear_drawings(&mut self) -> usize {
        let n = self.store.clear();
        if n > 0 { self.dirty.set(true); }
        n
    }

    pub fn drawings(&self) -> &DrawingStore { &self.store }

    /// Current draft, for live feedback outside the canvas.
    pub fn draft(&self) -> Option<&Draft> { self.gesture.draft() }

    // ---- rendering ---------------------------------------------------------

    pub fn set_theme(&mut self, theme: Theme) {
        if self.renderer.style().theme != theme {
            self.renderer.set_theme(theme);
            self.dirty.set(true);
        }
    }

    pub fn theme(&self) -> Theme { self.renderer.style().theme }

    pub fn needs_render(&self) -> bool { self.dirty.get() }

    /// Force a repaint on the next `render_if_needed`, e.g. after the host chart
    /// redrew underneath without moving the viewport.
    pub fn request_render(&self) { self.dirty.set(true); }

    /// Paint now. `None` when no surface is installed (nothing drawn, dirty kept).
    pub fn render<B>(&mut self, bridge: &B) -> Option<FrameStats>
    where
        B: CoordinateBridge + ?Sized,
    {
        let surface = self.surface.as_mut()?;
        let stats = self.renderer.paint(surface, self.store.as_slice(), self.gesture.draft(), bridge);
        self.dirty.set(false);
        Some(stats)
    }

    pub fn render_if_needed<B>(&mut self, bridge: &B) -> Option<FrameStats>
    where
        B: CoordinateBridge + ?Sized,
    {
        if !self.dirty.get() { return None; }
        self.render(bridge)
    }
}
