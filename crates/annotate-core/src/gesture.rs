// File: crates/annotate-core/src/gesture.rs
// Summary: Pointer-gesture state machine producing drafts and finalized drawings.

use log::trace;

use crate::tool::{DrawingTool, ToolKind};
use crate::types::DomainPoint;

/// In-progress drawing owned by the gesture machine. Never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    tool: DrawingTool,
    points: Vec<DomainPoint>,
}

impl Draft {
    fn start(tool: DrawingTool, first: DomainPoint) -> Self {
        Self { tool, points: vec![first] }
    }

    pub fn tool(&self) -> DrawingTool { self.tool }
    pub fn points(&self) -> &[DomainPoint] { &self.points }

    // brush: unbounded polyline; everything else: [first, latest]
    fn track(&mut self, point: DomainPoint) {
        match self.tool {
            DrawingTool::Brush => self.points.push(point),
            _ => {
                self.points.truncate(1);
                self.points.push(point);
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing(Draft),
}

/// A gesture that completed with enough points to become a drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Finalized {
    pub tool: DrawingTool,
    pub points: Vec<DomainPoint>,
}

/// Result of feeding one event to the machine.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    DraftStarted,
    DraftUpdated,
    /// Commit this drawing (the draft, if any, is gone).
    Finalized(Finalized),
    /// Gesture ended below the tool's minimum point count.
    Discarded,
    Cancelled,
}

impl Transition {
    pub fn is_ignored(&self) -> bool { matches!(self, Transition::Ignored) }
}

#[derive(Debug, Default)]
pub struct GestureMachine {
    active_tool: ToolKind,
    state: GestureState,
}

impl GestureMachine {
    pub fn new(active_tool: ToolKind) -> Self {
        Self { active_tool, state: GestureState::Idle }
    }

    pub fn active_tool(&self) -> ToolKind { self.active_tool }

    /// Switch tools. An open draft belongs to the old tool and is cancelled.
    pub fn set_active_tool(&mut self, tool: ToolKind) -> Transition {
        self.active_tool = tool;
        self.cancel()
    }

    pub fn state(&self) -> &GestureState { &self.state }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            GestureState::Drawing(draft) => Some(draft),
            GestureState::Idle => None,
        }
    }

    pub fn is_drawing(&self) -> bool { self.draft().is_some() }

    pub fn pointer_down(&mut self, point: DomainPoint) -> Transition {
        if self.is_drawing() { return Transition::Ignored; }
        let Some(tool) = self.active_tool.drawing_tool() else { return Transition::Ignored };

        if tool.is_single_point() {
            trace!("{} placed at ({}, {})", tool, point.time, point.price);
            return Transition::Finalized(Finalized { tool, points: vec![point] });
        }
        self.state = GestureState::Drawing(Draft::start(tool, point));
        trace!("{} draft started", tool);
        Transition::DraftStarted
    }

    pub fn pointer_move(&mut self, point: DomainPoint) -> Transition {
        match &mut self.state {
            GestureState::Drawing(draft) => {
                draft.track(point);
                Transition::DraftUpdated
            }
            GestureState::Idle => Transition::Ignored,
        }
    }

    /// Finish the gesture. `point` is `None` when the release position could not be
    /// resolved; the draft is then finalized with the points it already has.
    /// A release on the press point is tracked like any other, so a plain click with
    /// a two-point tool or the brush commits `[p, p]`.
    pub fn pointer_up(&mut self, point: Option<DomainPoint>) -> Transition {
        let GestureState::Drawing(mut draft) = std::mem::take(&mut self.state) else {
            return Transition::Ignored;
        };
        if let Some(p) = point {
            draft.track(p);
        }
        if draft.tool.arity().accepts(draft.points.len()) {
            Transition::Finalized(Finalized { tool: draft.tool, points: draft.points })
        } else {
            trace!("{} draft discarded with {} point(s)", draft.tool, draft.points.len());
            Transition::Discarded
        }
    }

    pub fn pointer_leave(&mut self) -> Transition {
        self.cancel()
    }

    pub fn cancel(&mut self) -> Transition {
        match std::mem::take(&mut self.state) {
            GestureState::Drawing(draft) => {
                trace!("{} draft cancelled", draft.tool);
                Transition::Cancelled
            }
            GestureState::Idle => Transition::Ignored,
        }
    }
}
