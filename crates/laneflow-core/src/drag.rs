//! The per-gesture drag transaction state machine.
//!
//! One [`DragGesture`] instance lives for exactly one pointer gesture. It
//! captures a node's *rendered* world position on pointer-down (the data
//! model may be stale relative to the screen), follows the pointer with
//! visual-only updates, and on release reports either a [`DragOutcome::Click`]
//! (sub-threshold travel, visual delta discarded) or a
//! [`DragOutcome::Commit`] carrying the final visual position for the caller
//! to write into the data model.
//!
//! The machine is an explicit tagged union (`Idle | Armed | Dragging`)
//! rather than a mutable strategy reference. Plain clicks are handed off to
//! whatever alternate handler is active through the [`ClickSink`] trait.

use log::{debug, trace};

use crate::error::GestureError;
use crate::geometry::Point;

/// Screen-space pointer travel below which a gesture is a click, not a drag.
pub const CLICK_THRESHOLD_PX: f32 = 15.0;

/// Everything captured at pointer-down time, before any movement.
#[derive(Debug, Clone)]
pub struct DragCapture {
    /// Id of the node under the pointer.
    pub node_id: String,
    /// The node's rendered world position, read from the current render
    /// rather than the data model to avoid a visible jump at drag start.
    pub rendered_world: Point,
    /// Pointer position in world space.
    pub pointer_world: Point,
    /// Pointer position in screen space, for click/drag disambiguation.
    pub pointer_screen: Point,
    /// Lane owning the node when the gesture started.
    pub lane_id: Option<String>,
}

/// Context carried through an active gesture.
#[derive(Debug, Clone)]
struct Context {
    node_id: String,
    start_lane: Option<String>,
    /// Pointer-to-node offset captured at activation.
    pointer_offset: Point,
    screen_start: Point,
    /// Last optimistic visual position handed to the render layer.
    last_visual: Point,
}

impl Context {
    fn new(capture: DragCapture) -> Self {
        Self {
            pointer_offset: capture.pointer_world.sub_point(capture.rendered_world),
            last_visual: capture.rendered_world,
            node_id: capture.node_id,
            start_lane: capture.lane_id,
            screen_start: capture.pointer_screen,
        }
    }

    fn travel(&self, pointer_screen: Point) -> f32 {
        pointer_screen.sub_point(self.screen_start).hypot()
    }
}

/// What a finished gesture asks the caller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// No gesture was active.
    None,
    /// Sub-threshold travel: discard the visual delta by re-rendering from
    /// the unchanged data model, then forward the click.
    Click { node_id: String },
    /// The gesture qualified as a drag; write the final position.
    Commit(DragCommit),
    /// The gesture was cancelled (e.g. pointer capture lost); discard the
    /// visual delta exactly like a click, but forward nothing.
    Reverted { node_id: String },
}

/// Payload of a committed drag: the node's final visual world position and
/// the lane it started in. Lane detection runs once, against this final
/// position; intermediate move positions are disposable.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub node_id: String,
    pub final_world: Point,
    pub start_lane: Option<String>,
}

/// Receiver for plain clicks that the drag machine declines to own.
///
/// The surrounding shell passes whichever alternate gesture handler is
/// active (connection building, selection, ...); the hand-off is an explicit
/// call, never a shared mutable "current strategy".
pub trait ClickSink {
    fn forward_click(&mut self, node_id: &str);
}

impl DragOutcome {
    /// Hands a click outcome to the alternate handler. Commit/revert/none
    /// outcomes are not forwarded.
    pub fn hand_off(&self, sink: &mut dyn ClickSink) {
        if let DragOutcome::Click { node_id } = self {
            sink.forward_click(node_id);
        }
    }
}

/// Gesture phases, as an explicit tagged union.
#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Armed(Context),
    Dragging(Context),
}

/// The drag transaction state machine. One instance per gesture.
///
/// Transition table:
///
/// | state    | event                          | next     |
/// |----------|--------------------------------|----------|
/// | Idle     | `arm` (no pan modifier)        | Armed    |
/// | Armed    | `pointer_move` ≥ threshold     | Dragging |
/// | Armed    | `release`                      | Idle (Click) |
/// | Dragging | `release` < threshold          | Idle (Click) |
/// | Dragging | `release` ≥ threshold          | Idle (Commit) |
/// | Armed/Dragging | `cancel`                 | Idle (Reverted) |
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: State,
}

impl DragGesture {
    /// Creates an idle gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while the gesture owns the pointer.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Returns true once the gesture has crossed the drag threshold.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    /// Id of the node owning the active gesture, if any.
    pub fn node_id(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::Armed(ctx) | State::Dragging(ctx) => Some(&ctx.node_id),
        }
    }

    /// Arms the gesture on pointer-down over a draggable node.
    ///
    /// Refused while a pan-mode modifier is engaged (the viewport owns the
    /// pointer then) and while another gesture is still active.
    pub fn arm(&mut self, capture: DragCapture, pan_modifier: bool) -> Result<(), GestureError> {
        if pan_modifier {
            return Err(GestureError::PanModifierEngaged);
        }
        match &self.state {
            State::Idle => {
                debug!(node_id = capture.node_id; "Drag gesture armed");
                self.state = State::Armed(Context::new(capture));
                Ok(())
            }
            State::Armed(ctx) | State::Dragging(ctx) => Err(GestureError::AlreadyActive {
                node_id: ctx.node_id.clone(),
            }),
        }
    }

    /// Follows the pointer: returns the node's new optimistic visual world
    /// position (`pointer_world − captured_offset`) for the render layer to
    /// apply. No data mutation happens here.
    ///
    /// Returns `None` while idle. Crossing the travel threshold promotes
    /// Armed → Dragging.
    pub fn pointer_move(&mut self, pointer_world: Point, pointer_screen: Point) -> Option<Point> {
        if !pointer_world.is_finite() {
            return None;
        }
        let promote = match &self.state {
            State::Idle => return None,
            State::Armed(ctx) => ctx.travel(pointer_screen) >= CLICK_THRESHOLD_PX,
            State::Dragging(_) => false,
        };

        if promote {
            if let State::Armed(ctx) = std::mem::take(&mut self.state) {
                trace!(node_id = ctx.node_id; "Drag gesture promoted to dragging");
                self.state = State::Dragging(ctx);
            }
        }

        match &mut self.state {
            State::Armed(ctx) | State::Dragging(ctx) => {
                ctx.last_visual = pointer_world.sub_point(ctx.pointer_offset);
                Some(ctx.last_visual)
            }
            State::Idle => None,
        }
    }

    /// Ends the gesture at pointer-up.
    ///
    /// Total screen-space travel since the gesture start decides the
    /// outcome: below [`CLICK_THRESHOLD_PX`] the gesture is a click and the
    /// visual delta must be discarded; at or above it, the final visual
    /// position is committed. Lane detection is the caller's job, evaluated
    /// once against [`DragCommit::final_world`].
    pub fn release(&mut self, pointer_screen: Point) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            State::Idle => DragOutcome::None,
            State::Armed(ctx) | State::Dragging(ctx) => {
                let travel = ctx.travel(pointer_screen);
                if travel < CLICK_THRESHOLD_PX {
                    debug!(node_id = ctx.node_id, travel; "Gesture below threshold, treated as click");
                    DragOutcome::Click {
                        node_id: ctx.node_id,
                    }
                } else {
                    debug!(node_id = ctx.node_id, travel; "Gesture committed");
                    DragOutcome::Commit(DragCommit {
                        node_id: ctx.node_id,
                        final_world: ctx.last_visual,
                        start_lane: ctx.start_lane,
                    })
                }
            }
        }
    }

    /// Aborts the gesture, e.g. on pointer-capture loss.
    ///
    /// The node snaps back to its last committed position: the visual delta
    /// is discarded like a sub-threshold click, but no click is forwarded.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            State::Idle => DragOutcome::None,
            State::Armed(ctx) | State::Dragging(ctx) => {
                debug!(node_id = ctx.node_id; "Gesture cancelled, reverting");
                DragOutcome::Reverted {
                    node_id: ctx.node_id,
                }
            }
        }
    }
}
