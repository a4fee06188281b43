//! Error types for gesture handling.
//!
//! Geometry lookups in this crate deliberately do *not* error: an unknown
//! lane id or a NaN coordinate resolves to `None`/no-op so that one bad node
//! never blocks the rest of the graph. The only fallible surface is the drag
//! state machine, whose misuse by the surrounding shell is a programming
//! error worth reporting.

use thiserror::Error;

/// Errors from the drag gesture state machine.
#[derive(Debug, Error)]
pub enum GestureError {
    /// `arm` was called while a gesture was already active.
    #[error("a drag gesture is already active for node `{node_id}`")]
    AlreadyActive { node_id: String },

    /// `arm` was called while a pan-mode modifier was engaged; the viewport
    /// owns the pointer for the duration of the pan.
    #[error("pan modifier engaged; pointer belongs to the viewport")]
    PanModifierEngaged,
}
