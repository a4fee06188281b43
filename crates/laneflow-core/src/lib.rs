//! Laneflow Core Types and Operations
//!
//! This crate provides the foundational geometry and interaction logic for
//! the Laneflow swimlane editor engine. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Viewport**: Pan/zoom state and screen↔world transforms ([`viewport`])
//! - **Lanes**: User-defined lane containment and coordinate conversion ([`lane`])
//! - **Bands**: The fixed organizational-tier band table ([`band`])
//! - **Drag**: The per-gesture drag transaction state machine ([`drag`])
//!
//! Everything here is pure: no rendering, no I/O, no global state. Geometry
//! lookups that fail (unknown lane id, NaN input) resolve to `None` or leave
//! state unchanged rather than returning errors, so one bad coordinate never
//! takes an editing session down.

pub mod band;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod lane;
pub mod viewport;

pub use error::GestureError;
