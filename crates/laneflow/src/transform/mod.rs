//! Bidirectional document ↔ visual-graph transformation.
//!
//! Deserialization resolves stored (lane- or band-relative) positions into
//! world space and materializes container backdrops; serialization runs the
//! other way and *re-infers* container membership from each element's
//! vertical center, healing stale assignments instead of trusting
//! bookkeeping. Dangling references never abort a transform: they are
//! collected as warnings and the affected element falls back to world
//! coordinates.

pub mod org;
pub mod process;

pub use org::OrgView;
pub use process::ProcessView;
