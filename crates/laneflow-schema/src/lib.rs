//! Laneflow Document Model
//!
//! The persisted, versioned schema for swimlane process documents. It
//! includes:
//!
//! - **Schema**: serde types for the tiered document format ([`schema`])
//! - **Validation**: shape validation with field paths and dangling-reference
//!   warnings ([`validate`])
//! - **Legacy**: the older flat node/edge shape and its upgrade path
//!   ([`legacy`])
//!
//! The document is pure data: all behavior (coordinate conversion,
//! transformation to a live graph) lives in `laneflow-core` and `laneflow`.
//! Catalog entries are referenced by id only, never embedded, so catalog
//! edits retroactively affect every referencing node without migration.

pub mod error;
pub mod legacy;
pub mod schema;
pub mod validate;

pub use error::SchemaError;
pub use legacy::AnyDocument;
pub use schema::Document;
