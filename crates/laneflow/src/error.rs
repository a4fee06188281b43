//! The engine-level error type.

use thiserror::Error;

use laneflow_core::GestureError;
use laneflow_schema::SchemaError;

/// Errors surfaced by the engine facade.
///
/// Geometry lookups never produce errors (unknown lanes and NaN inputs
/// resolve to safe defaults in `laneflow-core`); what does error out is
/// document structure, missing entities, and gesture protocol misuse.
#[derive(Debug, Error)]
pub enum LaneflowError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error("process graph `{graph_id}` not found in document")]
    GraphNotFound { graph_id: String },

    #[error("node `{node_id}` not found")]
    NodeNotFound { node_id: String },

    #[error("node `{node_id}` is not draggable")]
    NotDraggable { node_id: String },

    #[error("no document stored for project `{project_id}`")]
    DocumentNotFound { project_id: String },

    #[error("malformed telemetry payload: {0}")]
    Telemetry(#[source] serde_json::Error),
}
