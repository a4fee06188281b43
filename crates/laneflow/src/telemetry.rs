//! Runtime telemetry: the live-stats feed and its merge into the visual
//! graph.
//!
//! Telemetry arrives as per-node JSON messages over a push stream scoped to
//! one project. Each message patches exactly the runtime-stats fields of the
//! addressed element. Positions, labels, and structure are never touched by
//! telemetry. Messages for elements that no longer exist (removed by a
//! concurrent edit) are dropped with a debug log, never an error.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::LaneflowError;
use crate::visual::VisualGraph;

/// Live per-node runtime statistics, rendered on top of the element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeStats {
    pub active_count: Option<u32>,
    pub avg_wait_time: Option<f32>,
    pub status: Option<String>,
}

impl RuntimeStats {
    /// Applies a patch field-by-field: present fields overwrite, absent
    /// fields keep their previous value.
    pub fn apply(&mut self, patch: &StatsPatch) {
        if let Some(active_count) = patch.active_count {
            self.active_count = Some(active_count);
        }
        if let Some(avg_wait_time) = patch.avg_wait_time {
            self.avg_wait_time = Some(avg_wait_time);
        }
        if let Some(status) = &patch.status {
            self.status = Some(status.clone());
        }
    }
}

/// The stats fragment of one telemetry message. All fields optional; the
/// merge is shallow and per-field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_wait_time: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One node-update message from the telemetry stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    #[serde(rename = "nodeId")]
    pub node_id: String,
    pub stats: StatsPatch,
}

/// Connection state of a telemetry feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    #[default]
    Disconnected,
    Connected,
}

/// One project's telemetry subscription.
///
/// The feed holds no reference to the graph it feeds; every merge receives
/// the target graph explicitly. Transport errors mark the feed disconnected
/// and the subscription released. Reconnecting is the caller's decision;
/// the feed never retries on its own.
#[derive(Debug, Clone)]
pub struct TelemetryFeed {
    project_id: String,
    state: FeedState,
}

impl TelemetryFeed {
    /// Creates a feed for one project, initially disconnected.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            state: FeedState::Disconnected,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == FeedState::Connected
    }

    /// Marks the stream open.
    pub fn on_open(&mut self) {
        info!(project_id = self.project_id.as_str(); "Telemetry stream connected");
        self.state = FeedState::Connected;
    }

    /// Handles a transport error: the feed disconnects and stays down until
    /// explicitly reopened.
    pub fn on_error(&mut self) {
        warn!(project_id = self.project_id.as_str(); "Telemetry stream error, disconnecting");
        self.state = FeedState::Disconnected;
    }

    /// Releases the subscription. Idempotent.
    pub fn disconnect(&mut self) {
        self.state = FeedState::Disconnected;
    }

    /// Merges one message into the graph.
    ///
    /// Only the stats fields of the addressed element change. Returns false
    /// when the element is unknown; the message is dropped silently apart
    /// from a debug log.
    pub fn apply(&self, graph: &mut VisualGraph, message: &TelemetryMessage) -> bool {
        match graph.node_mut(&message.node_id) {
            Some(node) => {
                node.stats.apply(&message.stats);
                true
            }
            None => {
                debug!(node_id = message.node_id.as_str(); "Dropping telemetry for unknown node");
                false
            }
        }
    }

    /// Parses and merges one raw message payload.
    ///
    /// # Errors
    ///
    /// Returns [`LaneflowError::Telemetry`] for malformed payloads. A parse
    /// failure does not disconnect the feed.
    pub fn apply_json(&self, graph: &mut VisualGraph, payload: &str) -> Result<bool, LaneflowError> {
        let message: TelemetryMessage =
            serde_json::from_str(payload).map_err(LaneflowError::Telemetry)?;
        Ok(self.apply(graph, &message))
    }
}
