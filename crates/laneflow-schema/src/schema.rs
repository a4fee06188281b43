//! Serde types for the tiered document format.
//!
//! Wire layout (JSON):
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "meta": { "project_id": "p1", "name": "Order Flow" },
//!   "resources": { "roles": [], "kpi_definitions": [], "data_sources": [] },
//!   "org_graph": { "layers": [], "nodes": [], "edges": [] },
//!   "process_graphs": { "pg_main": { "lanes": [], "nodes": [], "edges": [] } }
//! }
//! ```
//!
//! Content-node positions in a process graph are *lane-relative* when
//! `lane_id` is set, and world coordinates otherwise. Organizational-tier
//! node positions are band-relative; `layer_id` is always re-inferred
//! geometrically on save, never trusted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_version() -> String {
    "1.0.0".to_owned()
}

/// The persisted, versioned graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: String,
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DocumentConfig>,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_graph: Option<OrgGraph>,
    #[serde(default)]
    pub process_graphs: IndexMap<String, ProcessGraph>,
}

impl Document {
    /// Creates an empty document for a project, ready for editing.
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            meta: Meta {
                project_id: project_id.into(),
                name: name.into(),
                description: None,
                owner: None,
                created_at: None,
                updated_at: None,
            },
            config: None,
            resources: Resources::default(),
            org_graph: None,
            process_graphs: IndexMap::new(),
        }
    }
}

/// Project-level metadata. Timestamps are ISO-8601 strings owned by the
/// persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_refresh_rate() -> u32 {
    5000
}

/// Optional per-document presentation settings. Passed through untouched by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: u32,
}

/// The shared resource catalog. Referenced everywhere by id only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub kpi_definitions: Vec<KpiDefinition>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Webhook,
    ApiPoll,
    Websocket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DataSourceKind,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

// --- Process tier ---

/// One swimlane process graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProcessGraphMeta>,
    #[serde(default)]
    pub lanes: Vec<LaneDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

/// Links a process graph back to the organizational node it details.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessGraphMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_ref: Option<String>,
    #[serde(default)]
    pub name: String,
    pub layout: LaneLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLayout {
    pub y: f32,
    pub h: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
}

/// Element kinds a graph node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Activity,
    Gateway,
    Process,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_id: Option<String>,
    pub layout: NodeLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_binding: Option<RuntimeBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeLayout {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
    #[serde(rename = "zIndex", default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// Attaches a diagram element to catalog KPI definitions and/or an external
/// data source, with per-node overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricBinding>,
}

/// One bound metric: a catalog reference by id plus optional per-node
/// overrides. Catalog name/unit are never copied in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBinding {
    pub id: String,
    pub definition_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    #[serde(
        rename = "targetHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Render-type tag, passed through to the presentation layer.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// --- Organizational tier ---

/// The organizational band-graph format. `layer_id` on nodes is always
/// geometrically inferred on save, never user-stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrgGraph {
    #[serde(default)]
    pub layers: Vec<OrgLayer>,
    #[serde(default)]
    pub nodes: Vec<OrgNode>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgLayer {
    pub id: String,
    pub name: String,
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgNodeKind {
    ProcessNode,
    GroupNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OrgNodeKind,
    pub layer_id: String,
    pub name: String,
    /// Points at the process graph that details this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill_down_ref: Option<String>,
    pub layout: NodeLayout,
}
