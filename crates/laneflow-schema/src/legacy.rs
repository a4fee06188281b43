//! The older flat node/edge document shape and its upgrade path.
//!
//! Early documents persisted a single flat graph: a list of typed nodes
//! (lanes included, as `type: "lane"` entries with absolute positions) and a
//! list of edges, plus an optional viewport snapshot. The coexistence of
//! that shape with the tiered format is modeled as one explicit sum type,
//! [`AnyDocument`], with one dedicated [`AnyDocument::upgrade`] function.
//! Call sites never sniff shapes themselves.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::{
    Document, EdgeDef, LaneDef, LaneLayout, NodeDef, NodeKind, NodeLayout, ProcessGraph,
    RuntimeBinding,
};

/// Identifier the upgrade assigns to the single migrated process graph.
pub const UPGRADED_GRAPH_ID: &str = "pg_main";

/// A node in the legacy flat format. `data` is an open bag the old editor
/// stuffed labels and lane bookkeeping into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub position: LegacyPosition,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyViewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

/// The legacy flat document: one untiered node/edge soup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    pub nodes: Vec<LegacyNode>,
    pub edges: Vec<EdgeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<LegacyViewport>,
}

/// Either persisted shape. Serde picks the variant; the tiered format is
/// tried first since its required `meta` object cannot appear in a legacy
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyDocument {
    Tiered(Document),
    Legacy(LegacyDocument),
}

impl AnyDocument {
    /// Parses either document shape from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Upgrades to the tiered format. Idempotent: an already-tiered document
    /// passes through unchanged.
    pub fn upgrade(self, project_id: &str, name: &str) -> Document {
        match self {
            AnyDocument::Tiered(doc) => doc,
            AnyDocument::Legacy(legacy) => upgrade_legacy(legacy, project_id, name),
        }
    }
}

/// Converts a legacy flat document into a tiered one with a single process
/// graph.
///
/// Legacy lane entries kept their own absolute origin in `position` and
/// their height on the node; legacy content nodes stored *absolute*
/// positions, so each node assigned to a lane is rebased onto that lane's
/// legacy origin. On the next load the relative position resolves against
/// the standard lane left edge instead.
fn upgrade_legacy(legacy: LegacyDocument, project_id: &str, name: &str) -> Document {
    let mut doc = Document::new(project_id, name);
    let mut graph = ProcessGraph::default();
    let mut lane_origins: Vec<(String, LegacyPosition)> = Vec::new();

    for node in &legacy.nodes {
        if node.kind.as_deref() == Some("lane") {
            lane_origins.push((node.id.clone(), node.position));
            graph.lanes.push(LaneDef {
                id: node.id.clone(),
                role_ref: string_field(node, "roleId"),
                name: string_field(node, "label").unwrap_or_default(),
                layout: LaneLayout {
                    y: node.position.y,
                    h: node.height.unwrap_or(200.0),
                    w: node.width,
                },
            });
        }
    }

    for node in &legacy.nodes {
        if node.kind.as_deref() == Some("lane") {
            continue;
        }

        let kind = match node.kind.as_deref() {
            Some("startEvent") | Some("start") => NodeKind::Start,
            Some("endEvent") | Some("end") => NodeKind::End,
            Some("gateway") => NodeKind::Gateway,
            Some("process") => NodeKind::Process,
            Some("group") => NodeKind::Group,
            _ => NodeKind::Activity,
        };

        // Prefer the stored lane, else infer from the node's vertical center
        let center_y = node.position.y + node.height.unwrap_or(0.0) / 2.0;
        let lane_id = string_field(node, "laneId").or_else(|| {
            graph
                .lanes
                .iter()
                .find(|lane| center_y >= lane.layout.y && center_y < lane.layout.y + lane.layout.h)
                .map(|lane| lane.id.clone())
        });

        let origin = lane_id
            .as_deref()
            .and_then(|id| lane_origins.iter().find(|(candidate, _)| candidate == id))
            .map(|(_, origin)| *origin)
            .unwrap_or(LegacyPosition { x: 0.0, y: 0.0 });

        graph.nodes.push(NodeDef {
            id: node.id.clone(),
            kind,
            name: string_field(node, "label").unwrap_or_default(),
            lane_id,
            layout: NodeLayout {
                x: node.position.x - origin.x,
                y: node.position.y - origin.y,
                w: node.width,
                h: node.height,
                z_index: None,
            },
            runtime_binding: binding_from_data(node),
        });
    }

    graph.edges = legacy.edges;

    info!(
        lanes = graph.lanes.len(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len();
        "Upgraded legacy document"
    );

    doc.process_graphs.insert(UPGRADED_GRAPH_ID.into(), graph);
    doc
}

fn string_field(node: &LegacyNode, key: &str) -> Option<String> {
    node.data
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::to_owned)
}

fn binding_from_data(node: &LegacyNode) -> Option<RuntimeBinding> {
    let source_ref = string_field(node, "source_ref");
    let external_id = string_field(node, "external_id");
    if source_ref.is_none() && external_id.is_none() {
        return None;
    }
    Some(RuntimeBinding {
        source_ref,
        external_id,
        metrics: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_json() -> &'static str {
        r#"{
            "nodes": [
                {
                    "id": "lane_a", "type": "lane",
                    "position": { "x": 0.0, "y": 100.0 },
                    "data": { "label": "Sales", "roleId": "role_1" },
                    "width": 1200.0, "height": 220.0
                },
                {
                    "id": "n1", "type": "startEvent",
                    "position": { "x": 60.0, "y": 140.0 },
                    "data": { "label": "Order In", "laneId": "lane_a" },
                    "width": 40.0, "height": 40.0
                },
                {
                    "id": "n2", "type": "activity",
                    "position": { "x": 200.0, "y": 150.0 },
                    "data": { "label": "Approve" },
                    "width": 160.0, "height": 60.0
                }
            ],
            "edges": [
                { "id": "e1", "source": "n1", "target": "n2" }
            ],
            "viewport": { "x": 0.0, "y": 0.0, "zoom": 1.0 }
        }"#
    }

    #[test]
    fn test_legacy_shape_parses_as_legacy() {
        let any = AnyDocument::from_json_str(legacy_json()).unwrap();
        assert!(matches!(any, AnyDocument::Legacy(_)));
    }

    #[test]
    fn test_tiered_shape_parses_as_tiered() {
        let any =
            AnyDocument::from_json_str(r#"{ "meta": { "project_id": "p", "name": "x" } }"#)
                .unwrap();
        assert!(matches!(any, AnyDocument::Tiered(_)));
    }

    #[test]
    fn test_upgrade_is_idempotent_for_tiered() {
        let doc = Document::new("p1", "Flow");
        let upgraded = AnyDocument::Tiered(doc.clone()).upgrade("other", "Other");
        assert_eq!(upgraded, doc);
    }

    #[test]
    fn test_upgrade_extracts_lanes_and_rebases_nodes() {
        let any = AnyDocument::from_json_str(legacy_json()).unwrap();
        let doc = any.upgrade("p1", "Flow");

        let graph = &doc.process_graphs[UPGRADED_GRAPH_ID];
        assert_eq!(graph.lanes.len(), 1);
        assert_eq!(graph.lanes[0].role_ref.as_deref(), Some("role_1"));

        // Stored laneId wins; absolute y 140 rebased onto lane top 100
        let n1 = &graph.nodes[0];
        assert_eq!(n1.lane_id.as_deref(), Some("lane_a"));
        assert_eq!(n1.layout.y, 40.0);

        // No stored lane: inferred from vertical center (150 + 30 = 180)
        let n2 = &graph.nodes[1];
        assert_eq!(n2.lane_id.as_deref(), Some("lane_a"));
        assert_eq!(n2.layout.y, 50.0);

        assert_eq!(graph.edges.len(), 1);
    }
}
