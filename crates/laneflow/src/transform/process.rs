//! Process-tier transformation: lanes and flow nodes.

use std::collections::HashSet;

use log::debug;

use laneflow_core::geometry::Point;
use laneflow_core::lane::{Lane, LaneConfig, LaneSet};
use laneflow_schema::schema::{
    EdgeDef, LaneDef, LaneLayout, NodeDef, NodeLayout, ProcessGraph, ProcessGraphMeta, Resources,
    RuntimeBinding,
};
use laneflow_schema::validate::{DanglingReference, RefKind};

use crate::visual::{VisualEdge, VisualGraph, VisualKind, VisualNode};

/// Result of deserializing one process graph: the world-space visual graph,
/// the lane set both the renderer and the drag protocol consult, and any
/// dangling references encountered on the way.
#[derive(Debug)]
pub struct ProcessView {
    pub visual: VisualGraph,
    pub lanes: LaneSet,
    pub warnings: Vec<DanglingReference>,
}

/// Deserializes a stored process graph into world space.
///
/// Lanes become non-draggable container backdrops at
/// `(config.lane_start_x, lane.y)`. Content nodes with a known lane resolve
/// their stored lane-relative position against that lane's origin. Nodes
/// with no lane, and nodes with a dangling lane reference, keep their
/// stored coordinates as world coordinates and are flagged.
pub fn to_visual(graph: &ProcessGraph, resources: &Resources, config: LaneConfig) -> ProcessView {
    let mut lanes = LaneSet::new(config);
    for lane in &graph.lanes {
        lanes.push(Lane::new(
            &lane.id,
            &lane.name,
            lane.role_ref.clone(),
            lane.layout.y,
            lane.layout.h,
            lane.layout.w.unwrap_or(config.lane_default_width),
        ));
    }

    let mut visual = VisualGraph::new();
    let mut warnings = Vec::new();

    for lane in &graph.lanes {
        let mut container =
            VisualNode::container(&lane.id, VisualKind::LaneContainer, &lane.name);
        container.position = Point::new(config.lane_start_x, lane.layout.y);
        container.width = lane.layout.w;
        container.height = Some(lane.layout.h);
        container.role_ref = lane.role_ref.clone();
        visual.insert_node(container);
    }

    let kpi_ids: HashSet<&str> = resources
        .kpi_definitions
        .iter()
        .map(|k| k.id.as_str())
        .collect();
    let source_ids: HashSet<&str> = resources
        .data_sources
        .iter()
        .map(|d| d.id.as_str())
        .collect();

    for (idx, node) in graph.nodes.iter().enumerate() {
        if let Some(lane_id) = &node.lane_id {
            if lanes.get(lane_id).is_none() {
                warnings.push(DanglingReference {
                    path: format!("nodes[{idx}].lane_id"),
                    referenced_id: lane_id.clone(),
                    kind: RefKind::Lane,
                });
            }
        }

        let stored = Point::new(node.layout.x, node.layout.y);
        let world = lanes.to_absolute(stored, node.lane_id.as_deref());

        let mut element = VisualNode::content(&node.id, node.kind, &node.name);
        element.position = world;
        element.width = node.layout.w;
        element.height = node.layout.h;
        element.z_index = node.layout.z_index;
        element.lane_id = node.lane_id.clone();

        if let Some(binding) = &node.runtime_binding {
            if let Some(source_ref) = &binding.source_ref {
                if !source_ids.contains(source_ref.as_str()) {
                    warnings.push(DanglingReference {
                        path: format!("nodes[{idx}].runtime_binding.source_ref"),
                        referenced_id: source_ref.clone(),
                        kind: RefKind::DataSource,
                    });
                }
            }
            for (midx, metric) in binding.metrics.iter().enumerate() {
                if !kpi_ids.contains(metric.definition_id.as_str()) {
                    warnings.push(DanglingReference {
                        path: format!("nodes[{idx}].runtime_binding.metrics[{midx}].definition_id"),
                        referenced_id: metric.definition_id.clone(),
                        kind: RefKind::KpiDefinition,
                    });
                }
            }
            element.source_ref = binding.source_ref.clone();
            element.external_id = binding.external_id.clone();
            element.metrics = binding.metrics.clone();
        }

        visual.insert_node(element);
    }

    for edge in &graph.edges {
        visual.connect(&edge.source, &edge.target, visual_edge(edge));
    }

    debug!(
        lanes = graph.lanes.len(),
        nodes = graph.nodes.len(),
        warnings = warnings.len();
        "Process graph deserialized"
    );

    ProcessView {
        visual,
        lanes,
        warnings,
    }
}

/// Serializes a visual graph back into the stored process-graph form.
///
/// Lane membership is re-inferred from each content element's vertical
/// center against the container geometry; stale lane bookkeeping is healed
/// here, never trusted. Elements over no lane persist world coordinates.
pub fn from_visual(
    visual: &VisualGraph,
    config: LaneConfig,
    meta: Option<ProcessGraphMeta>,
) -> ProcessGraph {
    let mut lanes = LaneSet::new(config);
    let mut lane_defs = Vec::new();

    for node in visual.nodes() {
        if node.kind != VisualKind::LaneContainer {
            continue;
        }
        let height = node.height.unwrap_or(config.lane_default_height);
        lanes.push(Lane::new(
            &node.id,
            &node.label,
            node.role_ref.clone(),
            node.position.y(),
            height,
            node.width.unwrap_or(config.lane_default_width),
        ));
        lane_defs.push(LaneDef {
            id: node.id.clone(),
            role_ref: node.role_ref.clone(),
            name: node.label.clone(),
            layout: LaneLayout {
                y: node.position.y(),
                h: height,
                w: node.width,
            },
        });
    }

    let mut nodes = Vec::new();
    for node in visual.nodes() {
        let VisualKind::Content(kind) = node.kind else {
            continue;
        };

        let lane_id = lanes.detect(node.center().y()).map(str::to_owned);
        let relative = lanes.to_relative(node.position, lane_id.as_deref());

        nodes.push(NodeDef {
            id: node.id.clone(),
            kind,
            name: node.label.clone(),
            lane_id,
            layout: NodeLayout {
                x: relative.x(),
                y: relative.y(),
                w: node.width,
                h: node.height,
                z_index: node.z_index,
            },
            runtime_binding: pack_binding(node),
        });
    }

    let edges = visual
        .edges()
        .map(|(source, target, edge)| EdgeDef {
            id: edge.id.clone(),
            source: source.id.clone(),
            target: target.id.clone(),
            source_handle: edge.source_handle.clone(),
            target_handle: edge.target_handle.clone(),
            label: edge.label.clone(),
            kind: edge.kind.clone(),
        })
        .collect();

    ProcessGraph {
        meta,
        lanes: lane_defs,
        nodes,
        edges,
    }
}

fn visual_edge(edge: &EdgeDef) -> VisualEdge {
    VisualEdge {
        id: edge.id.clone(),
        label: edge.label.clone(),
        kind: edge.kind.clone(),
        source_handle: edge.source_handle.clone(),
        target_handle: edge.target_handle.clone(),
        animated: edge.kind.as_deref() == Some("smart"),
    }
}

fn pack_binding(node: &VisualNode) -> Option<RuntimeBinding> {
    if node.source_ref.is_none() && node.external_id.is_none() && node.metrics.is_empty() {
        return None;
    }
    Some(RuntimeBinding {
        source_ref: node.source_ref.clone(),
        external_id: node.external_id.clone(),
        metrics: node.metrics.clone(),
    })
}
