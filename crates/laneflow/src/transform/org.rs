//! Organizational-tier transformation: fixed bands and overview nodes.

use log::debug;

use laneflow_core::band::{self, BAND_WIDTH, BANDS, Band};
use laneflow_core::geometry::Point;
use laneflow_schema::schema::{
    EdgeDef, NodeKind, NodeLayout, OrgGraph, OrgLayer, OrgNode, OrgNodeKind,
};
use laneflow_schema::validate::{DanglingReference, RefKind};

use crate::visual::{VisualEdge, VisualGraph, VisualKind, VisualNode};

/// Result of deserializing the organizational graph.
#[derive(Debug)]
pub struct OrgView {
    pub visual: VisualGraph,
    pub warnings: Vec<DanglingReference>,
}

/// Deserializes the organizational graph into world space.
///
/// The five fixed bands always materialize as container backdrops,
/// regardless of what the stored `layers` list says. Node positions are
/// band-relative; a stale `layer_id` is flagged and the node resolves
/// against the core band so it stays on screen.
pub fn to_visual(org: &OrgGraph) -> OrgView {
    let mut visual = VisualGraph::new();
    let mut warnings = Vec::new();

    for band in BANDS {
        let mut container =
            VisualNode::container(band.id(), VisualKind::BandContainer, band.display_name());
        container.position = band.rect().origin();
        container.width = Some(BAND_WIDTH);
        container.height = Some(band.height());
        visual.insert_node(container);
    }

    for (idx, node) in org.nodes.iter().enumerate() {
        let band = match Band::from_id(&node.layer_id) {
            Some(band) => band,
            None => {
                warnings.push(DanglingReference {
                    path: format!("nodes[{idx}].layer_id"),
                    referenced_id: node.layer_id.clone(),
                    kind: RefKind::Band,
                });
                Band::Core
            }
        };

        let kind = match node.kind {
            OrgNodeKind::ProcessNode => NodeKind::Process,
            OrgNodeKind::GroupNode => NodeKind::Group,
        };

        let mut element = VisualNode::content(&node.id, kind, &node.name);
        element.position =
            band::to_absolute(Point::new(node.layout.x, node.layout.y), band);
        element.width = node.layout.w;
        element.height = node.layout.h;
        element.z_index = node.layout.z_index;
        element.drill_down_ref = node.drill_down_ref.clone();
        visual.insert_node(element);
    }

    for edge in &org.edges {
        visual.connect(
            &edge.source,
            &edge.target,
            VisualEdge {
                id: edge.id.clone(),
                label: edge.label.clone(),
                kind: edge.kind.clone(),
                source_handle: edge.source_handle.clone(),
                target_handle: edge.target_handle.clone(),
                // Overview connectors always animate
                animated: true,
            },
        );
    }

    debug!(nodes = org.nodes.len(), warnings = warnings.len(); "Org graph deserialized");

    OrgView { visual, warnings }
}

/// Serializes a visual graph back into the stored organizational form.
///
/// The layer list is always the canonical five bands. Band membership is
/// inferred from each element's vertical center; points outside the stack
/// fall back to the core band, so every node serializes with a valid
/// `layer_id`.
pub fn from_visual(visual: &VisualGraph) -> OrgGraph {
    let layers = BANDS
        .iter()
        .enumerate()
        .map(|(order, band)| OrgLayer {
            id: band.id().to_owned(),
            name: band.display_name().to_owned(),
            order: order as u32,
        })
        .collect();

    let mut nodes = Vec::new();
    for node in visual.nodes() {
        let VisualKind::Content(kind) = node.kind else {
            continue;
        };

        let band = band::detect_or_core(node.center().y());
        let relative = band::to_relative(node.position, band);

        nodes.push(OrgNode {
            id: node.id.clone(),
            kind: match kind {
                NodeKind::Group => OrgNodeKind::GroupNode,
                _ => OrgNodeKind::ProcessNode,
            },
            layer_id: band.id().to_owned(),
            name: node.label.clone(),
            drill_down_ref: node.drill_down_ref.clone(),
            layout: NodeLayout {
                x: relative.x(),
                y: relative.y(),
                w: node.width,
                h: node.height,
                z_index: node.z_index,
            },
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

    OrgGraph {
        layers,
        nodes,
        edges,
    }
}
