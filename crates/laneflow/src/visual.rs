//! The live visual graph the render layer draws from.
//!
//! A [`VisualGraph`] is the deserialized, world-space form of one document
//! tier: lane/band backdrops become container elements, content nodes carry
//! their resolved world positions, and connectors become graph edges. It is
//! a *projection* of the document: the document stays the single source of
//! truth, and edits flow back through the transformer, never by mutating the
//! visual graph alone.
//!
//! The [`RenderIndex`] maps document ids to opaque renderer handles. It is
//! injective (one handle per id, never reused) and never authoritative for
//! geometry.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use laneflow_core::geometry::Point;
use laneflow_schema::schema::{MetricBinding, NodeKind};

use crate::telemetry::RuntimeStats;

/// Default stacking order for content elements.
pub const CONTENT_Z_INDEX: i32 = 10;
/// Stacking order for lane/band container backdrops.
pub const CONTAINER_Z_INDEX: i32 = -1;

/// What a visual element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// A process-tier lane backdrop.
    LaneContainer,
    /// An organizational-tier band backdrop.
    BandContainer,
    /// A content node of the given kind.
    Content(NodeKind),
}

/// One element of the visual graph, positioned in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: String,
    pub kind: VisualKind,
    pub label: String,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Stored stacking order; `None` renders at [`CONTENT_Z_INDEX`].
    pub z_index: Option<i32>,
    pub draggable: bool,
    pub selectable: bool,
    /// Lane bookkeeping carried from the document. Never trusted for
    /// geometry: membership is re-inferred on save.
    pub lane_id: Option<String>,
    pub role_ref: Option<String>,
    pub drill_down_ref: Option<String>,
    pub source_ref: Option<String>,
    pub external_id: Option<String>,
    pub metrics: Vec<MetricBinding>,
    pub stats: RuntimeStats,
}

impl VisualNode {
    /// Creates a non-draggable container backdrop.
    pub fn container(id: impl Into<String>, kind: VisualKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            position: Point::default(),
            width: None,
            height: None,
            z_index: Some(CONTAINER_Z_INDEX),
            draggable: false,
            selectable: false,
            lane_id: None,
            role_ref: None,
            drill_down_ref: None,
            source_ref: None,
            external_id: None,
            metrics: Vec::new(),
            stats: RuntimeStats::default(),
        }
    }

    /// Creates a draggable content element.
    pub fn content(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: VisualKind::Content(kind),
            label: label.into(),
            position: Point::default(),
            width: None,
            height: None,
            z_index: None,
            draggable: true,
            selectable: true,
            lane_id: None,
            role_ref: None,
            drill_down_ref: None,
            source_ref: None,
            external_id: None,
            metrics: Vec::new(),
            stats: RuntimeStats::default(),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            VisualKind::LaneContainer | VisualKind::BandContainer
        )
    }

    /// Effective stacking order for rendering.
    pub fn effective_z(&self) -> i32 {
        self.z_index.unwrap_or(CONTENT_Z_INDEX)
    }

    /// World-space center, treating missing dimensions as zero.
    ///
    /// The vertical component drives lane/band membership inference.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x() + self.width.unwrap_or(0.0) / 2.0,
            self.position.y() + self.height.unwrap_or(0.0) / 2.0,
        )
    }
}

/// A connector between two visual elements.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEdge {
    pub id: String,
    pub label: Option<String>,
    /// Render-type tag passed through from the document.
    pub kind: Option<String>,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub animated: bool,
}

/// The render layer's working graph: elements plus connectors, addressable
/// by document id.
#[derive(Debug, Clone, Default)]
pub struct VisualGraph {
    graph: DiGraph<VisualNode, VisualEdge>,
    ids: HashMap<String, NodeIndex>,
}

impl VisualGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element, replacing any existing element with the same id.
    pub fn insert_node(&mut self, node: VisualNode) -> NodeIndex {
        match self.ids.get(&node.id) {
            Some(&idx) => {
                self.graph[idx] = node;
                idx
            }
            None => {
                let id = node.id.clone();
                let idx = self.graph.add_node(node);
                self.ids.insert(id, idx);
                idx
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.ids.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut VisualNode> {
        self.ids.get(id).map(|&idx| &mut self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Removes an element and its connectors.
    pub fn remove_node(&mut self, id: &str) -> Option<VisualNode> {
        let idx = self.ids.remove(id)?;
        let removed = self.graph.remove_node(idx);
        // remove_node swap-removes: the element formerly at the highest
        // index now occupies `idx`, so its map entry must be repointed.
        if let Some(moved) = self.graph.node_weight(idx) {
            self.ids.insert(moved.id.clone(), idx);
        }
        removed
    }

    /// Connects two elements. Returns false (and adds nothing) when either
    /// endpoint is unknown.
    pub fn connect(&mut self, source: &str, target: &str, edge: VisualEdge) -> bool {
        match (self.ids.get(source), self.ids.get(target)) {
            (Some(&a), Some(&b)) => {
                self.graph.add_edge(a, b, edge);
                true
            }
            _ => false,
        }
    }

    /// Elements in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &VisualNode> {
        self.graph.node_weights()
    }

    /// Connectors with their resolved endpoints, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&VisualNode, &VisualNode, &VisualEdge)> {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()], edge.weight()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// An opaque handle the render layer associates with one document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

/// Explicit id → renderer-handle registry.
///
/// Handles are allocated monotonically and never reused, so the mapping is
/// injective for the lifetime of the index. The registry carries no
/// geometry; it only lets the render layer find its own objects.
#[derive(Debug, Clone, Default)]
pub struct RenderIndex {
    handles: HashMap<String, RenderHandle>,
    next: u64,
}

impl RenderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle bound to `id`, allocating one on first use.
    pub fn bind(&mut self, id: &str) -> RenderHandle {
        if let Some(handle) = self.handles.get(id) {
            return *handle;
        }
        let handle = RenderHandle(self.next);
        self.next += 1;
        self.handles.insert(id.to_owned(), handle);
        handle
    }

    pub fn get(&self, id: &str) -> Option<RenderHandle> {
        self.handles.get(id).copied()
    }

    /// Unbinds an id, e.g. when its element is deleted.
    pub fn release(&mut self, id: &str) -> Option<RenderHandle> {
        self.handles.remove(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
