//! One editing session over one process graph.
//!
//! The session owns the document (single source of truth), the derived
//! visual graph, the viewport, and the drag gesture machine, and wires them
//! together: pointer events come in as screen coordinates, get resolved
//! through the viewport, and drive the gesture machine. Only a committed
//! drag mutates the document and re-derives the visual graph.
//! Intermediate drag positions touch the visual graph alone.

use log::info;

use laneflow_core::drag::{DragCapture, DragCommit, DragGesture, DragOutcome};
use laneflow_core::geometry::{Point, Size};
use laneflow_core::lane::{LaneConfig, LaneSet};
use laneflow_core::viewport::Viewport;
use laneflow_schema::schema::Document;
use laneflow_schema::validate::{self, DanglingReference, ValidationReport};

use crate::error::LaneflowError;
use crate::store::DocumentStore;
use crate::transform::process;
use crate::visual::{RenderIndex, VisualGraph};

/// An open editing session: document, derived visuals, and input state.
#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    graph_id: String,
    config: LaneConfig,
    visual: VisualGraph,
    lanes: LaneSet,
    warnings: Vec<DanglingReference>,
    viewport: Viewport,
    gesture: DragGesture,
    render_index: RenderIndex,
}

impl EditorSession {
    /// Opens a session on one process graph of a document.
    ///
    /// The document is validated up front; structural problems refuse the
    /// session rather than surfacing later mid-edit.
    pub fn open(
        document: Document,
        graph_id: &str,
        config: LaneConfig,
        view_size: Size,
    ) -> Result<Self, LaneflowError> {
        validate::validate(&document)?;
        let graph = document
            .process_graphs
            .get(graph_id)
            .ok_or_else(|| LaneflowError::GraphNotFound {
                graph_id: graph_id.to_owned(),
            })?;

        let view = process::to_visual(graph, &document.resources, config);
        info!(
            graph_id,
            nodes = view.visual.node_count(),
            warnings = view.warnings.len();
            "Editing session opened"
        );

        Ok(Self {
            document,
            graph_id: graph_id.to_owned(),
            config,
            visual: view.visual,
            lanes: view.lanes,
            warnings: view.warnings,
            viewport: Viewport::new(view_size),
            gesture: DragGesture::new(),
            render_index: RenderIndex::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn visual(&self) -> &VisualGraph {
        &self.visual
    }

    pub fn lanes(&self) -> &LaneSet {
        &self.lanes
    }

    /// Dangling references found when the graph was last derived.
    pub fn warnings(&self) -> &[DanglingReference] {
        &self.warnings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn render_index_mut(&mut self) -> &mut RenderIndex {
        &mut self.render_index
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Re-derives the visual graph and lane set from the document.
    pub fn refresh(&mut self) {
        if let Some(graph) = self.document.process_graphs.get(&self.graph_id) {
            let view = process::to_visual(graph, &self.document.resources, self.config);
            self.visual = view.visual;
            self.lanes = view.lanes;
            self.warnings = view.warnings;
        }
    }

    /// Arms a drag on pointer-down over an element.
    ///
    /// The captured start position is the element's *rendered* world
    /// position, so a stale data model never makes the node jump under the
    /// pointer.
    pub fn begin_drag(
        &mut self,
        node_id: &str,
        pointer_screen: Point,
        pan_modifier: bool,
    ) -> Result<(), LaneflowError> {
        let node = self
            .visual
            .node(node_id)
            .ok_or_else(|| LaneflowError::NodeNotFound {
                node_id: node_id.to_owned(),
            })?;
        if !node.draggable {
            return Err(LaneflowError::NotDraggable {
                node_id: node_id.to_owned(),
            });
        }

        let capture = DragCapture {
            node_id: node_id.to_owned(),
            rendered_world: node.position,
            pointer_world: self.viewport.to_world(pointer_screen),
            pointer_screen,
            lane_id: node.lane_id.clone(),
        };
        self.gesture.arm(capture, pan_modifier)?;
        Ok(())
    }

    /// Follows the pointer during a gesture, applying the optimistic
    /// position to the visual graph only. Returns the element's new visual
    /// world position, or `None` while no gesture is active.
    pub fn drag_move(&mut self, pointer_screen: Point) -> Option<Point> {
        let pointer_world = self.viewport.to_world(pointer_screen);
        let position = self.gesture.pointer_move(pointer_world, pointer_screen)?;
        if let Some(node_id) = self.gesture.node_id().map(str::to_owned) {
            if let Some(node) = self.visual.node_mut(&node_id) {
                node.position = position;
            }
        }
        Some(position)
    }

    /// Ends the gesture on pointer-up.
    ///
    /// A commit detects the target lane once, against the element's final
    /// top-left, converts to lane-relative coordinates, writes the document,
    /// and re-derives the visuals. A click or revert discards the visual
    /// delta by re-deriving from the unchanged document. The outcome is
    /// returned so the caller can hand plain clicks to its alternate
    /// handler.
    pub fn end_drag(&mut self, pointer_screen: Point) -> Result<DragOutcome, LaneflowError> {
        let outcome = self.gesture.release(pointer_screen);
        match &outcome {
            DragOutcome::Commit(commit) => self.apply_commit(commit)?,
            DragOutcome::Click { .. } | DragOutcome::Reverted { .. } => self.refresh(),
            DragOutcome::None => {}
        }
        Ok(outcome)
    }

    /// Aborts an in-flight gesture, e.g. on pointer-capture loss. The
    /// element snaps back to its last committed position.
    pub fn cancel_drag(&mut self) -> DragOutcome {
        let outcome = self.gesture.cancel();
        if matches!(outcome, DragOutcome::Reverted { .. }) {
            self.refresh();
        }
        outcome
    }

    /// Serializes the visual graph back into the document (healing lane
    /// membership on the way) and persists through the store.
    ///
    /// # Errors
    ///
    /// Validation failures from the store propagate verbatim; nothing is
    /// persisted in that case.
    pub fn save_to(
        &mut self,
        store: &mut dyn DocumentStore,
    ) -> Result<ValidationReport, LaneflowError> {
        let meta = self
            .document
            .process_graphs
            .get(&self.graph_id)
            .and_then(|graph| graph.meta.clone());
        let healed = process::from_visual(&self.visual, self.config, meta);
        self.document
            .process_graphs
            .insert(self.graph_id.clone(), healed);

        let report = store.save(&self.document.meta.project_id, &self.document)?;
        self.refresh();
        Ok(report)
    }

    fn apply_commit(&mut self, commit: &DragCommit) -> Result<(), LaneflowError> {
        let lane_id = self
            .lanes
            .detect(commit.final_world.y())
            .map(str::to_owned);
        let relative = self.lanes.to_relative(commit.final_world, lane_id.as_deref());

        let graph = self
            .document
            .process_graphs
            .get_mut(&self.graph_id)
            .ok_or_else(|| LaneflowError::GraphNotFound {
                graph_id: self.graph_id.clone(),
            })?;
        let node = graph
            .nodes
            .iter_mut()
            .find(|node| node.id == commit.node_id)
            .ok_or_else(|| LaneflowError::NodeNotFound {
                node_id: commit.node_id.clone(),
            })?;

        info!(
            node_id = commit.node_id.as_str(),
            lane = lane_id.as_deref().unwrap_or("-");
            "Drag committed"
        );

        node.lane_id = lane_id;
        node.layout.x = relative.x();
        node.layout.y = relative.y();

        self.refresh();
        Ok(())
    }
}
