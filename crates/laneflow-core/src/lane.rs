//! Lane containment: layout storage, point-in-lane testing, and
//! relative↔absolute coordinate conversion.
//!
//! Lanes are user-defined, vertically stacked containers in the process
//! tier. Each lane's absolute y is *stored* and maintained by an explicit
//! [`LaneSet::restack`] pass at creation/reorder time, not recomputed per
//! lookup. Content nodes owned by a lane persist lane-relative positions;
//! unassigned nodes float in world space.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// Constant geometry rules for the lane layout.
///
/// Shared between the renderer and the drag/transform calculators so both
/// sides agree on where lanes live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// World x of every lane's left edge.
    pub lane_start_x: f32,
    /// World y of the first lane's top edge.
    pub lane_start_y: f32,
    /// Vertical gap between stacked lanes.
    pub lane_gap: f32,
    /// Width used when a lane does not store one.
    pub lane_default_width: f32,
    /// Height used when a lane does not store one.
    pub lane_default_height: f32,
    /// Default size for freshly created content nodes.
    pub node_default_width: f32,
    /// Default height for freshly created content nodes.
    pub node_default_height: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            lane_start_x: 100.0,
            lane_start_y: 100.0,
            lane_gap: 6.0,
            lane_default_width: 1200.0,
            lane_default_height: 220.0,
            node_default_width: 160.0,
            node_default_height: 60.0,
        }
    }
}

/// A user-defined lane in the process tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    id: String,
    name: String,
    role_ref: Option<String>,
    y: f32,
    height: f32,
    width: f32,
}

impl Lane {
    /// Creates a new lane. The absolute y is assigned by the owning
    /// [`LaneSet`] when the lane is stacked or loaded.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role_ref: Option<String>,
        y: f32,
        height: f32,
        width: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role_ref,
            y,
            height,
            width,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional reference into the shared role catalog, by id only.
    pub fn role_ref(&self) -> Option<&str> {
        self.role_ref.as_deref()
    }

    /// Stored absolute y of the lane's top edge.
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// The ordered set of lanes of one process graph, in document order.
#[derive(Debug, Clone, Default)]
pub struct LaneSet {
    lanes: Vec<Lane>,
    config: LaneConfig,
}

impl LaneSet {
    /// Creates an empty lane set with the given geometry rules.
    pub fn new(config: LaneConfig) -> Self {
        Self {
            lanes: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &LaneConfig {
        &self.config
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Appends a lane with its stored absolute y, trusting the caller.
    ///
    /// Used when loading a persisted document whose lanes already carry
    /// layout. Editing paths should follow up with [`LaneSet::restack`].
    pub fn push(&mut self, lane: Lane) {
        self.lanes.push(lane);
    }

    /// Reassigns every lane's absolute y from document order:
    /// `lane[n+1].y = lane[n].y + lane[n].height + gap`.
    ///
    /// Called at lane creation/reorder time so that [`LaneSet::top`] is a
    /// plain lookup afterwards.
    pub fn restack(&mut self) {
        let mut y = self.config.lane_start_y;
        for lane in &mut self.lanes {
            lane.y = y;
            y += lane.height + self.config.lane_gap;
        }
    }

    /// Looks up a lane by id.
    pub fn get(&self, id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id == id)
    }

    /// Returns the stored absolute y of a lane's top edge.
    ///
    /// Unknown ids resolve to `None`; this never panics, keeping dragging
    /// resilient against stale lane references.
    pub fn top(&self, id: &str) -> Option<f32> {
        self.get(id).map(Lane::top)
    }

    /// Returns the world-space rect a lane occupies.
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.get(id).map(|lane| {
            Rect::new(
                Point::new(self.config.lane_start_x, lane.y),
                Size::new(lane.width, lane.height),
            )
        })
    }

    /// Returns the id of the lane whose `[y, y+height)` interval contains
    /// `world_y`, or `None` if the point is over empty canvas.
    ///
    /// Vertical bands only; ties are broken by document order. NaN resolves
    /// to `None`.
    pub fn detect(&self, world_y: f32) -> Option<&str> {
        if !world_y.is_finite() {
            return None;
        }
        self.lanes
            .iter()
            .find(|lane| world_y >= lane.y && world_y < lane.y + lane.height)
            .map(|lane| lane.id.as_str())
    }

    /// Converts a world position into lane-relative coordinates.
    ///
    /// With no lane (or an unknown lane id) the world coordinates are
    /// returned unchanged: unassigned nodes float in world space.
    pub fn to_relative(&self, world: Point, lane_id: Option<&str>) -> Point {
        match lane_id.and_then(|id| self.top(id)) {
            Some(top) => world.sub_point(Point::new(self.config.lane_start_x, top)),
            None => world,
        }
    }

    /// Converts a lane-relative position back into world coordinates.
    ///
    /// Inverse of [`LaneSet::to_relative`] for any known lane.
    pub fn to_absolute(&self, relative: Point, lane_id: Option<&str>) -> Point {
        match lane_id.and_then(|id| self.top(id)) {
            Some(top) => relative.add_point(Point::new(self.config.lane_start_x, top)),
            None => relative,
        }
    }
}
