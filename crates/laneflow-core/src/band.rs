//! The fixed band table for the organizational tier.
//!
//! Unlike process-tier lanes, bands are not stored per document: the
//! organizational graph always shows the same five horizontal groupings, in
//! order, with fixed heights. Band membership is always inferred from a
//! node's vertical position and never persisted.

use crate::geometry::{Point, Rect, Size};

/// Width shared by all five bands.
pub const BAND_WIDTH: f32 = 1200.0;

/// The five organizational bands, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Customer,
    Management,
    Core,
    Support,
    Supplier,
}

/// Document order of the bands. Heights are fixed per band.
pub const BANDS: [Band; 5] = [
    Band::Customer,
    Band::Management,
    Band::Core,
    Band::Support,
    Band::Supplier,
];

impl Band {
    /// Stable identifier used in the organizational-graph format.
    pub fn id(self) -> &'static str {
        match self {
            Band::Customer => "layer-customer",
            Band::Management => "layer-management",
            Band::Core => "layer-core",
            Band::Support => "layer-support",
            Band::Supplier => "layer-supplier",
        }
    }

    /// Display name for the band container element.
    pub fn display_name(self) -> &'static str {
        match self {
            Band::Customer => "客户 (Customer)",
            Band::Management => "管理类 (Management)",
            Band::Core => "主业务 (Core Business)",
            Band::Support => "支持类 (Support)",
            Band::Supplier => "供应商 (Supplier)",
        }
    }

    /// Fixed height of this band.
    pub fn height(self) -> f32 {
        match self {
            Band::Customer => 160.0,
            Band::Management => 240.0,
            Band::Core => 450.0,
            Band::Support => 240.0,
            Band::Supplier => 160.0,
        }
    }

    /// Zero-based position of this band in the stack.
    pub fn order(self) -> usize {
        BANDS.iter().position(|band| *band == self).unwrap_or(0)
    }

    /// Absolute y of this band's top edge. Bands stack from y = 0 with no
    /// gap.
    pub fn top(self) -> f32 {
        BANDS
            .iter()
            .take_while(|band| **band != self)
            .map(|band| band.height())
            .sum()
    }

    /// The world-space rect this band occupies.
    pub fn rect(self) -> Rect {
        Rect::new(
            Point::new(0.0, self.top()),
            Size::new(BAND_WIDTH, self.height()),
        )
    }

    /// Resolves a stored band id, if it names one of the five bands.
    pub fn from_id(id: &str) -> Option<Band> {
        BANDS.iter().copied().find(|band| band.id() == id)
    }
}

/// Returns the band whose `[y, y+height)` interval contains `world_y`.
///
/// NaN and points outside the stack resolve to `None`.
pub fn detect(world_y: f32) -> Option<Band> {
    if !world_y.is_finite() {
        return None;
    }
    BANDS
        .iter()
        .copied()
        .find(|band| band.rect().contains_y(world_y))
}

/// Like [`detect`], but points outside the stack fall back to the core band
/// so that membership inference is total and deterministic.
pub fn detect_or_core(world_y: f32) -> Band {
    detect(world_y).unwrap_or(Band::Core)
}

/// Converts a world position into band-relative coordinates.
pub fn to_relative(world: Point, band: Band) -> Point {
    world.sub_point(Point::new(0.0, band.top()))
}

/// Converts a band-relative position back into world coordinates.
pub fn to_absolute(relative: Point, band: Band) -> Point {
    relative.add_point(Point::new(0.0, band.top()))
}
