//! Viewport pan/zoom state and screen↔world coordinate transforms.
//!
//! The viewport owns three pieces of state: a scale factor clamped to
//! [`Viewport::MIN_SCALE`]..[`Viewport::MAX_SCALE`], a screen-space offset of
//! the content layer's origin, and the bookkeeping of an in-progress pan
//! gesture. One viewport is created per editing session and discarded with
//! it.

use log::trace;

use crate::geometry::{Point, Size};

/// Pan/zoom state for one editing session.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f32,
    offset: Point,
    view_size: Size,
    panning: bool,
    last_pointer: Point,
}

impl Viewport {
    /// Lower clamp for the zoom scale. The scale must never reach zero.
    pub const MIN_SCALE: f32 = 0.1;
    /// Upper clamp for the zoom scale.
    pub const MAX_SCALE: f32 = 5.0;

    /// Creates a viewport at identity scale with the given view size.
    ///
    /// The view size is the screen-space extent of the visible area and is
    /// only consulted by [`Viewport::center_on`].
    pub fn new(view_size: Size) -> Self {
        Self {
            scale: 1.0,
            offset: Point::default(),
            view_size,
            panning: false,
            last_pointer: Point::default(),
        }
    }

    /// Returns the current scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Returns the screen-space offset of the content origin.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Returns true while a pan gesture is in progress.
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Updates the visible area extent (e.g. after a window resize).
    pub fn set_view_size(&mut self, view_size: Size) {
        self.view_size = view_size;
    }

    /// Inverse-transforms a screen point into world space.
    ///
    /// The transform is anchored to the content layer's screen-space origin,
    /// i.e. the current offset.
    pub fn to_world(&self, screen: Point) -> Point {
        screen.sub_point(self.offset).scale(1.0 / self.scale)
    }

    /// Forward-transforms a world point into screen space.
    pub fn to_screen(&self, world: Point) -> Point {
        world.scale(self.scale).add_point(self.offset)
    }

    /// Zooms by `factor` while keeping the world point under `screen` fixed.
    ///
    /// The scale is clamped on every call. The offset is adjusted so the
    /// world point currently under the cursor stays under the cursor after
    /// the rescale. Non-finite input leaves the viewport unchanged.
    pub fn zoom_at(&mut self, factor: f32, screen: Point) {
        if !factor.is_finite() || !screen.is_finite() {
            return;
        }

        let anchor = self.to_world(screen);
        let old_scale = self.scale;
        self.scale = (self.scale * factor).clamp(Self::MIN_SCALE, Self::MAX_SCALE);

        // offset -= anchor * (new - old), so the anchor keeps its screen spot
        let scale_change = self.scale - old_scale;
        self.offset = self.offset.sub_point(anchor.scale(scale_change));

        trace!(scale = self.scale; "Viewport zoomed");
    }

    /// Begins a pan gesture at the given screen position.
    pub fn begin_pan(&mut self, screen: Point) {
        self.panning = true;
        self.last_pointer = screen;
    }

    /// Follows the pointer during a pan.
    ///
    /// The raw screen-space delta is added directly to the offset; panning is
    /// not scaled because the offset lives in screen space. A no-op unless a
    /// pan is in progress.
    pub fn pan_move(&mut self, screen: Point) {
        if !self.panning || !screen.is_finite() {
            return;
        }
        let delta = screen.sub_point(self.last_pointer);
        self.offset = self.offset.add_point(delta);
        self.last_pointer = screen;
    }

    /// Ends the current pan gesture, if any.
    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    /// Sets the offset so the viewport center aligns with the given world
    /// point.
    pub fn center_on(&mut self, world: Point) {
        if !world.is_finite() {
            return;
        }
        let view_center = Point::new(self.view_size.width() / 2.0, self.view_size.height() / 2.0);
        self.offset = view_center.sub_point(world.scale(self.scale));
        trace!(x = world.x(), y = world.y(); "Viewport centered");
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(1600.0, 900.0))
    }

    #[test]
    fn test_world_screen_roundtrip() {
        let mut vp = viewport();
        vp.zoom_at(1.5, Point::new(200.0, 100.0));
        vp.begin_pan(Point::new(0.0, 0.0));
        vp.pan_move(Point::new(37.0, -12.0));
        vp.end_pan();

        let world = Point::new(250.0, 480.0);
        let back = vp.to_world(vp.to_screen(world));
        assert_approx_eq!(f32, back.x(), world.x(), epsilon = 0.001);
        assert_approx_eq!(f32, back.y(), world.y(), epsilon = 0.001);
    }

    #[test]
    fn test_scale_clamped() {
        let mut vp = viewport();
        for _ in 0..100 {
            vp.zoom_at(0.5, Point::new(0.0, 0.0));
        }
        assert_approx_eq!(f32, vp.scale(), Viewport::MIN_SCALE);

        for _ in 0..100 {
            vp.zoom_at(2.0, Point::new(0.0, 0.0));
        }
        assert_approx_eq!(f32, vp.scale(), Viewport::MAX_SCALE);
    }

    #[test]
    fn test_pan_adds_raw_screen_delta() {
        let mut vp = viewport();
        vp.zoom_at(2.0, Point::new(0.0, 0.0));
        let before = vp.offset();

        vp.begin_pan(Point::new(100.0, 100.0));
        vp.pan_move(Point::new(130.0, 80.0));
        vp.end_pan();

        assert_approx_eq!(f32, vp.offset().x(), before.x() + 30.0);
        assert_approx_eq!(f32, vp.offset().y(), before.y() - 20.0);
    }

    #[test]
    fn test_pan_move_ignored_when_not_panning() {
        let mut vp = viewport();
        let before = vp.offset();
        vp.pan_move(Point::new(500.0, 500.0));
        assert_eq!(vp.offset(), before);
    }

    #[test]
    fn test_center_on() {
        let mut vp = viewport();
        let world = Point::new(300.0, 400.0);
        vp.center_on(world);

        let screen = vp.to_screen(world);
        assert_approx_eq!(f32, screen.x(), 800.0);
        assert_approx_eq!(f32, screen.y(), 450.0);
    }

    #[test]
    fn test_non_finite_input_leaves_state_unchanged() {
        let mut vp = viewport();
        vp.zoom_at(1.3, Point::new(50.0, 50.0));
        let scale = vp.scale();
        let offset = vp.offset();

        vp.zoom_at(f32::NAN, Point::new(10.0, 10.0));
        vp.zoom_at(1.1, Point::new(f32::NAN, 0.0));
        vp.center_on(Point::new(f32::INFINITY, 0.0));

        assert_approx_eq!(f32, vp.scale(), scale);
        assert_eq!(vp.offset(), offset);
    }

    proptest! {
        // Anchor invariance: zooming at the screen projection of a world
        // point keeps that point at the same screen position.
        #[test]
        fn prop_zoom_anchor_invariance(
            factor in 0.1f32..5.0,
            wx in -5_000.0f32..5_000.0,
            wy in -5_000.0f32..5_000.0,
        ) {
            let mut vp = viewport();
            let world = Point::new(wx, wy);
            let screen_before = vp.to_screen(world);

            vp.zoom_at(factor, screen_before);
            let screen_after = vp.to_screen(world);

            prop_assert!((screen_after.x() - screen_before.x()).abs() < 0.01);
            prop_assert!((screen_after.y() - screen_before.y()).abs() < 0.01);
        }
    }
}
