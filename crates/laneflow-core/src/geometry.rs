//! Basic geometric value types shared across the engine.
//!
//! Three coordinate spaces meet here: *screen* (viewport pixels), *world*
//! (the unscaled, unpanned content plane), and *lane-relative* (offset from a
//! lane's own origin). All three use the same [`Point`] type; which space a
//! value lives in is a matter of where it came from.

use serde::{Deserialize, Serialize};

/// A point in one of the editor's coordinate spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Calculates the Euclidean distance from the origin.
    ///
    /// Used for screen-space gesture travel measurement.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Checks that both coordinates are finite (not NaN, not infinite).
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Represents the dimensions of an element with width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size.
    pub fn height(self) -> f32 {
        self.height
    }
}

/// A rectangular region given by its top-left corner and size.
///
/// Lane and band hit testing only ever looks at the vertical interval, so
/// the interesting operation is [`Rect::contains_y`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Creates a rect from a top-left corner and a size.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns the top-left corner.
    pub fn origin(self) -> Point {
        self.origin
    }

    /// Returns the size.
    pub fn size(self) -> Size {
        self.size
    }

    /// Returns the center point of the rect.
    pub fn center(self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Tests whether a y-coordinate falls inside the half-open vertical
    /// interval `[top, top + height)`.
    pub fn contains_y(self, y: f32) -> bool {
        y >= self.origin.y && y < self.origin.y + self.size.height
    }
}
