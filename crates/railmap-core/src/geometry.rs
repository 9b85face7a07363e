//! Geometric primitives for diagram and world space.
//!
//! This module provides the point types shared by the curve builders, the
//! nearest-point queries and the snapping tools.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space (the rail diagram editor's canvas)
//! - [`WorldPoint`] - A planar `(x, z)` coordinate in world space
//! - [`WorldCoord`] - A full `(x, y, z)` world coordinate where `y` is elevation
//!
//! # Coordinate Systems
//!
//! Diagram space follows the editor canvas convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! World space is the map renderer's ground plane. A diagram `y` maps onto the
//! world `z` axis, and elevation is never derived from the diagram; it is
//! supplied by the caller when a [`WorldCoord`] is needed.

use serde::{Deserialize, Serialize};

/// Distances at or below this value are treated as zero.
pub const EPSILON: f64 = 1e-9;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use railmap_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the Euclidean distance from the origin
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Calculates the Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// Returns `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.hypot();
        if len <= EPSILON {
            return None;
        }
        Some(self.scale(1.0 / len))
    }

    /// Rotates the vector by 90° counter-clockwise: `(x, y) -> (-y, x)`.
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Moves from this point toward `target` by `distance`.
    ///
    /// Returns `self` when the two points coincide.
    pub fn toward(self, target: Point, distance: f64) -> Self {
        match target.sub_point(self).normalized() {
            Some(dir) => self.add_point(dir.scale(distance)),
            None => self,
        }
    }

    /// Returns true if the two points are within [`EPSILON`] of each other
    pub fn approx_eq(self, other: Point) -> bool {
        self.distance(other) <= EPSILON
    }
}

/// A planar point in world space.
///
/// The editing tools work on the ground plane only; elevation is supplied
/// contextually when a [`WorldCoord`] is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f64,
    z: f64,
}

impl WorldPoint {
    /// Creates a new world point
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the z-coordinate
    pub fn z(self) -> f64 {
        self.z
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified z-coordinate
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: WorldPoint) -> Self {
        Self {
            x: self.x + other.x,
            z: self.z + other.z,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: WorldPoint) -> Self {
        Self {
            x: self.x - other.x,
            z: self.z - other.z,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            z: self.z * factor,
        }
    }

    /// Dot product, treating both points as vectors
    pub fn dot(self, other: WorldPoint) -> f64 {
        self.x * other.x + self.z * other.z
    }

    /// Calculates the Euclidean distance to another point
    pub fn distance(self, other: WorldPoint) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`
    pub fn lerp(self, other: WorldPoint, t: f64) -> Self {
        self.add_point(other.sub_point(self).scale(t))
    }

    /// Lifts this point to a full world coordinate at the given elevation
    pub fn at_elevation(self, y: f64) -> WorldCoord {
        WorldCoord::new(self.x, y, self.z)
    }
}

/// A full world coordinate. `y` is the elevation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldCoord {
    x: f64,
    y: f64,
    z: f64,
}

impl WorldCoord {
    /// Creates a new world coordinate
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the elevation
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the z-coordinate
    pub fn z(self) -> f64 {
        self.z
    }

    /// Drops the elevation, returning the ground-plane point
    pub fn planar(self) -> WorldPoint {
        WorldPoint::new(self.x, self.z)
    }
}
