//! Diagram-to-world coordinate transforms.
//!
//! Every region of the virtual world has its own linear mapping from the rail
//! diagram canvas onto the world ground plane, described by a
//! [`TransformConfig`]:
//!
//! ```text
//! world_x = (x * scale + offset) * multiplier
//! world_z = (y * scale + offset) * multiplier
//! ```
//!
//! [`RegionTable`] maps region identifiers onto their configuration. Looking
//! up an unknown region never fails; it silently yields the table's fallback.
//!
//! # Example
//!
//! ```
//! # use railmap_core::geometry::Point;
//! # use railmap_core::transform::{RegionTable, TransformConfig};
//! let table = RegionTable::builtin().with_region("test", TransformConfig::new(2.0, 1.0, 3.0));
//!
//! let world = table.resolve("test").to_world(Point::new(1.0, 2.0));
//! assert_eq!(world.x(), 9.0);
//! assert_eq!(world.z(), 15.0);
//!
//! // Unknown regions fall back to the identity transform
//! let fallback = table.resolve("nowhere").to_world(Point::new(1.0, 2.0));
//! assert_eq!(fallback.x(), 1.0);
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{EPSILON, Point, WorldCoord, WorldPoint};

/// Identifier of the fallback entry in the builtin region table.
pub const DEFAULT_REGION: &str = "default";

/// Builtin region transforms: `(id, scale, offset, multiplier)`.
const BUILTIN_REGIONS: &[(&str, f64, f64, f64)] = &[
    (DEFAULT_REGION, 1.0, 0.0, 1.0),
    ("zth", 1.0, 0.0, 2.0),
    ("naraku", 0.5, 0.0, 8.0),
    ("houtu", 1.0, -500.0, 1.0),
];

/// The `(scale, offset, multiplier)` triple describing one region's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default = "TransformConfig::default_scale")]
    scale: f64,
    #[serde(default)]
    offset: f64,
    #[serde(default = "TransformConfig::default_multiplier")]
    multiplier: f64,
}

impl TransformConfig {
    /// Creates a new transform configuration.
    ///
    /// # Arguments
    ///
    /// * `scale` - Factor applied to raw diagram coordinates.
    /// * `offset` - Shift applied after scaling.
    /// * `multiplier` - Final factor applied to the shifted value.
    pub fn new(scale: f64, offset: f64, multiplier: f64) -> Self {
        Self {
            scale,
            offset,
            multiplier,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Maps a diagram point onto the world ground plane.
    pub fn to_world(&self, point: Point) -> WorldPoint {
        WorldPoint::new(self.axis_to_world(point.x()), self.axis_to_world(point.y()))
    }

    /// Maps a diagram point onto a full world coordinate at the given elevation.
    pub fn to_world_coord(&self, point: Point, elevation: f64) -> WorldCoord {
        self.to_world(point).at_elevation(elevation)
    }

    /// Maps a world point back into diagram space.
    ///
    /// Returns `None` when the transform collapses the plane (zero scale or
    /// zero multiplier) and therefore has no inverse.
    pub fn to_diagram(&self, point: WorldPoint) -> Option<Point> {
        if self.scale.abs() <= EPSILON || self.multiplier.abs() <= EPSILON {
            return None;
        }
        Some(Point::new(
            self.axis_to_diagram(point.x()),
            self.axis_to_diagram(point.z()),
        ))
    }

    fn axis_to_world(&self, value: f64) -> f64 {
        (value * self.scale + self.offset) * self.multiplier
    }

    fn axis_to_diagram(&self, value: f64) -> f64 {
        (value / self.multiplier - self.offset) / self.scale
    }

    fn default_scale() -> f64 {
        1.0
    }

    fn default_multiplier() -> f64 {
        1.0
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::new(1.0, 0.0, 1.0)
    }
}

/// Region identifier to [`TransformConfig`] lookup with a silent fallback.
#[derive(Debug, Clone)]
pub struct RegionTable {
    regions: IndexMap<String, TransformConfig>,
    fallback: TransformConfig,
}

impl RegionTable {
    /// Creates a table holding the builtin regions.
    ///
    /// The `default` entry doubles as the fallback for unknown identifiers.
    pub fn builtin() -> Self {
        let regions: IndexMap<String, TransformConfig> = BUILTIN_REGIONS
            .iter()
            .map(|&(id, scale, offset, multiplier)| {
                (id.to_string(), TransformConfig::new(scale, offset, multiplier))
            })
            .collect();
        let fallback = regions
            .get(DEFAULT_REGION)
            .copied()
            .unwrap_or_default();
        Self { regions, fallback }
    }

    /// Returns a new table with `id` added or replaced.
    ///
    /// Replacing the `default` entry also replaces the fallback.
    pub fn with_region(mut self, id: impl Into<String>, config: TransformConfig) -> Self {
        self.insert(id, config);
        self
    }

    /// Adds or replaces the region `id`.
    pub fn insert(&mut self, id: impl Into<String>, config: TransformConfig) {
        let id = id.into();
        if id == DEFAULT_REGION {
            self.fallback = config;
        }
        self.regions.insert(id, config);
    }

    /// Returns true if `id` has an explicit entry.
    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    /// Returns the configuration for `id`, or the fallback for unknown regions.
    pub fn resolve(&self, id: &str) -> TransformConfig {
        match self.regions.get(id) {
            Some(config) => *config,
            None => {
                debug!(region = id; "Unknown region, using fallback transform");
                self.fallback
            }
        }
    }

    /// Returns the configuration used for unknown regions.
    pub fn fallback(&self) -> TransformConfig {
        self.fallback
    }

    /// Iterates over the explicit entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransformConfig)> {
        self.regions.iter().map(|(id, config)| (id.as_str(), config))
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
