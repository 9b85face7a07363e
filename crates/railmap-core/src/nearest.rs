//! Nearest-point queries against segments and rings.
//!
//! A [`Ring`] is an ordered point sequence that is either an open polyline or
//! a closed polygon boundary. [`GeometryRings`] gathers several rings into a
//! single snapping target so lines and polygons are handled uniformly.
//!
//! The search is a linear scan over every segment; target sets are bounded
//! by what is visible on screen.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, WorldPoint},
    network::{CURVE_SAMPLES, EdgePath},
    transform::TransformConfig,
};

/// Squared segment lengths below this are treated as a single point.
pub const DEGENERATE_SEGMENT: f64 = 1e-12;

/// The projection of a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Closest point on the segment
    pub point: WorldPoint,
    /// Parametric position of `point` along the segment, in `[0, 1]`
    pub t: f64,
    /// Distance from the query point to `point`
    pub distance: f64,
}

/// The projection of a point onto a ring set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingProjection {
    pub point: WorldPoint,
    pub distance: f64,
    /// Index of the ring holding the closest segment
    pub ring_index: usize,
    /// Index of the closest segment's start point within its ring
    pub segment_index: usize,
    pub t: f64,
}

/// Projects `p` onto the segment `a`-`b`, clamping to the segment's extent.
///
/// A degenerate segment (`a` and `b` coincide) yields `a` itself.
///
/// # Examples
///
/// ```
/// # use railmap_core::geometry::WorldPoint;
/// # use railmap_core::nearest::closest_point_on_segment;
/// let hit = closest_point_on_segment(
///     WorldPoint::new(5.0, 5.0),
///     WorldPoint::new(0.0, 0.0),
///     WorldPoint::new(10.0, 0.0),
/// );
/// assert_eq!(hit.point, WorldPoint::new(5.0, 0.0));
/// assert_eq!(hit.t, 0.5);
/// assert_eq!(hit.distance, 5.0);
/// ```
pub fn closest_point_on_segment(p: WorldPoint, a: WorldPoint, b: WorldPoint) -> SegmentProjection {
    let ab = b.sub_point(a);
    let length_sq = ab.dot(ab);
    if length_sq < DEGENERATE_SEGMENT {
        return SegmentProjection {
            point: a,
            t: 0.0,
            distance: p.distance(a),
        };
    }

    let t = (p.sub_point(a).dot(ab) / length_sq).clamp(0.0, 1.0);
    let point = a.lerp(b, t);
    SegmentProjection {
        point,
        t,
        distance: p.distance(point),
    }
}

/// An open polyline or closed polygon boundary in world space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<WorldPoint>,
    closed: bool,
}

impl Ring {
    /// Creates an open polyline
    pub fn open(points: Vec<WorldPoint>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Creates a closed polygon boundary; the closing segment is implicit
    pub fn closed(points: Vec<WorldPoint>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Creates a ring from diagram-space points.
    pub fn from_diagram(points: &[Point], closed: bool, transform: &TransformConfig) -> Self {
        Self {
            points: points.iter().map(|p| transform.to_world(*p)).collect(),
            closed,
        }
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of segments: `n - 1` when open, `n` when closed.
    pub fn segment_count(&self) -> usize {
        match (self.closed, self.points.len()) {
            (_, 0) => 0,
            (true, n) => n,
            (false, n) => n - 1,
        }
    }

    /// Returns the endpoints of segment `index`, wrapping for closed rings.
    pub fn segment(&self, index: usize) -> Option<(WorldPoint, WorldPoint)> {
        if index >= self.segment_count() {
            return None;
        }
        let start = self.points[index];
        let end = self.points[(index + 1) % self.points.len()];
        Some((start, end))
    }

    /// Iterates over every segment in order.
    pub fn segments(&self) -> impl Iterator<Item = (WorldPoint, WorldPoint)> + '_ {
        (0..self.segment_count()).filter_map(|index| self.segment(index))
    }

    /// Inserts a point at `index`, shifting later points.
    pub(crate) fn insert(&mut self, index: usize, point: WorldPoint) {
        self.points.insert(index, point);
    }

    /// Replaces the point at `index`.
    pub(crate) fn set(&mut self, index: usize, point: WorldPoint) -> Option<WorldPoint> {
        let slot = self.points.get_mut(index)?;
        Some(std::mem::replace(slot, point))
    }

    pub(crate) fn remove(&mut self, index: usize) -> WorldPoint {
        self.points.remove(index)
    }

    /// Returns the closest segment projection of `p` within this ring.
    pub fn closest_point(&self, p: WorldPoint) -> Option<(usize, SegmentProjection)> {
        let mut best: Option<(usize, SegmentProjection)> = None;
        for (index, (a, b)) in self.segments().enumerate() {
            let hit = closest_point_on_segment(p, a, b);
            if best.is_none_or(|(_, current)| hit.distance < current.distance) {
                best = Some((index, hit));
            }
        }
        best
    }
}

/// A set of rings used as one snapping target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryRings {
    rings: Vec<Ring>,
}

impl GeometryRings {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Builds one open ring per edge path by flattening its curves.
    pub fn from_edge_paths<'a>(paths: impl IntoIterator<Item = &'a EdgePath>) -> Self {
        let rings = paths
            .into_iter()
            .map(|path| Ring::open(path.polyline(CURVE_SAMPLES)))
            .filter(|ring| !ring.is_empty())
            .collect();
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn push(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|ring| ring.segment_count() == 0)
    }
}

impl From<Ring> for GeometryRings {
    fn from(ring: Ring) -> Self {
        Self { rings: vec![ring] }
    }
}

/// Returns the global minimum-distance projection of `p` over every segment
/// of every ring.
///
/// Returns `None` if the rings hold no segments at all. Ties keep the first
/// segment found.
pub fn closest_point_on_rings(p: WorldPoint, rings: &GeometryRings) -> Option<RingProjection> {
    let mut best: Option<RingProjection> = None;
    for (ring_index, ring) in rings.rings().iter().enumerate() {
        let Some((segment_index, hit)) = ring.closest_point(p) else {
            continue;
        };
        if best.is_none_or(|current| hit.distance < current.distance) {
            best = Some(RingProjection {
                point: hit.point,
                distance: hit.distance,
                ring_index,
                segment_index,
                t: hit.t,
            });
        }
    }
    trace!(found = best.is_some(); "Closest point on rings");
    best
}
