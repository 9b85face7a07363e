//! Threshold-gated snapping for the editing tools.
//!
//! Snapping is driven by a [`SnapPolicy`] value passed into every call. Tools
//! never keep their own copy of the threshold, so sharing one policy between
//! the control-point tool and the assist-line tool keeps them in lockstep.
//!
//! Two targets are supported:
//! - ring sets, where the candidate is projected onto the nearest segment;
//! - axis-aligned guides, where one coordinate is replaced outright.
//!
//! [`SnapTransform`] is the single operation the UI layer calls per pointer
//! event. [`RingSnap`] and [`AssistLine`] implement it.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::WorldPoint,
    nearest::{GeometryRings, Ring, closest_point_on_rings},
};

/// Default snap threshold in world units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 20.0;

/// The maximum distance a candidate point may be corrected by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapPolicy {
    threshold: f64,
}

impl SnapPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns true if a correction over `distance` is allowed.
    pub fn accepts(&self, distance: f64) -> bool {
        distance <= self.threshold
    }
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_THRESHOLD)
    }
}

/// The result of one snap attempt.
///
/// A rejected outcome carries the original point unchanged. `distance` is
/// infinite when the target had no geometry to measure against.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    pub point: WorldPoint,
    pub accepted: bool,
    pub distance: f64,
    pub target_label: Option<String>,
}

impl SnapOutcome {
    fn rejected(point: WorldPoint, distance: f64) -> Self {
        Self {
            point,
            accepted: false,
            distance,
            target_label: None,
        }
    }

    fn labelled(mut self, label: Option<&str>) -> Self {
        self.target_label = label.map(str::to_string);
        self
    }
}

/// A snapping target the UI can hand pointer positions to.
pub trait SnapTransform {
    /// Corrects `point` onto the target, or rejects it.
    fn transform(&self, point: WorldPoint, policy: &SnapPolicy) -> SnapOutcome;
}

/// A world-space axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Returns the coordinate of `point` on this axis.
    pub fn of(self, point: WorldPoint) -> f64 {
        match self {
            Self::X => point.x(),
            Self::Z => point.z(),
        }
    }

    /// Returns `point` with this axis' coordinate replaced.
    pub fn replace(self, point: WorldPoint, value: f64) -> WorldPoint {
        match self {
            Self::X => point.with_x(value),
            Self::Z => point.with_z(value),
        }
    }
}

/// Projects `point` onto the nearest segment of `rings`.
pub fn snap_to_rings(point: WorldPoint, rings: &GeometryRings, policy: &SnapPolicy) -> SnapOutcome {
    let Some(hit) = closest_point_on_rings(point, rings) else {
        return SnapOutcome::rejected(point, f64::INFINITY);
    };

    if !policy.accepts(hit.distance) {
        debug!(distance = hit.distance, threshold = policy.threshold(); "Ring snap rejected");
        return SnapOutcome::rejected(point, hit.distance);
    }

    SnapOutcome {
        point: hit.point,
        accepted: true,
        distance: hit.distance,
        target_label: None,
    }
}

/// Snaps `point` onto the axis-aligned line `axis == value`.
///
/// Only the coordinate on `axis` changes; the other is left untouched.
///
/// # Examples
///
/// ```
/// # use railmap_core::geometry::WorldPoint;
/// # use railmap_core::snap::{Axis, SnapPolicy, snap_to_axis};
/// let outcome = snap_to_axis(WorldPoint::new(110.0, 50.0), Axis::X, 100.0, &SnapPolicy::default());
/// assert!(outcome.accepted);
/// assert_eq!(outcome.point, WorldPoint::new(100.0, 50.0));
/// assert_eq!(outcome.distance, 10.0);
/// ```
pub fn snap_to_axis(point: WorldPoint, axis: Axis, value: f64, policy: &SnapPolicy) -> SnapOutcome {
    let distance = (axis.of(point) - value).abs();
    if !policy.accepts(distance) {
        debug!(distance, threshold = policy.threshold(); "Axis snap rejected");
        return SnapOutcome::rejected(point, distance);
    }

    SnapOutcome {
        point: axis.replace(point, value),
        accepted: true,
        distance,
        target_label: None,
    }
}

/// Snap target used while moving or drawing control points.
#[derive(Debug, Clone, Default)]
pub struct RingSnap {
    rings: GeometryRings,
    label: Option<String>,
}

impl RingSnap {
    pub fn new(rings: GeometryRings) -> Self {
        Self { rings, label: None }
    }

    /// Attaches a label reported back in every accepted outcome
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rings(&self) -> &GeometryRings {
        &self.rings
    }
}

impl SnapTransform for RingSnap {
    fn transform(&self, point: WorldPoint, policy: &SnapPolicy) -> SnapOutcome {
        let outcome = snap_to_rings(point, &self.rings, policy);
        if outcome.accepted {
            outcome.labelled(self.label.as_deref())
        } else {
            outcome
        }
    }
}

/// The geometry an assist line guides towards.
#[derive(Debug, Clone)]
pub enum AssistGuide {
    Rings(GeometryRings),
    Axis { axis: Axis, value: f64 },
}

/// Snap target of the assist-line tool.
#[derive(Debug, Clone)]
pub struct AssistLine {
    guide: AssistGuide,
    label: Option<String>,
}

impl AssistLine {
    pub fn new(guide: AssistGuide) -> Self {
        Self { guide, label: None }
    }

    pub fn axis(axis: Axis, value: f64) -> Self {
        Self::new(AssistGuide::Axis { axis, value })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn guide(&self) -> &AssistGuide {
        &self.guide
    }
}

impl SnapTransform for AssistLine {
    fn transform(&self, point: WorldPoint, policy: &SnapPolicy) -> SnapOutcome {
        let outcome = match &self.guide {
            AssistGuide::Rings(rings) => snap_to_rings(point, rings, policy),
            AssistGuide::Axis { axis, value } => snap_to_axis(point, *axis, *value, policy),
        };
        if outcome.accepted {
            outcome.labelled(self.label.as_deref())
        } else {
            outcome
        }
    }
}

/// Errors raised by control-point edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("control point {index} is out of range for a ring of {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("removing a point would leave fewer than {min} points")]
    TooFewPoints { min: usize },
}

/// A control point added by [`insert_control_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// Position of the new point in the ring
    pub index: usize,
    pub point: WorldPoint,
    pub distance: f64,
}

/// Inserts the projection of `click` onto `ring` right after the start of the
/// nearest segment.
///
/// A hit on a closed ring's wrap-around segment appends the point to the end.
/// Clicks farther than the policy threshold are ignored and return `None`.
pub fn insert_control_point(
    ring: &mut Ring,
    click: WorldPoint,
    policy: &SnapPolicy,
) -> Option<Insertion> {
    let (segment_index, hit) = ring.closest_point(click)?;
    if !policy.accepts(hit.distance) {
        debug!(distance = hit.distance; "Insertion ignored, click too far from ring");
        return None;
    }

    let index = segment_index + 1;
    ring.insert(index, hit.point);
    Some(Insertion {
        index,
        point: hit.point,
        distance: hit.distance,
    })
}

/// Moves control point `index` to `candidate` as corrected by `target`.
///
/// A rejected snap leaves the ring untouched; the rejected outcome is still
/// returned so the caller can give feedback.
pub fn move_control_point(
    ring: &mut Ring,
    index: usize,
    candidate: WorldPoint,
    target: &impl SnapTransform,
    policy: &SnapPolicy,
) -> Result<SnapOutcome, EditError> {
    let len = ring.len();
    if index >= len {
        return Err(EditError::IndexOutOfRange { index, len });
    }

    let outcome = target.transform(candidate, policy);
    if outcome.accepted {
        ring.set(index, outcome.point);
    }
    Ok(outcome)
}

/// Removes control point `index`.
///
/// Open rings keep at least two points and closed rings at least three.
pub fn remove_control_point(ring: &mut Ring, index: usize) -> Result<WorldPoint, EditError> {
    let len = ring.len();
    if index >= len {
        return Err(EditError::IndexOutOfRange { index, len });
    }

    let min = if ring.is_closed() { 3 } else { 2 };
    if len <= min {
        return Err(EditError::TooFewPoints { min });
    }
    Ok(ring.remove(index))
}
