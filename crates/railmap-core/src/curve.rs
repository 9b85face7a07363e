//! Edge path geometry.
//!
//! Builds the rendered shape of a diagram edge between two diagram points.
//! Every builder produces an [`EdgePath`] whose control points have been
//! mapped to world space, so lengths are always comparable in world units.
//!
//! Shapes:
//!
//! - **Perpendicular**: an L-shaped path with one optionally rounded elbow.
//! - **Diagonal**: straight, 45° diagonal, straight; two optionally rounded corners.
//! - **Simple**: a single straight segment shifted sideways.
//! - **Straight**: the fallback; a plain segment between the two points.
//!
//! Rounded corners are quadratic beziers with the corner itself as control
//! point. The reach along each adjoining leg is the rounding factor clamped to
//! half the shorter leg, so a curve never overshoots a short leg.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{EPSILON, Point},
    network::{EdgePath, PathSegment},
    transform::TransformConfig,
};

/// Which of the two L orientations a bent path uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartFrom {
    #[default]
    From,
    To,
}

/// Parameters of a perpendicular (L-shaped) edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerpendicularConfig {
    #[serde(default)]
    pub start_from: StartFrom,
    #[serde(default)]
    pub offset_from: f64,
    #[serde(default)]
    pub offset_to: f64,
    #[serde(default)]
    pub round_corner_factor: f64,
}

/// Parameters of a diagonal edge.
///
/// A `startFrom` entry in the document is accepted and ignored; the straight
/// remainder is always split evenly around the 45° run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagonalConfig {
    #[serde(default)]
    pub offset_from: f64,
    #[serde(default)]
    pub offset_to: f64,
    #[serde(default)]
    pub round_corner_factor: f64,
}

/// Parameters of a simple (straight, shifted) edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleConfig {
    #[serde(default)]
    pub offset: f64,
}

/// The curve type of an edge together with its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    Perpendicular(PerpendicularConfig),
    Diagonal(DiagonalConfig),
    Simple(SimpleConfig),
    /// Fallback for unrecognised curve types.
    Straight,
}

impl CurveShape {
    /// Builds the world-space path of this shape between `from` and `to`.
    pub fn build(&self, from: Point, to: Point, transform: &TransformConfig) -> EdgePath {
        match self {
            Self::Perpendicular(config) => perpendicular_path(from, to, config, transform),
            Self::Diagonal(config) => diagonal_path(from, to, config, transform),
            Self::Simple(config) => simple_path(from, to, config, transform),
            Self::Straight => straight_path(from, to, transform),
        }
    }

    /// Returns the curve type tag as written in diagram documents
    pub fn name(&self) -> &'static str {
        match self {
            Self::Perpendicular(_) => "perpendicular",
            Self::Diagonal(_) => "diagonal",
            Self::Simple(_) => "simple",
            Self::Straight => "straight",
        }
    }
}

/// A segment in diagram space, before the world transform.
#[derive(Debug, Clone, Copy)]
enum DiagramSegment {
    Line(Point, Point),
    Quadratic(Point, Point, Point),
}

impl DiagramSegment {
    fn to_world(self, transform: &TransformConfig) -> PathSegment {
        match self {
            Self::Line(from, to) => PathSegment::Line {
                from: transform.to_world(from),
                to: transform.to_world(to),
            },
            Self::Quadratic(from, control, to) => PathSegment::Quadratic {
                from: transform.to_world(from),
                control: transform.to_world(control),
                to: transform.to_world(to),
            },
        }
    }
}

/// Builds an L-shaped path.
///
/// Each endpoint is shifted perpendicular to the `from -> to` direction by its
/// own offset. The elbow goes horizontal-first or vertical-first depending on
/// the dominant axis of the displacement combined with `start_from`.
pub fn perpendicular_path(
    from: Point,
    to: Point,
    config: &PerpendicularConfig,
    transform: &TransformConfig,
) -> EdgePath {
    let Some((a, b)) = offset_endpoints(from, to, config.offset_from, config.offset_to) else {
        return straight_path(from, to, transform);
    };

    let delta = to.sub_point(from);
    let horizontal_dominant = delta.x().abs() >= delta.y().abs();
    let horizontal_first = match config.start_from {
        StartFrom::From => horizontal_dominant,
        StartFrom::To => !horizontal_dominant,
    };
    let elbow = if horizontal_first {
        Point::new(b.x(), a.y())
    } else {
        Point::new(a.x(), b.y())
    };

    rounded_path(&[a, elbow, b], config.round_corner_factor, transform)
}

/// Builds a path with a 45° diagonal run between two straight legs.
///
/// The diagonal run spans `min(|dx|, |dy|)` on both axes of the offset
/// endpoints; the remaining displacement along the dominant axis is split
/// evenly between the leading and trailing legs.
pub fn diagonal_path(
    from: Point,
    to: Point,
    config: &DiagonalConfig,
    transform: &TransformConfig,
) -> EdgePath {
    let Some((a, b)) = offset_endpoints(from, to, config.offset_from, config.offset_to) else {
        return straight_path(from, to, transform);
    };

    let delta = b.sub_point(a);
    let (dx, dy) = (delta.x(), delta.y());
    let diagonal = dx.abs().min(dy.abs());
    let rest = dx.abs().max(dy.abs()) - diagonal;

    let lead = if dx.abs() >= dy.abs() {
        Point::new(dx.signum() * rest / 2.0, 0.0)
    } else {
        Point::new(0.0, dy.signum() * rest / 2.0)
    };
    let first = a.add_point(lead);
    let second = first.add_point(Point::new(dx.signum() * diagonal, dy.signum() * diagonal));

    rounded_path(&[a, first, second, b], config.round_corner_factor, transform)
}

/// Builds a single straight segment with both endpoints shifted by the same
/// perpendicular offset.
pub fn simple_path(
    from: Point,
    to: Point,
    config: &SimpleConfig,
    transform: &TransformConfig,
) -> EdgePath {
    match offset_endpoints(from, to, config.offset, config.offset) {
        Some((a, b)) => straight_path(a, b, transform),
        None => straight_path(from, to, transform),
    }
}

/// Builds the fallback path: one straight segment, no offset, no rounding.
pub fn straight_path(from: Point, to: Point, transform: &TransformConfig) -> EdgePath {
    EdgePath::straight(transform.to_world(from), transform.to_world(to))
}

/// Shifts both endpoints perpendicular to the `from -> to` direction.
///
/// Returns `None` when the endpoints coincide and no direction exists.
fn offset_endpoints(
    from: Point,
    to: Point,
    offset_from: f64,
    offset_to: f64,
) -> Option<(Point, Point)> {
    let normal = to.sub_point(from).normalized()?.perpendicular();
    Some((
        from.add_point(normal.scale(offset_from)),
        to.add_point(normal.scale(offset_to)),
    ))
}

/// Turns a corner polyline into straight and rounded segments.
fn rounded_path(points: &[Point], factor: f64, transform: &TransformConfig) -> EdgePath {
    let segments = round_corners(&dedup_points(points), factor.max(0.0));
    EdgePath::new(
        segments
            .into_iter()
            .map(|segment| segment.to_world(transform))
            .collect(),
    )
}

/// Drops consecutive points that coincide, which removes zero-length legs.
fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if result.last().is_none_or(|last| !last.approx_eq(point)) {
            result.push(point);
        }
    }
    result
}

fn round_corners(points: &[Point], factor: f64) -> Vec<DiagramSegment> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() == 1 {
        return vec![DiagramSegment::Line(first, last)];
    }

    let mut segments = Vec::with_capacity(points.len() * 2);
    let mut cursor = first;
    for window in points.windows(3) {
        let (prev, corner, next) = (window[0], window[1], window[2]);
        let reach = factor
            .min(corner.distance(prev) / 2.0)
            .min(corner.distance(next) / 2.0);

        if reach <= EPSILON {
            segments.push(DiagramSegment::Line(cursor, corner));
            cursor = corner;
            continue;
        }

        let enter = corner.toward(prev, reach);
        let exit = corner.toward(next, reach);
        if !cursor.approx_eq(enter) {
            segments.push(DiagramSegment::Line(cursor, enter));
        }
        segments.push(DiagramSegment::Quadratic(enter, corner, exit));
        cursor = exit;
    }
    if !cursor.approx_eq(last) {
        segments.push(DiagramSegment::Line(cursor, last));
    }
    segments
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::WorldPoint;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn start_from_strategy() -> impl Strategy<Value = StartFrom> {
        prop_oneof![Just(StartFrom::From), Just(StartFrom::To)]
    }

    fn perpendicular_strategy() -> impl Strategy<Value = PerpendicularConfig> {
        (start_from_strategy(), -20.0f64..20.0, -20.0f64..20.0, 0.0f64..50.0).prop_map(
            |(start_from, offset_from, offset_to, round_corner_factor)| PerpendicularConfig {
                start_from,
                offset_from,
                offset_to,
                round_corner_factor,
            },
        )
    }

    fn diagonal_strategy() -> impl Strategy<Value = DiagonalConfig> {
        perpendicular_strategy().prop_map(|config| DiagonalConfig {
            offset_from: config.offset_from,
            offset_to: config.offset_to,
            round_corner_factor: config.round_corner_factor,
        })
    }

    fn transform_strategy() -> impl Strategy<Value = TransformConfig> {
        (0.1f64..4.0, -100.0f64..100.0, 0.5f64..4.0)
            .prop_map(|(scale, offset, multiplier)| TransformConfig::new(scale, offset, multiplier))
    }

    /// Arc length measured with a much finer chord sum than the path uses.
    fn fine_length(path: &EdgePath) -> f64 {
        path.segments()
            .iter()
            .map(|segment| {
                segment
                    .sample(2000)
                    .windows(2)
                    .map(|pair| pair[0].distance(pair[1]))
                    .sum::<f64>()
            })
            .sum()
    }

    /// The stored length stays within 1% of an independent fine measurement.
    fn check_length_close_to_integrated(path: &EdgePath) -> Result<(), TestCaseError> {
        let reference = fine_length(path);
        let error = (path.length() - reference).abs();
        prop_assert!(error <= reference * 0.01 + 1e-9);
        Ok(())
    }

    /// Consecutive segments share their joint points.
    fn check_segments_are_continuous(path: &EdgePath) -> Result<(), TestCaseError> {
        for pair in path.segments().windows(2) {
            let gap = pair[0].end().distance(pair[1].start());
            prop_assert!(gap <= 1e-6, "gap of {gap} between segments");
        }
        Ok(())
    }

    fn check_endpoints(
        path: &EdgePath,
        first: WorldPoint,
        last: WorldPoint,
    ) -> Result<(), TestCaseError> {
        let start = path.segments().first().map(PathSegment::start);
        let end = path.segments().last().map(PathSegment::end);
        prop_assert!(start.is_some_and(|p| p.distance(first) <= 1e-6));
        prop_assert!(end.is_some_and(|p| p.distance(last) <= 1e-6));
        Ok(())
    }

    fn offset_world_endpoints(
        from: Point,
        to: Point,
        offset_from: f64,
        offset_to: f64,
        transform: &TransformConfig,
    ) -> Option<(WorldPoint, WorldPoint)> {
        offset_endpoints(from, to, offset_from, offset_to)
            .map(|(a, b)| (transform.to_world(a), transform.to_world(b)))
    }

    proptest! {
        #[test]
        fn perpendicular_length_is_accurate(
            from in point_strategy(),
            to in point_strategy(),
            config in perpendicular_strategy(),
            transform in transform_strategy(),
        ) {
            let path = perpendicular_path(from, to, &config, &transform);
            check_length_close_to_integrated(&path)?;
            check_segments_are_continuous(&path)?;
            if let Some((a, b)) = offset_world_endpoints(from, to, config.offset_from, config.offset_to, &transform) {
                check_endpoints(&path, a, b)?;
            }
        }

        #[test]
        fn diagonal_length_is_accurate(
            from in point_strategy(),
            to in point_strategy(),
            config in diagonal_strategy(),
            transform in transform_strategy(),
        ) {
            let path = diagonal_path(from, to, &config, &transform);
            check_length_close_to_integrated(&path)?;
            check_segments_are_continuous(&path)?;
            if let Some((a, b)) = offset_world_endpoints(from, to, config.offset_from, config.offset_to, &transform) {
                check_endpoints(&path, a, b)?;
            }
        }
    }
}
