//! Line and station records produced by the graph import.
//!
//! These are read-only snapshots handed to the renderer and the search index.
//! They are rebuilt wholesale on every data load and never patched in place.
//!
//! - [`PathSegment`] - A straight or quadratic piece of a rendered edge
//! - [`EdgePath`] - The world-space geometry between two consecutive stations
//! - [`ParsedStation`] - A station as it appears on one line
//! - [`ParsedLine`] - An ordered list of stations with the paths between them
//! - [`RailNetwork`] - All lines plus the merged global station list

use indexmap::IndexSet;
use serde::Serialize;

use crate::geometry::{WorldCoord, WorldPoint};

/// Number of chords used to measure and flatten a quadratic segment.
pub const CURVE_SAMPLES: usize = 10;

/// One piece of an [`EdgePath`], in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PathSegment {
    /// A straight two-point segment.
    Line { from: WorldPoint, to: WorldPoint },
    /// A quadratic bezier with a single control point.
    Quadratic {
        from: WorldPoint,
        control: WorldPoint,
        to: WorldPoint,
    },
}

impl PathSegment {
    /// Returns the first point of the segment
    pub fn start(&self) -> WorldPoint {
        match self {
            Self::Line { from, .. } | Self::Quadratic { from, .. } => *from,
        }
    }

    /// Returns the last point of the segment
    pub fn end(&self) -> WorldPoint {
        match self {
            Self::Line { to, .. } | Self::Quadratic { to, .. } => *to,
        }
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> WorldPoint {
        match *self {
            Self::Line { from, to } => from.lerp(to, t),
            Self::Quadratic { from, control, to } => {
                let u = 1.0 - t;
                from.scale(u * u)
                    .add_point(control.scale(2.0 * u * t))
                    .add_point(to.scale(t * t))
            }
        }
    }

    /// Returns the segment length.
    ///
    /// Straight segments are measured exactly. Quadratic segments are
    /// approximated by summing [`CURVE_SAMPLES`] chords.
    pub fn length(&self) -> f64 {
        match self {
            Self::Line { from, to } => from.distance(*to),
            Self::Quadratic { .. } => self
                .sample(CURVE_SAMPLES)
                .windows(2)
                .map(|pair| pair[0].distance(pair[1]))
                .sum(),
        }
    }

    /// Returns the same segment traversed end to start.
    pub fn reversed(&self) -> Self {
        match *self {
            Self::Line { from, to } => Self::Line { from: to, to: from },
            Self::Quadratic { from, control, to } => Self::Quadratic {
                from: to,
                control,
                to: from,
            },
        }
    }

    /// Samples the segment at `steps + 1` evenly spaced parameters.
    ///
    /// Straight segments always yield just their two endpoints.
    pub fn sample(&self, steps: usize) -> Vec<WorldPoint> {
        match self {
            Self::Line { from, to } => vec![*from, *to],
            Self::Quadratic { .. } => {
                let steps = steps.max(1);
                (0..=steps)
                    .map(|i| self.point_at(i as f64 / steps as f64))
                    .collect()
            }
        }
    }
}

/// The world-space geometry connecting two consecutive stations of a line.
///
/// `length` is always the sum of the segment lengths measured in world units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgePath {
    segments: Vec<PathSegment>,
    length: f64,
}

impl EdgePath {
    /// Creates a path from its segments, measuring the total length.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        let length = segments.iter().map(PathSegment::length).sum();
        Self { segments, length }
    }

    /// Creates a single straight segment path.
    pub fn straight(from: WorldPoint, to: WorldPoint) -> Self {
        Self::new(vec![PathSegment::Line { from, to }])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the total length in world units
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends another path's segments and length to this one.
    pub fn extend(&mut self, other: EdgePath) {
        self.length += other.length;
        self.segments.extend(other.segments);
    }

    /// Returns the path traversed end to start; the length is unchanged.
    pub fn reversed(&self) -> Self {
        Self {
            segments: self.segments.iter().rev().map(PathSegment::reversed).collect(),
            length: self.length,
        }
    }

    /// Flattens the path into a polyline.
    ///
    /// Quadratic segments are sampled with `steps` chords. Points shared by
    /// consecutive segments appear once.
    pub fn polyline(&self, steps: usize) -> Vec<WorldPoint> {
        let mut points: Vec<WorldPoint> = Vec::new();
        for segment in &self.segments {
            let sampled = segment.sample(steps);
            let skip = match points.last() {
                Some(last) if *last == segment.start() => 1,
                _ => 0,
            };
            points.extend(sampled.into_iter().skip(skip));
        }
        points
    }
}

/// A station as it appears on one line.
///
/// Copies of the same station on different lines agree on `name`, `lines`
/// and `is_transfer` once the network is complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStation {
    name: String,
    names: Vec<String>,
    node: String,
    coord: WorldCoord,
    index: usize,
    is_transfer: bool,
    lines: IndexSet<String>,
}

impl ParsedStation {
    /// Creates a line-local station record.
    ///
    /// # Arguments
    ///
    /// * `names` - Localised names; the first is the identity key. Must not be empty.
    /// * `node` - Key of the diagram node the station came from.
    /// * `coord` - World coordinate of the station.
    /// * `index` - 1-based position within its line.
    /// * `line` - Display name of the owning line.
    pub fn new(
        names: Vec<String>,
        node: impl Into<String>,
        coord: WorldCoord,
        index: usize,
        line: impl Into<String>,
    ) -> Self {
        let name = names.first().cloned().unwrap_or_default();
        let mut lines = IndexSet::new();
        lines.insert(line.into());
        Self {
            name,
            names,
            node: node.into(),
            coord,
            index,
            is_transfer: false,
            lines,
        }
    }

    /// Returns the identity name of the station
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every localised name, primary first
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the key of the diagram node this station came from
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn coord(&self) -> WorldCoord {
        self.coord
    }

    /// Returns the 1-based position within the owning line
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_transfer(&self) -> bool {
        self.is_transfer
    }

    /// Returns the names of every line serving this station
    pub fn lines(&self) -> &IndexSet<String> {
        &self.lines
    }

    /// Returns a copy carrying the merged line membership.
    ///
    /// `is_transfer` is passed separately since two lines may share a
    /// display name.
    pub fn with_membership(&self, lines: IndexSet<String>, is_transfer: bool) -> Self {
        Self {
            is_transfer,
            lines,
            ..self.clone()
        }
    }
}

/// A resolved line: ordered stations plus one path per consecutive pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLine {
    id: String,
    name: String,
    color: String,
    stations: Vec<ParsedStation>,
    edge_paths: Vec<EdgePath>,
}

impl ParsedLine {
    /// Creates a line.
    ///
    /// `edge_paths` must hold exactly one path per consecutive station pair.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        stations: Vec<ParsedStation>,
        edge_paths: Vec<EdgePath>,
    ) -> Self {
        debug_assert_eq!(
            edge_paths.len(),
            stations.len().saturating_sub(1),
            "one edge path per consecutive station pair"
        );
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            stations,
            edge_paths,
        }
    }

    /// Returns the stable line identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line colour as a CSS colour string
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn stations(&self) -> &[ParsedStation] {
        &self.stations
    }

    pub fn edge_paths(&self) -> &[EdgePath] {
        &self.edge_paths
    }

    /// Returns the total rendered length of the line
    pub fn length(&self) -> f64 {
        self.edge_paths.iter().map(EdgePath::length).sum()
    }

    /// Returns a copy of this line with its stations replaced.
    pub fn with_stations(&self, stations: Vec<ParsedStation>) -> Self {
        Self {
            stations,
            ..self.clone()
        }
    }
}

/// The complete import result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RailNetwork {
    lines: Vec<ParsedLine>,
    stations: Vec<ParsedStation>,
}

impl RailNetwork {
    /// Creates a network from its lines and the merged global station list.
    pub fn new(lines: Vec<ParsedLine>, stations: Vec<ParsedStation>) -> Self {
        Self { lines, stations }
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    /// Returns one entry per distinct station name, in first-appearance order
    pub fn stations(&self) -> &[ParsedStation] {
        &self.stations
    }

    /// Looks a station up by its identity name.
    pub fn station(&self, name: &str) -> Option<&ParsedStation> {
        self.stations.iter().find(|station| station.name() == name)
    }

    /// Looks a line up by its display name.
    pub fn line(&self, name: &str) -> Option<&ParsedLine> {
        self.lines.iter().find(|line| line.name() == name)
    }
}
