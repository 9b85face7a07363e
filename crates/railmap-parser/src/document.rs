//! Diagram document decoding.
//!
//! A document is a JSON object whose `graph` member holds a list of `nodes`
//! and a list of `edges`. Every entry carries a free-form `attributes` bag in
//! which a `type` tag names a second member holding the type's own payload:
//!
//! ```json
//! {
//!   "key": "stn_a",
//!   "attributes": {
//!     "x": 10, "y": 20,
//!     "type": "shmetro-basic",
//!     "shmetro-basic": { "names": ["Central", "Zentral"] }
//!   }
//! }
//! ```
//!
//! Decoding resolves those bags into [`DiagramNode`] and [`DiagramEdge`]
//! values with one enum variant per node role and curve type. Entries that
//! cannot be resolved are skipped or degraded with a warning.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value, error::Category};

use railmap_core::{color::LineColor, curve::CurveShape, geometry::Point};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    registry::{NodeRole, StationRegistry},
    span::Span,
};

/// What a diagram node represents.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A plain station.
    Station { names: Vec<String> },
    /// A station drawn as an interchange.
    Interchange { names: Vec<String> },
    /// A line badge naming the line drawn in `color`.
    Badge {
        names: Vec<String>,
        color: Option<LineColor>,
    },
    /// Any other node: bends, labels, decorations.
    Waypoint,
}

/// A decoded diagram node.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    key: String,
    position: Point,
    kind: NodeKind,
}

impl DiagramNode {
    pub fn new(key: impl Into<String>, position: Point, kind: NodeKind) -> Self {
        Self {
            key: key.into(),
            position,
            kind,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the position in diagram space
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the station names if this node is a station of either kind.
    pub fn station_names(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::Station { names } | NodeKind::Interchange { names } => Some(names),
            NodeKind::Badge { .. } | NodeKind::Waypoint => None,
        }
    }
}

/// A decoded diagram edge.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    key: String,
    source: String,
    target: String,
    visible: bool,
    curve: CurveShape,
    color: LineColor,
}

impl DiagramEdge {
    /// Creates a visible edge.
    pub fn new(
        key: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        curve: CurveShape,
        color: LineColor,
    ) -> Self {
        Self {
            key: key.into(),
            source: source.into(),
            target: target.into(),
            visible: true,
            curve,
            color,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn curve(&self) -> &CurveShape {
        &self.curve
    }

    /// Returns the colour attribute edges are grouped into lines by
    pub fn color(&self) -> &LineColor {
        &self.color
    }
}

/// The decoded contents of a document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    graph: Option<RawGraph>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    key: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(default)]
    key: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

/// The names and colour carried by station and badge payloads.
#[derive(Debug, Default, Deserialize)]
struct NamedPayload {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    color: Vec<String>,
}

/// Decodes a document, reporting skipped entries to `collector`.
///
/// # Errors
///
/// Fails only when the document is not JSON, has no `graph`, or its graph is
/// not a list of keyed nodes and edges.
pub(crate) fn decode(
    source: &str,
    registry: &StationRegistry,
    collector: &mut DiagnosticCollector,
) -> Result<Document, ParseError> {
    let raw: RawDocument = serde_json::from_str(source).map_err(|err| json_error(source, &err))?;
    let Some(graph) = raw.graph else {
        return Err(Diagnostic::error("document has no `graph` object")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(0..source.len().min(1)), "expected a `graph` member")
            .with_help("save the diagram from the editor and import the saved file")
            .into());
    };

    let decoder = Decoder { source, registry };

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for raw_node in &graph.nodes {
        if !seen.insert(raw_node.key.as_str()) {
            collector.emit(
                Diagnostic::warning(format!("node key `{}` is used more than once", raw_node.key))
                    .with_code(ErrorCode::E102)
                    .with_help("only the first node with this key is used"),
            );
            continue;
        }
        if let Some(node) = decoder.node(raw_node, collector) {
            nodes.push(node);
        }
    }

    let edges = graph
        .edges
        .iter()
        .filter_map(|raw_edge| decoder.edge(raw_edge, collector))
        .collect();

    Ok(Document { nodes, edges })
}

fn json_error(source: &str, err: &serde_json::Error) -> ParseError {
    let span = Span::from_line_column(source, err.line(), err.column());
    let diagnostic = match err.classify() {
        Category::Data => Diagnostic::error(format!("invalid graph structure: {err}"))
            .with_code(ErrorCode::E003)
            .with_label(span, "unexpected value")
            .with_help("`graph.nodes` and `graph.edges` must be lists of keyed entries"),
        Category::Syntax | Category::Eof | Category::Io => {
            Diagnostic::error(format!("invalid JSON: {err}"))
                .with_code(ErrorCode::E001)
                .with_label(span, "could not read past here")
        }
    };
    diagnostic.into()
}

struct Decoder<'a> {
    source: &'a str,
    registry: &'a StationRegistry,
}

impl Decoder<'_> {
    fn span_of(&self, key: &str) -> Option<Span> {
        if key.is_empty() {
            return None;
        }
        Span::locate_key(self.source, key)
    }

    fn node(&self, raw: &RawNode, collector: &mut DiagnosticCollector) -> Option<DiagramNode> {
        let attributes = &raw.attributes;
        let x = attributes.get("x").and_then(Value::as_f64);
        let y = attributes.get("y").and_then(Value::as_f64);
        let (Some(x), Some(y)) = (x, y) else {
            debug!(node = raw.key.as_str(); "Skipping node without position");
            collector.emit(
                Diagnostic::warning(format!("node `{}` has no position", raw.key))
                    .with_code(ErrorCode::E100)
                    .with_label_at(self.span_of(&raw.key), "numeric `x` and `y` expected")
                    .with_help("the node is skipped"),
            );
            return None;
        };

        let node_type = attributes
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let payload: NamedPayload = attributes
            .get(node_type)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default();
        let names: Vec<String> = payload
            .names
            .into_iter()
            .filter(|name| !name.trim().is_empty())
            .collect();

        let kind = match self.registry.classify(node_type) {
            NodeRole::Station | NodeRole::Interchange if names.is_empty() => {
                debug!(node = raw.key.as_str(); "Station has no name, using it as a waypoint");
                collector.emit(
                    Diagnostic::warning(format!("station `{}` has no name", raw.key))
                        .with_code(ErrorCode::E101)
                        .with_label_at(self.span_of(&raw.key), "unnamed station")
                        .with_help("the node only shapes the line and is not listed as a station"),
                );
                NodeKind::Waypoint
            }
            NodeRole::Station => NodeKind::Station { names },
            NodeRole::Interchange => NodeKind::Interchange { names },
            NodeRole::Badge => NodeKind::Badge {
                names,
                color: LineColor::from_parts(payload.color),
            },
            NodeRole::Waypoint => NodeKind::Waypoint,
        };

        Some(DiagramNode::new(raw.key.clone(), Point::new(x, y), kind))
    }

    fn edge(&self, raw: &RawEdge, collector: &mut DiagnosticCollector) -> Option<DiagramEdge> {
        let attributes = &raw.attributes;
        let visible = attributes
            .get("visible")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if !visible {
            debug!(edge = raw.key.as_str(); "Skipping hidden edge");
            return None;
        }

        let span = self.span_of(&raw.key);
        let color = attributes
            .get("style")
            .and_then(Value::as_str)
            .and_then(|style| attributes.get(style))
            .and_then(|payload| payload.get("color"))
            .and_then(|color| serde_json::from_value::<Vec<String>>(color.clone()).ok())
            .and_then(LineColor::from_parts);
        let Some(color) = color else {
            debug!(edge = raw.key.as_str(); "Skipping edge without colour");
            collector.emit(
                Diagnostic::warning(format!("edge `{}` has no colour", raw.key))
                    .with_code(ErrorCode::E201)
                    .with_label_at(span, "no `color` in the edge style")
                    .with_help("the edge belongs to no line and is skipped"),
            );
            return None;
        };

        if let Err(message) = color.css() {
            collector.emit(
                Diagnostic::warning(format!("edge `{}` has an {message}", raw.key))
                    .with_code(ErrorCode::E204)
                    .with_label_at(span, "colour declared here")
                    .with_help("the line keeps the raw value as its colour"),
            );
        }

        let curve = self.curve(raw, span, collector);
        Some(DiagramEdge::new(
            raw.key.clone(),
            raw.source.clone(),
            raw.target.clone(),
            curve,
            color,
        ))
    }

    fn curve(
        &self,
        raw: &RawEdge,
        span: Option<Span>,
        collector: &mut DiagnosticCollector,
    ) -> CurveShape {
        let attributes = &raw.attributes;
        let curve_type = attributes
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let payload = attributes.get(curve_type);

        let decoded = match curve_type {
            "perpendicular" => curve_config(payload).map(CurveShape::Perpendicular),
            "diagonal" => curve_config(payload).map(CurveShape::Diagonal),
            "simple" => curve_config(payload).map(CurveShape::Simple),
            other => {
                debug!(edge = raw.key.as_str(), curve = other; "Unknown curve type, drawing straight");
                collector.emit(
                    Diagnostic::warning(format!(
                        "edge `{}` has unknown curve type `{other}`",
                        raw.key
                    ))
                    .with_code(ErrorCode::E202)
                    .with_label_at(span, "edge declared here")
                    .with_help("the edge is drawn as a straight segment"),
                );
                return CurveShape::Straight;
            }
        };

        decoded.unwrap_or_else(|message| {
            collector.emit(
                Diagnostic::warning(format!(
                    "edge `{}` has a malformed `{curve_type}` configuration: {message}",
                    raw.key
                ))
                .with_code(ErrorCode::E203)
                .with_label_at(span, "edge declared here")
                .with_help("the edge is drawn as a straight segment"),
            );
            CurveShape::Straight
        })
    }
}

fn curve_config<T: DeserializeOwned>(payload: Option<&Value>) -> Result<T, String> {
    let payload = payload.ok_or_else(|| "the configuration is missing".to_string())?;
    serde_json::from_value(payload.clone()).map_err(|err| err.to_string())
}
