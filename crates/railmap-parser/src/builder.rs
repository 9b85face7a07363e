//! Groups diagram edges into lines and builds their stations and paths.
//!
//! For every colour the builder:
//!
//! 1. builds an undirected [`LineGraph`] of the colour's visible edges;
//! 2. walks it depth-first from a line end, recording the edge crossed at
//!    every step;
//! 3. keeps the named station nodes of the walk, remembering where in the
//!    walk each one appeared;
//! 4. joins the paths of every edge crossed between two consecutive stations
//!    into one [`EdgePath`].
//!
//! Colours resolving to fewer than two stations are dropped. Line-local
//! stations are then merged across lines by [`crate::merge`].

use indexmap::IndexMap;
use log::{debug, info, trace};

use railmap_core::{
    color::LineColor,
    curve::straight_path,
    network::{EdgePath, ParsedLine, ParsedStation, RailNetwork},
    transform::TransformConfig,
};

use crate::{
    ImportOptions,
    document::{DiagramEdge, DiagramNode, NodeKind},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    graph::{LineGraph, NodeIndex, Step},
    merge::merge_transfers,
    span::Span,
};

type ColorGraph<'a> = LineGraph<'a, &'a DiagramNode, &'a DiagramEdge>;

/// A station found while walking a colour graph.
struct StationStop<'a> {
    /// Position of the station in the unfiltered walk
    position: usize,
    node: &'a DiagramNode,
    names: &'a [String],
}

/// Turns decoded nodes and edges into a [`RailNetwork`].
pub(crate) struct GraphLineBuilder<'a> {
    options: &'a ImportOptions,
    transform: TransformConfig,
    source: Option<&'a str>,
}

impl<'a> GraphLineBuilder<'a> {
    pub(crate) fn new(options: &'a ImportOptions, transform: TransformConfig) -> Self {
        Self {
            options,
            transform,
            source: None,
        }
    }

    /// Attaches the document text so diagnostics can point into it.
    pub(crate) fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds every line and merges stations shared between lines.
    pub(crate) fn build<'g>(
        &self,
        nodes: &'g [DiagramNode],
        edges: &'g [DiagramEdge],
        collector: &mut DiagnosticCollector,
    ) -> RailNetwork {
        let node_map: IndexMap<&'g str, &'g DiagramNode> =
            nodes.iter().map(|node| (node.key(), node)).collect();

        let mut groups: IndexMap<String, (&LineColor, Vec<&'g DiagramEdge>)> = IndexMap::new();
        for edge in edges.iter().filter(|edge| edge.is_visible()) {
            groups
                .entry(edge.color().group_key())
                .or_insert_with(|| (edge.color(), Vec::new()))
                .1
                .push(edge);
        }

        let mut lines = Vec::new();
        for (key, (color, group)) in &groups {
            let number = lines.len() + 1;
            match self.build_line(number, color, group, &node_map, nodes, collector) {
                Some(line) => lines.push(line),
                None => {
                    debug!(color = key.as_str(); "Dropping line with fewer than two stations");
                    collector.emit(
                        Diagnostic::warning(format!(
                            "line coloured `{color}` has fewer than two named stations"
                        ))
                        .with_code(ErrorCode::E300)
                        .with_label_at(self.span_of(group[0].key()), "first edge of the line")
                        .with_help("the line is left out of the import"),
                    );
                }
            }
        }

        let network = merge_transfers(lines);
        info!(
            lines = network.lines().len(),
            stations = network.stations().len();
            "Built rail network",
        );
        network
    }

    fn build_line<'g>(
        &self,
        number: usize,
        color: &LineColor,
        group: &[&'g DiagramEdge],
        node_map: &IndexMap<&'g str, &'g DiagramNode>,
        nodes: &'g [DiagramNode],
        collector: &mut DiagnosticCollector,
    ) -> Option<ParsedLine> {
        let graph = self.color_graph(group, node_map, collector);
        trace!(
            color = color.background(),
            nodes = graph.nodes_count(),
            edges = graph.edges_count();
            "Built colour graph",
        );
        let start = graph.traversal_start()?;
        let steps = graph.traverse(start);

        if steps.len() < graph.nodes_count() {
            debug!(
                color = color.background(),
                reached = steps.len(),
                total = graph.nodes_count();
                "Ignoring nodes unreachable from the line start",
            );
            collector.emit(
                Diagnostic::warning(format!(
                    "{} nodes of line coloured `{color}` are not connected to the rest of the line",
                    graph.nodes_count() - steps.len()
                ))
                .with_code(ErrorCode::E301)
                .with_help("only the part connected to the line's first end is imported"),
            );
        }

        let stops: Vec<StationStop<'g>> = steps
            .iter()
            .enumerate()
            .filter_map(|(position, step)| {
                let node = graph.node(step.node);
                node.station_names().map(|names| StationStop {
                    position,
                    node,
                    names,
                })
            })
            .collect();
        if stops.len() < 2 {
            return None;
        }

        let name = line_name(color, nodes).unwrap_or_else(|| format!("Line {number}"));
        let stations = stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                ParsedStation::new(
                    stop.names.to_vec(),
                    stop.node.key(),
                    self.transform
                        .to_world_coord(stop.node.position(), self.options.elevation),
                    index + 1,
                    name.clone(),
                )
            })
            .collect();
        let edge_paths = stops
            .windows(2)
            .map(|pair| self.station_path(&graph, &steps, &pair[0], &pair[1]))
            .collect();

        Some(ParsedLine::new(
            format!("line-{number}"),
            name,
            color.background(),
            stations,
            edge_paths,
        ))
    }

    fn color_graph<'g>(
        &self,
        group: &[&'g DiagramEdge],
        node_map: &IndexMap<&'g str, &'g DiagramNode>,
        collector: &mut DiagnosticCollector,
    ) -> ColorGraph<'g> {
        let mut graph = ColorGraph::new();
        for &edge in group {
            let source = node_map.get(edge.source()).copied();
            let target = node_map.get(edge.target()).copied();
            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    edge.source()
                } else {
                    edge.target()
                };
                debug!(edge = edge.key(), node = missing; "Skipping edge with dangling endpoint");
                collector.emit(
                    Diagnostic::warning(format!(
                        "edge `{}` references unknown node `{missing}`",
                        edge.key()
                    ))
                    .with_code(ErrorCode::E200)
                    .with_label_at(self.span_of(edge.key()), "edge declared here")
                    .with_help("the edge is skipped"),
                );
                continue;
            };

            let source = graph.add_node(source.key(), source);
            let target = graph.add_node(target.key(), target);
            graph.add_edge(source, target, edge);
        }
        graph
    }

    /// Joins the paths of every edge crossed between two stations of a walk.
    fn station_path<'g>(
        &self,
        graph: &ColorGraph<'g>,
        steps: &[Step],
        from: &StationStop<'g>,
        to: &StationStop<'g>,
    ) -> EdgePath {
        let mut path = EdgePath::default();
        for step in &steps[from.position + 1..=to.position] {
            let Some(edge_index) = step.entered_by else {
                continue;
            };
            let edge = graph.edge(edge_index);
            let (source, target) = graph.endpoints(edge_index);
            let built = edge.curve().build(
                graph.node(source).position(),
                graph.node(target).position(),
                &self.transform,
            );
            path.extend(if entered_forward(step.node, target) {
                built
            } else {
                built.reversed()
            });
        }

        if path.is_empty() {
            return straight_path(from.node.position(), to.node.position(), &self.transform);
        }
        path
    }

    fn span_of(&self, key: &str) -> Option<Span> {
        if key.is_empty() {
            return None;
        }
        self.source.and_then(|source| Span::locate_key(source, key))
    }
}

/// An edge is crossed forwards when the walk arrives at its target.
fn entered_forward(reached: NodeIndex, target: NodeIndex) -> bool {
    reached == target
}

/// Finds the name of the first line badge drawn for the same line as `color`.
///
/// The badge's text colour is not compared.
fn line_name(color: &LineColor, nodes: &[DiagramNode]) -> Option<String> {
    nodes.iter().find_map(|node| match node.kind() {
        NodeKind::Badge {
            names,
            color: Some(badge_color),
        } if badge_color.line_key() == color.line_key() => names.first().cloned(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use railmap_core::{
        curve::{CurveShape, PerpendicularConfig, SimpleConfig},
        geometry::{Point, WorldPoint},
    };

    use super::*;

    fn color(code: &str, bg: &str) -> LineColor {
        LineColor::from_parts(vec![
            "city".to_string(),
            code.to_string(),
            bg.to_string(),
            "#fff".to_string(),
        ])
        .unwrap()
    }

    fn station(key: &str, name: &str, x: f64, y: f64) -> DiagramNode {
        DiagramNode::new(
            key,
            Point::new(x, y),
            NodeKind::Station {
                names: vec![name.to_string()],
            },
        )
    }

    fn waypoint(key: &str, x: f64, y: f64) -> DiagramNode {
        DiagramNode::new(key, Point::new(x, y), NodeKind::Waypoint)
    }

    fn simple(key: &str, source: &str, target: &str, color: &LineColor) -> DiagramEdge {
        DiagramEdge::new(
            key,
            source,
            target,
            CurveShape::Simple(SimpleConfig::default()),
            color.clone(),
        )
    }

    fn run(nodes: &[DiagramNode], edges: &[DiagramEdge]) -> (RailNetwork, Vec<Diagnostic>) {
        let options = ImportOptions::default();
        let mut collector = DiagnosticCollector::new();
        let network = GraphLineBuilder::new(&options, TransformConfig::default())
            .build(nodes, edges, &mut collector);
        (network, collector.into_diagnostics())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_waypoints_join_station_paths() {
        let red = color("l1", "#ff0000");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            waypoint("w", 10.0, 0.0),
            station("b", "B", 10.0, 10.0),
        ];
        let edges = vec![simple("e1", "a", "w", &red), simple("e2", "w", "b", &red)];

        let (network, warnings) = run(&nodes, &edges);
        assert!(warnings.is_empty());

        let line = &network.lines()[0];
        assert_eq!(line.stations().len(), 2);
        assert_eq!(line.edge_paths().len(), 1);
        assert_eq!(line.edge_paths()[0].segments().len(), 2);
        assert_eq!(line.edge_paths()[0].length(), 20.0);
    }

    #[test]
    fn test_backwards_edges_are_reversed() {
        let red = color("l1", "#ff0000");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 20.0, 0.0),
        ];
        // Second edge is drawn from c towards b
        let edges = vec![simple("e1", "a", "b", &red), simple("e2", "c", "b", &red)];

        let (network, _) = run(&nodes, &edges);
        let line = &network.lines()[0];
        let names: Vec<&str> = line.stations().iter().map(ParsedStation::name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let second = &line.edge_paths()[1].segments()[0];
        assert_eq!(second.start(), WorldPoint::new(10.0, 0.0));
        assert_eq!(second.end(), WorldPoint::new(20.0, 0.0));
    }

    #[test]
    fn test_line_named_after_badge() {
        let red = color("l1", "#ff0000");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            DiagramNode::new(
                "badge",
                Point::new(0.0, 0.0),
                NodeKind::Badge {
                    names: vec!["Red Line".to_string()],
                    color: Some(red.clone()),
                },
            ),
        ];
        let edges = vec![simple("e1", "a", "b", &red)];

        let (network, _) = run(&nodes, &edges);
        assert_eq!(network.lines()[0].name(), "Red Line");
        assert_eq!(network.lines()[0].id(), "line-1");
        assert_eq!(network.lines()[0].color(), "#ff0000");
    }

    #[test]
    fn test_placeholder_names_count_emitted_lines() {
        let red = color("l1", "#ff0000");
        let blue = color("l2", "#0000ff");
        let green = color("l3", "#00ff00");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            waypoint("w", 5.0, 5.0),
            station("c", "C", 0.0, 20.0),
            station("d", "D", 10.0, 20.0),
        ];
        let edges = vec![
            simple("e1", "a", "b", &red),
            simple("e2", "a", "w", &blue),
            simple("e3", "c", "d", &green),
        ];

        let (network, warnings) = run(&nodes, &edges);
        assert_eq!(codes(&warnings), vec![ErrorCode::E300]);

        let ids: Vec<&str> = network.lines().iter().map(ParsedLine::id).collect();
        let names: Vec<&str> = network.lines().iter().map(ParsedLine::name).collect();
        assert_eq!(ids, vec!["line-1", "line-2"]);
        assert_eq!(names, vec!["Line 1", "Line 2"]);
    }

    #[test]
    fn test_dangling_edges_are_reported() {
        let red = color("l1", "#ff0000");
        let nodes = vec![station("a", "A", 0.0, 0.0), station("b", "B", 10.0, 0.0)];
        let edges = vec![simple("e1", "a", "b", &red), simple("e2", "b", "ghost", &red)];

        let (network, warnings) = run(&nodes, &edges);
        assert_eq!(codes(&warnings), vec![ErrorCode::E200]);
        assert_eq!(network.lines()[0].stations().len(), 2);
    }

    #[test]
    fn test_disconnected_part_is_ignored() {
        let red = color("l1", "#ff0000");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 50.0, 0.0),
            station("d", "D", 60.0, 0.0),
        ];
        let edges = vec![simple("e1", "a", "b", &red), simple("e2", "c", "d", &red)];

        let (network, warnings) = run(&nodes, &edges);
        assert_eq!(codes(&warnings), vec![ErrorCode::E301]);

        let names: Vec<&str> = network.lines()[0]
            .stations()
            .iter()
            .map(ParsedStation::name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_hidden_edges_are_excluded() {
        let red = color("l1", "#ff0000");
        let nodes = vec![
            station("a", "A", 0.0, 0.0),
            station("b", "B", 10.0, 0.0),
            station("c", "C", 20.0, 0.0),
        ];
        let edges = vec![
            simple("e1", "a", "b", &red),
            simple("e2", "b", "c", &red).with_visible(false),
        ];

        let (network, _) = run(&nodes, &edges);
        assert_eq!(network.lines()[0].stations().len(), 2);
    }

    #[test]
    fn test_perpendicular_edge_path() {
        let red = color("l1", "#ff0000");
        let nodes = vec![station("a", "A", 0.0, 0.0), station("b", "B", 10.0, 4.0)];
        let edges = vec![DiagramEdge::new(
            "e1",
            "a",
            "b",
            CurveShape::Perpendicular(PerpendicularConfig::default()),
            red,
        )];

        let (network, _) = run(&nodes, &edges);
        let path = &network.lines()[0].edge_paths()[0];
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.length(), 14.0);
    }
}
