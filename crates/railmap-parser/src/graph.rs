//! Undirected arena graph used to order the nodes of one line.
//!
//! Nodes and edges live in flat vectors addressed by [`NodeIndex`] and
//! [`EdgeIndex`]. Adjacency is stored per node as a list of
//! `(neighbour, edge)` pairs in insertion order, which keeps traversal order
//! deterministic for a given input.
//!
//! Traversal is a depth-first search driven by an explicit stack, so long
//! lines never hit a recursion limit and cycles are visited only once.

use std::collections::HashMap;

use log::trace;

/// Index of a node in a [`LineGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeIndex(usize);

/// Index of an edge in a [`LineGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EdgeIndex(usize);

#[derive(Debug)]
struct Edge<E> {
    source: NodeIndex,
    target: NodeIndex,
    value: E,
}

/// One step of a traversal: the node reached and the edge crossed to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub node: NodeIndex,
    /// `None` only for the start node
    pub entered_by: Option<EdgeIndex>,
}

/// An undirected multigraph keyed by node identifier.
///
/// Type parameters:
/// - `'a`: Lifetime of the node keys
/// - `N`: Node data type
/// - `E`: Edge data type
#[derive(Debug)]
pub(crate) struct LineGraph<'a, N, E>
where
    N: Copy,
    E: Copy,
{
    keys: HashMap<&'a str, NodeIndex>,
    nodes: Vec<N>,
    edges: Vec<Edge<E>>,
    adjacency: Vec<Vec<(NodeIndex, EdgeIndex)>>,
}

impl<'a, N, E> LineGraph<'a, N, E>
where
    N: Copy,
    E: Copy,
{
    /// Creates a new empty graph.
    pub(crate) fn new() -> Self {
        Self {
            keys: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    /// Adds a node, or returns the existing index if `key` is already present.
    pub(crate) fn add_node(&mut self, key: &'a str, node: N) -> NodeIndex {
        if let Some(index) = self.keys.get(key) {
            return *index;
        }
        let index = NodeIndex(self.nodes.len());
        self.keys.insert(key, index);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        index
    }

    /// Adds an undirected edge between two existing nodes.
    pub(crate) fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, edge: E) -> EdgeIndex {
        debug_assert!(source.0 < self.nodes.len() && target.0 < self.nodes.len());

        let index = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            source,
            target,
            value: edge,
        });
        self.adjacency[source.0].push((target, index));
        if source != target {
            self.adjacency[target.0].push((source, index));
        }
        index
    }

    pub(crate) fn node(&self, index: NodeIndex) -> N {
        self.nodes[index.0]
    }

    pub(crate) fn edge(&self, index: EdgeIndex) -> E {
        self.edges[index.0].value
    }

    /// Returns the `(source, target)` pair the edge was added with.
    pub(crate) fn endpoints(&self, index: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let edge = &self.edges[index.0];
        (edge.source, edge.target)
    }

    pub(crate) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of distinct neighbours of a node.
    ///
    /// Parallel edges count once; a self-loop counts the node itself.
    pub(crate) fn neighbour_count(&self, index: NodeIndex) -> usize {
        let mut neighbours: Vec<NodeIndex> = self.adjacency[index.0]
            .iter()
            .map(|(neighbour, _)| *neighbour)
            .collect();
        neighbours.sort_unstable();
        neighbours.dedup();
        neighbours.len()
    }

    /// Picks where to start walking a line.
    ///
    /// The first node with exactly one neighbour is a line end. Loops have no
    /// such node, in which case the source of the first edge is used. Returns
    /// `None` for a graph without edges.
    pub(crate) fn traversal_start(&self) -> Option<NodeIndex> {
        (0..self.nodes.len())
            .map(NodeIndex)
            .find(|index| self.neighbour_count(*index) == 1)
            .or_else(|| self.edges.first().map(|edge| edge.source))
    }

    /// Depth-first traversal from `start`.
    ///
    /// Every reachable node appears exactly once, in the order a recursive
    /// depth-first search visiting neighbours in insertion order would reach
    /// it. Each step records the edge crossed to get there.
    pub(crate) fn traverse(&self, start: NodeIndex) -> Vec<Step> {
        let mut visited = vec![false; self.nodes.len()];
        let mut steps = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Step {
            node: start,
            entered_by: None,
        }];

        while let Some(step) = stack.pop() {
            if visited[step.node.0] {
                continue;
            }
            visited[step.node.0] = true;
            steps.push(step);

            for &(neighbour, edge) in self.adjacency[step.node.0].iter().rev() {
                if !visited[neighbour.0] {
                    stack.push(Step {
                        node: neighbour,
                        entered_by: Some(edge),
                    });
                }
            }
        }

        trace!(start = start.0, visited = steps.len(); "Traversed line graph");
        steps
    }
}
