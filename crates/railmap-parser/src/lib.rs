//! # Railmap Parser
//!
//! Imports rail diagram documents into lines and stations placed in world
//! coordinates. This crate provides the pipeline from document text to a
//! [`RailNetwork`].
//!
//! ## Usage
//!
//! ```
//! # use railmap_parser::{parse, ImportOptions, ParseError};
//! # use railmap_core::transform::TransformConfig;
//! fn main() -> Result<(), ParseError> {
//!     let source = r##"{ "graph": { "nodes": [], "edges": [] } }"##;
//!
//!     let output = parse(source, &ImportOptions::default(), &TransformConfig::default())?;
//!     assert!(output.network.lines().is_empty());
//!     Ok(())
//! }
//! ```

mod builder;
mod document;
pub mod error;
mod graph;
mod merge;
mod registry;
mod span;

pub use document::{DiagramEdge, DiagramNode, NodeKind};
pub use error::{Diagnostic, ParseError};
pub use registry::{NodeRole, StationRegistry};
pub use span::Span;

use log::debug;
use railmap_core::{network::RailNetwork, transform::TransformConfig};

use builder::GraphLineBuilder;
use error::DiagnosticCollector;

/// Elevation stamped on station coordinates unless configured otherwise.
pub const DEFAULT_ELEVATION: f64 = 64.0;

/// Settings applied to every import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// World elevation given to every station
    pub elevation: f64,
    /// Decides which node types are stations
    pub registry: StationRegistry,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            elevation: DEFAULT_ELEVATION,
            registry: StationRegistry::builtin(),
        }
    }
}

/// A successful import.
#[derive(Debug)]
pub struct ParseOutput {
    pub network: RailNetwork,
    /// Everything that was skipped or degraded on the way
    pub warnings: Vec<Diagnostic>,
}

/// Parse a diagram document into a rail network.
///
/// This is the main entry point. It orchestrates the complete pipeline:
///
/// 1. **Decode** - Read the JSON document into typed nodes and edges
/// 2. **Build** - Group edges into lines, order them and build their paths
/// 3. **Merge** - Unify stations sharing a name across lines
///
/// # Arguments
///
/// * `source` - The document text
/// * `options` - Elevation and station type registry
/// * `transform` - Diagram-to-world mapping of the target region
///
/// # Errors
///
/// Returns a [`ParseError`] only if the document itself cannot be read.
/// Problems with individual nodes, edges or lines are reported in
/// [`ParseOutput::warnings`].
pub fn parse(
    source: &str,
    options: &ImportOptions,
    transform: &TransformConfig,
) -> Result<ParseOutput, ParseError> {
    let mut collector = DiagnosticCollector::new();

    // Step 1: Decode
    let document = document::decode(source, &options.registry, &mut collector)?;
    debug!(
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Decoded document",
    );

    // Steps 2 and 3: Build and merge
    let network = GraphLineBuilder::new(options, *transform)
        .with_source(source)
        .build(&document.nodes, &document.edges, &mut collector);

    let warnings = collector.finish()?;
    Ok(ParseOutput { network, warnings })
}

/// Build a rail network from already decoded nodes and edges.
///
/// Hidden edges are ignored. This never fails; every problem is a warning.
pub fn build(
    nodes: &[DiagramNode],
    edges: &[DiagramEdge],
    options: &ImportOptions,
    transform: &TransformConfig,
) -> ParseOutput {
    let mut collector = DiagnosticCollector::new();
    let network = GraphLineBuilder::new(options, *transform).build(nodes, edges, &mut collector);
    ParseOutput {
        network,
        warnings: collector.into_diagnostics(),
    }
}
