//! Railmap - Railway network import and snapping for virtual-world maps.
//!
//! Imports rail diagram documents into lines and stations placed in world
//! coordinates, and provides the snapping primitives the editing tools use
//! on top of the imported network.

pub mod config;

mod error;

pub use railmap_core::{color, curve, geometry, nearest, network, snap, transform};
pub use railmap_parser::{Diagnostic, ImportOptions, ParseOutput};

pub use error::RailmapError;

use log::{debug, info, warn};

use config::AppConfig;
use nearest::GeometryRings;
use network::{ParsedLine, RailNetwork};
use snap::{RingSnap, SnapPolicy};
use transform::{RegionTable, TransformConfig};

/// Builder for importing rail networks.
///
/// Holds the configuration shared by every import: the region table, the
/// station type registry, the station elevation and the snap policy.
///
/// # Examples
///
/// ```rust
/// use railmap::{NetworkBuilder, config::AppConfig};
///
/// let source = r#"{ "graph": { "nodes": [], "edges": [] } }"#;
///
/// let builder = NetworkBuilder::new(AppConfig::default());
/// let output = builder.parse(source, Some("zth")).expect("Failed to parse");
/// assert!(output.network.lines().is_empty());
///
/// let json = builder.to_json(&output.network, false).expect("Failed to export");
/// assert!(json.contains("\"lines\""));
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    config: AppConfig,
    regions: RegionTable,
}

impl NetworkBuilder {
    /// Create a new network builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including import, region and snap settings
    pub fn new(config: AppConfig) -> Self {
        let regions = config.region_table();
        Self { config, regions }
    }

    /// Returns the configuration the builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the region table with configured overrides applied.
    pub fn region_table(&self) -> &RegionTable {
        &self.regions
    }

    /// Returns the snap policy shared by the editing tools.
    pub fn snap_policy(&self) -> SnapPolicy {
        self.config.snap()
    }

    /// Returns the parser options derived from the import settings.
    pub fn import_options(&self) -> ImportOptions {
        self.config.import().options()
    }

    /// Resolves the transform used for `region`, or the configured default region.
    ///
    /// Unknown regions fall back to the table's fallback transform.
    pub fn transform_for(&self, region: Option<&str>) -> TransformConfig {
        let region = region.unwrap_or_else(|| self.config.import().default_region());
        if !self.regions.contains(region) {
            warn!(region = region; "Unknown region, importing with the fallback transform");
        }
        self.regions.resolve(region)
    }

    /// Import a diagram document into a rail network.
    ///
    /// # Arguments
    ///
    /// * `source` - The document text
    /// * `region` - Region whose transform places the network; `None` uses the configured default
    ///
    /// # Errors
    ///
    /// Returns `RailmapError::Parse` when the document cannot be read at all.
    /// Problems with individual nodes, edges or lines are returned as warnings
    /// in the [`ParseOutput`].
    pub fn parse(&self, source: &str, region: Option<&str>) -> Result<ParseOutput, RailmapError> {
        info!("Importing rail network");

        let transform = self.transform_for(region);
        let output = railmap_parser::parse(source, &self.import_options(), &transform)
            .map_err(|err| RailmapError::new_parse_error(err, source))?;

        debug!(
            lines = output.network.lines().len(),
            stations = output.network.stations().len(),
            warnings = output.warnings.len();
            "Network imported",
        );
        Ok(output)
    }

    /// Serialise a network to JSON.
    ///
    /// # Errors
    ///
    /// Returns `RailmapError::Export` if serialisation fails.
    pub fn to_json(&self, network: &RailNetwork, pretty: bool) -> Result<String, RailmapError> {
        let json = if pretty {
            serde_json::to_string_pretty(network)?
        } else {
            serde_json::to_string(network)?
        };
        Ok(json)
    }

    /// Turns a parsed line into a snap target labelled with the line's name.
    pub fn line_snap(&self, line: &ParsedLine) -> RingSnap {
        RingSnap::new(GeometryRings::from_edge_paths(line.edge_paths())).with_label(line.name())
    }
}
