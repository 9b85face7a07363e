//! Configuration types for railway network import.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! configuration file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining import, region and snap settings.
//! - [`ImportConfig`] - Default region, station elevation and extra station types.
//! - Region overrides - Extra or replaced entries of the builtin [`RegionTable`].
//! - [`SnapPolicy`] - Threshold shared by the editing tools.
//!
//! # Example
//!
//! ```
//! # use railmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.import().default_region(), "zth");
//! assert!(config.validate().is_ok());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use railmap_core::{
    snap::SnapPolicy,
    transform::{RegionTable, TransformConfig},
};
use railmap_parser::{DEFAULT_ELEVATION, ImportOptions, StationRegistry};

const DEFAULT_REGION_ID: &str = "zth";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Import settings section.
    #[serde(default)]
    import: ImportConfig,

    /// Region transforms added to or replacing the builtin ones.
    #[serde(default)]
    regions: IndexMap<String, TransformConfig>,

    /// Snapping section.
    #[serde(default)]
    snap: SnapPolicy,
}

impl AppConfig {
    /// Creates a new [`AppConfig`].
    ///
    /// # Arguments
    ///
    /// * `import` - Import settings.
    /// * `regions` - Region transform overrides.
    /// * `snap` - Snap policy shared by the editing tools.
    pub fn new(
        import: ImportConfig,
        regions: IndexMap<String, TransformConfig>,
        snap: SnapPolicy,
    ) -> Self {
        Self {
            import,
            regions,
            snap,
        }
    }

    /// Returns the import configuration.
    pub fn import(&self) -> &ImportConfig {
        &self.import
    }

    /// Returns the configured region overrides.
    pub fn regions(&self) -> &IndexMap<String, TransformConfig> {
        &self.regions
    }

    /// Returns the snap policy.
    pub fn snap(&self) -> SnapPolicy {
        self.snap
    }

    /// Builds the region table: builtin regions with the overrides applied.
    pub fn region_table(&self) -> RegionTable {
        self.regions
            .iter()
            .fold(RegionTable::builtin(), |table, (id, config)| {
                table.with_region(id.clone(), *config)
            })
    }

    /// Checks the values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        if !self.import.elevation.is_finite() {
            return Err(format!(
                "Invalid elevation in config: {}",
                self.import.elevation
            ));
        }
        let threshold = self.snap.threshold();
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(format!("Invalid snap threshold in config: {threshold}"));
        }
        for (id, region) in &self.regions {
            if region.to_diagram(Default::default()).is_none() {
                return Err(format!(
                    "Region `{id}` has a zero scale or multiplier and cannot be inverted"
                ));
            }
        }
        Ok(())
    }
}

/// Settings applied to every import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Region used when none is requested explicitly.
    #[serde(default = "ImportConfig::default_region_id")]
    default_region: String,

    /// Elevation stamped on every station coordinate.
    #[serde(default = "ImportConfig::default_elevation")]
    elevation: f64,

    /// Node types recognised as stations on top of the builtin ones.
    #[serde(default)]
    station_types: Vec<String>,

    /// Node types recognised as interchanges on top of the builtin ones.
    #[serde(default)]
    interchange_types: Vec<String>,
}

impl ImportConfig {
    pub fn new(default_region: impl Into<String>, elevation: f64) -> Self {
        Self {
            default_region: default_region.into(),
            elevation,
            station_types: Vec::new(),
            interchange_types: Vec::new(),
        }
    }

    /// Returns a copy recognising additional station and interchange types.
    pub fn with_types(mut self, stations: Vec<String>, interchanges: Vec<String>) -> Self {
        self.station_types = stations;
        self.interchange_types = interchanges;
        self
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn station_types(&self) -> &[String] {
        &self.station_types
    }

    pub fn interchange_types(&self) -> &[String] {
        &self.interchange_types
    }

    /// Builds the parser options for these settings.
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            elevation: self.elevation,
            registry: StationRegistry::builtin().extended(
                self.station_types.iter().cloned(),
                self.interchange_types.iter().cloned(),
            ),
        }
    }

    fn default_region_id() -> String {
        DEFAULT_REGION_ID.to_string()
    }

    fn default_elevation() -> f64 {
        DEFAULT_ELEVATION
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_ID, DEFAULT_ELEVATION)
    }
}
