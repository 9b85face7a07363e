//! Node type classification.
//!
//! Diagram documents tag every node with a style name such as
//! `shmetro-basic` or `gzmtr-int`. The registry decides which of those are
//! stations, which are interchanges and which are line badges. Everything
//! else is a waypoint.

use std::collections::HashSet;

/// Station styles shipped with the diagram editor.
const BUILTIN_STATIONS: &[&str] = &[
    "shmetro-basic",
    "shmetro-basic-2020",
    "shanghai-suburban-railway",
    "gzmtr-basic",
    "bjsubway-basic",
    "mtr",
    "suzhourt-basic",
    "kunmingrt-basic",
    "mrt-basic",
    "jrea-basic",
    "foshan-metro-basic",
    "qingdao-basic",
    "tokyo-metro-basic",
    "london-tube-basic",
    "london-rail-basic",
    "guangdong-intercity-railway",
    "chongqingrt-basic",
    "chongqingrt-basic-2021",
    "chengdurt-basic",
    "osaka-metro",
    "wuhanrt-basic",
    "csmetro-basic",
    "hzmetro-basic",
];

/// Interchange styles that do not follow the `-int` suffix convention.
const BUILTIN_INTERCHANGES: &[&str] = &[
    "shmetro-osysi",
    "gzmtr-int-2024",
    "chongqingrt-int-2021",
];

const INTERCHANGE_SUFFIX: &str = "-int";
const BADGE_MARKER: &str = "line-badge";

/// What a node type means for line building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Station,
    Interchange,
    Badge,
    Waypoint,
}

/// The set of node types recognised as stations and interchanges.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: HashSet<String>,
    interchanges: HashSet<String>,
}

impl StationRegistry {
    /// Creates a registry with the builtin styles.
    pub fn builtin() -> Self {
        Self {
            stations: BUILTIN_STATIONS.iter().map(|s| s.to_string()).collect(),
            interchanges: BUILTIN_INTERCHANGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds extra station and interchange types.
    pub fn extended<S, I>(mut self, stations: S, interchanges: I) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.stations.extend(stations.into_iter().map(Into::into));
        self.interchanges
            .extend(interchanges.into_iter().map(Into::into));
        self
    }

    /// Classifies a node type tag.
    pub fn classify(&self, node_type: &str) -> NodeRole {
        if self.interchanges.contains(node_type) || node_type.ends_with(INTERCHANGE_SUFFIX) {
            NodeRole::Interchange
        } else if self.stations.contains(node_type) {
            NodeRole::Station
        } else if node_type.contains(BADGE_MARKER) {
            NodeRole::Badge
        } else {
            NodeRole::Waypoint
        }
    }
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
