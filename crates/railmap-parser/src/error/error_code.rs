//! Error codes for the import diagnostics.
//!
//! Error codes are organized by the part of the document they concern:
//! - `E0xx` - Document errors
//! - `E1xx` - Node problems
//! - `E2xx` - Edge problems
//! - `E3xx` - Line problems

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The document is not well-formed JSON.
    E001,

    /// Missing graph.
    ///
    /// The document has no `graph` object.
    E002,

    /// Invalid graph structure.
    ///
    /// `graph.nodes` or `graph.edges` is not a list of keyed entries.
    E003,

    // =========================================================================
    // Node Problems (E1xx)
    // =========================================================================
    /// Missing node position.
    ///
    /// A node has no numeric `x` or `y` attribute and is skipped.
    E100,

    /// Station without a name.
    ///
    /// A station node has an empty name list and is treated as a waypoint.
    E101,

    /// Duplicate node key.
    ///
    /// Two nodes share a key; the first one is kept.
    E102,

    // =========================================================================
    // Edge Problems (E2xx)
    // =========================================================================
    /// Dangling edge endpoint.
    ///
    /// An edge references a node that does not exist or was skipped.
    E200,

    /// Missing edge colour.
    ///
    /// An edge's style carries no colour, so it belongs to no line.
    E201,

    /// Unknown curve type.
    ///
    /// The edge is drawn as a straight segment.
    E202,

    /// Malformed curve configuration.
    ///
    /// The curve payload could not be read; the edge is drawn as a straight segment.
    E203,

    /// Invalid colour value.
    ///
    /// The background entry of a colour is not a CSS colour. The edge is still
    /// grouped by the raw value.
    E204,

    // =========================================================================
    // Line Problems (E3xx)
    // =========================================================================
    /// Dropped line.
    ///
    /// A colour group resolved to fewer than two named stations.
    E300,

    /// Unreachable nodes.
    ///
    /// Part of a colour group is not connected to the traversal start and is
    /// ignored for that line.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Document errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            // Node problems
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Edge problems
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            // Line problems
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Document errors
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E002 => "missing graph",
            ErrorCode::E003 => "invalid graph structure",
            // Node problems
            ErrorCode::E100 => "missing node position",
            ErrorCode::E101 => "station without a name",
            ErrorCode::E102 => "duplicate node key",
            // Edge problems
            ErrorCode::E200 => "dangling edge endpoint",
            ErrorCode::E201 => "missing edge colour",
            ErrorCode::E202 => "unknown curve type",
            ErrorCode::E203 => "malformed curve configuration",
            ErrorCode::E204 => "invalid colour value",
            // Line problems
            ErrorCode::E300 => "dropped line",
            ErrorCode::E301 => "unreachable nodes",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
