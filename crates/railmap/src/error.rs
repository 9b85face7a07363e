//! Error types for railmap operations.
//!
//! This module provides the main error type [`RailmapError`] which wraps
//! the error conditions that can occur while importing a network.

use std::io;

use thiserror::Error;

use railmap_parser::ParseError;

/// The main error type for railmap operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the document text next to the structured
/// diagnostics so reporters can show the offending source.
#[derive(Debug, Error)]
pub enum RailmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl RailmapError {
    /// Create a new `Parse` error with the associated source document.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
