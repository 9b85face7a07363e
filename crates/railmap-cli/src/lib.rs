//! CLI logic for the railmap importer.
//!
//! Reads a diagram document, imports it for a region and writes the
//! resulting lines and stations as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use railmap::{NetworkBuilder, RailmapError};

use error_adapter::{render, warning_reportables};

/// Run the railmap CLI application
///
/// This function processes the input document through the import pipeline
/// and writes the resulting network JSON to the output file. Import warnings
/// are logged and do not fail the run.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `RailmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unreadable documents
/// - Serialisation errors
pub fn run(args: &Args) -> Result<(), RailmapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = NetworkBuilder::new(app_config);
    let output = builder.parse(&source, args.region.as_deref())?;

    for reportable in warning_reportables(&output.warnings, &source) {
        warn!("{}", render(&reportable));
    }

    let json = builder.to_json(&output.network, args.pretty)?;
    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        lines = output.network.lines().len(),
        stations = output.network.stations().len(),
        warnings = output.warnings.len();
        "Network exported successfully"
    );

    Ok(())
}
