//! Command-line argument definitions for the railmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the target region,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the railmap importer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram document
    #[arg(help = "Path to the input JSON document")]
    pub input: String,

    /// Path to the output network JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Region whose transform places the network (defaults to the configured region)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
