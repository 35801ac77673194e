//! Command-line argument definitions for the screenc CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input document, output paths,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the screen compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input screen document
    #[arg(help = "Path to the input XML file")]
    pub input: String,

    /// Path to the C header to write (defaults to the input with `.h`)
    #[arg(long)]
    pub header: Option<String>,

    /// Path to the binary screen file to write (defaults to the input with `.bin`)
    #[arg(long)]
    pub binary: Option<String>,

    /// Directory to write a PNG preview of every screen into
    #[arg(long)]
    pub preview_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
