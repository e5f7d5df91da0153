//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Allocate developer workdays to projects under deadline pressure.
///
/// Reads projects, developers and local holidays from a JSON document and
/// writes how many workdays each developer spends on each project.
#[derive(Debug, Parser)]
#[command(name = "tractus", version, about, long_about = None)]
pub struct Cli {
    /// Input document [default: data.json].
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output document [default: output.json].
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print elapsed wall-clock seconds.
    #[arg(short, long)]
    pub time: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
