//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::categories::CategoriesArgs;
use crate::commands::report::ReportArgs;

/// Fieldwork hours tracker.
///
/// Totals the direct and indirect service hours recorded in a weekly
/// clinical fieldwork log.
#[derive(Debug, Parser)]
#[command(name = "fh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Total the hours in a weekly log.
    Report(ReportArgs),

    /// List the direct and indirect categories.
    Categories(CategoriesArgs),
}
