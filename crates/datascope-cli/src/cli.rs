//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Datascope: automated EDA for delimited tabular files
#[derive(Parser)]
#[command(name = "datascope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the data file to analyze (CSV/TSV)
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Directory to save EDA results
    #[arg(short, long, default_value = "eda_output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Skip the supplementary profile report (faster execution)
    #[arg(long)]
    pub no_profiling: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
