//! Datascope CLI - automated EDA over delimited tabular files.

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use datascope::{DatascopeError, EdaPipeline};

/// File extensions accepted as tabular input.
const RECOGNIZED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "tab"];

fn main() {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Validate the input before any analysis starts.
    if !cli.file.exists() {
        return Err(format!("File not found: {}", cli.file.display()).into());
    }

    let extension = cli
        .file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !RECOGNIZED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DatascopeError::UnsupportedFormat(format!(
            "expected one of {}, got: {}",
            RECOGNIZED_EXTENSIONS.join(", "),
            cli.file.display()
        ))
        .into());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        cli.file.display().to_string().white()
    );

    let mut pipeline = EdaPipeline::new(&cli.file, &cli.output_dir, !cli.no_profiling);
    let (html_path, json_path) = pipeline.run()?;

    println!();
    println!(
        "{} {}",
        "EDA complete! Results saved to".green().bold(),
        cli.output_dir.display().to_string().white()
    );
    println!(
        "Open {} to view the full report",
        html_path.display().to_string().cyan().bold()
    );
    println!(
        "Structured summary: {}",
        json_path.display().to_string().white()
    );

    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}
