//! Report assembly: JSON summary and HTML report.

mod html;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;

use crate::error::{DatascopeError, Result};
use crate::results::AnalysisResults;

pub use html::key_findings;

/// File name of the primary HTML report.
pub const REPORT_FILE: &str = "eda_report.html";
/// File name of the structured JSON summary.
pub const SUMMARY_FILE: &str = "eda_summary.json";

/// Renders the analysis results to persistent artifacts.
///
/// The assembler is a pure function of the accumulated results plus the
/// chart references they carry; it holds no state of its own beyond the
/// target directory.
pub struct ReportAssembler {
    output_dir: PathBuf,
}

impl ReportAssembler {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Write both artifacts; returns `(html_path, json_path)`.
    pub fn write(&self, results: &AnalysisResults) -> Result<(PathBuf, PathBuf)> {
        let html_path = self.output_dir.join(REPORT_FILE);
        let json_path = self.output_dir.join(SUMMARY_FILE);

        let html = html::render_report(results, Utc::now());
        std::fs::write(&html_path, html).map_err(|e| DatascopeError::Io {
            path: html_path.clone(),
            source: e,
        })?;

        let file = File::create(&json_path).map_err(|e| {
            DatascopeError::Persistence(format!(
                "Failed to create file '{}': {}",
                json_path.display(),
                e
            ))
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), results)?;

        info!("HTML report saved: {}", html_path.display());
        info!("JSON summary saved: {}", json_path.display());

        Ok((html_path, json_path))
    }
}
