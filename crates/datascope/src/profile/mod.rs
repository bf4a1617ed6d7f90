//! Supplementary per-column profile report.
//!
//! Stands in for the external profiling generators the pipeline may
//! optionally invoke: failures here are logged and skipped, never fatal.

use std::path::{Path, PathBuf};

use crate::error::{DatascopeError, Result};
use crate::results::AnalysisResults;
use crate::schema::{ColumnKind, TableSchema};

/// File name of the generated profile document.
pub const PROFILE_FILE: &str = "column_profile.html";

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }\n\
        .card { background: white; padding: 20px; margin: 15px auto; max-width: 900px; border-radius: 8px; }\n\
        .card h3 { margin-top: 0; color: #2c3e50; }\n\
        .kind { color: #7f8c8d; font-size: 13px; text-transform: uppercase; }\n\
        dl { display: grid; grid-template-columns: 180px auto; gap: 4px 12px; }\n\
        dt { color: #7f8c8d; }\n\
        dd { margin: 0; color: #2c3e50; }\n";

/// Writes a per-column profile document under `<output_dir>/reports/`.
pub struct ProfileReporter {
    reports_dir: PathBuf,
}

impl ProfileReporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            reports_dir: output_dir.as_ref().join("reports"),
        }
    }

    /// Generate the profile document from already-computed results.
    pub fn generate(&self, schema: &TableSchema, results: &AnalysisResults) -> Result<PathBuf> {
        let path = self.reports_dir.join(PROFILE_FILE);

        let mut cards = String::new();
        for column in &schema.columns {
            cards.push_str(&self.column_card(column.name.as_str(), column.kind, results));
        }

        let html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <title>Column Profile</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
             <h1 style=\"text-align:center;color:#2c3e50;\">Column Profile</h1>\n{cards}\
             </body>\n</html>\n"
        );

        std::fs::write(&path, html).map_err(|e| DatascopeError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    fn column_card(&self, name: &str, kind: ColumnKind, results: &AnalysisResults) -> String {
        let mut rows = String::new();

        if let Some(missing) = &results.missing_data {
            if let Some(&nulls) = missing.by_column.get(name) {
                let pct = missing.by_percentage.get(name).copied().unwrap_or(0.0);
                rows.push_str(&detail("Missing", &format!("{nulls} ({pct:.1}%)")));
            }
        }
        if let Some(unique) = &results.unique_values {
            if let Some(stats) = unique.get(name) {
                rows.push_str(&detail(
                    "Unique values",
                    &format!("{} ({:.1}%)", stats.count, stats.percentage),
                ));
            }
        }

        match kind {
            ColumnKind::Numeric => {
                if let Some(numeric) = results
                    .numeric_statistics
                    .as_ref()
                    .and_then(|m| m.get(name))
                {
                    rows.push_str(&detail("Non-null count", &numeric.count.to_string()));
                    rows.push_str(&detail("Mean", &fmt(numeric.mean)));
                    rows.push_str(&detail("Std dev", &fmt(numeric.std)));
                    rows.push_str(&detail("Min / Max", &format!("{} / {}", fmt(numeric.min), fmt(numeric.max))));
                    rows.push_str(&detail("Quartiles", &format!("{} / {} / {}", fmt(numeric.q25), fmt(numeric.median), fmt(numeric.q75))));
                    rows.push_str(&detail("Skew / Kurtosis", &format!("{} / {}", fmt(numeric.skewness), fmt(numeric.kurtosis))));
                }
            }
            ColumnKind::Categorical | ColumnKind::Datetime => {
                if let Some(cat) = results
                    .categorical_statistics
                    .as_ref()
                    .and_then(|m| m.get(name))
                {
                    if let Some(most) = &cat.most_frequent {
                        rows.push_str(&detail(
                            "Most frequent",
                            &format!("{} ({}x)", escape(most), cat.most_frequent_count),
                        ));
                    }
                    if let Some(least) = &cat.least_frequent {
                        rows.push_str(&detail(
                            "Least frequent",
                            &format!("{} ({}x)", escape(least), cat.least_frequent_count),
                        ));
                    }
                    let top: Vec<String> = cat
                        .top_values
                        .iter()
                        .map(|(v, c)| format!("{}: {c}", escape(v)))
                        .collect();
                    if !top.is_empty() {
                        rows.push_str(&detail("Top values", &top.join(", ")));
                    }
                }
            }
        }

        let kind_label = match kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Datetime => "datetime",
        };

        format!(
            "<div class=\"card\">\n<h3>{}</h3>\n<div class=\"kind\">{kind_label}</div>\n\
             <dl>\n{rows}</dl>\n</div>\n",
            escape(name),
        )
    }
}

fn detail(label: &str, value: &str) -> String {
    format!("<dt>{label}</dt><dd>{value}</dd>\n")
}

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
