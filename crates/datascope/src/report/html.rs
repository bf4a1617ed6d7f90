//! HTML rendering of the analysis results.

use chrono::{DateTime, Utc};

use crate::results::AnalysisResults;

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }\n\
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; }\n\
        h1 { color: #2c3e50; text-align: center; border-bottom: 2px solid #3498db; padding-bottom: 10px; }\n\
        h2 { color: #34495e; border-left: 4px solid #3498db; padding-left: 15px; }\n\
        .stat-grid { display: flex; flex-wrap: wrap; gap: 15px; margin: 20px 0; }\n\
        .stat-card { background: #ecf0f1; padding: 15px; border-radius: 8px; text-align: center; min-width: 150px; }\n\
        .stat-value { font-size: 24px; font-weight: bold; color: #2c3e50; }\n\
        .stat-label { color: #7f8c8d; font-size: 14px; }\n\
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }\n\
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }\n\
        th { background-color: #3498db; color: white; }\n\
        tr:nth-child(even) { background-color: #f8f9fa; }\n\
        .plot-grid { display: flex; flex-wrap: wrap; gap: 20px; margin: 20px 0; }\n\
        .plot-container { text-align: center; max-width: 400px; }\n\
        .plot-container img { max-width: 100%; height: auto; border-radius: 8px; }\n\
        .key-findings { background: #667eea; color: white; padding: 20px; border-radius: 10px; margin: 20px 0; }\n\
        .findings-list { list-style: none; padding: 0; }\n\
        .findings-list li { margin: 10px 0; padding-left: 25px; }\n\
        .timestamp { text-align: center; color: #6c757d; font-style: italic; margin-top: 30px; }\n";

/// Render the full HTML report.
pub fn render_report(results: &AnalysisResults, generated_at: DateTime<Utc>) -> String {
    let mut body = String::new();

    body.push_str(&overview_section(results));
    body.push_str(&findings_section(results));
    body.push_str(&column_info_section(results));
    body.push_str(&numeric_stats_section(results));
    body.push_str(&categorical_stats_section(results));
    body.push_str(&gallery_section(results));

    let source = results
        .basic_info
        .as_ref()
        .map(|info| info.file_path.display().to_string())
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Automated EDA Report</title>\n\
         <style>\n{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"container\">\n\
         <h1>Automated EDA Report</h1>\n\
         <div class=\"timestamp\">Generated on {}</div>\n\
         {body}\
         <div class=\"timestamp\">Report generated by datascope<br>File analyzed: {}</div>\n\
         </div>\n\
         </body>\n\
         </html>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        escape(&source),
    )
}

/// Key findings derived from threshold rules over the basic statistics.
pub fn key_findings(results: &AnalysisResults) -> Vec<String> {
    let mut findings = Vec::new();

    if let Some(stats) = &results.basic_stats {
        if stats.missing_percentage > 10.0 {
            findings.push(format!(
                "High missing data: {:.1}% of total values are missing",
                stats.missing_percentage
            ));
        } else if stats.missing_percentage == 0.0 {
            findings.push("No missing data found - dataset is complete".to_string());
        }

        if stats.duplicate_rows > 0 {
            findings.push(format!("Found {} duplicate rows", stats.duplicate_rows));
        }
    }

    let numeric_count = results
        .numeric_statistics
        .as_ref()
        .map(|m| m.len())
        .or_else(|| results.basic_stats.as_ref().map(|s| s.numeric_columns))
        .unwrap_or(0);
    if numeric_count > 1 {
        findings.push(format!(
            "Dataset contains {numeric_count} numeric columns suitable for correlation analysis"
        ));
    }

    if findings.is_empty() {
        findings.push(
            "Dataset appears to be well-structured with no major data quality issues".to_string(),
        );
    }

    findings
}

fn overview_section(results: &AnalysisResults) -> String {
    let Some(stats) = &results.basic_stats else {
        return String::new();
    };

    let cards = [
        (format_count(stats.total_rows), "Total Rows"),
        (stats.total_columns.to_string(), "Total Columns"),
        (stats.numeric_columns.to_string(), "Numeric Columns"),
        (stats.categorical_columns.to_string(), "Categorical Columns"),
        (
            format!("{:.1}%", stats.missing_percentage),
            "Missing Data",
        ),
        (format_count(stats.duplicate_rows), "Duplicate Rows"),
    ];

    let mut html = String::from(
        "<div class=\"section\">\n<h2>Dataset Overview</h2>\n<div class=\"stat-grid\">\n",
    );
    for (value, label) in cards {
        html.push_str(&format!(
            "<div class=\"stat-card\"><div class=\"stat-value\">{value}</div>\
             <div class=\"stat-label\">{label}</div></div>\n"
        ));
    }
    html.push_str("</div>\n</div>\n");
    html
}

fn findings_section(results: &AnalysisResults) -> String {
    let mut html = String::from(
        "<div class=\"section\">\n<h2>Key Findings</h2>\n<div class=\"key-findings\">\n\
         <ul class=\"findings-list\">\n",
    );
    for finding in key_findings(results) {
        html.push_str(&format!("<li>{}</li>\n", escape(&finding)));
    }
    html.push_str("</ul>\n</div>\n</div>\n");
    html
}

fn column_info_section(results: &AnalysisResults) -> String {
    let Some(info) = &results.basic_info else {
        return String::new();
    };

    let mut html = String::from(
        "<div class=\"section\">\n<h2>Column Information</h2>\n<table>\n<thead>\n<tr>\
         <th>Column Name</th><th>Data Type</th><th>Non-Null Count</th>\
         <th>Missing %</th><th>Unique Values</th></tr>\n</thead>\n<tbody>\n",
    );

    let total_rows = info.shape.0;
    for name in &info.columns {
        let data_type = info
            .data_types
            .get(name)
            .map(|t| t.as_str())
            .unwrap_or("unknown");
        let nulls = results
            .missing_data
            .as_ref()
            .and_then(|m| m.by_column.get(name))
            .copied()
            .unwrap_or(0);
        let missing_pct = results
            .missing_data
            .as_ref()
            .and_then(|m| m.by_percentage.get(name))
            .copied()
            .unwrap_or(0.0);
        let unique = results
            .unique_values
            .as_ref()
            .and_then(|u| u.get(name))
            .map(|u| u.count)
            .unwrap_or(0);

        html.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td>\
             <td>{:.1}%</td><td>{}</td></tr>\n",
            escape(name),
            data_type,
            format_count(total_rows.saturating_sub(nulls)),
            missing_pct,
            format_count(unique),
        ));
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

fn numeric_stats_section(results: &AnalysisResults) -> String {
    let Some(stats) = &results.numeric_statistics else {
        return String::new();
    };
    if stats.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "<div class=\"section\">\n<h2>Numeric Statistics</h2>\n<table>\n<thead>\n<tr>\
         <th>Column</th><th>Mean</th><th>Median</th><th>Std Dev</th>\
         <th>Min</th><th>Max</th><th>Skewness</th></tr>\n</thead>\n<tbody>\n",
    );

    for (name, summary) in stats {
        html.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(name),
            format_stat(summary.mean),
            format_stat(summary.median),
            format_stat(summary.std),
            format_stat(summary.min),
            format_stat(summary.max),
            format_stat(summary.skewness),
        ));
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

fn categorical_stats_section(results: &AnalysisResults) -> String {
    let Some(stats) = &results.categorical_statistics else {
        return String::new();
    };
    // The section is omitted entirely when no categorical columns exist.
    if stats.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "<div class=\"section\">\n<h2>Categorical Statistics</h2>\n<table>\n<thead>\n<tr>\
         <th>Column</th><th>Unique Values</th><th>Most Frequent</th>\
         <th>Frequency</th></tr>\n</thead>\n<tbody>\n",
    );

    for (name, summary) in stats {
        html.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(name),
            summary.unique_count,
            escape(summary.most_frequent.as_deref().unwrap_or("-")),
            summary.most_frequent_count,
        ));
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}

fn gallery_section(results: &AnalysisResults) -> String {
    let Some(viz) = &results.visualizations else {
        return String::new();
    };

    let mut html = String::from(
        "<div class=\"section\">\n<h2>Visualizations</h2>\n\
         <p>The following visualizations have been generated for your dataset:</p>\n\
         <div class=\"plot-grid\">\n",
    );

    for path in &viz.plot_files {
        let title = chart_title(path);
        html.push_str(&format!(
            "<div class=\"plot-container\"><h4>{title}</h4>\
             <img src=\"{}\" alt=\"{title}\"></div>\n",
            escape(path),
        ));
    }

    html.push_str("</div>\n</div>\n");
    html
}

/// Human-readable chart title from a file path: stem, underscores to
/// spaces, each word capitalized.
fn chart_title(path: &str) -> String {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".png");

    stem.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Thousands-separated integer formatting for the overview cards.
fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
