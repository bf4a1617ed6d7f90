//! PNG chart generation with plotters.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DatascopeError, Result};
use crate::input::DataTable;
use crate::metrics::describe;
use crate::schema::{ColumnKind, TableSchema};

const CHART_SIZE: (u32, u32) = (800, 600);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// The `visualizations` section of the analysis results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationInfo {
    /// Chart paths relative to the output directory, in render order.
    pub plot_files: Vec<String>,
    pub total_plots: usize,
}

impl VisualizationInfo {
    pub fn new(plot_files: Vec<String>) -> Self {
        let total_plots = plot_files.len();
        Self {
            plot_files,
            total_plots,
        }
    }
}

/// Renders the chart set for a table into `<output_dir>/plots/`.
///
/// Filenames are deterministic functions of column names, so re-running
/// against the same output directory overwrites the previous artifacts.
pub struct ChartRenderer {
    plots_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            plots_dir: output_dir.as_ref().join("plots"),
        }
    }

    /// Render every applicable chart; returns output-dir-relative paths.
    pub fn render_all(&self, table: &DataTable, schema: &TableSchema) -> Result<Vec<String>> {
        let mut plots = Vec::new();

        if table.column_count() > 0 {
            plots.push(self.missing_data_chart(table)?);
        }

        for column in schema.numeric_columns() {
            let values = crate::metrics::numeric_values(table, column.position);
            if values.is_empty() {
                continue;
            }
            plots.push(self.distribution_chart(&column.name, &values)?);
        }

        for column in schema.columns_of_kind(ColumnKind::Categorical) {
            let counts = top_value_counts(table, column.position, 5);
            if counts.is_empty() {
                continue;
            }
            plots.push(self.category_chart(&column.name, &counts)?);
        }

        let numeric: Vec<_> = schema.numeric_columns().collect();
        if numeric.len() > 1 && table.row_count() > 0 {
            let names: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
            let positions: Vec<usize> = numeric.iter().map(|c| c.position).collect();
            let matrix = correlation_matrix(table, &positions);
            plots.push(self.correlation_heatmap(&names, &matrix)?);
        }

        Ok(plots)
    }

    /// Bar chart of null counts per column.
    fn missing_data_chart(&self, table: &DataTable) -> Result<String> {
        let filename = "missing_data.png";
        let path = self.plots_dir.join(filename);

        let counts: Vec<usize> = (0..table.column_count())
            .map(|i| {
                table
                    .column_values(i)
                    .filter(|v| DataTable::is_null_value(v))
                    .count()
            })
            .collect();
        let max_count = counts.iter().copied().max().unwrap_or(0) as u32;
        let names = table.headers.clone();

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_error(filename, e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Missing Values by Column", CAPTION_FONT)
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d(0i32..names.len() as i32, 0u32..max_count + 1)
            .map_err(|e| chart_error(filename, e))?;

        chart
            .configure_mesh()
            .x_labels(names.len())
            .x_label_formatter(&|x| {
                names
                    .get(*x as usize)
                    .map(|n| truncate_label(n))
                    .unwrap_or_default()
            })
            .y_desc("Null count")
            .draw()
            .map_err(|e| chart_error(filename, e))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &c)| {
                Rectangle::new([(i as i32, 0), (i as i32 + 1, c as u32)], BLUE.mix(0.6).filled())
            }))
            .map_err(|e| chart_error(filename, e))?;

        root.present().map_err(|e| chart_error(filename, e))?;
        Ok(format!("plots/{filename}"))
    }

    /// Histogram of a numeric column with a mean marker.
    fn distribution_chart(&self, column: &str, values: &[f64]) -> Result<String> {
        let filename = format!("distribution_{}.png", sanitize_filename(column));
        let path = self.plots_dir.join(&filename);

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let bin_count = values.len().min(20).max(1);
        let bin_width = (max - min) / bin_count as f64;
        let mut bins = vec![0u32; bin_count];
        for &v in values {
            let idx = (((v - min) / bin_width) as usize).min(bin_count - 1);
            bins[idx] += 1;
        }
        let max_bin = bins.iter().copied().max().unwrap_or(0);

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_error(&filename, e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Distribution of {column}"), CAPTION_FONT)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(min..max, 0u32..max_bin + 1)
            .map_err(|e| chart_error(&filename, e))?;

        chart
            .configure_mesh()
            .x_desc(column)
            .y_desc("Count")
            .draw()
            .map_err(|e| chart_error(&filename, e))?;

        chart
            .draw_series(bins.iter().enumerate().map(|(i, &c)| {
                let x0 = min + i as f64 * bin_width;
                let x1 = x0 + bin_width;
                Rectangle::new([(x0, 0), (x1, c)], BLUE.mix(0.6).filled())
            }))
            .map_err(|e| chart_error(&filename, e))?;

        if let Some(mean) = describe::mean(values) {
            chart
                .draw_series(LineSeries::new(
                    vec![(mean, 0), (mean, max_bin + 1)],
                    RED.stroke_width(2),
                ))
                .map_err(|e| chart_error(&filename, e))?;
        }

        root.present().map_err(|e| chart_error(&filename, e))?;
        Ok(format!("plots/{filename}"))
    }

    /// Bar chart of the most frequent values in a categorical column.
    fn category_chart(&self, column: &str, counts: &[(String, usize)]) -> Result<String> {
        let filename = format!("category_{}.png", sanitize_filename(column));
        let path = self.plots_dir.join(&filename);

        let max_count = counts.iter().map(|&(_, c)| c).max().unwrap_or(0) as u32;
        let labels: Vec<String> = counts.iter().map(|(v, _)| v.clone()).collect();

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_error(&filename, e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Top Values of {column}"), CAPTION_FONT)
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d(0i32..counts.len() as i32, 0u32..max_count + 1)
            .map_err(|e| chart_error(&filename, e))?;

        chart
            .configure_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&|x| {
                labels
                    .get(*x as usize)
                    .map(|l| truncate_label(l))
                    .unwrap_or_default()
            })
            .y_desc("Count")
            .draw()
            .map_err(|e| chart_error(&filename, e))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &(_, c))| {
                Rectangle::new(
                    [(i as i32, 0), (i as i32 + 1, c as u32)],
                    GREEN.mix(0.6).filled(),
                )
            }))
            .map_err(|e| chart_error(&filename, e))?;

        root.present().map_err(|e| chart_error(&filename, e))?;
        Ok(format!("plots/{filename}"))
    }

    /// Pearson correlation heatmap over the numeric columns.
    fn correlation_heatmap(&self, names: &[String], matrix: &[Vec<f64>]) -> Result<String> {
        let filename = "correlation_heatmap.png";
        let path = self.plots_dir.join(filename);
        let n = names.len() as i32;

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_error(filename, e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Heatmap", CAPTION_FONT)
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(0i32..n, 0i32..n)
            .map_err(|e| chart_error(filename, e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(names.len())
            .y_labels(names.len())
            .x_label_formatter(&|x| {
                names
                    .get(*x as usize)
                    .map(|l| truncate_label(l))
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| {
                names
                    .get(*y as usize)
                    .map(|l| truncate_label(l))
                    .unwrap_or_default()
            })
            .draw()
            .map_err(|e| chart_error(filename, e))?;

        chart
            .draw_series(matrix.iter().enumerate().flat_map(|(i, row)| {
                row.iter().enumerate().map(move |(j, &c)| {
                    Rectangle::new(
                        [(i as i32, j as i32), (i as i32 + 1, j as i32 + 1)],
                        correlation_color(c).filled(),
                    )
                })
            }))
            .map_err(|e| chart_error(filename, e))?;

        root.present().map_err(|e| chart_error(filename, e))?;
        Ok(format!("plots/{filename}"))
    }
}

/// Map a correlation in [-1, 1] to a blue-white-red gradient.
fn correlation_color(c: f64) -> RGBColor {
    let t = c.clamp(-1.0, 1.0);
    if t >= 0.0 {
        let s = (t * 255.0) as u8;
        RGBColor(255, 255 - s, 255 - s)
    } else {
        let s = (-t * 255.0) as u8;
        RGBColor(255 - s, 255 - s, 255)
    }
}

/// Pearson correlation matrix over the given column positions.
///
/// Each pairwise coefficient uses rows where both cells parse as
/// numbers; degenerate pairs (no shared rows, zero variance) are 0.
fn correlation_matrix(table: &DataTable, positions: &[usize]) -> Vec<Vec<f64>> {
    let columns: Vec<Vec<Option<f64>>> = positions
        .iter()
        .map(|&p| {
            table
                .column_values(p)
                .map(|v| {
                    if DataTable::is_null_value(v) {
                        None
                    } else {
                        v.trim().parse::<f64>().ok().filter(|n| n.is_finite())
                    }
                })
                .collect()
        })
        .collect();

    let n = positions.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = columns[i]
                .iter()
                .zip(columns[j].iter())
                .filter_map(|(a, b)| a.zip(*b))
                .collect();
            let c = pearson(&pairs);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }

    matrix
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean_x = pairs.iter().map(|&(x, _)| x).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|&(_, y)| y).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}

/// Most frequent non-null values of a column, descending by count.
fn top_value_counts(table: &DataTable, index: usize, limit: usize) -> Vec<(String, usize)> {
    let mut counts: indexmap::IndexMap<String, usize> = indexmap::IndexMap::new();
    for value in table.column_values(index) {
        if DataTable::is_null_value(value) {
            continue;
        }
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Lowercase alphanumeric filename fragment for a column name.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn truncate_label(label: &str) -> String {
    const MAX: usize = 12;
    if label.chars().count() <= MAX {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX - 1).collect();
        format!("{head}~")
    }
}

fn chart_error(chart: &str, e: impl std::fmt::Display) -> DatascopeError {
    DatascopeError::Chart {
        chart: chart.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Loan Amount"), "loan_amount");
        assert_eq!(sanitize_filename("a/b::c"), "a_b__c");
        assert_eq!(sanitize_filename("age"), "age");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short"), "short");
        assert_eq!(truncate_label("a_very_long_column_name"), "a_very_long~");
    }

    #[test]
    fn test_correlation_color_extremes() {
        assert_eq!(correlation_color(1.0), RGBColor(255, 0, 0));
        assert_eq!(correlation_color(-1.0), RGBColor(0, 0, 255));
        assert_eq!(correlation_color(0.0), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64)).collect();
        assert!((pearson(&pairs) - 1.0).abs() < 1e-9);

        let anti: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, -(i as f64))).collect();
        assert!((pearson(&anti) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_degenerate_is_zero() {
        assert_eq!(pearson(&[]), 0.0);
        assert_eq!(pearson(&[(1.0, 2.0)]), 0.0);
        let constant: Vec<(f64, f64)> = (0..5).map(|i| (3.0, i as f64)).collect();
        assert_eq!(pearson(&constant), 0.0);
    }

    #[test]
    fn test_correlation_matrix_skips_unpaired_rows() {
        let table = DataTable::new(
            vec!["x".into(), "y".into()],
            vec![
                vec!["1".into(), "2".into()],
                vec!["NA".into(), "5".into()],
                vec!["2".into(), "4".into()],
                vec!["3".into(), "6".into()],
            ],
            b',',
        );
        let matrix = correlation_matrix(&table, &[0, 1]);

        assert!((matrix[0][1] - 1.0).abs() < 1e-9);
        assert_eq!(matrix[0][0], 1.0);
    }
}
