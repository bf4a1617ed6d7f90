//! Metric engine: per-table and per-column descriptive statistics.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::describe;
use crate::input::DataTable;
use crate::schema::{ColumnKind, TableSchema};

/// Table-level summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub datetime_columns: usize,
    pub total_missing_values: usize,
    /// Missing cells as a percentage of all cells; 0 by convention for an
    /// empty table.
    pub missing_percentage: f64,
    /// Rows identical (as full string tuples) to an earlier row.
    pub duplicate_rows: usize,
}

/// Per-column missing-value breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingData {
    pub by_column: IndexMap<String, usize>,
    pub by_percentage: IndexMap<String, f64>,
}

/// Per-column distinct-value statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueValueStats {
    pub count: usize,
    pub percentage: f64,
}

/// Descriptive statistics for one numeric column.
///
/// Statistics that are undefined for the sample (empty column, too few
/// values, zero variance) are `None` and serialize as JSON null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of non-null parseable values.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// First modal value (smallest when tied).
    pub mode: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q25: Option<f64>,
    pub q75: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub variance: Option<f64>,
}

/// Frequency statistics for one non-numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub unique_count: usize,
    pub most_frequent: Option<String>,
    pub most_frequent_count: usize,
    pub least_frequent: Option<String>,
    pub least_frequent_count: usize,
    /// Top values by descending count; ties keep first-encountered order.
    pub top_values: IndexMap<String, usize>,
}

/// Computes descriptive statistics from a loaded table.
pub struct MetricEngine {
    /// How many entries the categorical top-value table keeps.
    top_n: usize,
}

impl MetricEngine {
    pub fn new() -> Self {
        Self { top_n: 5 }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Table-level counts, missingness, and duplicate rows.
    pub fn basic_stats(&self, table: &DataTable, schema: &TableSchema) -> BasicStats {
        let total_rows = table.row_count();
        let total_columns = table.column_count();

        let total_missing_values: usize = (0..total_columns)
            .map(|i| {
                table
                    .column_values(i)
                    .filter(|v| DataTable::is_null_value(v))
                    .count()
            })
            .sum();

        let cell_count = table.cell_count();
        let missing_percentage = if cell_count == 0 {
            0.0
        } else {
            total_missing_values as f64 / cell_count as f64 * 100.0
        };

        BasicStats {
            total_rows,
            total_columns,
            numeric_columns: schema.count_of_kind(ColumnKind::Numeric),
            categorical_columns: schema.count_of_kind(ColumnKind::Categorical),
            datetime_columns: schema.count_of_kind(ColumnKind::Datetime),
            total_missing_values,
            missing_percentage,
            duplicate_rows: count_duplicate_rows(table),
        }
    }

    /// Per-column null counts and percentages.
    pub fn missing_data(&self, table: &DataTable) -> MissingData {
        let total_rows = table.row_count();
        let mut by_column = IndexMap::new();
        let mut by_percentage = IndexMap::new();

        for (i, name) in table.headers.iter().enumerate() {
            let nulls = table
                .column_values(i)
                .filter(|v| DataTable::is_null_value(v))
                .count();
            let pct = if total_rows == 0 {
                0.0
            } else {
                nulls as f64 / total_rows as f64 * 100.0
            };
            by_column.insert(name.clone(), nulls);
            by_percentage.insert(name.clone(), pct);
        }

        MissingData {
            by_column,
            by_percentage,
        }
    }

    /// Per-column distinct-value counts (nulls excluded) and percentages.
    pub fn unique_values(&self, table: &DataTable) -> IndexMap<String, UniqueValueStats> {
        let total_rows = table.row_count();
        let mut result = IndexMap::new();

        for (i, name) in table.headers.iter().enumerate() {
            let distinct: HashSet<&str> = table
                .column_values(i)
                .filter(|v| !DataTable::is_null_value(v))
                .collect();
            let count = distinct.len();
            let percentage = if total_rows == 0 {
                0.0
            } else {
                count as f64 / total_rows as f64 * 100.0
            };
            result.insert(name.clone(), UniqueValueStats { count, percentage });
        }

        result
    }

    /// Descriptive statistics for every numeric column.
    pub fn numeric_statistics(
        &self,
        table: &DataTable,
        schema: &TableSchema,
    ) -> IndexMap<String, NumericSummary> {
        let mut result = IndexMap::new();

        for column in schema.numeric_columns() {
            let values = numeric_values(table, column.position);
            result.insert(column.name.clone(), summarize_numeric(&values));
        }

        result
    }

    /// Frequency statistics for every non-numeric column.
    pub fn categorical_statistics(
        &self,
        table: &DataTable,
        schema: &TableSchema,
    ) -> IndexMap<String, CategoricalSummary> {
        let mut result = IndexMap::new();

        for column in schema.non_numeric_columns() {
            let counts = value_counts(table, column.position);
            result.insert(column.name.clone(), summarize_categorical(counts, self.top_n));
        }

        result
    }
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-null values of a column that parse as finite numbers, in row order.
pub(crate) fn numeric_values(table: &DataTable, index: usize) -> Vec<f64> {
    table
        .column_values(index)
        .filter(|v| !DataTable::is_null_value(v))
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect()
}

/// Frequency table over non-null values, keyed in first-encountered order.
fn value_counts(table: &DataTable, index: usize) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in table.column_values(index) {
        if DataTable::is_null_value(value) {
            continue;
        }
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

fn summarize_numeric(values: &[f64]) -> NumericSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    NumericSummary {
        count: values.len(),
        mean: describe::mean(values),
        median: describe::median(&sorted),
        mode: describe::mode(&sorted),
        std: describe::sample_std(values),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        q25: describe::percentile(&sorted, 25.0),
        q75: describe::percentile(&sorted, 75.0),
        skewness: describe::skewness(values),
        kurtosis: describe::kurtosis(values),
        variance: describe::sample_variance(values),
    }
}

fn summarize_categorical(counts: IndexMap<String, usize>, top_n: usize) -> CategoricalSummary {
    let mut most_frequent = None;
    let mut most_count = 0usize;
    let mut least_frequent = None;
    let mut least_count = usize::MAX;

    // Strict comparisons keep the first-encountered value on ties.
    for (value, &count) in counts.iter() {
        if count > most_count {
            most_count = count;
            most_frequent = Some(value.clone());
        }
        if count < least_count {
            least_count = count;
            least_frequent = Some(value.clone());
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.iter().map(|(v, &c)| (v.clone(), c)).collect();
    // Stable sort: equal counts stay in first-encountered order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_values: IndexMap<String, usize> = ranked.into_iter().take(top_n).collect();

    CategoricalSummary {
        unique_count: counts.len(),
        most_frequent,
        most_frequent_count: most_count,
        least_frequent,
        least_frequent_count: if least_count == usize::MAX {
            0
        } else {
            least_count
        },
        top_values,
    }
}

/// Count rows byte-equal to an earlier row.
fn count_duplicate_rows(table: &DataTable) -> usize {
    let mut seen: HashSet<&Vec<String>> = HashSet::with_capacity(table.row_count());
    table.rows.iter().filter(|row| !seen.insert(row)).count()
}
