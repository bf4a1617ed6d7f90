//! IQR and z-score outlier detection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::DataTable;
use crate::metrics::describe;
use crate::schema::TableSchema;

/// A detection rule applied independently per numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Tukey fences: outside [Q1 - k*IQR, Q3 + k*IQR].
    Iqr,
    /// Absolute z-score above a threshold, with population mean/std.
    ZScore,
}

impl OutlierMethod {
    /// Key used in result maps and the JSON summary.
    pub fn key(&self) -> &'static str {
        match self {
            OutlierMethod::Iqr => "iqr",
            OutlierMethod::ZScore => "zscore",
        }
    }
}

/// Flagged rows for one (column, method) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub count: usize,
    /// Flagged rows as a percentage of all table rows.
    pub percentage: f64,
    /// Row indices in the source table, ascending.
    pub indices: Vec<usize>,
}

/// Detects anomalous rows in numeric columns.
///
/// Methods run independently; a row may be flagged by one method, both,
/// or neither. Null and unparseable cells are skipped, but flagged
/// indices always refer to rows of the source table.
pub struct OutlierDetector {
    methods: Vec<OutlierMethod>,
    iqr_multiplier: f64,
    z_threshold: f64,
}

impl OutlierDetector {
    /// Default detector: IQR (multiplier 1.5) then z-score (threshold 3).
    pub fn new() -> Self {
        Self {
            methods: vec![OutlierMethod::Iqr, OutlierMethod::ZScore],
            iqr_multiplier: 1.5,
            z_threshold: 3.0,
        }
    }

    /// Use a custom method list, in the given order.
    pub fn with_methods(methods: Vec<OutlierMethod>) -> Self {
        Self {
            methods,
            ..Self::new()
        }
    }

    /// Override the IQR fence multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Override the z-score threshold.
    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        self
    }

    /// Run every configured method over every numeric column.
    ///
    /// Returns method key -> column name -> record, preserving method
    /// order and table column order.
    pub fn detect(
        &self,
        table: &DataTable,
        schema: &TableSchema,
    ) -> IndexMap<String, IndexMap<String, OutlierRecord>> {
        let total_rows = table.row_count();
        let mut results = IndexMap::new();

        for method in &self.methods {
            let mut per_column = IndexMap::new();

            for column in schema.numeric_columns() {
                let values = indexed_numeric_values(table, column.position);
                let indices = match method {
                    OutlierMethod::Iqr => self.detect_iqr(&values),
                    OutlierMethod::ZScore => self.detect_zscore(&values),
                };

                let percentage = if total_rows == 0 {
                    0.0
                } else {
                    indices.len() as f64 / total_rows as f64 * 100.0
                };

                per_column.insert(
                    column.name.clone(),
                    OutlierRecord {
                        count: indices.len(),
                        percentage,
                        indices,
                    },
                );
            }

            results.insert(method.key().to_string(), per_column);
        }

        results
    }

    /// Rows strictly outside the Tukey fences.
    fn detect_iqr(&self, values: &[(usize, f64)]) -> Vec<usize> {
        let mut sorted: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let (Some(q1), Some(q3)) = (
            describe::percentile(&sorted, 25.0),
            describe::percentile(&sorted, 75.0),
        ) else {
            return Vec::new();
        };

        let iqr = q3 - q1;
        let lower = q1 - self.iqr_multiplier * iqr;
        let upper = q3 + self.iqr_multiplier * iqr;

        values
            .iter()
            .filter(|&&(_, v)| v < lower || v > upper)
            .map(|&(row, _)| row)
            .collect()
    }

    /// Rows whose absolute z-score exceeds the threshold.
    ///
    /// Zero variance means every z-score is zero, so nothing is flagged.
    fn detect_zscore(&self, values: &[(usize, f64)]) -> Vec<usize> {
        let raw: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        let (Some(mean), Some(std)) = (describe::mean(&raw), describe::population_std(&raw))
        else {
            return Vec::new();
        };
        if std == 0.0 {
            return Vec::new();
        }

        values
            .iter()
            .filter(|&&(_, v)| ((v - mean) / std).abs() > self.z_threshold)
            .map(|&(row, _)| row)
            .collect()
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-null finite values of a column with their source row indices.
fn indexed_numeric_values(table: &DataTable, index: usize) -> Vec<(usize, f64)> {
    table
        .indexed_column_values(index)
        .filter(|(_, v)| !DataTable::is_null_value(v))
        .filter_map(|(row, v)| v.trim().parse::<f64>().ok().map(|num| (row, num)))
        .filter(|(_, num)| num.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeInference;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> (DataTable, TableSchema) {
        let table = DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            b',',
        );
        let schema = TypeInference::infer_schema(&table);
        (table, schema)
    }

    fn single_column(values: &[&str]) -> (DataTable, TableSchema) {
        make_table(vec!["v"], values.iter().map(|v| vec![*v]).collect())
    }

    #[test]
    fn test_extreme_value_flagged_by_both_methods() {
        // 19 well-behaved values plus one far outlier.
        let mut values: Vec<String> = (0..19).map(|i| format!("{}", 50 + i % 5)).collect();
        values.push("10000".to_string());
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let (table, schema) = single_column(&refs);

        let results = OutlierDetector::new().detect(&table, &schema);

        assert_eq!(results["iqr"]["v"].indices, vec![19]);
        assert_eq!(results["zscore"]["v"].indices, vec![19]);
        assert_eq!(results["iqr"]["v"].count, 1);
        assert!((results["iqr"]["v"].percentage - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let values = vec!["5"; 100];
        let (table, schema) = single_column(&values);

        let results = OutlierDetector::new().detect(&table, &schema);

        assert_eq!(results["iqr"]["v"].count, 0);
        assert_eq!(results["zscore"]["v"].count, 0);
    }

    #[test]
    fn test_nulls_preserve_original_row_indices() {
        // The extreme value sits at row 5, after two nulls that would
        // shift positional indices if null-dropping lost row identity.
        let (table, schema) = single_column(&[
            "10", "NA", "11", "NA", "12", "9999", "10", "11", "12", "10", "11",
        ]);

        let results = OutlierDetector::new().detect(&table, &schema);

        assert_eq!(results["iqr"]["v"].indices, vec![5]);
        assert_eq!(results["zscore"]["v"].indices, vec![5]);
    }

    #[test]
    fn test_methods_are_independent() {
        // Zero IQR with symmetric moderate tails: 40 and 60 sit outside
        // the collapsed fences but well within 3 population std devs,
        // so only the IQR method flags them.
        let (table, schema) = single_column(&[
            "50", "50", "50", "50", "50", "50", "50", "50", "50", "50", "40", "60",
        ]);

        let results = OutlierDetector::new().detect(&table, &schema);

        assert_eq!(results["iqr"]["v"].count, 2);
        assert_eq!(results["iqr"]["v"].indices, vec![10, 11]);
        assert_eq!(results["zscore"]["v"].count, 0);
    }

    #[test]
    fn test_empty_numeric_column() {
        let (table, _) = single_column(&["NA", ""]);
        let schema = crate::schema::TableSchema::new(vec![crate::schema::ColumnSchema::new(
            "v",
            0,
            crate::schema::ColumnType::Float,
        )]);

        let results = OutlierDetector::new().detect(&table, &schema);

        assert_eq!(results["iqr"]["v"].count, 0);
        assert_eq!(results["zscore"]["v"].count, 0);
    }

    #[test]
    fn test_smaller_multiplier_flags_at_least_as_many() {
        let values: Vec<String> = (0..50).map(|i| format!("{}", i * i % 37)).collect();
        let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
        let (table, schema) = single_column(&refs);

        let wide = OutlierDetector::with_methods(vec![OutlierMethod::Iqr])
            .with_iqr_multiplier(1.5)
            .detect(&table, &schema);
        let narrow = OutlierDetector::with_methods(vec![OutlierMethod::Iqr])
            .with_iqr_multiplier(0.5)
            .detect(&table, &schema);

        assert!(narrow["iqr"]["v"].count >= wide["iqr"]["v"].count);
    }
}
