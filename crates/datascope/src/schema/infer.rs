//! Column type inference by majority vote over non-null values.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::column::{ColumnSchema, TableSchema};
use super::types::ColumnType;
use crate::input::DataTable;

// Date patterns compiled once on first use.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(), // US date
        Regex::new(r"^\d{2}-\d{2}-\d{4}").unwrap(), // European date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

/// Infers a [`TableSchema`] from raw cell values.
///
/// Each column is typed once, immediately after load; every later stage
/// dispatches on the resulting [`ColumnKind`](super::ColumnKind) instead
/// of re-inspecting values.
pub struct TypeInference;

impl TypeInference {
    /// Classify every column of the table.
    pub fn infer_schema(table: &DataTable) -> TableSchema {
        let columns = table
            .headers
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let column_type = Self::infer_column_type(table, position);
                ColumnSchema::new(name.clone(), position, column_type)
            })
            .collect();

        TableSchema::new(columns)
    }

    /// Infer the type of a single column from its non-null values.
    pub fn infer_column_type(table: &DataTable, index: usize) -> ColumnType {
        let mut type_counts: HashMap<ColumnType, usize> = HashMap::new();
        let mut non_null = 0usize;

        for value in table.column_values(index) {
            if DataTable::is_null_value(value) {
                continue;
            }
            non_null += 1;
            *type_counts.entry(detect_value_type(value)).or_insert(0) += 1;
        }

        if non_null == 0 {
            return ColumnType::Unknown;
        }

        let best_type = type_counts
            .iter()
            .max_by_key(|&(_, count)| *count)
            .map(|(t, _)| *t)
            .unwrap_or(ColumnType::String);

        // A column of integers with even one float value is a float column.
        if best_type == ColumnType::Integer && type_counts.contains_key(&ColumnType::Float) {
            return ColumnType::Float;
        }

        best_type
    }
}

/// Detect the type of a single value.
fn detect_value_type(value: &str) -> ColumnType {
    let trimmed = value.trim();

    if matches!(
        trimmed.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    ) {
        return ColumnType::Boolean;
    }

    if trimmed.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }

    if trimmed.parse::<f64>().is_ok() {
        return ColumnType::Float;
    }

    if looks_like_date(trimmed) {
        if trimmed.contains(':') || trimmed.contains('T') {
            return ColumnType::DateTime;
        }
        return ColumnType::Date;
    }

    ColumnType::String
}

/// Check if a value looks like a date.
fn looks_like_date(value: &str) -> bool {
    DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value))
}
