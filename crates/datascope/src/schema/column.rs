//! Per-column and table-level schema.

use serde::{Deserialize, Serialize};

use super::types::{ColumnKind, ColumnType};

/// Schema for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Inferred data type.
    pub column_type: ColumnType,
    /// Statistical dispatch bucket derived from the type.
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, position: usize, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            position,
            column_type,
            kind: ColumnKind::from(column_type),
        }
    }

    /// Returns true for columns that receive numeric statistics.
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Schema for an entire table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schemas for each column, in table order.
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns with the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// Numeric columns, in table order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    /// Non-numeric columns (categorical and datetime), in table order.
    pub fn non_numeric_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| !c.is_numeric())
    }

    /// Count columns of a given kind.
    pub fn count_of_kind(&self, kind: ColumnKind) -> usize {
        self.columns_of_kind(kind).count()
    }
}
