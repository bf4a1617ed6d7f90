//! Core type definitions for column classification.

use serde::{Deserialize, Serialize};

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Date only (no time component).
    Date,
    /// Date with a time component.
    DateTime,
    /// Text/string values.
    String,
    /// Unable to determine type (e.g. all values null).
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::DateTime)
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::String => "string",
            ColumnType::Unknown => "unknown",
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Unknown
    }
}

/// Statistical dispatch bucket, assigned once at load time.
///
/// All downstream stages branch on this variant instead of re-inspecting
/// cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or float column; gets descriptive statistics and
    /// outlier detection.
    Numeric,
    /// Text-like column; gets frequency statistics.
    Categorical,
    /// Date or datetime column.
    Datetime,
}

impl From<ColumnType> for ColumnKind {
    fn from(column_type: ColumnType) -> Self {
        if column_type.is_numeric() {
            ColumnKind::Numeric
        } else if column_type.is_temporal() {
            ColumnKind::Datetime
        } else {
            ColumnKind::Categorical
        }
    }
}
