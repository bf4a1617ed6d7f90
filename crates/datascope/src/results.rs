//! Accumulated analysis results, one field per report section.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::charts::VisualizationInfo;
use crate::input::SourceMetadata;
use crate::metrics::{BasicStats, CategoricalSummary, MissingData, NumericSummary, UniqueValueStats};
use crate::outliers::OutlierRecord;
use crate::schema::TableSchema;

/// Facts about the loaded file, recorded at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInfo {
    pub file_path: PathBuf,
    pub file_name: String,
    /// SHA-256 content hash of the source file.
    pub hash: String,
    pub size_bytes: u64,
    /// Detected format (csv, tsv, ...).
    pub format: String,
    /// (rows, columns).
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    /// Column name -> inferred type label, in table order.
    pub data_types: IndexMap<String, String>,
    pub loaded_at: DateTime<Utc>,
}

impl BasicInfo {
    pub fn from_source(source: &SourceMetadata, schema: &TableSchema) -> Self {
        let data_types = schema
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.column_type.label().to_string()))
            .collect();

        Self {
            file_path: source.path.clone(),
            file_name: source.file.clone(),
            hash: source.hash.clone(),
            size_bytes: source.size_bytes,
            format: source.format.clone(),
            shape: (source.row_count, source.column_count),
            columns: schema.columns.iter().map(|c| c.name.clone()).collect(),
            data_types,
            loaded_at: source.loaded_at,
        }
    }
}

/// The full analysis result, accumulated section by section.
///
/// Each stage writes its section exactly once; nothing revises a section
/// after it is written. Sections that have not run yet serialize as
/// absent rather than null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_stats: Option<BasicStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_data: Option<MissingData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_values: Option<IndexMap<String, UniqueValueStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_statistics: Option<IndexMap<String, NumericSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_statistics: Option<IndexMap<String, CategoricalSummary>>,
    /// Method key -> column name -> flagged rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<IndexMap<String, IndexMap<String, OutlierRecord>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualizations: Option<VisualizationInfo>,
}

impl AnalysisResults {
    pub fn new() -> Self {
        Self::default()
    }
}
