//! Datascope: automated exploratory data analysis for tabular datasets.
//!
//! Datascope loads a delimited data file, computes descriptive statistics
//! and outlier flags, renders charts, and assembles an HTML report plus a
//! JSON summary into an output directory.
//!
//! # Pipeline
//!
//! - **Load**: parse the file, classify every column once into a numeric,
//!   categorical, or datetime bucket.
//! - **Metrics**: table-level counts, missingness, uniqueness, and
//!   per-column descriptive statistics.
//! - **Outliers**: IQR and z-score detection per numeric column.
//! - **Charts**: PNG renderings under `plots/`.
//! - **Report**: `eda_report.html` and `eda_summary.json`.
//!
//! # Example
//!
//! ```no_run
//! use datascope::EdaPipeline;
//!
//! let mut pipeline = EdaPipeline::new("data.csv", "eda_output", true);
//! let (html_path, json_path) = pipeline.run().unwrap();
//!
//! println!("Report: {}", html_path.display());
//! println!("Summary: {}", json_path.display());
//! ```

pub mod charts;
pub mod error;
pub mod input;
pub mod metrics;
pub mod outliers;
pub mod profile;
pub mod report;
pub mod schema;

mod pipeline;
mod results;

pub use charts::{ChartRenderer, VisualizationInfo};
pub use error::{DatascopeError, Result};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use metrics::{
    BasicStats, CategoricalSummary, MetricEngine, MissingData, NumericSummary, UniqueValueStats,
};
pub use outliers::{OutlierDetector, OutlierMethod, OutlierRecord};
pub use pipeline::{EdaPipeline, PipelineConfig, PipelineStage};
pub use profile::ProfileReporter;
pub use report::ReportAssembler;
pub use results::{AnalysisResults, BasicInfo};
pub use schema::{ColumnKind, ColumnSchema, ColumnType, TableSchema, TypeInference};
