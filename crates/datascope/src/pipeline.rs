//! Pipeline orchestrator: load, analyze, render, report.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::charts::{ChartRenderer, VisualizationInfo};
use crate::error::{DatascopeError, Result};
use crate::input::{DataTable, Parser, ParserConfig};
use crate::metrics::MetricEngine;
use crate::outliers::OutlierDetector;
use crate::profile::ProfileReporter;
use crate::report::ReportAssembler;
use crate::results::{AnalysisResults, BasicInfo};
use crate::schema::{TableSchema, TypeInference};

/// Where the pipeline currently stands.
///
/// Stages advance strictly forward; `Failed` is terminal and reachable
/// from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Loaded,
    MetricsComputed,
    OutliersComputed,
    ChartsGenerated,
    Reported,
    Done,
    Failed,
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Whether the optional profile report sub-step runs.
    pub enable_profiling: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            enable_profiling: true,
        }
    }
}

/// Sequential EDA pipeline over a single input file.
///
/// Stages run in order within one invocation; the loaded table is
/// read-only shared state and no stage revises a previously written
/// result section. One output directory belongs to one run; re-running
/// overwrites prior artifacts.
pub struct EdaPipeline {
    input_path: PathBuf,
    output_dir: PathBuf,
    config: PipelineConfig,
    stage: PipelineStage,
    table: Option<DataTable>,
    schema: Option<TableSchema>,
    results: AnalysisResults,
    metrics: MetricEngine,
    detector: OutlierDetector,
}

impl EdaPipeline {
    /// Create a pipeline for `input_path`, writing under `output_dir`.
    pub fn new(
        input_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        enable_profiling: bool,
    ) -> Self {
        Self::with_config(
            input_path,
            output_dir,
            PipelineConfig {
                enable_profiling,
                ..PipelineConfig::default()
            },
        )
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(
        input_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            config,
            stage: PipelineStage::Idle,
            table: None,
            schema: None,
            results: AnalysisResults::new(),
            metrics: MetricEngine::new(),
            detector: OutlierDetector::new(),
        }
    }

    /// Replace the default outlier detector.
    pub fn with_detector(mut self, detector: OutlierDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Results accumulated so far.
    pub fn results(&self) -> &AnalysisResults {
        &self.results
    }

    /// The output directory for this run.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Parse the input file, infer the schema, and record basic info.
    pub fn load(&mut self) -> Result<()> {
        info!("Loading data from {}", self.input_path.display());

        let outcome = (|| {
            self.setup_output_dirs()?;

            let parser = Parser::with_config(self.config.parser.clone());
            let (table, source) = parser.parse_file(&self.input_path)?;
            let schema = TypeInference::infer_schema(&table);

            info!(
                "Data loaded: {} rows x {} columns ({})",
                table.row_count(),
                table.column_count(),
                source.format
            );

            self.results.basic_info = Some(BasicInfo::from_source(&source, &schema));
            self.table = Some(table);
            self.schema = Some(schema);
            Ok(())
        })();

        self.advance(outcome, PipelineStage::Loaded)
    }

    /// Compute every metric section from the loaded table.
    pub fn compute_metrics(&mut self) -> Result<()> {
        info!("Computing descriptive statistics");

        let outcome = (|| {
            let (table, schema) = self.loaded()?;

            let basic_stats = self.metrics.basic_stats(table, schema);
            info!(
                "{} missing values ({:.2}%), {} duplicate rows",
                basic_stats.total_missing_values,
                basic_stats.missing_percentage,
                basic_stats.duplicate_rows
            );

            let missing_data = self.metrics.missing_data(table);
            let unique_values = self.metrics.unique_values(table);
            let numeric = self.metrics.numeric_statistics(table, schema);
            let categorical = self.metrics.categorical_statistics(table, schema);
            info!(
                "Analyzed {} numeric and {} non-numeric columns",
                numeric.len(),
                categorical.len()
            );

            self.results.basic_stats = Some(basic_stats);
            self.results.missing_data = Some(missing_data);
            self.results.unique_values = Some(unique_values);
            self.results.numeric_statistics = Some(numeric);
            self.results.categorical_statistics = Some(categorical);
            Ok(())
        })();

        self.advance(outcome, PipelineStage::MetricsComputed)
    }

    /// Flag anomalous rows per numeric column and method.
    pub fn detect_outliers(&mut self) -> Result<()> {
        info!("Detecting outliers");

        let outcome = (|| {
            let (table, schema) = self.loaded()?;
            let outliers = self.detector.detect(table, schema);

            for (method, columns) in &outliers {
                let total: usize = columns.values().map(|r| r.count).sum();
                info!("{method} method flagged {total} outliers across numeric columns");
            }

            self.results.outliers = Some(outliers);
            Ok(())
        })();

        self.advance(outcome, PipelineStage::OutliersComputed)
    }

    /// Render the chart set and record the produced file references.
    pub fn generate_charts(&mut self) -> Result<()> {
        info!("Generating visualizations");

        let outcome = (|| {
            let (table, schema) = self.loaded()?;
            let renderer = ChartRenderer::new(&self.output_dir);
            let plots = renderer.render_all(table, schema)?;
            info!("Generated {} visualization files", plots.len());

            self.results.visualizations = Some(VisualizationInfo::new(plots));
            Ok(())
        })();

        self.advance(outcome, PipelineStage::ChartsGenerated)
    }

    /// Generate the optional profile report.
    ///
    /// Never fatal: a failure (or the flag being off) logs and returns
    /// without touching the pipeline stage.
    pub fn generate_profile_reports(&mut self) {
        if !self.config.enable_profiling {
            info!("Skipping profile reports (disabled)");
            return;
        }

        let Ok((_, schema)) = self.loaded() else {
            warn!("Skipping profile reports: no dataset loaded");
            return;
        };

        let reporter = ProfileReporter::new(&self.output_dir);
        match reporter.generate(schema, &self.results) {
            Ok(path) => info!("Profile report saved: {}", path.display()),
            Err(e) => warn!("Profile report generation failed, skipping: {e}"),
        }
    }

    /// Write the HTML report and JSON summary.
    pub fn generate_report(&mut self) -> Result<(PathBuf, PathBuf)> {
        info!("Generating summary report");

        let assembler = ReportAssembler::new(&self.output_dir);
        let outcome = assembler.write(&self.results);

        self.advance(outcome, PipelineStage::Reported)
    }

    /// Run the complete pipeline.
    ///
    /// A load failure halts immediately; any later stage error is fatal
    /// to the whole run. Only the profile sub-step is best-effort. The
    /// report is written last, after every other stage has succeeded, so
    /// a failed run leaves no report behind.
    pub fn run(&mut self) -> Result<(PathBuf, PathBuf)> {
        info!("Starting EDA pipeline");

        self.load()?;
        self.compute_metrics()?;
        self.detect_outliers()?;
        self.generate_charts()?;
        self.generate_profile_reports();
        let paths = self.generate_report()?;
        self.stage = PipelineStage::Done;

        info!("EDA pipeline completed");
        Ok(paths)
    }

    /// Borrow the loaded table and schema, or fail if none.
    fn loaded(&self) -> Result<(&DataTable, &TableSchema)> {
        match (self.table.as_ref(), self.schema.as_ref()) {
            (Some(table), Some(schema)) => Ok((table, schema)),
            _ => Err(DatascopeError::NotLoaded(
                "call load() before running analysis stages".to_string(),
            )),
        }
    }

    /// Move to `next` on success, `Failed` on error.
    fn advance<T>(&mut self, outcome: Result<T>, next: PipelineStage) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.stage = next;
                Ok(value)
            }
            Err(e) => {
                error!("Pipeline stage failed: {e}");
                self.stage = PipelineStage::Failed;
                Err(e)
            }
        }
    }

    fn setup_output_dirs(&self) -> Result<()> {
        for dir in [
            self.output_dir.clone(),
            self.output_dir.join("plots"),
            self.output_dir.join("reports"),
        ] {
            fs::create_dir_all(&dir).map_err(|e| DatascopeError::Io {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_method_before_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = EdaPipeline::new("nonexistent.csv", dir.path(), false);

        assert_eq!(pipeline.stage(), PipelineStage::Idle);
        let err = pipeline.compute_metrics().unwrap_err();
        assert!(matches!(err, DatascopeError::NotLoaded(_)));
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
    }

    #[test]
    fn test_load_failure_moves_to_failed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let mut pipeline = EdaPipeline::new(&missing, dir.path().join("out"), false);

        assert!(pipeline.load().is_err());
        assert_eq!(pipeline.stage(), PipelineStage::Failed);
        assert!(pipeline.run().is_err());
    }
}
