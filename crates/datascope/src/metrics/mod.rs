//! Descriptive metric computation over a loaded table.

pub mod describe;
mod engine;

pub use engine::{
    BasicStats, CategoricalSummary, MetricEngine, MissingData, NumericSummary, UniqueValueStats,
};

pub(crate) use engine::numeric_values;
