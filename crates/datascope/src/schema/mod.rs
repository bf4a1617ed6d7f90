//! Column typing: inferred types, kind buckets, and table schema.

mod column;
mod infer;
mod types;

pub use column::{ColumnSchema, TableSchema};
pub use infer::TypeInference;
pub use types::{ColumnKind, ColumnType};
