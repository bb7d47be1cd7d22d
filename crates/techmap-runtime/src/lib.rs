//! Runtime orchestrator — reads the title table, runs extraction,
//! normalization, aggregation and layout, and exports the results.

pub mod dataset;
pub mod export;
pub mod pipeline;
pub mod types;

pub use dataset::Dataset;
pub use export::{export_all, ExportPaths};
pub use pipeline::Pipeline;
pub use types::*;
