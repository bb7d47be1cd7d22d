//! TechMap Core — error type, run configuration, data directories.

pub mod config;
pub mod error;

pub use config::{DataPaths, TechMapConfig, DEFAULT_TITLE_COLUMN, DEFAULT_TOP_N};
pub use error::{Error, Result};
