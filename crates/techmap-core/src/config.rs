//! Run configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Column holding patent titles in the original Korean export format.
pub const DEFAULT_TITLE_COLUMN: &str = "발명명칭";

/// Number of technologies shown in the treemap.
pub const DEFAULT_TOP_N: usize = 25;

/// Paths to all TechMap data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Default directory for run exports (`data/outputs/`).
    pub outputs: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            outputs: root.join("outputs"),
            llm_config_file: root.join("llm-config.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.outputs)?;
        Ok(())
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechMapConfig {
    /// Input column holding the patent titles.
    pub title_column: String,
    /// How many of the most frequent technologies go into the treemap.
    pub top_n: usize,
    /// Maximum number of extraction calls in flight (1 = sequential).
    pub concurrency: usize,
    /// Data directory paths.
    pub data_paths: DataPaths,
}

impl TechMapConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let title_column = std::env::var("TECHMAP_TITLE_COLUMN")
            .ok()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE_COLUMN.to_string());

        let top_n = std::env::var("TECHMAP_TOP_N")
            .ok()
            .and_then(|n| n.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_TOP_N);

        let concurrency = std::env::var("TECHMAP_CONCURRENCY")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(1usize)
            .max(1);

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            title_column,
            top_n,
            concurrency,
            data_paths,
        })
    }

    /// Configuration with defaults only, rooted at `data_dir`.
    pub fn with_defaults(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            title_column: DEFAULT_TITLE_COLUMN.to_string(),
            top_n: DEFAULT_TOP_N,
            concurrency: 1,
            data_paths: DataPaths::new(data_dir)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_creates_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        assert!(paths.outputs.is_dir());
        assert_eq!(paths.llm_config_file, dir.path().join("llm-config.json"));
    }

    #[test]
    fn test_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TechMapConfig::with_defaults(dir.path()).unwrap();
        assert_eq!(config.title_column, DEFAULT_TITLE_COLUMN);
        assert_eq!(config.top_n, 25);
        assert_eq!(config.concurrency, 1);
    }
}
