//! Error types for TechMap.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required column '{column}' (found: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("External call failed: {0}")]
    ExternalCall(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
