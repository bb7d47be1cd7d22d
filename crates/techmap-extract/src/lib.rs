//! Keyword suggestion through an external LLM completion service.
//!
//! One completion call per patent title. The service is untrusted: its
//! output is returned as raw text and every failure is contained at the
//! row, never raised past [`KeywordExtractor::extract`].

pub mod backend;
pub mod config;
pub mod extractor;
pub mod prompt;
pub mod providers;
pub mod types;

pub use backend::{CompletionBackend, ScriptedBackend};
pub use config::LLMConfig;
pub use extractor::KeywordExtractor;
pub use providers::HttpCompletionBackend;
pub use types::*;
