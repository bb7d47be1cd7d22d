//! Completion backend trait and a scripted implementation.
//!
//! The `CompletionBackend` trait abstracts over the external service.
//! Implementations:
//! - `HttpCompletionBackend`: OpenAI / Anthropic / Groq over HTTP
//! - `ScriptedBackend`: canned responses keyed by title, for tests and dry runs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use techmap_core::{Error, Result};

use crate::types::CompletionRequest;

/// Trait for completion backends.
#[allow(async_fn_in_trait)]
pub trait CompletionBackend {
    /// Run one completion and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Backend that answers from a fixed table instead of the network.
///
/// The title is recovered from the quoted part of the prompt. Unknown titles
/// fall back to the default response, or fail if none was given.
pub struct ScriptedBackend {
    responses: HashMap<String, std::result::Result<String, String>>,
    default: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer `title` with `response`.
    pub fn respond(mut self, title: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(title.into(), Ok(response.into()));
        self
    }

    /// Fail the call for `title` with an external-call error.
    pub fn fail(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(title.into(), Err(message.into()));
        self
    }

    /// Response used for titles with no scripted entry.
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default = Some(response.into());
        self
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the title back out of `...patent: "<title>"\n...`.
fn title_from_prompt(prompt: &str) -> Option<&str> {
    let start = prompt.find('"')? + 1;
    let end = start + prompt[start..].find("\"\n")?;
    Some(&prompt[start..end])
}

impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let title = request
            .user_content()
            .and_then(title_from_prompt)
            .unwrap_or_default();

        match self.responses.get(title) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(Error::ExternalCall(message.clone())),
            None => self
                .default
                .clone()
                .ok_or_else(|| Error::ExternalCall(format!("no scripted response for '{}'", title))),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
