//! External LLM provider completion calls.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API with the system prompt sent separately.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use techmap_core::{Error, Result};

use crate::backend::CompletionBackend;
use crate::config::LLMConfig;
use crate::types::{CompletionRequest, LLMProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Completion backend that talks to a hosted provider.
pub struct HttpCompletionBackend {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
}

impl HttpCompletionBackend {
    pub fn new(
        provider: LLMProvider,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            client,
            provider,
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build the backend for whichever provider the config resolves to.
    pub fn from_config(config: &LLMConfig) -> Result<Self> {
        let (provider, model, api_key) = config.resolve_provider().ok_or_else(|| {
            Error::Config(
                "No LLM API key configured (set OPENAI_API_KEY, ANTHROPIC_API_KEY or GROQ_API_KEY)"
                    .into(),
            )
        })?;
        Self::new(
            provider,
            model,
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_openai_compat(&self, url: &str, request: &CompletionRequest) -> Result<String> {
        let msgs: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let body = json!({
            "model": self.model,
            "messages": msgs,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!("Requesting completion from {} with model {}", url, self.model);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ExternalCall(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        openai_content(&parsed)
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let system_msg: Option<&str> = request
            .messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str());

        let conv_msgs: Vec<Value> = request
            .messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": conv_msgs,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if let Some(sys) = system_msg {
            body["system"] = json!(sys);
        }

        debug!("Requesting completion from Anthropic with model {}", self.model);

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ExternalCall(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        anthropic_content(&parsed)
    }
}

impl CompletionBackend for HttpCompletionBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self.provider {
            LLMProvider::OpenAI => self.complete_openai_compat(OPENAI_URL, request).await,
            LLMProvider::Groq => self.complete_openai_compat(GROQ_URL, request).await,
            LLMProvider::Anthropic => self.complete_anthropic(request).await,
        }
    }

    fn name(&self) -> &str {
        match self.provider {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Anthropic => "anthropic",
            LLMProvider::Groq => "groq",
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::ExternalCall(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::ExternalCall(format!("Invalid response body: {}", e)))
}

/// `choices[0].message.content` of a chat-completions response.
fn openai_content(parsed: &Value) -> Result<String> {
    parsed["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::ExternalCall("Response has no message content".into()))
}

/// Concatenated text blocks of a Messages API response.
fn anthropic_content(parsed: &Value) -> Result<String> {
    if parsed["type"].as_str() == Some("error") {
        let msg = parsed["error"]["message"].as_str().unwrap_or("Unknown error");
        return Err(Error::ExternalCall(msg.to_string()));
    }
    let blocks = parsed["content"]
        .as_array()
        .ok_or_else(|| Error::ExternalCall("Response has no content blocks".into()))?;
    Ok(blocks
        .iter()
        .filter(|b| b["type"].as_str() == Some("text"))
        .filter_map(|b| b["text"].as_str())
        .collect::<Vec<_>>()
        .join(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_content() {
        let parsed = json!({
            "choices": [{"message": {"role": "assistant", "content": "Lidar, Radar"}}]
        });
        assert_eq!(openai_content(&parsed).unwrap(), "Lidar, Radar");
        assert!(openai_content(&json!({"choices": []})).is_err());
    }

    #[test]
    fn test_anthropic_content() {
        let parsed = json!({
            "type": "message",
            "content": [
                {"type": "text", "text": "Lidar, "},
                {"type": "text", "text": "Radar"}
            ]
        });
        assert_eq!(anthropic_content(&parsed).unwrap(), "Lidar, Radar");

        let error = json!({"type": "error", "error": {"message": "overloaded"}});
        match anthropic_content(&error) {
            Err(Error::ExternalCall(msg)) => assert_eq!(msg, "overloaded"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_without_key() {
        let config = LLMConfig {
            preferred_provider: "openai".into(),
            ..LLMConfig::default()
        };
        assert!(matches!(
            HttpCompletionBackend::from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_config_resolves_provider() {
        let config = LLMConfig {
            preferred_provider: "groq".into(),
            groq_api_key: Some("gsk".into()),
            ..LLMConfig::default()
        };
        let backend = HttpCompletionBackend::from_config(&config).unwrap();
        assert_eq!(backend.provider(), LLMProvider::Groq);
        assert_eq!(backend.name(), "groq");
        assert_eq!(backend.model(), crate::config::DEFAULT_GROQ_MODEL);
    }
}
