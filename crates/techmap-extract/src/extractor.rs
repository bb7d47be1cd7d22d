//! Per-title keyword suggestion with contained failures.

use std::time::Duration;

use tracing::{debug, error, warn};

use crate::backend::CompletionBackend;
use crate::config::LLMConfig;
use crate::prompt::{build_messages, count_items, EXPECTED_ITEMS};
use crate::types::{CompletionRequest, Extraction, ExtractionWarning};

/// Wraps one completion call per title into a raw suggestion string.
///
/// Every call is preceded by a fixed delay to keep the submission rate
/// within the provider's tolerance. There is no retry: a failed call yields
/// an empty suggestion and a warning.
pub struct KeywordExtractor<B> {
    backend: B,
    temperature: f64,
    max_tokens: usize,
    delay: Duration,
}

impl<B: CompletionBackend> KeywordExtractor<B> {
    pub fn new(backend: B, config: &LLMConfig) -> Self {
        Self {
            backend,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    /// Override the pre-request delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch suggested technologies for one title. Never fails.
    pub async fn extract(&self, title: &str) -> Extraction {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let request = CompletionRequest {
            messages: build_messages(title),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let raw = match self.backend.complete(&request).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!("Error fetching technologies for '{}' via {}: {}", title, self.backend.name(), e);
                return Extraction::failed(e.to_string());
            }
        };

        debug!("Response for '{}': {}", title, raw);

        let items = count_items(&raw);
        let warning = if items != EXPECTED_ITEMS {
            warn!("Unexpected response format for '{}': {}", title, raw);
            Some(ExtractionWarning::Malformed { items })
        } else {
            None
        };

        Extraction { raw, warning }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScriptedBackend;
    use std::time::Instant;

    fn extractor(backend: ScriptedBackend) -> KeywordExtractor<ScriptedBackend> {
        KeywordExtractor::new(backend, &LLMConfig::default()).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_well_formed_response() {
        let ex = extractor(
            ScriptedBackend::new().respond("drone", "  GPS, Lidar, Battery, Camera, Gimbal\n"),
        );
        let result = ex.extract("drone").await;
        assert_eq!(result.raw, "GPS, Lidar, Battery, Camera, Gimbal");
        assert!(result.warning.is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_is_kept() {
        let ex = extractor(
            ScriptedBackend::new().respond("drone", "Drones use GPS and cameras for flight"),
        );
        let result = ex.extract("drone").await;
        assert_eq!(result.raw, "Drones use GPS and cameras for flight");
        assert_eq!(result.warning, Some(ExtractionWarning::Malformed { items: 1 }));
    }

    #[tokio::test]
    async fn test_call_failure_yields_empty() {
        let ex = extractor(ScriptedBackend::new().fail("drone", "connection reset"));
        let result = ex.extract("drone").await;
        assert!(result.raw.is_empty());
        match result.warning {
            Some(ExtractionWarning::CallFailed { message }) => {
                assert!(message.contains("connection reset"))
            }
            other => panic!("unexpected warning: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_title_is_tolerated() {
        let ex = extractor(ScriptedBackend::new().with_default("Sensor"));
        let result = ex.extract("").await;
        assert_eq!(result.raw, "Sensor");
        assert_eq!(ex.backend().calls(), 1);
    }

    #[tokio::test]
    async fn test_delay_precedes_each_call() {
        let ex = KeywordExtractor::new(ScriptedBackend::new().with_default("a"), &LLMConfig::default())
            .with_delay(Duration::from_millis(20));
        let start = Instant::now();
        ex.extract("one").await;
        ex.extract("two").await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_default_delay() {
        let ex = KeywordExtractor::new(ScriptedBackend::new(), &LLMConfig::default());
        assert_eq!(ex.delay(), Duration::from_millis(100));
    }
}
