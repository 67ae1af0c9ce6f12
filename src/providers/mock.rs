//! @ai:module:intent Scriptable provider for tests and offline runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockProvider

use crate::providers::provider::{ProviderError, ProviderResponse, ReportProvider};
use crate::templates::PromptPair;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum Script {
    Succeed { text: String, truncated: bool },
    Fail(ProviderError),
}

/// @ai:intent Provider returning a fixed result and counting calls
pub struct MockProvider {
    name: String,
    script: Script,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompts: Mutex<Option<PromptPair>>,
    last_started: Mutex<Option<Instant>>,
    last_finished: Mutex<Option<Instant>>,
}

impl MockProvider {
    fn with_script(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            script,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompts: Mutex::new(None),
            last_started: Mutex::new(None),
            last_finished: Mutex::new(None),
        }
    }

    /// @ai:intent Mock that always answers with the given text
    /// @ai:effects pure
    pub fn succeeding(name: &str, text: &str) -> Self {
        Self::with_script(
            name,
            Script::Succeed {
                text: text.to_string(),
                truncated: false,
            },
        )
    }

    /// @ai:intent Mock that answers but reports hitting its token limit
    pub fn truncated(name: &str, text: &str) -> Self {
        Self::with_script(
            name,
            Script::Succeed {
                text: text.to_string(),
                truncated: true,
            },
        )
    }

    /// @ai:intent Mock that always fails with the given error
    pub fn failing(name: &str, error: ProviderError) -> Self {
        Self::with_script(name, Script::Fail(error))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompts(&self) -> Option<PromptPair> {
        self.last_prompts.lock().ok().and_then(|p| p.clone())
    }

    pub fn last_started(&self) -> Option<Instant> {
        self.last_started.lock().ok().and_then(|t| *t)
    }

    pub fn last_finished(&self) -> Option<Instant> {
        self.last_finished.lock().ok().and_then(|t| *t)
    }

    fn record(slot: &Mutex<Option<Instant>>) {
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(Instant::now());
        }
    }
}

#[async_trait]
impl ReportProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    /// @ai:effects state:write, time
    async fn generate(&self, prompts: &PromptPair) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::record(&self.last_started);
        if let Ok(mut last) = self.last_prompts.lock() {
            *last = Some(prompts.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Self::record(&self.last_finished);

        match &self.script {
            Script::Succeed { text, truncated } => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: Some(100),
                output_tokens: Some(200),
                truncated: *truncated,
            }),
            Script::Fail(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_calls_and_records_prompts() {
        let provider = MockProvider::succeeding("mock", "narrative");
        let prompts = PromptPair {
            system: "s".to_string(),
            user: "u".to_string(),
        };

        let response = provider.generate(&prompts).await.unwrap();
        assert_eq!(response.text, "narrative");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_prompts(), Some(prompts));
    }
}
