//! @ai:module:intent Ordered provider fallback chain
//! @ai:module:layer application
//! @ai:module:public_api ProviderChain, GenerationOutcome, AttemptRecord
//! @ai:module:depends_on providers, config
//! @ai:module:stateless true

use crate::config::{ProviderAvailability, ServiceConfig};
use crate::error::Result;
use crate::providers::fallback::FallbackProvider;
use crate::providers::gemini::GeminiProvider;
use crate::providers::local::LocalProvider;
use crate::providers::provider::{ProviderError, ProviderResponse, ReportProvider};
use crate::report::ReportStatus;
use crate::templates::PromptPair;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// @ai:intent A failed provider attempt, kept for the outcome's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub provider: String,
    pub error_kind: String,
    pub message: String,
    pub elapsed_ms: u64,
}

/// @ai:intent Result of running the chain; always present
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub text: String,
    /// Provider that produced `text`
    pub provider: String,
    pub status: ReportStatus,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub latency_ms: u64,
    /// Failures that preceded the serving provider, in order
    pub failed_attempts: Vec<AttemptRecord>,
}

/// @ai:intent Tries providers in a fixed order and falls back deterministically
pub struct ProviderChain {
    providers: Vec<Arc<dyn ReportProvider>>,
    fallback: FallbackProvider,
    timeout: Duration,
}

impl ProviderChain {
    /// @ai:intent Create a chain from an explicit provider order
    /// @ai:effects pure
    pub fn new(
        providers: Vec<Arc<dyn ReportProvider>>,
        fallback: FallbackProvider,
        timeout: Duration,
    ) -> Self {
        Self {
            providers,
            fallback,
            timeout,
        }
    }

    /// @ai:intent Build the startup provider order: hosted, local, fallback
    /// @ai:pre availability was probed once for this process
    /// @ai:effects fs:read
    pub fn from_config(config: &ServiceConfig, availability: &ProviderAvailability) -> Result<Self> {
        let timeout = config.provider_timeout();
        let mut providers: Vec<Arc<dyn ReportProvider>> = Vec::new();

        if availability.remote_credential {
            providers.push(Arc::new(GeminiProvider::new(&config.remote, timeout)?));
        }
        if availability.local_reachable {
            providers.push(Arc::new(LocalProvider::new(&config.local, timeout)?));
        }

        let fallback = FallbackProvider::from_paths(&config.paths)?;
        let chain = Self::new(providers, fallback, timeout);

        tracing::info!(
            "Provider chain: {} (timeout {:?})",
            chain.provider_names().join(" -> "),
            timeout
        );
        Ok(chain)
    }

    /// @ai:intent Provider names in attempt order, fallback last
    /// @ai:effects pure
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.name().to_string())
            .chain(std::iter::once(self.fallback.name().to_string()))
            .collect()
    }

    /// @ai:intent Run providers one at a time until one succeeds
    /// @ai:post never fails; status is fallback when no AI provider answered
    /// @ai:effects network
    pub async fn generate(&self, prompts: &PromptPair) -> GenerationOutcome {
        let started = Instant::now();
        let mut failed_attempts = Vec::new();

        for provider in &self.providers {
            let attempt_started = Instant::now();
            let result = match tokio::time::timeout(self.timeout, provider.generate(prompts)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout),
            };

            match result {
                Ok(response) => {
                    let status = if response.truncated {
                        ReportStatus::Partial
                    } else {
                        ReportStatus::Success
                    };
                    tracing::info!(
                        "Provider '{}' served report in {}ms ({})",
                        provider.name(),
                        attempt_started.elapsed().as_millis(),
                        status.as_str()
                    );
                    return Self::outcome(response, provider.name(), status, started, failed_attempts);
                }
                Err(e) => {
                    tracing::warn!(
                        "Provider '{}' failed ({}): {} - trying next provider",
                        provider.name(),
                        e.kind(),
                        e
                    );
                    failed_attempts.push(AttemptRecord {
                        provider: provider.name().to_string(),
                        error_kind: e.kind().to_string(),
                        message: e.to_string(),
                        elapsed_ms: attempt_started.elapsed().as_millis() as u64,
                    });
                }
            }
        }

        tracing::info!(
            "Serving fallback report after {} failed provider attempt(s)",
            failed_attempts.len()
        );
        let response = self.fallback.render(prompts);
        Self::outcome(
            response,
            self.fallback.name(),
            ReportStatus::Fallback,
            started,
            failed_attempts,
        )
    }

    fn outcome(
        response: ProviderResponse,
        provider: &str,
        status: ReportStatus,
        started: Instant,
        failed_attempts: Vec<AttemptRecord>,
    ) -> GenerationOutcome {
        GenerationOutcome {
            text: response.text,
            provider: provider.to_string(),
            status,
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            latency_ms: started.elapsed().as_millis() as u64,
            failed_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fallback::FALLBACK_LABEL;
    use crate::providers::mock::MockProvider;

    fn prompts() -> PromptPair {
        PromptPair {
            system: "system".to_string(),
            user: "Business: Acme Farm".to_string(),
        }
    }

    fn chain(providers: Vec<Arc<MockProvider>>, timeout: Duration) -> ProviderChain {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn ReportProvider>)
            .collect();
        ProviderChain::new(providers, FallbackProvider::default(), timeout)
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Arc::new(MockProvider::succeeding("remote", "AI narrative"));
        let second = Arc::new(MockProvider::succeeding("local", "other narrative"));
        let chain = chain(vec![first.clone(), second.clone()], Duration::from_secs(5));

        let outcome = chain.generate(&prompts()).await;

        assert_eq!(outcome.text, "AI narrative");
        assert_eq!(outcome.provider, "remote");
        assert_eq!(outcome.status, ReportStatus::Success);
        assert!(outcome.failed_attempts.is_empty());
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_moves_to_next_provider() {
        let first = Arc::new(MockProvider::failing(
            "remote",
            ProviderError::Authentication("401: bad key".to_string()),
        ));
        let second = Arc::new(MockProvider::succeeding("local", "local narrative"));
        let chain = chain(vec![first.clone(), second.clone()], Duration::from_secs(5));

        let outcome = chain.generate(&prompts()).await;

        assert_eq!(outcome.provider, "local");
        assert_eq!(outcome.status, ReportStatus::Success);
        assert_eq!(outcome.failed_attempts.len(), 1);
        assert_eq!(outcome.failed_attempts[0].provider, "remote");
        assert_eq!(outcome.failed_attempts[0].error_kind, "authentication");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_yields_fallback() {
        let first = Arc::new(MockProvider::failing(
            "remote",
            ProviderError::Network("connection refused".to_string()),
        ));
        let second = Arc::new(MockProvider::failing(
            "local",
            ProviderError::MalformedResponse("not json".to_string()),
        ));
        let chain = chain(vec![first, second], Duration::from_secs(5));

        let outcome = chain.generate(&prompts()).await;

        assert_eq!(outcome.status, ReportStatus::Fallback);
        assert_eq!(outcome.provider, "fallback");
        assert!(outcome.text.starts_with(FALLBACK_LABEL));
        let kinds: Vec<_> = outcome.failed_attempts.iter().map(|a| a.error_kind.as_str()).collect();
        assert_eq!(kinds, vec!["network", "malformed_response"]);
    }

    #[tokio::test]
    async fn test_empty_chain_yields_fallback() {
        let chain = chain(vec![], Duration::from_secs(5));
        let outcome = chain.generate(&prompts()).await;
        assert_eq!(outcome.status, ReportStatus::Fallback);
        assert_eq!(chain.provider_names(), vec!["fallback".to_string()]);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let slow = Arc::new(
            MockProvider::succeeding("remote", "too late").with_delay(Duration::from_secs(10)),
        );
        let local = Arc::new(MockProvider::succeeding("local", "on time"));
        let chain = chain(vec![slow.clone(), local], Duration::from_millis(50));

        let started = Instant::now();
        let outcome = chain.generate(&prompts()).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(outcome.provider, "local");
        assert_eq!(outcome.failed_attempts[0].error_kind, "timeout");
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_truncated_response_is_partial() {
        let provider = Arc::new(MockProvider::truncated("remote", "half a plan"));
        let chain = chain(vec![provider], Duration::from_secs(5));
        let outcome = chain.generate(&prompts()).await;
        assert_eq!(outcome.status, ReportStatus::Partial);
        assert_eq!(outcome.text, "half a plan");
    }

    #[tokio::test]
    async fn test_attempts_are_sequential() {
        let first = Arc::new(
            MockProvider::failing("remote", ProviderError::Timeout).with_delay(Duration::from_millis(30)),
        );
        let second = Arc::new(MockProvider::succeeding("local", "ok"));
        let chain = chain(vec![first.clone(), second.clone()], Duration::from_secs(5));

        chain.generate(&prompts()).await;

        let first_done = first.last_finished().unwrap();
        let second_started = second.last_started().unwrap();
        assert!(second_started >= first_done);
    }

    #[tokio::test]
    async fn test_from_config_without_providers() {
        let config = ServiceConfig::default();
        let chain = ProviderChain::from_config(&config, &ProviderAvailability::default()).unwrap();
        assert_eq!(chain.provider_names(), vec!["fallback".to_string()]);
    }

    #[tokio::test]
    async fn test_from_config_order() {
        let mut config = ServiceConfig::default();
        config.remote.api_key = Some("key".to_string());
        let availability = ProviderAvailability {
            remote_credential: true,
            local_reachable: true,
        };
        let chain = ProviderChain::from_config(&config, &availability).unwrap();
        assert_eq!(chain.provider_names(), vec!["gemini", "local", "fallback"]);
    }
}
