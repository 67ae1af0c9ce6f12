//! @ai:module:intent Local generative AI provider (Ollama-compatible generate API)
//! @ai:module:layer infrastructure
//! @ai:module:public_api LocalProvider

use crate::config::LocalConfig;
use crate::error::{ReportError, Result};
use crate::providers::provider::{ProviderError, ProviderResponse, ReportProvider};
use crate::templates::PromptPair;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LOCAL_PROVIDER: &str = "local";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    done_reason: Option<String>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

/// @ai:intent Client for a model server running next to the service
pub struct LocalProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl LocalProvider {
    /// @ai:intent Create the local provider from configuration
    /// @ai:effects pure
    pub fn new(config: &LocalConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            model: config.model.clone(),
        })
    }
}

fn into_provider_response(
    response: GenerateResponse,
) -> std::result::Result<ProviderResponse, ProviderError> {
    if response.response.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(
            "local service returned empty text".to_string(),
        ));
    }

    Ok(ProviderResponse {
        text: response.response,
        input_tokens: response.prompt_eval_count,
        output_tokens: response.eval_count,
        truncated: response.done_reason.as_deref() == Some("length"),
    })
}

#[async_trait]
impl ReportProvider for LocalProvider {
    fn name(&self) -> &str {
        LOCAL_PROVIDER
    }

    /// @ai:effects network
    async fn generate(&self, prompts: &PromptPair) -> std::result::Result<ProviderResponse, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            system: &prompts.system,
            prompt: &prompts.user,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        into_provider_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(value: serde_json::Value) -> std::result::Result<ProviderResponse, ProviderError> {
        into_provider_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_response_with_usage() {
        let response = convert(json!({
            "model": "llama3.2",
            "response": "Executive summary...",
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 80,
            "eval_count": 400
        }))
        .unwrap();
        assert_eq!(response.text, "Executive summary...");
        assert_eq!(response.output_tokens, Some(400));
        assert!(!response.truncated);
    }

    #[test]
    fn test_length_stop_is_truncated() {
        let response = convert(json!({"response": "partial", "done_reason": "length"})).unwrap();
        assert!(response.truncated);
    }

    #[test]
    fn test_empty_text_is_malformed() {
        let err = convert(json!({"done": true})).unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let config = LocalConfig {
            host: "127.0.0.1".to_string(),
            port: 9,
            ..Default::default()
        };
        let provider = LocalProvider::new(&config, Duration::from_millis(500)).unwrap();
        let prompts = PromptPair {
            system: "s".to_string(),
            user: "u".to_string(),
        };
        let err = provider.generate(&prompts).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_) | ProviderError::Timeout));
    }
}
