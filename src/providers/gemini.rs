//! @ai:module:intent Hosted generative AI provider (Gemini generateContent API)
//! @ai:module:layer infrastructure
//! @ai:module:public_api GeminiProvider
//! @ai:module:stateless false

use crate::config::RemoteConfig;
use crate::error::{ReportError, Result};
use crate::providers::provider::{ProviderError, ProviderResponse, ReportProvider};
use crate::providers::rate_limiter::RateLimiter;
use crate::templates::PromptPair;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_PROVIDER: &str = "gemini";

/// @ai:intent generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

/// @ai:intent generateContent response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

/// @ai:intent Hosted AI client with outbound pacing
pub struct GeminiProvider {
    client: reqwest::Client,
    config: RemoteConfig,
    api_key: String,
    rate_limiter: RateLimiter,
    timeout: Duration,
}

impl GeminiProvider {
    /// @ai:intent Create the hosted provider from configuration
    /// @ai:pre config.api_key is set
    /// @ai:effects pure
    pub fn new(config: &RemoteConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ReportError::Config("GEMINI_API_KEY not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            config: config.clone(),
            api_key,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request<'a>(&self, prompts: &'a PromptPair) -> ApiRequest<'a> {
        ApiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &prompts.system,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompts.user }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        }
    }
}

/// @ai:intent Extract narrative text and usage from a generateContent response
/// @ai:effects pure
fn parse_response(response: ApiResponse) -> std::result::Result<ProviderResponse, ProviderError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedResponse("no candidates in response".to_string()))?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(format!(
            "candidate has no text (finishReason={})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let usage = response.usage_metadata;
    Ok(ProviderResponse {
        text,
        input_tokens: usage.as_ref().and_then(|u| u.prompt_token_count),
        output_tokens: usage.as_ref().and_then(|u| u.candidates_token_count),
        truncated: candidate.finish_reason.as_deref() == Some("MAX_TOKENS"),
    })
}

#[async_trait]
impl ReportProvider for GeminiProvider {
    fn name(&self) -> &str {
        GEMINI_PROVIDER
    }

    /// @ai:intent Send the prompt pair to the hosted service
    /// @ai:effects network
    async fn generate(&self, prompts: &PromptPair) -> std::result::Result<ProviderResponse, ProviderError> {
        // A slot further away than the attempt budget is refused up front
        self.rate_limiter
            .acquire_within(self.timeout)
            .await
            .map_err(|wait| {
                ProviderError::Unavailable(format!("request rate limit reached, next slot in {wait:?}"))
            })?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(prompts))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        parse_response(api_response)
    }
}
