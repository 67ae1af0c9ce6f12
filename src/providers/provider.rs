//! @ai:module:intent Shared capability interface for narrative text providers
//! @ai:module:layer domain
//! @ai:module:public_api ReportProvider, ProviderResponse, ProviderError
//! @ai:module:stateless true

use crate::templates::PromptPair;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// @ai:intent Generate narrative text from a system/user prompt pair
#[async_trait]
pub trait ReportProvider: Send + Sync {
    /// Name recorded on reports served by this provider
    fn name(&self) -> &str;

    /// @ai:intent Produce narrative text for the prompts
    async fn generate(&self, prompts: &PromptPair) -> Result<ProviderResponse, ProviderError>;
}

/// @ai:intent Successful provider output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    /// The provider stopped because it hit its output token limit
    pub truncated: bool,
}

impl ProviderResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_tokens: None,
            output_tokens: None,
            truncated: false,
        }
    }
}

/// @ai:intent Failure of a single provider attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// @ai:intent Stable error kind for logs and attempt records
    /// @ai:effects pure
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout => "timeout",
            ProviderError::Authentication(_) => "authentication",
            ProviderError::Network(_) => "network",
            ProviderError::HttpStatus { .. } => "http_status",
            ProviderError::MalformedResponse(_) => "malformed_response",
            ProviderError::Unavailable(_) => "unavailable",
        }
    }

    /// @ai:intent Classify a non-success HTTP status
    /// @ai:effects pure
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ProviderError::Authentication(format!("{status}: {body}"))
            }
            _ => ProviderError::HttpStatus {
                status: status.as_u16(),
                body,
            },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let err = ProviderError::from_status(reqwest::StatusCode::FORBIDDEN, "bad key".into());
        assert_eq!(err.kind(), "authentication");

        let err = ProviderError::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, "busy".into());
        assert_eq!(
            err,
            ProviderError::HttpStatus {
                status: 503,
                body: "busy".to_string()
            }
        );
        assert_eq!(err.to_string(), "HTTP 503: busy");
    }
}
