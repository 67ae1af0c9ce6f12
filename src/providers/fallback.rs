//! @ai:module:intent Deterministic provider used when no AI backend answers
//! @ai:module:layer domain
//! @ai:module:public_api FallbackProvider
//! @ai:module:stateless true

use crate::config::PathConfig;
use crate::error::{ReportError, Result};
use crate::providers::provider::ProviderResponse;
use crate::templates::PromptPair;

pub const FALLBACK_PROVIDER: &str = "fallback";

pub const FALLBACK_LABEL: &str = "[FALLBACK REPORT - generated without AI]";

const DEFAULT_TEMPLATE: &str = "[FALLBACK REPORT - generated without AI]

AI report generation is currently unavailable. This placeholder lists the
report brief assembled from the submitted project data; regenerate the report
once an AI provider is configured to receive the full narrative.

{{user_prompt}}
";

/// @ai:intent Renders a canned, clearly labeled report from the prompt pair
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    template: String,
}

impl FallbackProvider {
    /// @ai:intent Create a fallback provider from a template
    /// @ai:pre template is non-empty
    /// @ai:effects pure
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if template.trim().is_empty() {
            return Err(ReportError::Config("fallback template is empty".to_string()));
        }
        Ok(Self { template })
    }

    /// @ai:intent Load the configured fallback template, or the built-in one
    /// @ai:effects fs:read
    pub fn from_paths(paths: &PathConfig) -> Result<Self> {
        match &paths.fallback_template {
            Some(path) => {
                let template = std::fs::read_to_string(path).map_err(|e| {
                    ReportError::Config(format!(
                        "fallback template {} unreadable: {e}",
                        path.display()
                    ))
                })?;
                Self::new(template)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn name(&self) -> &str {
        FALLBACK_PROVIDER
    }

    /// @ai:intent Produce the placeholder report; never fails
    /// @ai:effects pure
    pub fn render(&self, prompts: &PromptPair) -> ProviderResponse {
        let text = self
            .template
            .replace("{{user_prompt}}", prompts.user.trim())
            .replace("{{system_prompt}}", prompts.system.trim());
        ProviderResponse::text(text)
    }
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
