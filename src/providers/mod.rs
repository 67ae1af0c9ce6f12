//! @ai:module:intent Generative AI providers and the fallback chain
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportProvider, ProviderChain, GeminiProvider, LocalProvider, FallbackProvider, MockProvider

pub mod chain;
pub mod fallback;
pub mod gemini;
pub mod local;
pub mod mock;
pub mod provider;
pub mod rate_limiter;

pub use chain::{AttemptRecord, GenerationOutcome, ProviderChain};
pub use fallback::{FallbackProvider, FALLBACK_LABEL, FALLBACK_PROVIDER};
pub use gemini::{GeminiProvider, GEMINI_PROVIDER};
pub use local::{LocalProvider, LOCAL_PROVIDER};
pub use mock::MockProvider;
pub use provider::{ProviderError, ProviderResponse, ReportProvider};
pub use rate_limiter::RateLimiter;
