//! @ai:module:intent Configuration structs for the report service
//! @ai:module:layer infrastructure
//! @ai:module:public_api ServiceConfig, ServerConfig, RemoteConfig, LocalConfig, GenerationConfig, PathConfig, ProviderAvailability
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// @ai:intent Main configuration for the report service
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// @ai:intent Hosted generative AI service configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_model")]
    pub model: String,
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    /// Never written to disk; populated from `GEMINI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// @ai:intent Local generative AI service configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_enabled")]
    pub enabled: bool,
    #[serde(default = "default_local_host")]
    pub host: String,
    #[serde(default = "default_local_port")]
    pub port: u16,
    #[serde(default = "default_local_model")]
    pub model: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

/// @ai:intent Per-request generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_format")]
    pub default_format: String,
}

/// @ai:intent Filesystem locations used by the service
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_template_root")]
    pub template_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_template: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            model: default_remote_model(),
            base_url: default_remote_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            requests_per_minute: default_rate_limit(),
            api_key: None,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: default_local_enabled(),
            host: default_local_host(),
            port: default_local_port(),
            model: default_local_model(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            default_language: default_language(),
            default_format: default_format(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            template_root: default_template_root(),
            fallback_template: None,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_remote_model() -> String {
    "gemini-2.0-flash-001".to_string()
}

fn default_remote_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.4
}

fn default_rate_limit() -> u32 {
    60
}

fn default_local_enabled() -> bool {
    true
}

fn default_local_host() -> String {
    "127.0.0.1".to_string()
}

fn default_local_port() -> u16 {
    11434
}

fn default_local_model() -> String {
    "llama3.2".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

fn default_format() -> String {
    "business_plan".to_string()
}

fn default_template_root() -> PathBuf {
    PathBuf::from("templates")
}

impl ServiceConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Overlay environment-provided settings onto the loaded configuration
    /// @ai:effects env
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// @ai:intent Overlay settings from an arbitrary key lookup
    /// @ai:effects pure
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("REPORTS_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(root) = lookup("REPORTS_TEMPLATE_ROOT") {
            self.paths.template_root = PathBuf::from(root);
        }
        if let Some(host) = lookup("LOCAL_AI_HOST") {
            self.local.host = host;
        }
        if let Some(port) = lookup("LOCAL_AI_PORT") {
            match port.parse() {
                Ok(port) => self.local.port = port,
                Err(_) => tracing::warn!("Ignoring invalid LOCAL_AI_PORT value '{}'", port),
            }
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.remote.model = model;
        }
        self.remote.api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
    }

    /// @ai:intent Bounded time allowed for a single provider attempt
    /// @ai:effects pure
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.timeout_secs.max(1))
    }
}

impl LocalConfig {
    /// @ai:intent Base URL of the local AI service
    /// @ai:effects pure
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// @ai:intent Provider availability evaluated once at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProviderAvailability {
    pub remote_credential: bool,
    pub local_reachable: bool,
}

impl ProviderAvailability {
    /// @ai:intent Check credential presence and local service reachability
    /// @ai:effects network
    pub async fn probe(config: &ServiceConfig) -> Self {
        let remote_credential = config.remote.api_key.is_some();
        if !remote_credential {
            tracing::warn!("GEMINI_API_KEY not set - hosted AI provider disabled");
        }

        let local_reachable = if config.local.enabled {
            Self::probe_local(&config.local).await
        } else {
            false
        };

        Self {
            remote_credential,
            local_reachable,
        }
    }

    /// @ai:intent Issue a single bounded request to the local service's model listing
    /// @ai:effects network
    async fn probe_local(local: &LocalConfig) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_millis(local.probe_timeout_ms))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Could not build probe client: {}", e);
                return false;
            }
        };

        let url = format!("{}/api/tags", local.base_url());
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Local AI service reachable at {}", local.base_url());
                true
            }
            Ok(response) => {
                tracing::warn!(
                    "Local AI service at {} answered {} - local provider disabled",
                    local.base_url(),
                    response.status()
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    "Local AI service at {} unreachable - local provider disabled: {}",
                    local.base_url(),
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.generation.default_language, "en");
        assert_eq!(config.generation.default_format, "business_plan");
        assert_eq!(config.local.base_url(), "http://127.0.0.1:11434");
        assert!(config.remote.api_key.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
[generation]
timeout_secs = 5

[local]
port = 9999
"#,
        )
        .unwrap();
        assert_eq!(config.generation.timeout_secs, 5);
        assert_eq!(config.generation.default_language, "en");
        assert_eq!(config.local.port, 9999);
        assert_eq!(config.local.host, "127.0.0.1");
    }

    #[test]
    fn test_save_never_writes_credential() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports.toml");
        let mut config = ServiceConfig::default();
        config.remote.api_key = Some("secret-key".to_string());

        config.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("secret-key"));

        let loaded = ServiceConfig::load(&path).unwrap();
        assert!(loaded.remote.api_key.is_none());
        assert_eq!(loaded.remote.model, config.remote.model);
    }

    #[test]
    fn test_overrides() {
        let mut config = ServiceConfig::default();
        config.apply_overrides(lookup_from(&[
            ("LOCAL_AI_HOST", "ollama"),
            ("LOCAL_AI_PORT", "8080"),
            ("GEMINI_API_KEY", "abc"),
            ("REPORTS_TEMPLATE_ROOT", "/srv/templates"),
        ]));
        assert_eq!(config.local.base_url(), "http://ollama:8080");
        assert_eq!(config.remote.api_key.as_deref(), Some("abc"));
        assert_eq!(config.paths.template_root, PathBuf::from("/srv/templates"));
    }

    #[test]
    fn test_blank_credential_is_ignored() {
        let mut config = ServiceConfig::default();
        config.apply_overrides(lookup_from(&[("GEMINI_API_KEY", "  "), ("LOCAL_AI_PORT", "nope")]));
        assert!(config.remote.api_key.is_none());
        assert_eq!(config.local.port, 11434);
    }

    #[tokio::test]
    async fn test_probe_without_credential_or_local() {
        let mut config = ServiceConfig::default();
        config.local.enabled = false;
        let availability = ProviderAvailability::probe(&config).await;
        assert_eq!(availability, ProviderAvailability::default());
    }
}
