//! Provider configuration from TOML (`[provider]` section)

use crate::providers::{DEFAULT_ANTHROPIC_VERSION, ProviderKind, ProviderSettings, ResolvedOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::generation::FileGenerationConfig;

/// Environment variable read for the API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "WORLDTALE_API_KEY";

/// Raw provider configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider id: "openai", "deepseek", "claude", "gemini" or "local".
    pub id: String,
    /// Model name; defaults to `gpt-3.5-turbo`.
    pub model: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Direct API key (prefer `api_key_env`).
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Endpoint overrides keyed by provider id.
    pub endpoints: HashMap<String, String>,
    /// `anthropic-version` header for the claude provider.
    pub anthropic_version: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            id: ProviderKind::OpenAi.id().to_string(),
            model: None,
            timeout_secs: 60,
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoints: HashMap::new(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl FileProviderConfig {
    pub fn kind(&self) -> Option<ProviderKind> {
        ProviderKind::from_id(&self.id)
    }

    /// Gateway settings, with sampling defaults taken from `[generation]`.
    pub fn to_settings(&self, generation: &FileGenerationConfig) -> ProviderSettings {
        let mut defaults = ResolvedOptions {
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            ..ResolvedOptions::default()
        };
        if let Some(model) = &self.model {
            defaults.model = model.clone();
        }
        ProviderSettings {
            provider_id: self.id.clone(),
            defaults,
            endpoints: self.endpoints.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            anthropic_version: self.anthropic_version.clone(),
        }
    }
}
