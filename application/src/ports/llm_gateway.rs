//! LLM Gateway port
//!
//! Defines the interface for sending a role-tagged conversation to whichever
//! language-model provider is configured, and getting plain text back.

use async_trait::async_trait;
use thiserror::Error;
use worldtale_domain::ChatTurn;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Upstream error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Whether the provider answered, but not with usable text.
    pub fn is_upstream(&self) -> bool {
        matches!(self, GatewayError::Upstream { .. })
    }
}

/// Per-call generation options. Unset fields fall back to the gateway's
/// configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Fill unset fields from `defaults`.
    pub fn merged_over(&self, defaults: &GenerationOptions) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            model: self.model.clone().or_else(|| defaults.model.clone()),
        }
    }
}

/// Gateway for LLM communication
///
/// One request, one response or one failure. Implementations never retry
/// and never stream.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send `turns` and return the model's reply text verbatim.
    async fn send(
        &self,
        turns: &[ChatTurn],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_carries_body() {
        let err = GatewayError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream error (status 429): rate limited");
        assert!(err.is_upstream());
        assert!(!GatewayError::Timeout.is_upstream());
    }

    #[test]
    fn test_options_builder() {
        let options = GenerationOptions::new()
            .with_temperature(0.8)
            .with_max_tokens(800);
        assert_eq!(options.temperature, Some(0.8));
        assert_eq!(options.max_tokens, Some(800));
        assert!(options.model.is_none());
    }

    #[test]
    fn test_merged_over_prefers_explicit_values() {
        let defaults = GenerationOptions::new()
            .with_temperature(0.7)
            .with_model("gpt-3.5-turbo");
        let merged = GenerationOptions::new()
            .with_temperature(0.0)
            .with_max_tokens(64)
            .merged_over(&defaults);
        assert_eq!(merged.temperature, Some(0.0));
        assert_eq!(merged.max_tokens, Some(64));
        assert_eq!(merged.model.as_deref(), Some("gpt-3.5-turbo"));
    }
}
