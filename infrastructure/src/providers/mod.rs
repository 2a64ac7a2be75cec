//! Language-model provider adapters.
//!
//! Each vendor speaks a slightly different dialect of "send a conversation,
//! get text back". A [`ProviderAdapter`] captures one dialect: how to
//! authenticate, how to shape the request body and where the reply text
//! lives in the response. [`ProviderRegistry`] maps provider ids to adapters
//! and [`HttpLlmGateway`] does the actual POST.
//!
//! | Id         | Adapter                      | Auth header        |
//! |------------|------------------------------|--------------------|
//! | `openai`   | [`OpenAiCompatAdapter`]      | `Authorization`    |
//! | `deepseek` | [`OpenAiCompatAdapter`]      | `X-API-Key`        |
//! | `claude`   | [`AnthropicAdapter`]         | `x-api-key`        |
//! | `gemini`   | [`GeminiAdapter`]            | `X-Goog-Api-Key`   |
//! | `local`    | [`OpenAiCompatAdapter`]      | bearer, if any key |

mod anthropic;
mod gemini;
mod http_gateway;
mod openai_compat;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use http_gateway::{HttpLlmGateway, ProviderSettings};
pub use openai_compat::OpenAiCompatAdapter;

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use worldtale_application::ports::llm_gateway::GatewayError;
use worldtale_domain::ChatTurn;

/// Anthropic API version sent when none is configured.
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    DeepSeek,
    Claude,
    Gemini,
    Local,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::DeepSeek,
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::Local,
    ];

    /// Identifier used in configuration.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Local => "local",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
            ProviderKind::Claude => "https://api.anthropic.com/v1/messages",
            ProviderKind::Gemini => {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
            }
            ProviderKind::Local => "http://localhost:8000/v1/chat/completions",
        }
    }

    /// Vendor environment variable conventionally holding the API key.
    pub fn vendor_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::DeepSeek => Some("DEEPSEEK_API_KEY"),
            ProviderKind::Claude => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::Local => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Generation options with every default filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

/// One vendor's request/response dialect.
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Headers carrying `credential`.
    fn auth_headers(&self, credential: &str) -> Vec<(&'static str, String)>;

    /// Headers sent on every request regardless of credentials.
    fn extra_headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn build_request(&self, turns: &[ChatTurn], options: &ResolvedOptions) -> Value;

    /// Pull the reply text out of a decoded response body.
    fn extract_text(&self, response: &Value) -> Option<String>;
}

/// Lookup table from provider id to adapter.
#[derive(Clone)]
pub struct ProviderRegistry {
    adapters: HashMap<&'static str, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Every built-in provider.
    pub fn builtin(anthropic_version: impl Into<String>) -> Self {
        Self::empty()
            .with(Arc::new(OpenAiCompatAdapter::openai()))
            .with(Arc::new(OpenAiCompatAdapter::deepseek()))
            .with(Arc::new(AnthropicAdapter::new(anthropic_version)))
            .with(Arc::new(GeminiAdapter))
            .with(Arc::new(OpenAiCompatAdapter::local()))
    }

    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.kind().id(), adapter);
        self
    }

    /// The adapter for `provider_id`, or `UnsupportedProvider`.
    pub fn resolve(&self, provider_id: &str) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.adapters
            .get(provider_id)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| GatewayError::UnsupportedProvider(provider_id.to_string()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin(DEFAULT_ANTHROPIC_VERSION)
    }
}
