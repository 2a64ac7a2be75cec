//! OpenAI-compatible chat completions (`openai`, `deepseek`, `local`).

use super::{ProviderAdapter, ProviderKind, ResolvedOptions};
use serde_json::{Value, json};
use worldtale_domain::ChatTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `X-API-Key: <key>`
    ApiKeyHeader,
}

/// Adapter for any endpoint accepting the chat completions body shape.
#[derive(Debug, Clone)]
pub struct OpenAiCompatAdapter {
    kind: ProviderKind,
    auth: AuthStyle,
    /// Send the fixed sampling knobs (`top_p`, penalties).
    sampling_extras: bool,
}

impl OpenAiCompatAdapter {
    pub fn openai() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            auth: AuthStyle::Bearer,
            sampling_extras: true,
        }
    }

    pub fn deepseek() -> Self {
        Self {
            kind: ProviderKind::DeepSeek,
            auth: AuthStyle::ApiKeyHeader,
            sampling_extras: false,
        }
    }

    /// Self-hosted server. Usually unauthenticated; a configured key is
    /// passed through as a bearer token.
    pub fn local() -> Self {
        Self {
            kind: ProviderKind::Local,
            auth: AuthStyle::Bearer,
            sampling_extras: false,
        }
    }
}

impl ProviderAdapter for OpenAiCompatAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn auth_headers(&self, credential: &str) -> Vec<(&'static str, String)> {
        match self.auth {
            AuthStyle::Bearer => vec![("Authorization", format!("Bearer {}", credential))],
            AuthStyle::ApiKeyHeader => vec![("X-API-Key", credential.to_string())],
        }
    }

    fn build_request(&self, turns: &[ChatTurn], options: &ResolvedOptions) -> Value {
        let mut body = json!({
            "model": options.model,
            "messages": turns,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });
        if self.sampling_extras {
            body["top_p"] = json!(1);
            body["frequency_penalty"] = json!(0);
            body["presence_penalty"] = json!(0);
        }
        body
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
