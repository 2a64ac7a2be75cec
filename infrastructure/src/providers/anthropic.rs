//! Anthropic messages API (`claude`).

use super::{ProviderAdapter, ProviderKind, ResolvedOptions};
use serde_json::{Value, json};
use worldtale_domain::ChatTurn;

#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    api_version: String,
}

impl AnthropicAdapter {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
        }
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn auth_headers(&self, credential: &str) -> Vec<(&'static str, String)> {
        vec![("x-api-key", credential.to_string())]
    }

    fn extra_headers(&self) -> Vec<(&'static str, String)> {
        vec![("anthropic-version", self.api_version.clone())]
    }

    fn build_request(&self, turns: &[ChatTurn], options: &ResolvedOptions) -> Value {
        // The API accepts user, assistant and system roles, which is all
        // `Role` can express, so turns pass through unfiltered.
        json!({
            "model": options.model,
            "messages": turns,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
        })
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        response
            .pointer("/content/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::DEFAULT_ANTHROPIC_VERSION;

    #[test]
    fn test_request_shape() {
        let adapter = AnthropicAdapter::new(DEFAULT_ANTHROPIC_VERSION);
        let options = ResolvedOptions {
            model: "claude-3-haiku".to_string(),
            temperature: 0.8,
            max_tokens: 800,
        };
        let body = adapter.build_request(
            &[
                ChatTurn::system("persona"),
                ChatTurn::user("Hi"),
                ChatTurn::assistant("Hello"),
            ],
            &options,
        );
        assert_eq!(body["model"], "claude-3-haiku");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][2]["role"], "assistant");
    }

    #[test]
    fn test_headers() {
        let adapter = AnthropicAdapter::new("2023-06-01");
        assert_eq!(
            adapter.auth_headers("key"),
            vec![("x-api-key", "key".to_string())]
        );
        assert_eq!(
            adapter.extra_headers(),
            vec![("anthropic-version", "2023-06-01".to_string())]
        );
    }

    #[test]
    fn test_extract_text() {
        let adapter = AnthropicAdapter::new(DEFAULT_ANTHROPIC_VERSION);
        let response = json!({"content": [{"type": "text", "text": "Ahoy."}]});
        assert_eq!(adapter.extract_text(&response).as_deref(), Some("Ahoy."));
        assert_eq!(adapter.extract_text(&json!({"content": []})), None);
    }
}
