//! Google generative language API (`gemini`).
//!
//! Roles are not sent: every turn becomes one text part of a single content
//! entry, in order. The model is fixed by the endpoint URL.

use super::{ProviderAdapter, ProviderKind, ResolvedOptions};
use serde_json::{Value, json};
use worldtale_domain::ChatTurn;

#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn auth_headers(&self, credential: &str) -> Vec<(&'static str, String)> {
        vec![("X-Goog-Api-Key", credential.to_string())]
    }

    fn build_request(&self, turns: &[ChatTurn], options: &ResolvedOptions) -> Value {
        let parts: Vec<Value> = turns.iter().map(|t| json!({ "text": t.content })).collect();
        json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens,
                "topP": 1,
            },
        })
    }

    fn extract_text(&self, response: &Value) -> Option<String> {
        response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
