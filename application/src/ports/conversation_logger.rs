//! Port for structured generation logging.
//!
//! Records every model exchange (the turns sent, the text received, or the
//! failure) as a machine-readable event. This is separate from `tracing`:
//! tracing carries human-readable diagnostics, this port carries the
//! transcript of what the model actually saw.

use serde_json::Value;

/// A structured generation event.
pub struct ConversationEvent {
    /// Event type identifier ("llm_request", "llm_response", "llm_error").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging generation events.
///
/// `log` is synchronous and infallible; a failing logger must not break
/// generation.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
