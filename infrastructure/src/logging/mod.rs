//! Structured conversation logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](worldtale_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
