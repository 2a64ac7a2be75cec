//! Infrastructure layer for worldtale
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: key-value storage and the JSON repository,
//! HTTP provider dispatch, credentials, configuration file loading and
//! the JSONL conversation log.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig};
pub use credentials::ConfigCredentialProvider;
pub use logging::JsonlConversationLogger;
pub use providers::{HttpLlmGateway, ProviderKind, ProviderRegistry, ProviderSettings};
pub use storage::{
    CollectionKind, FileStore, InMemoryStore, JsonRepository, SeedReport, seed_defaults,
};
