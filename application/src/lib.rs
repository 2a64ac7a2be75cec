//! Application layer for worldtale
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credentials::{CredentialProvider, NoCredentials},
    llm_gateway::{GatewayError, GenerationOptions, LlmGateway},
    repository::{
        CharacterRepository, EntityRepository, MessageRepository, RepositoryError,
        SessionRepository, WorldbookRepository,
    },
    storage::{KeyValueStore, StoreError},
};
pub use use_cases::conversation_store::{ConversationError, ConversationStore};
pub use use_cases::orchestrator::{OrchestratorError, ResponseOrchestrator};
pub use use_cases::play_turn::{PlayTurnError, PlayTurnInput, PlayTurnUseCase, TurnOutcome};
