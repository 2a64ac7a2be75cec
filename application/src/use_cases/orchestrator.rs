//! Response orchestrator.
//!
//! Turns repository state into model requests: in-character replies, story
//! endings and novelizations. Every request goes through a single dispatch
//! point that records the exchange on the [`ConversationLogger`].

use crate::config::GenerationParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, GenerationOptions, LlmGateway};
use crate::ports::repository::{
    CharacterRepository, EntityRepository, MessageRepository, RepositoryError, SessionRepository,
    WorldbookRepository,
};
use crate::use_cases::transcript::{first_n, last_n, reply_turns};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use worldtale_domain::prompt::compile;
use worldtale_domain::util::preview;
use worldtale_domain::{
    Character, ChatTurn, EntityId, Message, NarrativeTemplate, Session, SessionPatch, Worldbook,
};

/// Errors that can occur while generating text.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("{entity} not found (id: {id})")]
    NotFound { entity: &'static str, id: EntityId },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl OrchestratorError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            OrchestratorError::NotFound { .. } => "not_found",
            OrchestratorError::Gateway(GatewayError::UnsupportedProvider(_)) => {
                "unsupported_provider"
            }
            OrchestratorError::Gateway(GatewayError::Upstream { .. }) => "upstream",
            OrchestratorError::Gateway(GatewayError::ConnectionError(_)) => "connection",
            OrchestratorError::Gateway(GatewayError::Timeout) => "timeout",
            OrchestratorError::Repository(e) if e.is_serialization() => "serialization",
            OrchestratorError::Repository(_) => "storage",
        }
    }

    fn not_found(entity: &'static str, id: EntityId) -> Self {
        OrchestratorError::NotFound { entity, id }
    }
}

/// Generates in-character replies and end-of-session narratives.
pub struct ResponseOrchestrator {
    repository: Arc<dyn EntityRepository>,
    gateway: Arc<dyn LlmGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: GenerationParams,
}

impl ResponseOrchestrator {
    pub fn new(repository: Arc<dyn EntityRepository>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            repository,
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
            params: GenerationParams::default(),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Look up a character, failing with `NotFound`.
    pub fn character(&self, character_id: EntityId) -> Result<Character, OrchestratorError> {
        self.repository
            .get_character(character_id)
            .ok_or_else(|| OrchestratorError::not_found("character", character_id))
    }

    fn session(&self, session_id: EntityId) -> Result<Session, OrchestratorError> {
        self.repository
            .get_session(session_id)
            .ok_or_else(|| OrchestratorError::not_found("session", session_id))
    }

    /// A dangling world reference is tolerated: the prompt simply has no
    /// world block.
    fn world_of(&self, world_id: Option<EntityId>) -> Option<Worldbook> {
        let world_id = world_id?;
        let worldbook = self.repository.get_worldbook(world_id);
        if worldbook.is_none() {
            warn!(world_id, "Referenced worldbook not found, continuing without it");
        }
        worldbook
    }

    /// Generate a reply from `character_id` to `player_message`.
    ///
    /// `history` is the transcript the character should see, oldest first,
    /// without the new player message. The model's text is returned verbatim.
    pub async fn generate_character_response(
        &self,
        character_id: EntityId,
        player_message: &str,
        history: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, OrchestratorError> {
        let character = self.character(character_id)?;
        let worldbook = self.world_of(character.world_id);

        info!(
            "Generating reply from {} (id: {}) to: {}",
            character.name,
            character.id,
            preview(player_message, 80)
        );

        let system_prompt = compile(&character, worldbook.as_ref());
        let turns = reply_turns(system_prompt, history, player_message);
        let options = options.merged_over(&self.params.reply);

        self.dispatch("character_response", &turns, &options).await
    }

    /// Write an ending for the session from its last messages, store it and
    /// mark the session completed. Calling again overwrites the ending.
    pub async fn generate_story_ending(
        &self,
        session_id: EntityId,
    ) -> Result<String, OrchestratorError> {
        let session = self.session(session_id)?;
        let worldbook = self.world_of(session.world_id);
        let messages = self.repository.list_messages(session_id);
        let excerpt = last_n(&messages, self.params.ending_window);

        info!(
            session_id,
            messages = excerpt.len(),
            "Generating story ending"
        );

        let turns = vec![
            ChatTurn::system(NarrativeTemplate::ending_system()),
            ChatTurn::user(NarrativeTemplate::ending_prompt(worldbook.as_ref(), excerpt)),
        ];
        let options = self.params.ending.merged_over(&self.params.reply);
        let ending = self.dispatch("story_ending", &turns, &options).await?;

        self.repository
            .update_session(session_id, SessionPatch::ending(ending.clone()))?
            .ok_or_else(|| OrchestratorError::not_found("session", session_id))?;

        Ok(ending)
    }

    /// Rewrite the opening of the session as prose and store it. The session
    /// status is left as is.
    pub async fn generate_novelization(
        &self,
        session_id: EntityId,
    ) -> Result<String, OrchestratorError> {
        let session = self.session(session_id)?;
        let worldbook = self.world_of(session.world_id);
        let messages = self.repository.list_messages(session_id);
        let excerpt = first_n(&messages, self.params.novelization_window);

        info!(
            session_id,
            messages = excerpt.len(),
            "Generating novelization"
        );

        let turns = vec![
            ChatTurn::system(NarrativeTemplate::novelization_system()),
            ChatTurn::user(NarrativeTemplate::novelization_prompt(
                worldbook.as_ref(),
                excerpt,
            )),
        ];
        let options = self.params.novelization.merged_over(&self.params.reply);
        let novel = self.dispatch("novelization", &turns, &options).await?;

        self.repository
            .update_session(session_id, SessionPatch::novelization(novel.clone()))?
            .ok_or_else(|| OrchestratorError::not_found("session", session_id))?;

        Ok(novel)
    }

    async fn dispatch(
        &self,
        purpose: &'static str,
        turns: &[ChatTurn],
        options: &GenerationOptions,
    ) -> Result<String, OrchestratorError> {
        debug!(
            purpose,
            turns = turns.len(),
            temperature = ?options.temperature,
            max_tokens = ?options.max_tokens,
            "Dispatching generation request"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "llm_request",
            json!({
                "purpose": purpose,
                "model": options.model,
                "temperature": options.temperature,
                "max_tokens": options.max_tokens,
                "turns": turns,
            }),
        ));

        match self.gateway.send(turns, options).await {
            Ok(text) => {
                debug!(purpose, bytes = text.len(), "Generation succeeded");
                self.conversation_logger.log(ConversationEvent::new(
                    "llm_response",
                    json!({
                        "purpose": purpose,
                        "bytes": text.len(),
                        "text": text,
                    }),
                ));
                Ok(text)
            }
            Err(e) => {
                warn!(purpose, "Generation failed: {}", e);
                self.conversation_logger.log(ConversationEvent::new(
                    "llm_error",
                    json!({
                        "purpose": purpose,
                        "error": e.to_string(),
                    }),
                ));
                Err(e.into())
            }
        }
    }
}
