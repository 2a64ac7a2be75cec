//! Play Turn use case.
//!
//! One round of play: the player speaks, the addressed character answers,
//! and both lines land in the session transcript.

use crate::ports::llm_gateway::GenerationOptions;
use crate::use_cases::conversation_store::{ConversationError, ConversationStore};
use crate::use_cases::orchestrator::{OrchestratorError, ResponseOrchestrator};
use crate::use_cases::transcript::last_n;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use worldtale_domain::{CharacterRef, EntityId, Message, NewMessage};

/// Errors that can occur during a play turn.
#[derive(Error, Debug)]
pub enum PlayTurnError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error(transparent)]
    Generation(#[from] OrchestratorError),
}

/// Input for the [`PlayTurnUseCase`].
#[derive(Debug, Clone)]
pub struct PlayTurnInput {
    pub session_id: EntityId,
    pub character_id: EntityId,
    /// What the player says.
    pub content: String,
    pub options: GenerationOptions,
}

impl PlayTurnInput {
    pub fn new(session_id: EntityId, character_id: EntityId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            character_id,
            content: content.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// The two messages a successful turn stores.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub player: Message,
    pub reply: Message,
}

/// Use case for playing one turn of a session.
///
/// 1. Resolve the character
/// 2. Store the player message
/// 3. Generate the reply from the window of messages before it
/// 4. Store the reply as a character message
///
/// If generation fails the player message stays stored.
pub struct PlayTurnUseCase {
    store: Arc<ConversationStore>,
    orchestrator: Arc<ResponseOrchestrator>,
}

impl PlayTurnUseCase {
    pub fn new(store: Arc<ConversationStore>, orchestrator: Arc<ResponseOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }

    pub async fn execute(&self, input: PlayTurnInput) -> Result<TurnOutcome, PlayTurnError> {
        let character = self.orchestrator.character(input.character_id)?;

        let prior = self.store.list_by_session(input.session_id);
        let player = self
            .store
            .append(input.session_id, NewMessage::player(input.content))?;
        let history = last_n(&prior, self.orchestrator.params().history_window);

        info!(
            session_id = input.session_id,
            character = %character.name,
            history = history.len(),
            "Playing turn"
        );

        let text = self
            .orchestrator
            .generate_character_response(character.id, &player.content, history, &input.options)
            .await?;

        let reply = self.store.append(
            input.session_id,
            NewMessage::character(
                CharacterRef {
                    id: character.id,
                    name: character.name,
                },
                text,
            ),
        )?;

        Ok(TurnOutcome { player, reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationParams;
    use crate::ports::llm_gateway::GatewayError;
    use crate::ports::repository::CharacterRepository;
    use crate::use_cases::test_support::{InMemoryRepository, ScriptedGateway};
    use worldtale_domain::{NewCharacter, NewSession, Role, Sender};

    struct Fixture {
        gateway: Arc<ScriptedGateway>,
        store: Arc<ConversationStore>,
        use_case: PlayTurnUseCase,
        character_id: EntityId,
        session_id: EntityId,
    }

    fn fixture(gateway: ScriptedGateway, params: GenerationParams) -> Fixture {
        let repository = Arc::new(InMemoryRepository::new());
        let gateway = Arc::new(gateway);
        let character_id = repository
            .create_character(NewCharacter::new("Rex", "a bounty hunter"))
            .unwrap()
            .id;
        let store = Arc::new(ConversationStore::new(repository.clone()));
        let session_id = store.create_session(NewSession::in_world(1)).unwrap().id;
        let orchestrator =
            Arc::new(ResponseOrchestrator::new(repository, gateway.clone()).with_params(params));
        Fixture {
            gateway,
            store: store.clone(),
            use_case: PlayTurnUseCase::new(store, orchestrator),
            character_id,
            session_id,
        }
    }

    #[tokio::test]
    async fn test_turn_stores_player_and_reply() {
        let f = fixture(
            ScriptedGateway::replying(&["Credits first."]),
            GenerationParams::default(),
        );

        let outcome = f
            .use_case
            .execute(PlayTurnInput::new(f.session_id, f.character_id, "Need a job done."))
            .await
            .unwrap();

        assert_eq!(outcome.player.sender, Sender::Player);
        assert_eq!(outcome.reply.sender, Sender::Character);
        assert_eq!(outcome.reply.content, "Credits first.");
        assert_eq!(outcome.reply.character.as_ref().unwrap().name, "Rex");

        let transcript = f.store.list_by_session(f.session_id);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].id, outcome.player.id);
        assert_eq!(transcript[1].id, outcome.reply.id);
    }

    #[tokio::test]
    async fn test_history_window_excludes_new_player_message() {
        let f = fixture(
            ScriptedGateway::replying(&["a", "b", "c"]),
            GenerationParams::default().with_history_window(2),
        );
        for line in ["one", "two", "three"] {
            f.use_case
                .execute(PlayTurnInput::new(f.session_id, f.character_id, line))
                .await
                .unwrap();
        }

        let (turns, _) = &f.gateway.calls()[2];
        // system + 2 history turns + the new player turn
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[1].content, "two");
        assert_eq!(turns[2].role, Role::Assistant);
        assert_eq!(turns[2].content, "b");
        assert_eq!(turns[3].content, "three");
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_player_message() {
        let f = fixture(
            ScriptedGateway::failing(GatewayError::ConnectionError("refused".into())),
            GenerationParams::default(),
        );

        let err = f
            .use_case
            .execute(PlayTurnInput::new(f.session_id, f.character_id, "Hello?"))
            .await
            .unwrap_err();

        assert!(matches!(err, PlayTurnError::Generation(_)));
        let transcript = f.store.list_by_session(f.session_id);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].content, "Hello?");
    }

    #[tokio::test]
    async fn test_unknown_character_stores_nothing() {
        let f = fixture(ScriptedGateway::replying(&["x"]), GenerationParams::default());

        let err = f
            .use_case
            .execute(PlayTurnInput::new(f.session_id, 404, "Anyone?"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlayTurnError::Generation(OrchestratorError::NotFound { .. })
        ));
        assert!(f.store.list_by_session(f.session_id).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let f = fixture(ScriptedGateway::replying(&["x"]), GenerationParams::default());

        let err = f
            .use_case
            .execute(PlayTurnInput::new(77, f.character_id, "Hello"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlayTurnError::Conversation(ConversationError::SessionNotFound(77))
        ));
        assert!(f.gateway.calls().is_empty());
    }
}
