//! In-memory doubles for the repository and gateway ports.

use crate::ports::llm_gateway::{GatewayError, GenerationOptions, LlmGateway};
use crate::ports::repository::{
    CharacterRepository, MessageRepository, RepositoryError, SessionRepository,
    WorldbookRepository,
};
use crate::ports::storage::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use worldtale_domain::{
    Character, CharacterPatch, ChatTurn, EntityId, Message, NewCharacter, NewMemory, NewMessage,
    NewSession, NewWorldbook, Session, SessionPatch, Worldbook, WorldbookPatch, next_id,
};

#[derive(Default)]
struct State {
    characters: Vec<Character>,
    worldbooks: Vec<Worldbook>,
    sessions: Vec<Session>,
    messages: Vec<Message>,
    message_high_water: EntityId,
}

/// Repository double holding every collection in memory.
#[derive(Default)]
pub(crate) struct InMemoryRepository {
    state: Mutex<State>,
    fail_message_writes: AtomicBool,
}

impl InMemoryRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every message write fail with a backend error until reset.
    pub(crate) fn fail_message_writes(&self, fail: bool) {
        self.fail_message_writes.store(fail, Ordering::SeqCst);
    }

    fn check_message_write(&self) -> Result<(), RepositoryError> {
        if self.fail_message_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()).into());
        }
        Ok(())
    }
}

impl CharacterRepository for InMemoryRepository {
    fn list_characters(&self) -> Vec<Character> {
        self.state.lock().unwrap().characters.clone()
    }

    fn create_character(&self, character: NewCharacter) -> Result<Character, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.characters.iter().map(|c| c.id), 0);
        let created = character.into_character(id, Utc::now());
        state.characters.push(created.clone());
        Ok(created)
    }

    fn update_character(
        &self,
        id: EntityId,
        patch: CharacterPatch,
    ) -> Result<Option<Character>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.characters.iter_mut().find(|c| c.id == id).map(|c| {
            patch.apply(c, Utc::now());
            c.clone()
        }))
    }

    fn delete_character(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.characters.len();
        state.characters.retain(|c| c.id != id);
        Ok(state.characters.len() != before)
    }

    fn add_memory(
        &self,
        character_id: EntityId,
        memory: NewMemory,
    ) -> Result<Option<Character>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .characters
            .iter_mut()
            .find(|c| c.id == character_id)
            .map(|c| {
                c.push_memory(memory, Utc::now());
                c.clone()
            }))
    }

    fn remove_memory(
        &self,
        character_id: EntityId,
        memory_id: EntityId,
    ) -> Result<Option<Character>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .characters
            .iter_mut()
            .find(|c| c.id == character_id)
            .map(|c| {
                c.remove_memory(memory_id, Utc::now());
                c.clone()
            }))
    }
}

impl WorldbookRepository for InMemoryRepository {
    fn list_worldbooks(&self) -> Vec<Worldbook> {
        self.state.lock().unwrap().worldbooks.clone()
    }

    fn create_worldbook(&self, worldbook: NewWorldbook) -> Result<Worldbook, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.worldbooks.iter().map(|w| w.id), 0);
        let created = worldbook.into_worldbook(id, Utc::now());
        state.worldbooks.push(created.clone());
        Ok(created)
    }

    fn update_worldbook(
        &self,
        id: EntityId,
        patch: WorldbookPatch,
    ) -> Result<Option<Worldbook>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.worldbooks.iter_mut().find(|w| w.id == id).map(|w| {
            patch.apply(w, Utc::now());
            w.clone()
        }))
    }

    fn delete_worldbook(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.worldbooks.len();
        state.worldbooks.retain(|w| w.id != id);
        Ok(state.worldbooks.len() != before)
    }
}

impl SessionRepository for InMemoryRepository {
    fn list_sessions(&self) -> Vec<Session> {
        self.state.lock().unwrap().sessions.clone()
    }

    fn create_session(&self, session: NewSession) -> Result<Session, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.sessions.iter().map(|s| s.id), 0);
        let created = session.into_session(id, Utc::now());
        state.sessions.push(created.clone());
        Ok(created)
    }

    fn update_session(
        &self,
        id: EntityId,
        patch: SessionPatch,
    ) -> Result<Option<Session>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.sessions.iter_mut().find(|s| s.id == id).map(|s| {
            s.apply(patch, Utc::now());
            s.clone()
        }))
    }

    fn delete_session(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != id);
        Ok(state.sessions.len() != before)
    }
}

impl MessageRepository for InMemoryRepository {
    fn list_all_messages(&self) -> Vec<Message> {
        self.state.lock().unwrap().messages.clone()
    }

    fn append_message(
        &self,
        session_id: EntityId,
        message: NewMessage,
    ) -> Result<Message, RepositoryError> {
        message.validate()?;
        self.check_message_write()?;
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.messages.iter().map(|m| m.id), state.message_high_water);
        state.message_high_water = id;
        let created = message.into_message(id, session_id, Utc::now());
        state.messages.push(created.clone());
        Ok(created)
    }

    fn delete_messages_for_session(&self, session_id: EntityId) -> Result<usize, RepositoryError> {
        self.check_message_write()?;
        let mut state = self.state.lock().unwrap();
        let before = state.messages.len();
        state.messages.retain(|m| m.session_id != session_id);
        Ok(before - state.messages.len())
    }
}

/// Gateway double that replays scripted outcomes and records every call.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<(Vec<ChatTurn>, GenerationOptions)>>,
}

impl ScriptedGateway {
    pub(crate) fn replying(texts: &[&str]) -> Self {
        let gateway = Self::default();
        for text in texts {
            gateway.push(Ok(text.to_string()));
        }
        gateway
    }

    pub(crate) fn failing(error: GatewayError) -> Self {
        let gateway = Self::default();
        gateway.push(Err(error));
        gateway
    }

    pub(crate) fn push(&self, outcome: Result<String, GatewayError>) {
        self.replies.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn calls(&self) -> Vec<(Vec<ChatTurn>, GenerationOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn send(
        &self,
        turns: &[ChatTurn],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((turns.to_vec(), options.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::ConnectionError("no scripted reply".into())))
    }
}
