//! Entity repository ports
//!
//! One trait per collection. Reads never fail: a collection that cannot be
//! decoded is reported through logs and reads as empty. Writes surface
//! storage failures.

use thiserror::Error;
use worldtale_domain::{
    Character, CharacterPatch, DomainError, EntityId, Message, NewCharacter, NewMemory,
    NewMessage, NewSession, NewWorldbook, Session, SessionPatch, Worldbook, WorldbookPatch,
};

use super::storage::StoreError;

/// Errors that can occur during repository writes
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Invalid(#[from] DomainError),
}

impl RepositoryError {
    pub fn is_serialization(&self) -> bool {
        matches!(self, RepositoryError::Serialization(_))
    }
}

/// Character collection
pub trait CharacterRepository: Send + Sync {
    fn list_characters(&self) -> Vec<Character>;

    fn get_character(&self, id: EntityId) -> Option<Character> {
        self.list_characters().into_iter().find(|c| c.id == id)
    }

    fn characters_in_world(&self, world_id: EntityId) -> Vec<Character> {
        self.list_characters()
            .into_iter()
            .filter(|c| c.world_id == Some(world_id))
            .collect()
    }

    fn create_character(&self, character: NewCharacter) -> Result<Character, RepositoryError>;

    /// Returns `None` if no character has this id.
    fn update_character(
        &self,
        id: EntityId,
        patch: CharacterPatch,
    ) -> Result<Option<Character>, RepositoryError>;

    /// Returns false if no character has this id.
    fn delete_character(&self, id: EntityId) -> Result<bool, RepositoryError>;

    /// Append a memory. Returns `None` if the character does not exist.
    fn add_memory(
        &self,
        character_id: EntityId,
        memory: NewMemory,
    ) -> Result<Option<Character>, RepositoryError>;

    /// Remove a memory. Returns `None` if the character does not exist; a
    /// missing memory leaves the character unchanged.
    fn remove_memory(
        &self,
        character_id: EntityId,
        memory_id: EntityId,
    ) -> Result<Option<Character>, RepositoryError>;
}

/// Worldbook collection
pub trait WorldbookRepository: Send + Sync {
    fn list_worldbooks(&self) -> Vec<Worldbook>;

    fn get_worldbook(&self, id: EntityId) -> Option<Worldbook> {
        self.list_worldbooks().into_iter().find(|w| w.id == id)
    }

    fn create_worldbook(&self, worldbook: NewWorldbook) -> Result<Worldbook, RepositoryError>;

    fn update_worldbook(
        &self,
        id: EntityId,
        patch: WorldbookPatch,
    ) -> Result<Option<Worldbook>, RepositoryError>;

    fn delete_worldbook(&self, id: EntityId) -> Result<bool, RepositoryError>;
}

/// Session collection (records only; messages are a separate collection)
pub trait SessionRepository: Send + Sync {
    fn list_sessions(&self) -> Vec<Session>;

    fn get_session(&self, id: EntityId) -> Option<Session> {
        self.list_sessions().into_iter().find(|s| s.id == id)
    }

    fn create_session(&self, session: NewSession) -> Result<Session, RepositoryError>;

    /// Apply a patch and bump `updated_at`. Returns `None` if absent.
    fn update_session(
        &self,
        id: EntityId,
        patch: SessionPatch,
    ) -> Result<Option<Session>, RepositoryError>;

    /// Remove the session record only. Returns false if absent.
    fn delete_session(&self, id: EntityId) -> Result<bool, RepositoryError>;
}

/// Message collection
pub trait MessageRepository: Send + Sync {
    fn list_all_messages(&self) -> Vec<Message>;

    /// Messages of one session, in append order.
    fn list_messages(&self, session_id: EntityId) -> Vec<Message> {
        self.list_all_messages()
            .into_iter()
            .filter(|m| m.session_id == session_id)
            .collect()
    }

    /// Append a message, assigning an id unique across every session.
    ///
    /// Ids come from a monotonic high-water mark, not from the live
    /// collection: after the highest message is deleted the next id is
    /// still larger than it.
    fn append_message(
        &self,
        session_id: EntityId,
        message: NewMessage,
    ) -> Result<Message, RepositoryError>;

    /// Remove every message of a session. Returns how many were removed.
    fn delete_messages_for_session(&self, session_id: EntityId) -> Result<usize, RepositoryError>;
}

/// All four collections behind one handle.
pub trait EntityRepository:
    CharacterRepository + WorldbookRepository + SessionRepository + MessageRepository
{
}

impl<T> EntityRepository for T where
    T: CharacterRepository + WorldbookRepository + SessionRepository + MessageRepository
{
}
