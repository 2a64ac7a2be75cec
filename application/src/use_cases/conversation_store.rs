//! Conversation store.
//!
//! Owns the ordered message log of every play session. Appending a message
//! bumps the session's `updated_at`; deleting a session removes its record
//! and its messages together.

use crate::ports::repository::{
    EntityRepository, MessageRepository, RepositoryError, SessionRepository,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};
use worldtale_domain::util::preview;
use worldtale_domain::{DomainError, EntityId, Message, NewMessage, NewSession, Session, SessionPatch};

/// Errors that can occur while mutating a conversation.
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Session not found (id: {0})")]
    SessionNotFound(EntityId),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Session-scoped message log on top of the entity repository.
pub struct ConversationStore {
    repository: Arc<dyn EntityRepository>,
    /// Serializes multi-step mutations (append + touch, record + messages).
    guard: Mutex<()>,
}

impl ConversationStore {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self {
            repository,
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is unit; a poisoned lock carries no broken state.
        self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create_session(&self, session: NewSession) -> Result<Session, ConversationError> {
        let _guard = self.lock();
        let created = self.repository.create_session(session)?;
        info!(session_id = created.id, title = ?created.title, "Created session");
        Ok(created)
    }

    pub fn get_session(&self, session_id: EntityId) -> Option<Session> {
        self.repository.get_session(session_id)
    }

    /// Messages of a session in append order. Unknown sessions read as empty.
    pub fn list_by_session(&self, session_id: EntityId) -> Vec<Message> {
        self.repository.list_messages(session_id)
    }

    /// Append a message to an existing session and bump the session's
    /// `updated_at`.
    pub fn append(
        &self,
        session_id: EntityId,
        message: NewMessage,
    ) -> Result<Message, ConversationError> {
        message.validate()?;

        let _guard = self.lock();
        if self.repository.get_session(session_id).is_none() {
            return Err(ConversationError::SessionNotFound(session_id));
        }

        let stored = self.repository.append_message(session_id, message)?;
        self.repository
            .update_session(session_id, SessionPatch::touch())?;

        debug!(
            session_id,
            message_id = stored.id,
            sender = ?stored.sender,
            "Appended message: {}",
            preview(&stored.content, 60)
        );
        Ok(stored)
    }

    /// Delete a session and every message it owns.
    ///
    /// Returns false when the session does not exist; nothing is removed in
    /// that case. Messages go first, so a failure part way leaves the
    /// session in place and calling again finishes the job.
    pub fn delete_session(&self, session_id: EntityId) -> Result<bool, ConversationError> {
        let _guard = self.lock();
        if self.repository.get_session(session_id).is_none() {
            return Ok(false);
        }
        let removed = self.repository.delete_messages_for_session(session_id)?;
        self.repository.delete_session(session_id)?;
        info!(session_id, messages = removed, "Deleted session");
        Ok(true)
    }
}
