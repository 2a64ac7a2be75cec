//! Persisted conversation messages

use crate::core::error::DomainError;
use crate::core::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Player,
    Character,
    System,
}

/// Reference to the speaking character, stored on character messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub id: EntityId,
    pub name: String,
}

/// A message in a session (Entity)
///
/// `id` is unique across the whole message collection, not per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub session_id: EntityId,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterRef>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Display name for transcripts: the character's name, or a fallback.
    pub fn speaker_name(&self) -> &str {
        match (&self.sender, &self.character) {
            (Sender::Player, _) => "Player",
            (Sender::Character, Some(c)) => &c.name,
            (Sender::Character, None) => "Character",
            (Sender::System, _) => "System",
        }
    }
}

/// Message contents before the store assigns id, session and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender: Sender,
    pub character: Option<CharacterRef>,
    pub content: String,
}

impl NewMessage {
    pub fn player(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Player,
            character: None,
            content: content.into(),
        }
    }

    pub fn character(character: CharacterRef, content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Character,
            character: Some(character),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::System,
            character: None,
            content: content.into(),
        }
    }

    /// A character reference must be present iff the sender is a character.
    pub fn validate(&self) -> Result<(), DomainError> {
        match (self.sender, self.character.is_some()) {
            (Sender::Character, false) => Err(DomainError::InvalidMessage(
                "character message without a character reference".to_string(),
            )),
            (Sender::Player | Sender::System, true) => Err(DomainError::InvalidMessage(
                "character reference on a non-character message".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn into_message(
        self,
        id: EntityId,
        session_id: EntityId,
        timestamp: DateTime<Utc>,
    ) -> Message {
        Message {
            id,
            session_id,
            sender: self.sender,
            character: self.character,
            content: self.content,
            timestamp,
        }
    }
}
