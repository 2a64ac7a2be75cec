//! Session domain entities

use crate::core::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session. Only moves forward: `Active` → `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One play-through (Entity)
///
/// Holds the terminal narrative artifacts; messages live in their own
/// collection and reference the session by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: EntityId,
    #[serde(default)]
    pub world_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub ending: Option<String>,
    #[serde(default)]
    pub novelization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Apply a patch and bump `updated_at`. An empty patch only touches.
    pub fn apply(&mut self, patch: SessionPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(ending) = patch.ending {
            self.ending = Some(ending);
        }
        if let Some(novelization) = patch.novelization {
            self.novelization = Some(novelization);
        }
        if patch.complete {
            self.status = SessionStatus::Completed;
        }
        self.updated_at = now;
    }
}

/// Session contents supplied by the caller at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSession {
    pub world_id: Option<EntityId>,
    pub title: Option<String>,
    pub character_ids: Vec<EntityId>,
}

impl NewSession {
    pub fn in_world(world_id: EntityId) -> Self {
        Self {
            world_id: Some(world_id),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_character(mut self, character_id: EntityId) -> Self {
        if !self.character_ids.contains(&character_id) {
            self.character_ids.push(character_id);
        }
        self
    }

    /// New sessions always start `Active`.
    pub fn into_session(self, id: EntityId, now: DateTime<Utc>) -> Session {
        Session {
            id,
            world_id: self.world_id,
            title: self.title,
            character_ids: self.character_ids,
            status: SessionStatus::Active,
            ending: None,
            novelization: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a session.
///
/// There is no way to move a session back to `Active`; `complete` is the
/// only status change a patch can express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub ending: Option<String>,
    pub novelization: Option<String>,
    pub complete: bool,
}

impl SessionPatch {
    /// Patch that changes nothing but `updated_at`.
    pub fn touch() -> Self {
        Self::default()
    }

    pub fn ending(text: impl Into<String>) -> Self {
        Self {
            ending: Some(text.into()),
            complete: true,
            ..Default::default()
        }
    }

    pub fn novelization(text: impl Into<String>) -> Self {
        Self {
            novelization: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
