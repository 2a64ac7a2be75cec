//! Character domain entities

use super::memory::{Memory, NewMemory};
use super::personality::Personality;
use crate::core::id::{EntityId, next_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A non-player character (Entity)
///
/// Memory order is insertion order and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub world_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_name: Option<String>,
    #[serde(default)]
    pub personality: Option<Personality>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub memories: Vec<Memory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Core memories in insertion order.
    pub fn core_memories(&self) -> impl Iterator<Item = &Memory> {
        self.memories.iter().filter(|m| m.kind.is_core())
    }

    /// Append a memory, assigning the next per-character id.
    pub fn push_memory(&mut self, memory: NewMemory, now: DateTime<Utc>) -> &Memory {
        let id = next_id(self.memories.iter().map(|m| m.id), 0);
        self.memories.push(memory.into_memory(id, now));
        self.updated_at = now;
        &self.memories[self.memories.len() - 1]
    }

    /// Remove a memory by id. Returns false if no such memory exists.
    pub fn remove_memory(&mut self, memory_id: EntityId, now: DateTime<Utc>) -> bool {
        let before = self.memories.len();
        self.memories.retain(|m| m.id != memory_id);
        let removed = self.memories.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }
}

/// Character contents before the repository assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCharacter {
    pub name: String,
    pub role: String,
    pub world_id: Option<EntityId>,
    pub world_name: Option<String>,
    pub personality: Option<Personality>,
    pub description: String,
    pub image: Option<String>,
    pub memories: Vec<NewMemory>,
}

impl NewCharacter {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_world(mut self, world_id: EntityId) -> Self {
        self.world_id = Some(world_id);
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_memory(mut self, memory: NewMemory) -> Self {
        self.memories.push(memory);
        self
    }

    /// Materialize with an assigned id. Initial memories are numbered from 1.
    pub fn into_character(self, id: EntityId, now: DateTime<Utc>) -> Character {
        let memories = self
            .memories
            .into_iter()
            .zip(1..)
            .map(|(m, memory_id)| m.into_memory(memory_id, now))
            .collect();
        Character {
            id,
            name: self.name,
            role: self.role,
            world_id: self.world_id,
            world_name: self.world_name,
            personality: self.personality,
            description: self.description,
            image: self.image,
            memories,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a character. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub world_id: Option<Option<EntityId>>,
    pub personality: Option<Option<Personality>>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
}

impl CharacterPatch {
    pub fn apply(self, character: &mut Character, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(role) = self.role {
            character.role = role;
        }
        if let Some(world_id) = self.world_id {
            character.world_id = world_id;
        }
        if let Some(personality) = self.personality {
            character.personality = personality;
        }
        if let Some(description) = self.description {
            character.description = description;
        }
        if let Some(image) = self.image {
            character.image = image;
        }
        character.updated_at = now;
    }
}
