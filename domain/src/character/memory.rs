//! Character memories

use crate::core::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a memory. Only [`MemoryKind::Core`] reaches compiled prompts.
///
/// Unrecognized kinds round-trip unchanged through [`MemoryKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemoryKind {
    Core,
    Episodic,
    Other(String),
}

impl MemoryKind {
    pub fn as_str(&self) -> &str {
        match self {
            MemoryKind::Core => "core",
            MemoryKind::Episodic => "episodic",
            MemoryKind::Other(s) => s,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, MemoryKind::Core)
    }
}

impl From<String> for MemoryKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "core" => MemoryKind::Core,
            "episodic" => MemoryKind::Episodic,
            _ => MemoryKind::Other(s),
        }
    }
}

impl From<MemoryKind> for String {
    fn from(kind: MemoryKind) -> Self {
        match kind {
            MemoryKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A memory owned by a character. `id` is unique within that character only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Memory contents before the owning repository assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemory {
    pub kind: MemoryKind,
    pub content: String,
}

impl NewMemory {
    pub fn core(content: impl Into<String>) -> Self {
        Self {
            kind: MemoryKind::Core,
            content: content.into(),
        }
    }

    pub fn episodic(content: impl Into<String>) -> Self {
        Self {
            kind: MemoryKind::Episodic,
            content: content.into(),
        }
    }

    pub fn into_memory(self, id: EntityId, created_at: DateTime<Utc>) -> Memory {
        Memory {
            id,
            kind: self.kind,
            content: self.content,
            created_at,
        }
    }
}
