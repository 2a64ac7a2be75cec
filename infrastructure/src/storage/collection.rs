//! Persisted collections and their storage keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use worldtale_domain::{Character, EntityId, Message, Session, Worldbook};

/// Key holding the per-collection id high-water marks.
pub const ID_COUNTERS_KEY: &str = "worldtale_id_counters";

/// The four entity collections, each a JSON array under one fixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Characters,
    Worldbooks,
    Sessions,
    Messages,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Characters,
        CollectionKind::Worldbooks,
        CollectionKind::Sessions,
        CollectionKind::Messages,
    ];

    /// Storage key of the collection.
    pub fn key(&self) -> &'static str {
        match self {
            CollectionKind::Characters => "ai_trpg_characters",
            CollectionKind::Worldbooks => "ai_trpg_worldbooks",
            CollectionKind::Sessions => "ai_trpg_game_sessions",
            CollectionKind::Messages => "ai_trpg_conversations",
        }
    }

    /// Short name used on the command line and in counters.
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Characters => "characters",
            CollectionKind::Worldbooks => "worldbooks",
            CollectionKind::Sessions => "sessions",
            CollectionKind::Messages => "messages",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "characters" | "character" => Ok(CollectionKind::Characters),
            "worldbooks" | "worldbook" | "worlds" => Ok(CollectionKind::Worldbooks),
            "sessions" | "session" | "game_sessions" => Ok(CollectionKind::Sessions),
            "messages" | "message" | "conversations" => Ok(CollectionKind::Messages),
            _ => Err(format!(
                "unknown collection '{}' (expected characters, worldbooks, sessions or messages)",
                s
            )),
        }
    }
}

/// A record stored in one of the collections.
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone {
    const KIND: CollectionKind;

    fn id(&self) -> EntityId;
}

impl Record for Character {
    const KIND: CollectionKind = CollectionKind::Characters;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for Worldbook {
    const KIND: CollectionKind = CollectionKind::Worldbooks;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for Session {
    const KIND: CollectionKind = CollectionKind::Sessions;

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for Message {
    const KIND: CollectionKind = CollectionKind::Messages;

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Highest id ever handed out, per collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdCounters(BTreeMap<String, EntityId>);

impl IdCounters {
    pub fn high_water(&self, kind: CollectionKind) -> EntityId {
        self.0.get(kind.name()).copied().unwrap_or(0)
    }

    /// Raise the mark for `kind` to `id`. Never lowers it.
    pub fn record(&mut self, kind: CollectionKind, id: EntityId) {
        let mark = self.0.entry(kind.name().to_string()).or_insert(0);
        *mark = (*mark).max(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(CollectionKind::Characters.key(), "ai_trpg_characters");
        assert_eq!(CollectionKind::Worldbooks.key(), "ai_trpg_worldbooks");
        assert_eq!(CollectionKind::Sessions.key(), "ai_trpg_game_sessions");
        assert_eq!(CollectionKind::Messages.key(), "ai_trpg_conversations");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Characters".parse::<CollectionKind>().unwrap(),
            CollectionKind::Characters
        );
        assert_eq!(
            "conversations".parse::<CollectionKind>().unwrap(),
            CollectionKind::Messages
        );
        assert!("players".parse::<CollectionKind>().is_err());
    }

    #[test]
    fn test_counters_never_decrease() {
        let mut counters = IdCounters::default();
        assert_eq!(counters.high_water(CollectionKind::Messages), 0);
        counters.record(CollectionKind::Messages, 9);
        counters.record(CollectionKind::Messages, 4);
        assert_eq!(counters.high_water(CollectionKind::Messages), 9);
        assert_eq!(counters.high_water(CollectionKind::Sessions), 0);
    }

    #[test]
    fn test_counters_serialize_as_object() {
        let mut counters = IdCounters::default();
        counters.record(CollectionKind::Sessions, 3);
        assert_eq!(
            serde_json::to_string(&counters).unwrap(),
            r#"{"sessions":3}"#
        );
    }
}
