//! Entity repository over a key-value store.
//!
//! Every collection is one JSON array under its fixed key. Each mutation
//! reads the whole array, changes it and writes it back; a mutex serializes
//! those read-modify-write cycles. Ids come from `next_id` over the current
//! records and a persisted high-water mark.
//!
//! Reads of an unreadable collection degrade to empty. Writes refuse to
//! touch it and fail with a serialization error.

use super::collection::{CollectionKind, ID_COUNTERS_KEY, IdCounters, Record};
use serde::de::Error as _;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use worldtale_application::ports::repository::{
    CharacterRepository, MessageRepository, RepositoryError, SessionRepository,
    WorldbookRepository,
};
use worldtale_application::ports::storage::KeyValueStore;
use worldtale_domain::{
    Character, CharacterPatch, EntityId, Message, NewCharacter, NewMemory, NewMessage,
    NewSession, NewWorldbook, Session, SessionPatch, Worldbook, WorldbookPatch, next_id,
};

/// JSON-document repository for characters, worldbooks, sessions and
/// messages.
pub struct JsonRepository {
    store: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl JsonRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ==================== Collection I/O ====================

    /// Read a collection. Anything unreadable reads as empty.
    fn load<R: Record>(&self) -> Vec<R> {
        let raw = match self.store.read(R::KIND.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(collection = %R::KIND, "Could not read collection, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = %R::KIND, "Stored collection is malformed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Read a collection that is about to be rewritten. Unlike
    /// [`JsonRepository::load`], anything unreadable is an error.
    fn load_for_write<R: Record>(&self) -> Result<Vec<R>, RepositoryError> {
        match self.store.read(R::KIND.key())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save<R: Record>(&self, records: &[R]) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(records)?;
        self.store.write(R::KIND.key(), &json)?;
        Ok(())
    }

    fn counters(&self) -> IdCounters {
        match self.store.read(ID_COUNTERS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Id counters are malformed, rebuilding from records: {}", e);
                IdCounters::default()
            }),
            Ok(None) => IdCounters::default(),
            Err(e) => {
                warn!("Could not read id counters: {}", e);
                IdCounters::default()
            }
        }
    }

    fn save_counters(&self, counters: &IdCounters) -> Result<(), RepositoryError> {
        self.store
            .write(ID_COUNTERS_KEY, &serde_json::to_string(counters)?)?;
        Ok(())
    }

    // ==================== Generic mutations ====================

    /// Append a record built from a freshly allocated id.
    fn insert<R: Record>(&self, build: impl FnOnce(EntityId) -> R) -> Result<R, RepositoryError> {
        let _guard = self.guard();
        let mut records = self.load_for_write::<R>()?;
        let mut counters = self.counters();

        let id = next_id(records.iter().map(Record::id), counters.high_water(R::KIND));
        let record = build(id);
        records.push(record.clone());

        self.save(&records)?;
        counters.record(R::KIND, id);
        self.save_counters(&counters)?;

        debug!(collection = %R::KIND, id, "Inserted record");
        Ok(record)
    }

    /// Change the record with `id` in place. `None` if absent.
    fn modify<R: Record>(
        &self,
        id: EntityId,
        change: impl FnOnce(&mut R),
    ) -> Result<Option<R>, RepositoryError> {
        let _guard = self.guard();
        let mut records = self.load_for_write::<R>()?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        change(record);
        let updated = record.clone();
        self.save(&records)?;
        Ok(Some(updated))
    }

    /// Drop every record matching `doomed`. Returns how many went.
    fn remove<R: Record>(&self, doomed: impl Fn(&R) -> bool) -> Result<usize, RepositoryError> {
        let _guard = self.guard();
        let mut records = self.load_for_write::<R>()?;
        let before = records.len();
        records.retain(|r| !doomed(r));
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    // ==================== Export / Import ====================

    /// The collection as pretty-printed JSON.
    pub fn export(&self, kind: CollectionKind) -> Result<String, RepositoryError> {
        match kind {
            CollectionKind::Characters => self.export_as::<Character>(),
            CollectionKind::Worldbooks => self.export_as::<Worldbook>(),
            CollectionKind::Sessions => self.export_as::<Session>(),
            CollectionKind::Messages => self.export_as::<Message>(),
        }
    }

    /// Replace the collection with the records in `json`.
    ///
    /// The payload must be a JSON array of well-formed records with distinct
    /// ids; anything else fails with a serialization error and leaves the
    /// stored collection untouched. Returns the number of records imported.
    pub fn import(&self, kind: CollectionKind, json: &str) -> Result<usize, RepositoryError> {
        match kind {
            CollectionKind::Characters => self.import_as::<Character>(json),
            CollectionKind::Worldbooks => self.import_as::<Worldbook>(json),
            CollectionKind::Sessions => self.import_as::<Session>(json),
            CollectionKind::Messages => self.import_as::<Message>(json),
        }
    }

    fn export_as<R: Record>(&self) -> Result<String, RepositoryError> {
        Ok(serde_json::to_string_pretty(&self.load::<R>())?)
    }

    fn import_as<R: Record>(&self, json: &str) -> Result<usize, RepositoryError> {
        let records: Vec<R> = serde_json::from_str(json)?;

        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().map(Record::id).find(|id| !seen.insert(*id)) {
            return Err(serde_json::Error::custom(format!(
                "duplicate id {} in imported {}",
                dup,
                R::KIND
            ))
            .into());
        }

        let _guard = self.guard();
        self.save(&records)?;

        let mut counters = self.counters();
        if let Some(max) = records.iter().map(Record::id).max() {
            counters.record(R::KIND, max);
            self.save_counters(&counters)?;
        }

        info!(collection = %R::KIND, records = records.len(), "Imported collection");
        Ok(records.len())
    }
}

impl CharacterRepository for JsonRepository {
    fn list_characters(&self) -> Vec<Character> {
        self.load()
    }

    fn create_character(&self, mut character: NewCharacter) -> Result<Character, RepositoryError> {
        if character.world_name.is_none()
            && let Some(world_id) = character.world_id
        {
            character.world_name = self
                .load::<Worldbook>()
                .into_iter()
                .find(|w| w.id == world_id)
                .map(|w| w.title);
        }
        let now = chrono::Utc::now();
        self.insert(|id| character.into_character(id, now))
    }

    fn update_character(
        &self,
        id: EntityId,
        patch: CharacterPatch,
    ) -> Result<Option<Character>, RepositoryError> {
        self.modify(id, |c: &mut Character| patch.apply(c, chrono::Utc::now()))
    }

    fn delete_character(&self, id: EntityId) -> Result<bool, RepositoryError> {
        Ok(self.remove(|c: &Character| c.id == id)? > 0)
    }

    fn add_memory(
        &self,
        character_id: EntityId,
        memory: NewMemory,
    ) -> Result<Option<Character>, RepositoryError> {
        self.modify(character_id, |c: &mut Character| {
            c.push_memory(memory, chrono::Utc::now());
        })
    }

    fn remove_memory(
        &self,
        character_id: EntityId,
        memory_id: EntityId,
    ) -> Result<Option<Character>, RepositoryError> {
        self.modify(character_id, |c: &mut Character| {
            c.remove_memory(memory_id, chrono::Utc::now());
        })
    }
}

impl WorldbookRepository for JsonRepository {
    fn list_worldbooks(&self) -> Vec<Worldbook> {
        self.load()
    }

    fn create_worldbook(&self, worldbook: NewWorldbook) -> Result<Worldbook, RepositoryError> {
        let now = chrono::Utc::now();
        self.insert(|id| worldbook.into_worldbook(id, now))
    }

    fn update_worldbook(
        &self,
        id: EntityId,
        patch: WorldbookPatch,
    ) -> Result<Option<Worldbook>, RepositoryError> {
        self.modify(id, |w: &mut Worldbook| patch.apply(w, chrono::Utc::now()))
    }

    fn delete_worldbook(&self, id: EntityId) -> Result<bool, RepositoryError> {
        Ok(self.remove(|w: &Worldbook| w.id == id)? > 0)
    }
}

impl SessionRepository for JsonRepository {
    fn list_sessions(&self) -> Vec<Session> {
        self.load()
    }

    fn create_session(&self, session: NewSession) -> Result<Session, RepositoryError> {
        let now = chrono::Utc::now();
        self.insert(|id| session.into_session(id, now))
    }

    fn update_session(
        &self,
        id: EntityId,
        patch: SessionPatch,
    ) -> Result<Option<Session>, RepositoryError> {
        self.modify(id, |s: &mut Session| s.apply(patch, chrono::Utc::now()))
    }

    fn delete_session(&self, id: EntityId) -> Result<bool, RepositoryError> {
        Ok(self.remove(|s: &Session| s.id == id)? > 0)
    }
}

impl MessageRepository for JsonRepository {
    fn list_all_messages(&self) -> Vec<Message> {
        self.load()
    }

    fn append_message(
        &self,
        session_id: EntityId,
        message: NewMessage,
    ) -> Result<Message, RepositoryError> {
        message.validate()?;
        let now = chrono::Utc::now();
        self.insert(|id| message.into_message(id, session_id, now))
    }

    fn delete_messages_for_session(&self, session_id: EntityId) -> Result<usize, RepositoryError> {
        self.remove(|m: &Message| m.session_id == session_id)
    }
}
