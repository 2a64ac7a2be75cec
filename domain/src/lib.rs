//! Domain layer for worldtale
//!
//! This crate contains the entities, value objects and pure logic of the
//! conversational pipeline. It has no dependencies on storage, network or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Worldbook**: an author-defined setting (description, rules, tags)
//! - **Character**: an NPC with a persona, a five-trait personality and a
//!   memory log; only core memories reach the model
//! - **Session**: one play-through holding messages and, once finished, an
//!   ending and a novelization
//! - **Persona prompt**: the deterministic system prompt compiled from a
//!   character and its world

pub mod character;
pub mod core;
pub mod prompt;
pub mod session;
pub mod util;
pub mod world;

// Re-export commonly used types
pub use character::{
    entities::{Character, CharacterPatch, NewCharacter},
    memory::{Memory, MemoryKind, NewMemory},
    personality::{Personality, Trait},
};
pub use crate::core::{
    error::DomainError,
    id::{EntityId, next_id},
};
pub use prompt::{ChatTurn, NarrativeTemplate, Role};
pub use session::{
    entities::{NewSession, Session, SessionPatch, SessionStatus},
    message::{CharacterRef, Message, NewMessage, Sender},
};
pub use world::entities::{NewWorldbook, Worldbook, WorldbookPatch};
