//! Play session domain.
//!
//! - [`entities::Session`] — one play-through and its narrative artifacts
//! - [`message::Message`] — a persisted player, character or system message

pub mod entities;
pub mod message;
