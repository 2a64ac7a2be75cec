//! Character domain.
//!
//! - [`entities::Character`] — an NPC with persona and memory log
//! - [`personality::Personality`] — validated five-trait score vector
//! - [`memory::Memory`] — a core or episodic memory

pub mod entities;
pub mod memory;
pub mod personality;
