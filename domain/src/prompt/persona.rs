//! Persona prompt compilation.
//!
//! Turns a [`Character`] and optional [`Worldbook`] into the system prompt
//! that frames every character reply. Compilation is a pure function of its
//! inputs: no clock, no randomness, no I/O. The same character and world
//! always produce byte-identical output.
//!
//! Sections, in order (each skipped when its source is empty):
//!
//! 1. Identity: name and role
//! 2. Description
//! 3. Personality traits, in canonical trait order
//! 4. Core memories, in insertion order (episodic memories never appear)
//! 5. World setting and rules
//! 6. Role-play instruction

use crate::character::entities::Character;
use crate::world::entities::Worldbook;
use std::fmt::Write;

/// Closing instruction appended to every persona prompt.
pub const ROLEPLAY_INSTRUCTION: &str = "Respond in the first person and stay consistent with your persona. \
Answer the player's words and actions according to your personality traits and memories. \
Do not use narration or quotation marks; reply directly as dialogue.";

/// Compile the system prompt for `character`, optionally set in `worldbook`.
pub fn compile(character: &Character, worldbook: Option<&Worldbook>) -> String {
    let mut prompt = String::new();

    if character.role.is_empty() {
        let _ = write!(prompt, "You are {}.\n\n", character.name);
    } else {
        let _ = write!(prompt, "You are {}, {}.\n\n", character.name, character.role);
    }

    if !character.description.is_empty() {
        let _ = write!(prompt, "Description: {}\n\n", character.description);
    }

    if let Some(personality) = &character.personality {
        prompt.push_str("Personality traits:\n");
        for (t, score) in personality.iter() {
            let _ = writeln!(prompt, "- {}: {}% ({})", t.label(), score, t.phrase(score));
        }
        prompt.push('\n');
    }

    let mut core = character.core_memories().peekable();
    if core.peek().is_some() {
        prompt.push_str("Core memories:\n");
        for memory in core {
            let _ = writeln!(prompt, "- {}", memory.content);
        }
        prompt.push('\n');
    }

    if let Some(world) = worldbook {
        let _ = writeln!(prompt, "World setting: {}", world.title);
        if !world.description.is_empty() {
            let _ = writeln!(prompt, "{}", world.description);
        }
        prompt.push('\n');

        if !world.rules.is_empty() {
            let _ = write!(prompt, "World rules:\n{}\n\n", world.rules);
        }
    }

    prompt.push_str(ROLEPLAY_INSTRUCTION);
    prompt
}
