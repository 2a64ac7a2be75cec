//! Console output for sessions, characters and worlds

use colored::Colorize;
use worldtale_domain::{Character, Message, Sender, Session, Worldbook};

/// Formats records for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn header(title: &str) -> String {
        let line = "═".repeat(60);
        format!("\n{}\n  {}\n{}\n", line.cyan(), title.cyan().bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }

    /// One transcript line, colored by sender.
    pub fn message(message: &Message) -> String {
        let speaker = match message.sender {
            Sender::Player => message.speaker_name().green().bold(),
            Sender::Character => message.speaker_name().magenta().bold(),
            Sender::System => message.speaker_name().dimmed(),
        };
        format!("{}: {}", speaker, message.content)
    }

    pub fn session_line(session: &Session, message_count: usize) -> String {
        format!(
            "#{:<4} {:<10} {:<28} {} messages, updated {}",
            session.id,
            session.status.to_string(),
            session.title.as_deref().unwrap_or("(untitled)"),
            message_count,
            session.updated_at.format("%Y-%m-%d %H:%M")
        )
    }

    /// Session header, transcript and any narrative artifacts.
    pub fn session(session: &Session, messages: &[Message]) -> String {
        let mut output = Self::header(session.title.as_deref().unwrap_or("Untitled session"));

        output.push_str(&format!(
            "{} #{}  {} {}\n",
            "Session:".cyan().bold(),
            session.id,
            "Status:".cyan().bold(),
            session.status
        ));

        output.push_str(&Self::section_header("Transcript"));
        if messages.is_empty() {
            output.push_str(&format!("{}\n", "(no messages yet)".dimmed()));
        }
        for message in messages {
            output.push_str(&Self::message(message));
            output.push('\n');
        }

        if let Some(ending) = &session.ending {
            output.push_str(&Self::section_header("Ending"));
            output.push_str(ending);
            output.push('\n');
        }
        if let Some(novel) = &session.novelization {
            output.push_str(&Self::section_header("Novelization"));
            output.push_str(novel);
            output.push('\n');
        }
        output
    }

    pub fn character_line(character: &Character) -> String {
        format!(
            "#{:<4} {:<16} {:<20} {}",
            character.id,
            character.name.bold(),
            character.role,
            character.world_name.as_deref().unwrap_or("-")
        )
    }

    /// Character profile plus the system prompt compiled for it.
    pub fn character(character: &Character, system_prompt: &str) -> String {
        let mut output = Self::header(&format!("{} ({})", character.name, character.role));

        if !character.description.is_empty() {
            output.push_str(&character.description);
            output.push('\n');
        }

        if let Some(personality) = &character.personality {
            output.push_str(&Self::section_header("Personality"));
            for (t, score) in personality.iter() {
                output.push_str(&format!("  {:<18} {:>3}\n", t.label(), score));
            }
        }

        output.push_str(&Self::section_header("Memories"));
        if character.memories.is_empty() {
            output.push_str(&format!("{}\n", "(none)".dimmed()));
        }
        for memory in &character.memories {
            let kind = if memory.kind.is_core() {
                memory.kind.as_str().yellow()
            } else {
                memory.kind.as_str().dimmed()
            };
            output.push_str(&format!("  [{}] {:<9} {}\n", memory.id, kind, memory.content));
        }

        output.push_str(&Self::section_header("System prompt"));
        output.push_str(system_prompt);
        output.push('\n');
        output
    }

    pub fn worldbook_line(worldbook: &Worldbook) -> String {
        format!(
            "#{:<4} {:<20} {:<10} {}",
            worldbook.id,
            worldbook.title.bold(),
            worldbook.genre.as_deref().unwrap_or("-"),
            worldbook.tags.join(", ")
        )
    }
}
