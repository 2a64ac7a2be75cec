//! REPL (Read-Eval-Print Loop) for talking to one character

use crate::output::ConsoleFormatter;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use worldtale_application::{
    ConversationStore, GenerationOptions, PlayTurnInput, PlayTurnUseCase, ResponseOrchestrator,
};
use worldtale_domain::{Character, EntityId};

/// A line typed at the prompt.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Say(&'a str),
    Help,
    History,
    End,
    Novelize,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Option<Input<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !line.starts_with('/') {
        return Some(Input::Say(line));
    }
    Some(match line {
        "/help" | "/h" | "/?" => Input::Help,
        "/history" => Input::History,
        "/end" => Input::End,
        "/novel" | "/novelize" => Input::Novelize,
        "/quit" | "/exit" | "/q" => Input::Quit,
        other => Input::Unknown(other),
    })
}

/// Interactive chat with one character in one session
pub struct ChatRepl {
    play_turn: PlayTurnUseCase,
    store: Arc<ConversationStore>,
    orchestrator: Arc<ResponseOrchestrator>,
    session_id: EntityId,
    character: Character,
    options: GenerationOptions,
}

impl ChatRepl {
    pub fn new(
        store: Arc<ConversationStore>,
        orchestrator: Arc<ResponseOrchestrator>,
        session_id: EntityId,
        character: Character,
    ) -> Self {
        Self {
            play_turn: PlayTurnUseCase::new(store.clone(), orchestrator.clone()),
            store,
            orchestrator,
            session_id,
            character,
            options: GenerationOptions::default(),
        }
    }

    /// Options applied to every reply in this chat
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&self) -> std::io::Result<()> {
        self.print_welcome();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{} ", ">>>".green().bold());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!("Bye!");
                break;
            };

            match parse(&line) {
                None => continue,
                Some(Input::Say(text)) => self.say(text).await,
                Some(Input::Help) => self.print_help(),
                Some(Input::History) => self.print_history(),
                Some(Input::End) => self.end().await,
                Some(Input::Novelize) => self.novelize().await,
                Some(Input::Quit) => {
                    println!("Bye!");
                    break;
                }
                Some(Input::Unknown(cmd)) => {
                    println!("Unknown command: {}", cmd);
                    println!("Type /help for available commands");
                }
            }
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!(
            "{}",
            ConsoleFormatter::header(&format!(
                "{} ({}) - session #{}",
                self.character.name, self.character.role, self.session_id
            ))
        );
        let earlier = self.store.list_by_session(self.session_id);
        if !earlier.is_empty() {
            println!("{}", format!("{} earlier messages, showing the last few:", earlier.len()).dimmed());
            let start = earlier.len().saturating_sub(4);
            for message in &earlier[start..] {
                println!("{}", ConsoleFormatter::message(message));
            }
            println!();
        }
        self.print_help();
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  {}     - Show this help", "/help".cyan());
        println!("  {}  - Show the full transcript", "/history".cyan());
        println!("  {}      - Write an ending and complete the session", "/end".cyan());
        println!("  {}    - Retell the session as prose", "/novel".cyan());
        println!("  {}     - Leave (the session is kept)", "/quit".cyan());
        println!();
    }

    fn print_history(&self) {
        for message in self.store.list_by_session(self.session_id) {
            println!("{}", ConsoleFormatter::message(&message));
        }
        println!();
    }

    async fn say(&self, text: &str) {
        let input = PlayTurnInput::new(self.session_id, self.character.id, text)
            .with_options(self.options.clone());

        match self.play_turn.execute(input).await {
            Ok(outcome) => println!("{}\n", ConsoleFormatter::message(&outcome.reply)),
            Err(e) => eprintln!("{} {}\n", "Error:".red().bold(), e),
        }
    }

    async fn end(&self) {
        println!("{}", "Writing the ending...".dimmed());
        match self.orchestrator.generate_story_ending(self.session_id).await {
            Ok(ending) => println!("\n{}\n", ending),
            Err(e) => eprintln!("{} {}\n", "Error:".red().bold(), e),
        }
    }

    async fn novelize(&self) {
        println!("{}", "Writing the novelization...".dimmed());
        match self.orchestrator.generate_novelization(self.session_id).await {
            Ok(novel) => println!("\n{}\n", novel),
            Err(e) => eprintln!("{} {}\n", "Error:".red().bold(), e),
        }
    }
}
