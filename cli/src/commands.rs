//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use worldtale_domain::EntityId;
use worldtale_infrastructure::CollectionKind;

/// CLI arguments for worldtale
#[derive(Parser, Debug)]
#[command(name = "worldtale")]
#[command(author, version, about = "Converse with AI-driven characters in author-defined worlds")]
#[command(long_about = r#"
worldtale keeps worldbooks, characters and play sessions on disk and asks a
language model to speak for the characters.

Configuration files are loaded from (in priority order):
1. WORLDTALE_<SECTION>__<KEY> environment variables
2. --config <path>       Explicit config file
3. ./worldtale.toml      Project-level config
4. ~/.config/worldtale/config.toml   Global config

Example:
  worldtale init
  worldtale chat --character 1
  worldtale session end 3
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Override the data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the default worlds and characters into empty collections
    Init,

    /// Talk to a character interactively
    Chat(ChatArgs),

    /// Manage play sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Inspect characters and edit their memories
    #[command(subcommand)]
    Character(CharacterCommand),

    /// List worldbooks
    Worlds,

    /// Print a collection as JSON
    Export {
        /// characters, worldbooks, sessions or messages
        collection: CollectionKind,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Replace a collection with the records in a JSON file
    Import {
        collection: CollectionKind,
        path: PathBuf,
    },

    /// Show the effective configuration and where it came from
    Config,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Character to talk to
    #[arg(short, long, value_name = "ID")]
    pub character: EntityId,

    /// Continue an existing session instead of starting a new one
    #[arg(short, long, value_name = "ID")]
    pub session: Option<EntityId>,

    /// Override the model for replies
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the sampling temperature for replies
    #[arg(short, long)]
    pub temperature: Option<f32>,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Start a session
    New {
        /// Worldbook the session takes place in
        #[arg(short, long, value_name = "ID")]
        world: Option<EntityId>,

        #[arg(short, long)]
        title: Option<String>,

        /// Character taking part (repeatable)
        #[arg(short, long = "character", value_name = "ID")]
        characters: Vec<EntityId>,
    },

    /// Print a session and its transcript
    Show {
        id: EntityId,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List sessions
    List,

    /// Write an ending and mark the session completed
    End { id: EntityId },

    /// Retell the session as prose
    Novelize { id: EntityId },

    /// Delete a session and its messages
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum CharacterCommand {
    /// List characters
    List {
        /// Only characters of this worldbook
        #[arg(short, long, value_name = "ID")]
        world: Option<EntityId>,
    },

    /// Print a character and the system prompt compiled for it
    Show { id: EntityId },

    /// Add a memory
    Remember {
        id: EntityId,
        content: String,

        /// Store as a core memory (surfaced in every reply)
        #[arg(long)]
        core: bool,
    },

    /// Remove a memory
    Forget { id: EntityId, memory_id: EntityId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::parse_from(["worldtale", "-vv", "chat", "-c", "2", "--session", "7"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.character, 2);
                assert_eq!(args.session, Some(7));
                assert!(args.model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_session_new_with_characters() {
        let cli = Cli::parse_from([
            "worldtale", "session", "new", "--world", "1", "-c", "1", "-c", "2",
        ]);
        match cli.command {
            Command::Session(SessionCommand::New {
                world, characters, ..
            }) => {
                assert_eq!(world, Some(1));
                assert_eq!(characters, vec![1, 2]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_collection_alias() {
        let cli = Cli::parse_from(["worldtale", "export", "conversations"]);
        match cli.command {
            Command::Export { collection, output } => {
                assert_eq!(collection, CollectionKind::Messages);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_collection_is_rejected() {
        assert!(Cli::try_parse_from(["worldtale", "export", "players"]).is_err());
    }
}
