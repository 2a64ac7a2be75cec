//! CLI entrypoint for worldtale
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod chat;
mod commands;
mod output;

use anyhow::{Context, Result, anyhow, bail};
use chat::ChatRepl;
use clap::Parser;
use commands::{CharacterCommand, ChatArgs, Cli, Command, SessionCommand};
use output::ConsoleFormatter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use worldtale_application::{
    CharacterRepository, ConversationLogger, ConversationStore, EntityRepository,
    GenerationOptions, LlmGateway, OrchestratorError, ResponseOrchestrator, SessionRepository,
    WorldbookRepository,
};
use worldtale_domain::{NewMemory, NewSession, prompt::compile};
use worldtale_infrastructure::{
    ConfigCredentialProvider, ConfigLoader, FileConfig, FileStore, HttpLlmGateway,
    JsonRepository, JsonlConversationLogger, seed_defaults,
};

/// Everything a command needs, built once from the configuration.
struct App {
    repository: Arc<JsonRepository>,
    store: Arc<ConversationStore>,
    orchestrator: Arc<ResponseOrchestrator>,
}

impl App {
    fn build(config: &FileConfig, data_dir: PathBuf) -> Result<Self> {
        info!("Using data directory {}", data_dir.display());

        // === Dependency Injection ===
        let repository = Arc::new(JsonRepository::new(Arc::new(FileStore::new(data_dir))));
        let entities: Arc<dyn EntityRepository> = repository.clone();

        let credentials = Arc::new(ConfigCredentialProvider::new(&config.provider));
        let gateway: Arc<dyn LlmGateway> = Arc::new(HttpLlmGateway::new(
            config.provider.to_settings(&config.generation),
            credentials,
        )?);

        let mut orchestrator = ResponseOrchestrator::new(entities.clone(), gateway)
            .with_params(config.generation.to_params());
        if let Some(logger) = conversation_logger(config) {
            orchestrator = orchestrator.with_conversation_logger(logger);
        }

        Ok(Self {
            repository,
            store: Arc::new(ConversationStore::new(entities)),
            orchestrator: Arc::new(orchestrator),
        })
    }
}

/// The JSONL transcript logger, if configured and openable.
fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.conversation_log.as_ref()?;
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Some(Arc::new(logger))
        }
        Err(e) => {
            warn!(
                "Could not open conversation log {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

fn generation_failed(e: OrchestratorError) -> anyhow::Error {
    anyhow!("{} [{}]", e, e.code())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        verbose,
        config: config_path,
        no_config,
        data_dir,
    } = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting worldtale");

    let config = if no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(config_path.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let data_dir = data_dir.unwrap_or_else(|| config.storage.resolve_data_dir());

    if let Command::Config = command {
        let sources = (!no_config).then(|| ConfigLoader::describe_sources(config_path.as_deref()));
        return show_config(&config, sources, &data_dir);
    }

    let app = App::build(&config, data_dir)?;

    match command {
        Command::Init => {
            let report = seed_defaults(app.repository.as_ref())?;
            if report.is_empty() {
                println!("Collections already populated; nothing seeded.");
            } else {
                println!(
                    "Seeded {} worldbooks and {} characters.",
                    report.worldbooks, report.characters
                );
            }
        }
        Command::Chat(args) => chat(&app, args).await?,
        Command::Session(command) => session(&app, command).await?,
        Command::Character(command) => character(&app, command)?,
        Command::Worlds => {
            for worldbook in app.repository.list_worldbooks() {
                println!("{}", ConsoleFormatter::worldbook_line(&worldbook));
            }
        }
        Command::Export { collection, output } => {
            let json = app.repository.export(collection)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} to {}", collection, path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Import { collection, path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let count = app
                .repository
                .import(collection, &json)
                .with_context(|| format!("Failed to import {}", collection))?;
            println!("Imported {} {}.", count, collection);
        }
        Command::Config => {}
    }

    Ok(())
}

async fn chat(app: &App, args: ChatArgs) -> Result<()> {
    let character = app
        .orchestrator
        .character(args.character)
        .map_err(generation_failed)?;

    let session = match args.session {
        Some(id) => app
            .store
            .get_session(id)
            .ok_or_else(|| anyhow!("Session {} not found", id))?,
        None => {
            let new = NewSession {
                world_id: character.world_id,
                ..Default::default()
            }
            .with_title(format!("Chat with {}", character.name))
            .with_character(character.id);
            app.store.create_session(new)?
        }
    };

    if session.status.is_terminal() {
        println!("Session #{} is already completed; new messages are still recorded.", session.id);
    }

    let mut options = GenerationOptions::new();
    if let Some(model) = args.model {
        options = options.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        options = options.with_temperature(temperature);
    }

    ChatRepl::new(
        app.store.clone(),
        app.orchestrator.clone(),
        session.id,
        character,
    )
    .with_options(options)
    .run()
    .await?;

    Ok(())
}

async fn session(app: &App, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::New {
            world,
            title,
            characters,
        } => {
            if let Some(world_id) = world
                && app.repository.get_worldbook(world_id).is_none()
            {
                bail!("Worldbook {} not found", world_id);
            }
            let mut new = NewSession {
                world_id: world,
                title,
                ..Default::default()
            };
            for id in characters {
                new = new.with_character(id);
            }
            let session = app.store.create_session(new)?;
            println!("Created session #{}", session.id);
        }
        SessionCommand::Show { id, json } => {
            let session = app
                .store
                .get_session(id)
                .ok_or_else(|| anyhow!("Session {} not found", id))?;
            let messages = app.store.list_by_session(id);
            if json {
                let value = serde_json::json!({ "session": session, "messages": messages });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", ConsoleFormatter::session(&session, &messages));
            }
        }
        SessionCommand::List => {
            for session in app.repository.list_sessions() {
                let count = app.store.list_by_session(session.id).len();
                println!("{}", ConsoleFormatter::session_line(&session, count));
            }
        }
        SessionCommand::End { id } => {
            let ending = app
                .orchestrator
                .generate_story_ending(id)
                .await
                .map_err(generation_failed)?;
            println!("{}", ending);
        }
        SessionCommand::Novelize { id } => {
            let novel = app
                .orchestrator
                .generate_novelization(id)
                .await
                .map_err(generation_failed)?;
            println!("{}", novel);
        }
        SessionCommand::Delete { id } => {
            if !app.store.delete_session(id)? {
                bail!("Session {} not found", id);
            }
            println!("Deleted session #{}", id);
        }
    }
    Ok(())
}

fn character(app: &App, command: CharacterCommand) -> Result<()> {
    match command {
        CharacterCommand::List { world } => {
            let characters = match world {
                Some(world_id) => app.repository.characters_in_world(world_id),
                None => app.repository.list_characters(),
            };
            for character in characters {
                println!("{}", ConsoleFormatter::character_line(&character));
            }
        }
        CharacterCommand::Show { id } => {
            let character = app
                .repository
                .get_character(id)
                .ok_or_else(|| anyhow!("Character {} not found", id))?;
            let worldbook = character
                .world_id
                .and_then(|world_id| app.repository.get_worldbook(world_id));
            let prompt = compile(&character, worldbook.as_ref());
            println!("{}", ConsoleFormatter::character(&character, &prompt));
        }
        CharacterCommand::Remember { id, content, core } => {
            let memory = if core {
                NewMemory::core(content)
            } else {
                NewMemory::episodic(content)
            };
            let character = app
                .repository
                .add_memory(id, memory)?
                .ok_or_else(|| anyhow!("Character {} not found", id))?;
            if let Some(memory) = character.memories.last() {
                println!("Added {} memory #{} to {}", memory.kind.as_str(), memory.id, character.name);
            }
        }
        CharacterCommand::Forget { id, memory_id } => {
            let before = app
                .repository
                .get_character(id)
                .ok_or_else(|| anyhow!("Character {} not found", id))?;
            if !before.memories.iter().any(|m| m.id == memory_id) {
                bail!("Character {} has no memory {}", id, memory_id);
            }
            app.repository.remove_memory(id, memory_id)?;
            println!("Removed memory #{} from {}", memory_id, before.name);
        }
    }
    Ok(())
}

/// Print where configuration came from and the merged result. A direct
/// `api_key` is masked.
fn show_config(config: &FileConfig, sources: Option<Vec<String>>, data_dir: &Path) -> Result<()> {
    match sources {
        Some(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        None => println!("Configuration files disabled (--no-config); using defaults."),
    }
    println!();

    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("********".to_string());
    }
    println!("{}", toml::to_string_pretty(&shown)?);
    println!("# data directory: {}", data_dir.display());

    for issue in config.validate() {
        println!("# warning: {}", issue);
    }
    Ok(())
}
