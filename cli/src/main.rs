//! CLI entrypoint for Majordomo
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Result};
use clap::Parser;
use majordomo_application::{
    DietarySpecialist, HandleTurnInput, HandleTurnUseCase, LanguageGateway, PantrySpecialist,
    PersonaSpecialist, RecipeSpecialist, SpecialistRegistry, TasksSpecialist,
};
use majordomo_infrastructure::{
    CannedLanguageGateway, ConfigLoader, InMemoryRecordStore, InMemorySessionStore,
    JsonlConversationLogger, KeywordIntentClassifier,
};
use majordomo_presentation::{ChatRepl, Cli, ConsoleFormatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // The guard keeps the background log writer alive until main returns
    let _log_guard = init_tracing(filter, cli.log_file.as_deref());

    info!("Starting Majordomo");

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    for warning in config.validate() {
        eprintln!("{}", ConsoleFormatter::format_warning(&warning));
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let behavior = config.to_behavior();

    // === Dependency Injection ===
    // Infrastructure adapters behind the application ports
    let sessions = Arc::new(InMemorySessionStore::new());
    let records = Arc::new(InMemoryRecordStore::new());
    let classifier = Arc::new(
        KeywordIntentClassifier::new().with_assistant_name(behavior.assistant_name.clone()),
    );
    let gateway: Arc<dyn LanguageGateway> = Arc::new(CannedLanguageGateway::new());

    let specialists = Arc::new(
        SpecialistRegistry::new()
            .register(Arc::new(RecipeSpecialist::new(gateway.clone())))
            .register(Arc::new(PantrySpecialist::new()))
            .register(Arc::new(DietarySpecialist::new(gateway.clone())))
            .register(Arc::new(TasksSpecialist::new()))
            .register(Arc::new(PersonaSpecialist::new(gateway.clone()))),
    );

    let mut use_case = HandleTurnUseCase::new(sessions, records, classifier, specialists)
        .with_config(behavior.clone());

    // Conversation transcript: the CLI flag wins over the config file
    let transcript_path = cli
        .transcript
        .clone()
        .or_else(|| config.logging.conversation_log.as_ref().map(PathBuf::from));

    if let Some(path) = transcript_path
        && let Some(logger) = JsonlConversationLogger::new(&path)
    {
        info!("Conversation transcript: {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let show_data = cli.show_data || config.repl.show_data;

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case)
            .with_assistant_name(behavior.assistant_name.clone())
            .with_show_data(show_data);

        if let Some(path) = config.repl.history_file.as_ref() {
            repl = repl.with_history_file(PathBuf::from(path));
        }
        if let Some(id) = cli.session.clone() {
            repl = repl.with_session(id);
        }

        repl.run().await?;
        return Ok(());
    }

    // Single query mode - a query is required
    let query = match cli.query {
        Some(q) => q,
        None => bail!("A query is required. Use --chat for interactive mode."),
    };

    let mut input = HandleTurnInput::new(query);
    if let Some(id) = cli.session.clone() {
        input = input.with_session(id);
    }

    let reply = use_case.execute(input).await?;

    print!("{}", ConsoleFormatter::format_reply(&reply, show_data));
    if cli.session.is_none() {
        println!(
            "{}",
            ConsoleFormatter::format_session_hint(&reply.session_id)
        );
    }

    Ok(())
}

/// Set up the tracing subscriber, writing to stderr or to a log file.
///
/// Returns the appender guard when a file is used; dropping it flushes
/// buffered lines.
fn init_tracing(
    filter: EnvFilter,
    log_file: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "majordomo.log".into());

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();

            None
        }
    }
}
