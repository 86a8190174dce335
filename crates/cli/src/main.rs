use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use murmur_core::logging::{LoggingConfig, init_logging};
use murmur_core::{Config, Role, Utterance};
use murmur_session::{ChatSession, TurnOutcome};
use murmur_transport::{ChatService, HttpChatService};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// murmur - a terminal client for a paced chat service
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Chat with a remote service, revealing replies at a reading pace", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to murmur.toml (default: ./murmur.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Session id used for history (overrides config)
    #[arg(short, long, value_name = "ID")]
    session: Option<String>,

    /// Chat service base URL (overrides config)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open the interactive chat view (default)
    Chat,
    /// Send one message and print the paced reply
    Send {
        #[arg(required = true, value_name = "TEXT")]
        text: String,
    },
    /// Print the session history and exit
    History,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from("murmur.toml"));
    let mut config = load_or_create_config(&config_path)?;
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let command = cli.command.unwrap_or(Commands::Chat);
    let _log_guard = init_logging(Some(logging_for(&config, &command, cli.verbose)))
        .context("Failed to initialize logging")?;

    if cli.verbose && command != Commands::Chat {
        println!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        println!("{} Session: {}", "Info:".blue().bold(), config.session_id.cyan());
        println!("{} Server: {}", "Info:".blue().bold(), config.server.base_url.cyan());
    }

    let service: Arc<dyn ChatService> =
        Arc::new(HttpChatService::from_config(&config.server).context("Failed to create HTTP client")?);

    match command {
        Commands::Chat => cmd_chat(config, service).await,
        Commands::Send { text } => cmd_send(&config, service, text, &mut std::io::stdout()).await,
        Commands::History => cmd_history(&config, service, &mut std::io::stdout()).await,
    }
}

/// Load config from file or create it from the example
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        return Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()));
    }

    std::fs::write(path, Config::example()).context("Failed to create config")?;
    eprintln!(
        "{} Created {} from the example; edit it to point at your chat service.",
        "Info:".blue().bold(),
        path.display()
    );

    Config::from_toml_str(Config::example()).context("Failed to parse example config")
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(session) = &cli.session {
        config.session_id = session.clone();
    }
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
}

/// The chat view owns the terminal: it never logs to stderr, and writes log
/// files only when `[logging.file]` is enabled.
fn logging_for(config: &Config, command: &Commands, verbose: bool) -> LoggingConfig {
    let mut logging = LoggingConfig::from(config.logging.clone());
    if verbose {
        logging = logging.with_level("debug");
    }
    if *command == Commands::Chat {
        logging = logging.without_stderr();
    }
    logging
}

async fn cmd_chat(config: Config, service: Arc<dyn ChatService>) -> Result<()> {
    let session = Arc::new(ChatSession::new(&config, service));
    let mut app = murmur_ui::App::new(session, &config);
    murmur_ui::app::run(&mut app).await.context("Terminal UI failed")
}

async fn cmd_send(config: &Config, service: Arc<dyn ChatService>, text: String, out: &mut impl Write) -> Result<()> {
    let session = ChatSession::new(config, service);
    let mut buffer = text;
    let handle = session.submit(&mut buffer).context("Nothing to send: input is blank")?;

    let mut store_rx = session.store().subscribe();
    let mut printed = 0;
    let turn = handle.wait();
    tokio::pin!(turn);

    let outcome = loop {
        tokio::select! {
            outcome = &mut turn => break outcome?,
            changed = store_rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                printed = print_since(&session, printed, out)?;
            }
        }
    };
    print_since(&session, printed, out)?;

    tracing::debug!(?outcome, "turn finished");
    if let TurnOutcome::Failed { error } = outcome {
        tracing::warn!(%error, "chat service unreachable");
    }
    Ok(())
}

async fn cmd_history(config: &Config, service: Arc<dyn ChatService>, out: &mut impl Write) -> Result<()> {
    let session = ChatSession::new(config, service);
    session.start().await;

    if session.store().is_empty() {
        writeln!(out, "{}", config.messages.empty_conversation.dimmed())?;
        return Ok(());
    }
    print_since(&session, 0, out)?;
    Ok(())
}

fn print_since(session: &ChatSession, from: usize, out: &mut impl Write) -> Result<usize> {
    let fresh = session.store().since(from);
    for utterance in &fresh {
        writeln!(out, "{}", format_utterance(utterance))?;
    }
    out.flush()?;
    Ok(from + fresh.len())
}

fn format_utterance(utterance: &Utterance) -> String {
    match utterance.role() {
        Role::User => format!("{} {}", "you>".cyan().bold(), utterance.content()),
        Role::System => format!("{} {}", "murmur>".green().bold(), utterance.content()),
    }
}
