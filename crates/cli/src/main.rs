use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};

use parlor_core::logging::{self, LoggingConfig};
use parlor_core::{Config, ParlorDir};
use parlor_providers::{KnowledgeBaseId, ServiceBundle};
use parlor_ui::{App, IntentOutcome, Outcome, Role, SessionContext, Surface};

/// Parlor - a terminal chat client for a question-answering service
#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(about = "Chat with an answer service, optionally backed by knowledge bases", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to config.toml (default: ~/.parlor/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive chat
    Chat,
    /// Ask a single question and print the answer as it is revealed
    Ask {
        #[arg(required = true, value_name = "QUESTION")]
        question: String,

        /// Answer from the selected knowledge base
        #[arg(short, long)]
        knowledge: bool,

        /// Knowledge base to answer from (implies --knowledge)
        #[arg(long, value_name = "ID")]
        kb: Option<String>,
    },
    /// Manage knowledge bases
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },
    /// Upload files to a knowledge base
    Upload {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Target knowledge base (default: the configured default base)
        #[arg(long, value_name = "ID")]
        kb: Option<String>,
    },
    /// Inspect or reset the conversation identity
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum KbAction {
    /// List knowledge bases
    List,
    /// Create a knowledge base
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a knowledge base
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Print the current conversation id
    Show,
    /// Start a new conversation id
    Reset,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print an example config.toml
    Example,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { action: ConfigAction::Example } = cli.command {
        print!("{}", Config::example());
        return Ok(());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => ParlorDir::from_home()?.config_file(),
    };
    let config = load_or_create_config(&config_path)?;

    let interactive = matches!(cli.command, Commands::Chat);
    let _guard = logging::init_logging(Some(logging_config(&config, interactive, cli.verbose)))
        .context("Failed to initialize logging")?;
    tracing::debug!(config = %config_path.display(), command = ?cli.command, "starting");

    if cli.verbose {
        eprintln!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        eprintln!("{} Service: {}", "Info:".blue().bold(), config.service.base_url.cyan());
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async move {
        match cli.command {
            Commands::Chat => cmd_chat(config).await,
            Commands::Ask { question, knowledge, kb } => cmd_ask(config, question, knowledge, kb).await,
            Commands::Kb { action } => cmd_kb(config, action).await,
            Commands::Upload { files, kb } => cmd_upload(config, files, kb).await,
            Commands::Session { action } => cmd_session(config, action),
            Commands::Config { action: ConfigAction::Example } => Ok(()),
        }
    })
}

/// Load config from file or create from example
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    } else {
        eprintln!("{} Config not found at {}", "Warning:".yellow().bold(), path.display());
        eprintln!("{} Creating config from example...", "Info:".blue().bold());

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path, Config::example()).context("Failed to create config")?;

        eprintln!(
            "{} Created config at {}. Please edit it with your settings.",
            "Success:".green().bold(),
            path.display()
        );

        anyhow::bail!("Please edit {} with your settings and run again", path.display())
    }
}

/// Logging for a command; the full-screen chat only logs to file
fn logging_config(config: &Config, interactive: bool, verbose: bool) -> LoggingConfig {
    let mut logging = LoggingConfig::from(config.logging.clone());
    if verbose {
        logging = logging.with_level("debug");
    }
    if interactive {
        logging = logging.without_stderr();
    }
    logging
}

/// Build the interaction surface for the configured backend
fn open_surface(config: &Config) -> Result<Surface> {
    let services = ServiceBundle::from_config(config).context("Failed to set up services")?;
    let context = SessionContext::from_config(config).context("Failed to open conversation identity")?;
    Ok(Surface::from_config(config, services, context))
}

/// Select a knowledge base by id, loading the catalog first
async fn select_knowledge_base(surface: &mut Surface, id: String) -> Result<()> {
    surface.refresh_knowledge_bases().await;
    match surface.select_knowledge_base(KnowledgeBaseId::new(id.clone())) {
        IntentOutcome::KnowledgeBaseSelected(_) => Ok(()),
        _ => anyhow::bail!("Unknown knowledge base: {}", id),
    }
}

/// Start the interactive chat
async fn cmd_chat(config: Config) -> Result<()> {
    let mut app = App::new(open_surface(&config)?);
    app.run().await.context("Terminal UI failed")?;

    println!(
        "{} Conversation {}",
        "Info:".blue().bold(),
        app.surface().controller().context().conversation_id().cyan()
    );
    Ok(())
}

/// Ask one question without the TUI
async fn cmd_ask(config: Config, question: String, knowledge: bool, kb: Option<String>) -> Result<()> {
    let mut surface = open_surface(&config)?;
    if knowledge || kb.is_some() {
        surface.set_knowledge_mode(true);
    }
    if let Some(id) = kb {
        select_knowledge_base(&mut surface, id).await?;
    }

    let mut stdout = std::io::stdout();
    match ask(&mut surface, &question, &mut stdout).await? {
        Outcome::Complete => Ok(()),
        Outcome::Cancelled => {
            eprintln!("{} Reply interrupted", "Warning:".yellow().bold());
            Ok(())
        }
        Outcome::Errored => anyhow::bail!("The answer service request failed"),
    }
}

/// Drive one request to completion, writing the answer as it is revealed.
/// Ctrl+C interrupts the request and keeps what was shown.
async fn ask(surface: &mut Surface, question: &str, out: &mut impl Write) -> Result<Outcome> {
    let Some(target) = surface.controller_mut().start(question) else {
        anyhow::bail!("Nothing to ask");
    };

    let mut shown = 0;
    while !surface.controller().is_idle() {
        tokio::select! {
            event = surface.next_lifecycle_event() => match event {
                Some(event) => surface.handle_lifecycle_event(event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                surface.controller_mut().cancel();
            }
        }

        if let Some(record) = surface.transcript().get(target)
            && let Some(delta) = record.content.get(shown..)
            && !delta.is_empty()
        {
            write!(out, "{}", delta)?;
            out.flush()?;
            shown = record.content.len();
        }
    }
    writeln!(out)?;

    Ok(surface.controller().last_outcome().unwrap_or(Outcome::Complete))
}

/// Knowledge-base management
async fn cmd_kb(config: Config, action: KbAction) -> Result<()> {
    match action {
        KbAction::List => {
            let services = ServiceBundle::from_config(&config).context("Failed to set up services")?;
            let bases = services.registry.list().await.context("Failed to list knowledge bases")?;

            println!("{}", "Knowledge bases".green().bold().underline());
            if bases.is_empty() {
                println!("  (none)");
            }
            for base in bases {
                let marker = if base.id.as_str() == config.knowledge.default_base { "*" } else { " " };
                if base.description.is_empty() {
                    println!("{} {}  {}", marker, base.id.cyan(), base.name);
                } else {
                    println!("{} {}  {} ({})", marker, base.id.cyan(), base.name, base.description);
                }
            }
        }
        KbAction::Create { name, description } => {
            let mut surface = open_surface(&config)?;
            let id = surface
                .create_knowledge_base(&name, &description)
                .await
                .context("Failed to create knowledge base")?;
            println!("{} Created knowledge base {} ({})", "Success:".green().bold(), name, id.cyan());
        }
        KbAction::Delete { id } => {
            let mut surface = open_surface(&config)?;
            surface
                .delete_knowledge_base(&KnowledgeBaseId::new(id))
                .await
                .context("Failed to delete knowledge base")?;
            println!("{} {}", "Success:".green().bold(), last_system_message(&surface));
        }
    }
    Ok(())
}

/// Upload files to the default or named knowledge base
async fn cmd_upload(config: Config, files: Vec<PathBuf>, kb: Option<String>) -> Result<()> {
    let mut surface = open_surface(&config)?;
    if let Some(id) = kb {
        select_knowledge_base(&mut surface, id).await?;
    }

    let target = surface.controller().context().knowledge_base().clone();
    println!("{} Uploading {} file(s) to {}", "Info:".blue().bold(), files.len(), target.cyan());
    let status = surface.upload(&files).await.context("File upload failed")?;
    println!("{} {}", "Success:".green().bold(), status);
    Ok(())
}

/// Conversation identity commands
fn cmd_session(config: Config, action: SessionAction) -> Result<()> {
    let mut context = SessionContext::from_config(&config).context("Failed to open conversation identity")?;
    match action {
        SessionAction::Show => {
            println!("{} Conversation {}", "Info:".blue().bold(), context.conversation_id().cyan());
        }
        SessionAction::Reset => {
            let id = context.reset_conversation().context("Failed to reset conversation")?;
            println!("{} New conversation {}", "Success:".green().bold(), id.cyan());
        }
    }
    Ok(())
}

fn last_system_message(surface: &Surface) -> String {
    surface
        .transcript()
        .last_of_role(Role::System)
        .map(|record| record.content.clone())
        .unwrap_or_default()
}
