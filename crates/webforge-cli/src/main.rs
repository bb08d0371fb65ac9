use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use webforge_core::WebforgeError;
use webforge_infrastructure::ConfigService;

mod bootstrap;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "webforge")]
#[command(
    about = "webforge - encrypted API credentials and generated web page conversations",
    long_about = None
)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/webforge/config.toml)
    #[arg(long, global = true, env = "WEBFORGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the vault key pair at the configured paths
    Keygen {
        /// RSA modulus size
        #[arg(long, default_value_t = 2048)]
        bits: usize,
        /// Replace existing key files
        #[arg(long)]
        force: bool,
    },
    /// Manage a user's upstream API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Manage conversations
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// One-off generation with the shared fallback credential
    Generate {
        /// Prompt text
        input: String,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Encrypt and store a token (read from --token, WEBFORGE_TOKEN, or stdin)
    Save {
        owner: String,
        #[arg(long, env = "WEBFORGE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Decrypt and show a stored token
    Fetch {
        owner: String,
        /// Print the full token instead of a masked form
        #[arg(long)]
        reveal: bool,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Create a conversation
    Create {
        owner: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List an owner's conversations, newest first
    List { owner: String },
    /// Show a conversation's turns and artifact
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Rename a conversation
    Rename { id: String, name: String },
    /// Delete a conversation
    Delete { id: String },
    /// Post a message to a conversation
    Send {
        owner: String,
        id: String,
        message: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let loaded = ConfigService::new(cli.config)?.load()?;
    logging::init(&loaded.config.logging.filter);

    match cli.command {
        Commands::Keygen { bits, force } => commands::keygen::run(&loaded, bits, force)?,
        Commands::Token { action } => {
            let context = bootstrap::build_context(&loaded).await?;
            match action {
                TokenAction::Save { owner, token } => {
                    commands::token::save(&context, &owner, token).await?
                }
                TokenAction::Fetch { owner, reveal } => {
                    commands::token::fetch(&context, &owner, reveal).await?
                }
            }
        }
        Commands::Chat { action } => {
            let context = bootstrap::build_context(&loaded).await?;
            match action {
                ChatAction::Create { owner, name } => {
                    commands::chat::create(&context, &owner, name.as_deref()).await?
                }
                ChatAction::List { owner } => commands::chat::list(&context, &owner).await?,
                ChatAction::Show { id, json } => commands::chat::show(&context, &id, json).await?,
                ChatAction::Rename { id, name } => {
                    commands::chat::rename(&context, &id, &name).await?
                }
                ChatAction::Delete { id } => commands::chat::delete(&context, &id).await?,
                ChatAction::Send {
                    owner,
                    id,
                    message,
                    json,
                } => commands::chat::send(&context, &owner, &id, &message, json).await?,
            }
        }
        Commands::Generate { input, json } => {
            let context = bootstrap::build_context(&loaded).await?;
            commands::generate::run(&context, &input, json).await?
        }
    }

    Ok(())
}

/// Prints the caller-facing message and picks the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.chain().find_map(|cause| cause.downcast_ref::<WebforgeError>()) {
        Some(WebforgeError::Configuration(_)) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(78)
        }
        Some(domain) => {
            tracing::debug!("{:#}", err);
            eprintln!("Error ({}): {}", domain.status_code(), domain.public_message());
            ExitCode::from(1)
        }
        None => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
