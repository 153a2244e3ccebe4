use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gemchat::config::{AppConfig, ConfigOverrides};
use gemchat::core::prompt::FAILURE_NOTICE;
use gemchat::core::{ChatError, ChatSession, Conversation, ConversationChange, Result, drive_turn};
use gemchat::{logging, tui};

#[derive(Parser, Debug)]
#[command(name = "gemchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gemini model to use (e.g., gemini-2.5-flash, gemini-2.5-pro)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Sampling temperature between 0.0 and 2.0
    #[arg(short, long, global = true)]
    temperature: Option<f32>,

    /// System instruction sent with every request
    #[arg(short, long, global = true)]
    system: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
    /// Send one message and stream the reply to stdout
    Ask {
        /// The message to send
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Write a config file with the defaults
    Init,
    /// Print the config file location
    Where,
    /// Print the effective configuration
    Show,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.clone(),
            temperature: self.temperature,
            system_instruction: self.system.clone(),
        }
    }
}

fn handle_config(command: &ConfigSubcommands, config: &AppConfig) -> ExitCode {
    match command {
        ConfigSubcommands::Init => match AppConfig::init_default() {
            Ok(path) => {
                println!("✓ Created config file at {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ Failed to create config: {e}");
                ExitCode::FAILURE
            }
        },
        ConfigSubcommands::Where => match AppConfig::get_config_path() {
            Some(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("✗ Could not determine config path");
                ExitCode::FAILURE
            }
        },
        ConfigSubcommands::Show => match toml::to_string_pretty(config) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ Failed to render config: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

/// One-shot mode: prints fragments as they arrive.
async fn ask(session: &ChatSession, text: &str) -> ExitCode {
    let mut conversation = Conversation::new();
    conversation.subscribe(|change| {
        if let ConversationChange::Appended { delta, .. } = change {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(delta.as_bytes());
            let _ = stdout.flush();
        }
    });

    let usage = drive_turn(&mut conversation, session, text).await;

    if conversation.is_empty() {
        eprintln!("✗ Nothing to send");
        return ExitCode::FAILURE;
    }

    println!();

    if let Some(error) = conversation.last_error() {
        eprintln!("✗ {FAILURE_NOTICE} ({error})");
        return ExitCode::FAILURE;
    }

    if let Some(usage) = usage {
        tracing::info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Turn complete"
        );
    }

    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::load();
    config
        .apply(cli.overrides())
        .map_err(|e| ChatError::Config(e.to_string()))?;

    match &cli.command {
        Some(Commands::Config { command }) => Ok(handle_config(command, &config)),
        Some(Commands::Ask { text }) => {
            let session = config.session_factory().create()?;
            Ok(ask(&session, &text.join(" ")).await)
        }
        None => {
            let session = config.session_factory().create();
            tui::run_tui(session, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose).map(|(_, guard)| guard);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Exiting with error");
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}
