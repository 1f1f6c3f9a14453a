pub mod bootstrap;
pub mod commands;
pub mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sunrise_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "sunrise",
    about = "Sunrise coffee shop point-of-sale CLI",
    long_about = "Maintain a menu, build a customer order, and total it from the terminal or a script.",
    after_help = "Examples:\n  sunrise shell\n  sunrise replay morning.txt --strict\n  sunrise menu --json\n  sunrise config"
)]
pub struct Cli {
    #[arg(long = "config", global = true, value_name = "PATH", help = "Path to sunrise.toml")]
    config_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run an interactive menu and order session on stdin/stdout")]
    Shell,
    #[command(about = "Run a command script and emit one JSON outcome per step")]
    Replay {
        #[arg(value_name = "SCRIPT")]
        path: PathBuf,
        #[arg(long, help = "Exit non-zero when any step is rejected")]
        strict: bool,
    },
    #[command(about = "Print the configured seed menu")]
    Menu {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Replay { .. } => "replay",
            Self::Menu { .. } => "menu",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        require_file: cli.config_path.is_some(),
        config_path: cli.config_path.clone(),
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                cli.command.name(),
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Shell => commands::shell::run(&config),
        Command::Replay { path, strict } => commands::replay::run(&config, &path, strict),
        Command::Menu { json } => commands::menu::run(&config, json),
        Command::Config => commands::CommandResult::plain(
            0,
            commands::config::run(&config, cli.config_path.as_deref()),
        ),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr; stdout carries command output only.
fn init_logging(config: &AppConfig) {
    use sunrise_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
