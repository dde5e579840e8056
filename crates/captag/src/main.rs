//! captag CLI - caption images with a vision-language model and suggest
//! subjects for the caption with Annif.
//!
//! # Usage
//!
//! ```bash
//! # Guided interactive form
//! captag
//!
//! # Caption one or more images
//! captag caption photo.jpg --language en --vocabulary yso
//!
//! # List indexing projects on the Annif server
//! captag projects
//!
//! # View configuration
//! captag config show
//! ```
//!
//! `VLM_API_BASE_URL` must be set (or `vlm.base_url` in the config file).

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// captag - image captions and subject suggestions.
#[derive(Parser, Debug)]
#[command(name = "captag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Without a subcommand, starts the interactive form on a terminal
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption images and suggest subjects for each caption
    Caption(cli::caption::CaptionArgs),

    /// List projects available on the Annif server
    Projects(cli::projects::ProjectsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config file warnings.
    let file_config = match captag_core::Config::load_file() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to read config file: {e}\n  \
                 Check it with `captag config path`."
            );
            captag_core::Config::default()
        }
    };
    logging::init_from_config(&file_config, cli.verbose, cli.json_logs);

    tracing::debug!("captag v{}", captag_core::VERSION);

    match cli.command {
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        Some(Commands::Caption(args)) => cli::caption::execute(&startup()?, args).await,
        Some(Commands::Projects(args)) => cli::projects::execute(&startup()?, args).await,
        None => {
            if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
                cli::interactive::run(&startup()?).await
            } else {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

/// Build the immutable configuration and providers. Any configuration
/// problem stops the process here, before a request is made.
fn startup() -> anyhow::Result<captag_core::Captag> {
    captag_core::Captag::from_env().context("Invalid configuration; nothing was sent")
}
