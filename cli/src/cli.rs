//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Provision this host to run the NEAR validator Telegram bot as a systemd
/// service. Run from the bot directory with sudo; no subcommand means
/// `install`.
#[derive(Parser)]
#[command(name = "nearbot-provision", version, propagate_version = true)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true, env = "NEARBOT_PROVISION_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install dependencies, write the unit, and start the service (default)
    Install,

    /// Show what is installed, without changing anything
    Status,

    /// Print the systemd unit that install would write
    RenderUnit,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });

        match command.unwrap_or(Command::Install) {
            Command::Install => commands::install::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::RenderUnit => commands::render_unit::run(&app),
            Command::Version => commands::version::run(&app),
        }
    }
}
