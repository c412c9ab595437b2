//! tmca - Klipper TMC Autotune installer
//!
//! This is the main entry point for the command-line interface.

mod cli;
mod commands;
mod output;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use tmca_core::ConfigLoader;
use tmca_host::{Host, Interaction};
use tmca_lifecycle::ExtensionLifecycle;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use terminal::{AssumeYes, TerminalInteraction};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let loader = ConfigLoader::new().context("Failed to resolve home directory")?;
    let config = loader
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let ui: Box<dyn Interaction> = if cli.yes {
        Box::new(AssumeYes::new())
    } else {
        Box::new(TerminalInteraction::new())
    };
    let lifecycle = ExtensionLifecycle::new(&config, Host::system(&config, ui));

    match cli.command {
        Commands::Install => commands::install::run(&lifecycle),
        Commands::Update => commands::update::run(&lifecycle),
        Commands::Remove => commands::remove::run(&lifecycle),
        Commands::Status(args) => commands::status::run(&lifecycle, args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Logs share the terminal with prompts, keep them out of the way
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
