//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// tmca - manage the Klipper TMC Autotune plugin
#[derive(Parser, Debug)]
#[command(name = "tmca")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config.yaml (default: ~/.config/tmca/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone the plugin and link it into Klipper
    Install,

    /// Pull the latest plugin source
    Update,

    /// Remove the plugin, its links and config sections
    Remove,

    /// Show installation state and discovered instances
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Exit with a non-zero status unless fully installed
    #[arg(long)]
    pub check: bool,
}
