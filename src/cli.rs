//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedwaf")]
#[command(
    author,
    version,
    about = "Build WAF white/black IP lists from crawler ranges and threat feeds"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `update` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YAML config file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only, for cron)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    /// Subcommand to run, `update` with default options when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Update {
            days: None,
            dry_run: false,
        })
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Fetch every source and overwrite both list files
    Update {
        /// Number of days of the daily listing to scrape (overrides config)
        #[arg(long)]
        days: Option<u32>,

        /// Fetch and report, but don't write any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the configured sources
    Sources,

    /// Print the default configuration as YAML
    DefaultConfig,
}
