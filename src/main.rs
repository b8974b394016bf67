//! feedwaf - WAF IP list aggregator
//!
//! Builds a crawler allowlist and a malicious-IP blocklist from public sources.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use feedwaf::cli::{Cli, Commands};
use feedwaf::commands::update::UpdateOptions;
use feedwaf::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command_or_default() {
        Commands::Update { days, dry_run } => {
            feedwaf::commands::update::run(config_path, UpdateOptions { days, dry_run }).await
        }
        Commands::Sources => feedwaf::commands::sources::run(config_path),
        Commands::DefaultConfig => {
            print!("{}", Config::generate_default_yaml());
            Ok(())
        }
    }
}
