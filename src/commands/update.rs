//! Update command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::aggregator::{collect, ListReport};
use crate::config::Config;
use crate::daily::DailyScraper;
use crate::fetcher::Fetcher;
use crate::sources::ListKind;
use crate::utils::{format_count, truncate};
use crate::writer::save_list;

/// Longest error text shown in the final summary
const SUMMARY_ERROR_LEN: usize = 120;

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Overrides `daily.days`
    pub days: Option<u32>,
    pub dry_run: bool,
}

/// What happened to one list during an update
#[derive(Debug)]
pub struct ListOutcome {
    pub report: ListReport,
    pub path: PathBuf,
    /// False for dry runs and failed writes
    pub written: bool,
    pub write_error: Option<String>,
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub white: ListOutcome,
    pub black: ListOutcome,
}

/// Run the update command
pub async fn run(config_path: Option<&Path>, options: UpdateOptions) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let summary = execute(&config, &options).await?;

    println!();
    for outcome in [&summary.white, &summary.black] {
        print_outcome(outcome, options.dry_run);
    }

    Ok(())
}

/// Fetch the white list, write it, then fetch the black list and write it.
///
/// Source and write failures are logged and never abort the run; only
/// client construction can fail.
pub async fn execute(config: &Config, options: &UpdateOptions) -> Result<UpdateSummary> {
    info!(
        "=== feedwaf update started at {} ===",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let fetcher = Fetcher::new(config)?;
    let scraper = if config.daily.enabled {
        Some(DailyScraper::new(&config.user_agent, &config.daily)?)
    } else {
        None
    };

    let white = collect(&fetcher, &config.sources, ListKind::White).await;
    let white = persist(white, &config.output.white, options.dry_run);

    let mut black = collect(&fetcher, &config.sources, ListKind::Black).await;
    if let Some(scraper) = scraper {
        let days = options.days.unwrap_or(config.daily.days);
        let daily = scraper.scrape_recent_days(days).await;
        black.absorb_daily(scraper.name(), daily);
    }
    let black = persist(black, &config.output.black, options.dry_run);

    info!("=== feedwaf update finished ===");

    Ok(UpdateSummary { white, black })
}

fn persist(report: ListReport, path: &Path, dry_run: bool) -> ListOutcome {
    let mut outcome = ListOutcome {
        report,
        path: path.to_path_buf(),
        written: false,
        write_error: None,
    };

    if dry_run {
        info!(
            "[DRY-RUN] Would write {} entries to {:?}",
            format_count(outcome.report.entries.len()),
            path
        );
        return outcome;
    }

    match save_list(path, &outcome.report.entries) {
        Ok(count) => {
            info!("[SUCCESS] Wrote {:?} ({} entries)", path, format_count(count));
            outcome.written = true;
        }
        Err(e) => {
            error!("[ERROR] Failed to write {} list: {}", outcome.report.kind, e);
            outcome.write_error = Some(e.to_string());
        }
    }

    outcome
}

fn print_outcome(outcome: &ListOutcome, dry_run: bool) {
    let report = &outcome.report;
    let failed = report.failed_sources();

    let marker = if outcome.write_error.is_some() {
        "[ERROR]"
    } else if !failed.is_empty() {
        "[WARN]"
    } else {
        "[OK]"
    };

    let action = if dry_run {
        "not written (dry run)".to_string()
    } else if let Some(ref e) = outcome.write_error {
        format!("not written: {}", truncate(e, SUMMARY_ERROR_LEN))
    } else {
        format!("written to {}", outcome.path.display())
    };

    println!(
        "{} {} list: {} entries from {} sources, {}",
        marker,
        report.kind,
        format_count(report.entries.len()),
        report.sources.len(),
        action
    );

    for source in failed {
        if let Some(ref e) = source.error {
            warn!("{} contributed nothing: {}", source.name, truncate(e, SUMMARY_ERROR_LEN));
        }
    }
    for source in &report.sources {
        if let Some(ref w) = source.warning {
            warn!("{} is incomplete: {}", source.name, truncate(w, SUMMARY_ERROR_LEN));
        }
    }
}
