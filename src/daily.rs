//! Scraper for the daily malicious-IP listing.
//!
//! The listing publishes one HTML page per day. Each page holds a table whose
//! second column is the reported address. The last N days are merged into one
//! set; a day that cannot be fetched or parsed is skipped.

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::aggregator::AddressSet;
use crate::config::{DailyConfig, DATE_PLACEHOLDER};
use crate::error::FeedError;
use crate::fetcher::get_text;
use crate::utils::format_count;

/// Column holding the address in the listing table
const ADDRESS_COLUMN: usize = 1;

/// Result of scraping a range of days
#[derive(Debug, Default)]
pub struct DailyResult {
    pub entries: AddressSet,
    pub days_scraped: usize,
    /// Days that contributed nothing because of an error
    pub failed_days: Vec<NaiveDate>,
}

impl DailyResult {
    /// Comma separated failed dates, `None` when every day succeeded
    pub fn failed_days_label(&self) -> Option<String> {
        if self.failed_days.is_empty() {
            return None;
        }
        let dates: Vec<String> = self
            .failed_days
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        Some(dates.join(", "))
    }
}

pub struct DailyScraper {
    client: Client,
    name: String,
    url_template: String,
}

impl DailyScraper {
    pub fn new(user_agent: &str, settings: &DailyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(user_agent)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .context("Failed to create HTTP client for daily listing")?;

        Ok(Self {
            client,
            name: settings.name.clone(),
            url_template: settings.url_template.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scrape today and the `days - 1` days before it (local calendar)
    pub async fn scrape_recent_days(&self, days: u32) -> DailyResult {
        let today = Local::now().date_naive();
        self.scrape_days(&recent_days(today, days)).await
    }

    /// Scrape the given days one after another
    pub async fn scrape_days(&self, dates: &[NaiveDate]) -> DailyResult {
        info!("Fetching [HTML] {} - last {} days...", self.name, dates.len());

        let mut result = DailyResult::default();
        for date in dates {
            result.days_scraped += 1;
            match self.scrape_day(*date).await {
                Ok(entries) => {
                    debug!("{}: {} entries", date, entries.len());
                    result.entries.extend(entries);
                }
                Err(e) => {
                    warn!("{} {}: {}", self.name, date, e);
                    result.failed_days.push(*date);
                }
            }
        }

        info!(
            "[OK] {} - {} unique entries ({} of {} days failed)",
            self.name,
            format_count(result.entries.len()),
            result.failed_days.len(),
            result.days_scraped
        );

        result
    }

    async fn scrape_day(&self, date: NaiveDate) -> Result<AddressSet, FeedError> {
        let url = day_url(&self.url_template, date);
        let body = get_text(&self.client, &url).await?;
        parse_daily_table(&body)
    }
}

/// Today followed by the previous `days - 1` dates
pub fn recent_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}

/// Page URL for one day
pub fn day_url(template: &str, date: NaiveDate) -> String {
    template.replace(DATE_PLACEHOLDER, &date.format("%Y-%m-%d").to_string())
}

/// Extract the address column from the first table of a listing page.
///
/// Row 0 is the header. Rows with fewer than two cells and empty cells are ignored.
pub fn parse_daily_table(html: &str) -> Result<AddressSet, FeedError> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or(FeedError::MissingTable)?;

    let mut entries = AddressSet::new();
    for row in table.select(&row_sel).skip(1) {
        let Some(cell) = row.select(&cell_sel).nth(ADDRESS_COLUMN) else {
            continue;
        };
        let text = cell.text().collect::<String>();
        let address = text.trim();
        if !address.is_empty() {
            entries.insert(address.to_string());
        }
    }

    Ok(entries)
}

fn selector(css: &'static str) -> Result<Selector, FeedError> {
    Selector::parse(css).map_err(|e| FeedError::Parse(format!("selector '{}': {}", css, e)))
}
