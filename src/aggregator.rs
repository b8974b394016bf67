//! Merging of per-source results into one address set per list.

use std::collections::HashSet;

use crate::daily::DailyResult;
use crate::fetcher::{FetchResult, Fetcher};
use crate::sources::{sources_for, ListKind, SourceDescriptor};

/// Addresses or CIDR blocks, unique by exact text. Ordered only when written.
pub type AddressSet = HashSet<String>;

/// What one source contributed to a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub entries: usize,
    pub error: Option<String>,
    /// Partial failure that still let the source contribute
    pub warning: Option<String>,
}

/// Merged list plus the per-source breakdown
#[derive(Debug)]
pub struct ListReport {
    pub kind: ListKind,
    pub entries: AddressSet,
    pub sources: Vec<SourceReport>,
}

impl ListReport {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            entries: AddressSet::new(),
            sources: Vec::new(),
        }
    }

    /// Union a fetch result into the list
    pub fn absorb(&mut self, result: FetchResult) {
        self.sources.push(SourceReport {
            name: result.name,
            entries: result.entries.len(),
            error: result.error,
            warning: None,
        });
        self.entries.extend(result.entries);
    }

    /// Union the daily listing into the list.
    ///
    /// Partial failures are not an error here; the source only counts as
    /// failed when every requested day failed.
    pub fn absorb_daily(&mut self, name: &str, result: DailyResult) {
        let failed = result.failed_days.len();
        let (error, warning) = match result.failed_days_label() {
            Some(dates) if failed == result.days_scraped => {
                (Some(format!("all {} days failed ({})", failed, dates)), None)
            }
            Some(dates) => (
                None,
                Some(format!(
                    "{} of {} days failed ({})",
                    failed, result.days_scraped, dates
                )),
            ),
            None => (None, None),
        };

        self.sources.push(SourceReport {
            name: name.to_string(),
            entries: result.entries.len(),
            error,
            warning,
        });
        self.entries.extend(result.entries);
    }

    pub fn failed_sources(&self) -> Vec<&SourceReport> {
        self.sources.iter().filter(|s| s.error.is_some()).collect()
    }
}

/// Fetch every source of `kind` in turn and merge them.
///
/// JSON sources are fetched before text sources. Requests are strictly sequential.
pub async fn collect(fetcher: &Fetcher, sources: &[SourceDescriptor], kind: ListKind) -> ListReport {
    let mut report = ListReport::new(kind);
    for source in sources_for(sources, kind) {
        report.absorb(fetcher.fetch_source(source).await);
    }
    report
}
