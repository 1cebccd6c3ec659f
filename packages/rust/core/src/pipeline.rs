//! End-to-end scrape run: root category → traversal → per-page extraction →
//! output document.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use wikiharvest_discovery::{DiscoveryOptions, discover_titles};
use wikiharvest_extract::{ExtractOptions, extract_item};
use wikiharvest_mediawiki::WikiApi;
use wikiharvest_shared::{ErrorRecord, Result, ScrapeConfig, ScrapeOutput};

/// Emit an `info!` progress line every this many pages.
const PROGRESS_LOG_INTERVAL: usize = 10;

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page has been attempted.
    fn item_processed(&self, title: &str, ok: bool, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, output: &ScrapeOutput);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn item_processed(&self, _title: &str, _ok: bool, _current: usize, _total: usize) {}
    fn done(&self, _output: &ScrapeOutput) {}
}

/// Run a full scrape.
///
/// 1. Traverse the category tree from `config.root_category`
/// 2. Apply the optional title limit
/// 3. Extract each page in discovery order
///
/// A traversal failure aborts the run. Per-page failures are collected
/// into `errors` and the run continues.
#[instrument(skip_all, fields(root = %config.root_category, base = %config.base_url))]
pub async fn run_scrape<A: WikiApi>(
    api: &A,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeOutput> {
    let start = Instant::now();
    let scraped_at = Utc::now();

    // --- Phase 1: Traversal ---
    progress.phase("Discovering item pages");
    let discovery =
        discover_titles(api, &config.root_category, &DiscoveryOptions::from(config)).await?;

    let mut titles = discovery.titles;
    if let Some(limit) = config.limit.filter(|&n| n > 0 && n < titles.len()) {
        info!(found = titles.len(), limit, "limiting pages to scrape");
        titles.truncate(limit);
    }

    // --- Phase 2: Extraction ---
    progress.phase("Extracting item pages");
    let opts = ExtractOptions::from(config);
    let total = titles.len();
    let mut items = Vec::with_capacity(total);
    let mut errors = Vec::new();

    for (i, title) in titles.iter().enumerate() {
        let ok = match extract_item(api, title, &opts).await {
            Ok(record) => {
                items.push(record);
                true
            }
            Err(e) => {
                warn!(title = %title, error = %e, "page extraction failed");
                errors.push(ErrorRecord {
                    title: title.clone(),
                    error: e.to_string(),
                });
                false
            }
        };

        let current = i + 1;
        progress.item_processed(title, ok, current, total);
        if current % PROGRESS_LOG_INTERVAL == 0 {
            info!(current, total, errors = errors.len(), "extraction progress");
        }
    }

    let source = config.base_url.as_str().trim_end_matches('/');
    let output = ScrapeOutput::new(source, scraped_at, items, errors);

    progress.done(&output);

    info!(
        items = output.count,
        errors = output.errors.len(),
        categories = discovery.categories.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "scrape complete"
    );

    Ok(output)
}
