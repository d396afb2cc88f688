//! Traversal engine - main harvest loop
//!
//! This module walks the listing pages one at a time:
//! - Fetching the listing page at the current cursor
//! - Deciding per candidate between a full insert and a counter refresh
//! - Fetching detail pages only for articles the store has never seen
//! - Stopping at the page budget or when the listing has no next cursor
//!
//! Everything runs sequentially: a page's candidates are processed in page
//! order and the page is finished before the next listing fetch starts.

use crate::config::{compute_config_hash, Config};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pacing::Pacer;
use crate::record::{Content, Record, RecordDraft};
use crate::storage::{RunStatus, RunTotals, Store};
use crate::url::resolve_cursor;
use crate::HarvestError;
use std::time::Duration;
use url::Url;

/// Why a traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last listing page had no next cursor
    Exhausted,
    /// The page budget was used up
    BudgetReached,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    pub totals: RunTotals,
    pub stop: StopReason,
}

/// Harvester driving fetcher, extractor and store
pub struct Harvester<F, S> {
    fetcher: F,
    store: S,
    extractor: Extractor,
    base_url: Url,
    start_cursor: String,
    max_pages: u32,
    pacer: Pacer,
    config_hash: String,
}

impl<F: Fetcher, S: Store> Harvester<F, S> {
    /// Creates a new harvester
    ///
    /// # Arguments
    ///
    /// * `config` - The effective configuration (file values plus overrides)
    /// * `fetcher` - The fetcher used for every request of the run
    /// * `store` - Where records and content are persisted
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The base URL or a selector is invalid
    pub fn new(config: &Config, fetcher: F, store: S) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.crawler.base_url)?;
        let extractor = Extractor::new(&config.selectors)?;
        let config_hash = compute_config_hash(config)?;

        Ok(Self {
            fetcher,
            store,
            extractor,
            base_url,
            start_cursor: config.crawler.start_cursor.clone(),
            max_pages: config.crawler.max_pages,
            pacer: Pacer::new(Duration::from_millis(config.crawler.page_delay_ms)),
            config_hash,
        })
    }

    /// The store this harvester writes to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the harvester, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the harvest to completion
    ///
    /// The run is recorded in the store. A listing page that cannot be
    /// fetched ends the run with an error after marking it failed; records
    /// stored before the failure are kept.
    pub async fn run(&mut self) -> Result<HarvestReport, HarvestError> {
        let run_id = self.store.begin_run(&self.config_hash)?;
        tracing::info!(
            "Starting harvest at {} (cursor {:?}, up to {} pages, config hash {})",
            self.base_url,
            self.start_cursor,
            self.max_pages,
            self.config_hash
        );

        let mut totals = RunTotals::default();
        let outcome = self.traverse(&mut totals).await;

        if let Some(run_id) = run_id {
            let status = if outcome.is_ok() {
                RunStatus::Completed
            } else {
                RunStatus::Failed
            };
            if let Err(e) = self.store.finish_run(run_id, status, &totals) {
                if outcome.is_ok() {
                    return Err(e.into());
                }
                tracing::warn!("Failed to record outcome of run {}: {}", run_id, e);
            }
        }

        let stop = outcome?;
        tracing::info!(
            "Harvest finished ({:?}): {} pages, {} new, {} refreshed, {} without content",
            stop,
            totals.pages,
            totals.inserted,
            totals.refreshed,
            totals.content_missing
        );

        Ok(HarvestReport { totals, stop })
    }

    /// Walks listing pages until the budget or the cursors run out
    async fn traverse(&mut self, totals: &mut RunTotals) -> Result<StopReason, HarvestError> {
        let mut cursor = self.start_cursor.clone();

        while totals.pages < self.max_pages {
            println!("Iteration: {} next_url: {}", totals.pages, cursor);
            let listing_url = resolve_cursor(&cursor, &self.base_url)?;

            self.pacer.wait().await;
            let page = self.fetcher.fetch(&listing_url).await?;
            let listing = self.extractor.parse_listing(&page.body, &self.base_url);
            tracing::debug!(
                "Listing {} yielded {} candidates",
                listing_url,
                listing.candidates.len()
            );

            for candidate in listing.candidates {
                self.process_candidate(candidate, totals).await?;
            }

            totals.pages += 1;

            match listing.next_cursor {
                Some(next) => cursor = next,
                None => {
                    tracing::info!("No next cursor after {} pages", totals.pages);
                    return Ok(StopReason::Exhausted);
                }
            }
        }

        Ok(StopReason::BudgetReached)
    }

    /// Inserts a new article or refreshes the counters of a known one
    async fn process_candidate(
        &mut self,
        candidate: RecordDraft,
        totals: &mut RunTotals,
    ) -> Result<(), HarvestError> {
        if self.store.has(&candidate.url)? {
            tracing::debug!("Refreshing counters for {}", candidate.url);
            self.store
                .update_counters(&candidate.url, &candidate.counters)?;
            totals.refreshed += 1;
            return Ok(());
        }

        println!("Fetching: {}", candidate.title);
        let content = self.fetch_content(&candidate.url).await;
        if content.is_empty() {
            totals.content_missing += 1;
        }

        self.store.insert(&Record::from(candidate), &content)?;
        totals.inserted += 1;
        Ok(())
    }

    /// Fetches and extracts an article body, degrading to empty content
    async fn fetch_content(&self, url: &str) -> Content {
        let detail_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Cannot fetch content of {}: {}", url, e);
                return Content::empty();
            }
        };

        match self.fetcher.fetch(&detail_url).await {
            Ok(page) => self.extractor.parse_detail(&page.body).unwrap_or_else(|| {
                tracing::debug!("No content container on {}", url);
                Content::empty()
            }),
            Err(e) => {
                tracing::warn!("Storing {} without content: {}", url, e);
                Content::empty()
            }
        }
    }
}
