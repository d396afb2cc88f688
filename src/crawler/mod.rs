//! Crawler module for the listing walk
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Extraction of candidates, cursors and article bodies
//! - Pacing between listing pages
//! - The traversal engine tying it all to a store

mod extractor;
mod fetcher;
mod pacing;
mod traversal;

pub use extractor::Extractor;
pub use fetcher::{
    build_http_client, user_agent_string, FetchError, FetchedPage, Fetcher, HttpFetcher,
};
pub use pacing::Pacer;
pub use traversal::{HarvestReport, Harvester, StopReason};

use crate::config::Config;
use crate::storage::open_store;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete harvest
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Build the HTTP fetcher from the user agent settings
/// 2. Open the configured sink at `output.database-path`
/// 3. Walk the listing until the budget or the cursors run out
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Harvest completed
/// * `Err(HarvestError)` - Setup failed or a listing page could not be fetched
pub async fn harvest(config: &Config) -> Result<HarvestReport, HarvestError> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let store = open_store(
        config.output.sink,
        Path::new(&config.output.database_path),
    )?;

    let mut harvester = Harvester::new(config, fetcher, store)?;
    harvester.run().await
}
