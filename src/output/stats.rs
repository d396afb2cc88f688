//! Statistics generation from the harvest database
//!
//! This module provides functionality for extracting and displaying
//! harvest statistics from the SQLite store.

use crate::storage::{RunRecord, SqliteStore, StorageResult};

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Number of stored records
    pub total_records: u64,

    /// Number of stored content rows
    pub total_contents: u64,

    /// Content rows stored empty because the detail page failed
    pub empty_contents: u64,

    /// Number of recorded runs
    pub total_runs: u64,

    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from the store
///
/// # Arguments
///
/// * `store` - The SQLite store to query
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(store: &SqliteStore) -> StorageResult<HarvestStatistics> {
    Ok(HarvestStatistics {
        total_records: store.count_records()?,
        total_contents: store.count_contents()?,
        empty_contents: store.count_empty_contents()?,
        total_runs: store.count_runs()?,
        latest_run: store.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Records: {}", stats.total_records);
    println!("  Contents: {}", stats.total_contents);
    println!("  Runs: {}", stats.total_runs);
    println!();

    let with_content = stats.total_contents.saturating_sub(stats.empty_contents);
    let coverage = if stats.total_contents > 0 {
        (with_content as f64 / stats.total_contents as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Content Coverage: {:.1}% ({} / {} records with content)",
        coverage, with_content, stats.total_contents
    );

    let Some(run) = &stats.latest_run else {
        return;
    };

    println!();
    println!("Latest Run (#{}):", run.id);
    println!("  Status: {}", run.status.to_db_string());
    println!("  Started: {}", run.started_at);
    if let Some(finished) = &run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!("  Config hash: {}", run.config_hash);
    println!("  Pages: {}", run.totals.pages);
    println!("  Inserted: {}", run.totals.inserted);
    println!("  Refreshed: {}", run.totals.refreshed);
    println!("  Without content: {}", run.totals.content_missing);
}
