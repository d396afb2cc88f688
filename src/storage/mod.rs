//! Storage module for persisting harvested articles
//!
//! This module handles everything that outlives a run, including:
//! - The `Store` contract the traversal engine relies on
//! - SQLite-backed keyed storage with dedup and counter refresh
//! - An append-only JSON lines log for plain exports
//! - Run tracking for statistics

mod jsonl;
mod schema;
mod sqlite;
mod traits;

pub use jsonl::JsonLinesStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StorageError, StorageResult};

use crate::config::SinkKind;
use crate::record::{Content, Counters, Record};
use std::path::Path;

/// Opens the store selected by `sink` at `path`
///
/// # Returns
///
/// * `Ok(Box<dyn Store>)` - Successfully opened store
/// * `Err(StorageError)` - Failed to open or initialize the store
pub fn open_store(sink: SinkKind, path: &Path) -> StorageResult<Box<dyn Store>> {
    Ok(match sink {
        SinkKind::Sqlite => Box::new(SqliteStore::new(path)?),
        SinkKind::Jsonl => Box::new(JsonLinesStore::open(path)?),
    })
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn has(&self, url: &str) -> StorageResult<bool> {
        (**self).has(url)
    }

    fn insert(&mut self, record: &Record, content: &Content) -> StorageResult<()> {
        (**self).insert(record, content)
    }

    fn update_counters(&mut self, url: &str, counters: &Counters) -> StorageResult<()> {
        (**self).update_counters(url, counters)
    }

    fn begin_run(&mut self, config_hash: &str) -> StorageResult<Option<i64>> {
        (**self).begin_run(config_hash)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        totals: &RunTotals,
    ) -> StorageResult<()> {
        (**self).finish_run(run_id, status, totals)
    }
}

/// Counts accumulated over one harvest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Listing pages fully processed
    pub pages: u32,

    /// New records stored
    pub inserted: u64,

    /// Known records whose counters were refreshed
    pub refreshed: u64,

    /// New records stored with empty content
    pub content_missing: u64,
}

/// Represents a harvest run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub totals: RunTotals,
}

/// Status of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
