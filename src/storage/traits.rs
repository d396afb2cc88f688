//! Storage traits and error types
//!
//! This module defines the trait interface for store backends and
//! associated error types.

use crate::record::{Content, Counters, Record};
use crate::storage::{RunStatus, RunTotals};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with this URL already exists; callers must check `has` first
    #[error("Record already exists: {0}")]
    DuplicateKey(String),

    /// No record with this URL exists
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for store backend implementations
///
/// A store is a keyed repository of records and their content. Every
/// mutating call is durable once it returns.
pub trait Store {
    // ===== Record Management =====

    /// Returns true iff a record with this URL exists
    fn has(&self, url: &str) -> StorageResult<bool>;

    /// Persists a new record together with its content
    ///
    /// Both rows are written as one unit: either both exist afterwards or
    /// neither does.
    ///
    /// # Errors
    ///
    /// * `StorageError::DuplicateKey` - a record with this URL already exists
    fn insert(&mut self, record: &Record, content: &Content) -> StorageResult<()>;

    /// Overwrites the four counters of an existing record
    ///
    /// Title, author and content are left untouched.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - no record with this URL exists
    fn update_counters(&mut self, url: &str, counters: &Counters) -> StorageResult<()>;

    // ===== Run Management =====

    /// Records the start of a harvest run
    ///
    /// Returns the run ID, or None for stores that do not keep run history.
    fn begin_run(&mut self, config_hash: &str) -> StorageResult<Option<i64>> {
        let _ = config_hash;
        Ok(None)
    }

    /// Records how a run ended
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        totals: &RunTotals,
    ) -> StorageResult<()> {
        let _ = (run_id, status, totals);
        Ok(())
    }
}
