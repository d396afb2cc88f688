//! SQLite storage implementation
//!
//! This module provides the keyed, deduplicating implementation of the
//! Store trait.

use crate::record::{Content, Counters, Record};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, RunTotals};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // FULL sync keeps every committed insert on disk before the call returns
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Lookups =====

    /// Gets a record by URL
    pub fn get_record(&self, url: &str) -> StorageResult<Option<Record>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, title, author, author_url,
                        read_count, comment_count, like_count, paid_count
                 FROM records WHERE url = ?1",
                params![url],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Gets the stored content of a record
    pub fn get_content(&self, url: &str) -> StorageResult<Option<Content>> {
        let content = self
            .conn
            .query_row(
                "SELECT raw, text FROM contents WHERE url = ?1",
                params![url],
                |row| Ok(Content::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(content)
    }

    // ===== Statistics =====

    /// Gets total record count
    pub fn count_records(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM records")
    }

    /// Gets total content row count
    pub fn count_contents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM contents")
    }

    /// Counts records whose content could not be obtained
    pub fn count_empty_contents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM contents WHERE raw = '' AND text = ''")
    }

    /// Gets the number of recorded runs
    pub fn count_runs(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM runs")
    }

    fn count(&self, query: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(query, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Run Lookups =====

    /// Gets a run by ID
    pub fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status,
                        pages, inserted, refreshed, content_missing
                 FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    /// Gets the most recent run
    pub fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status,
                        pages, inserted, refreshed, content_missing
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }
}

impl Store for SqliteStore {
    fn has(&self, url: &str) -> StorageResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM records WHERE url = ?1)",
            params![url],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn insert(&mut self, record: &Record, content: &Content) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM records WHERE url = ?1)",
            params![record.url],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StorageError::DuplicateKey(record.url.clone()));
        }

        tx.execute(
            "INSERT INTO records (url, title, author, author_url,
                                  read_count, comment_count, like_count, paid_count,
                                  first_seen_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                record.url,
                record.title,
                record.author,
                record.author_url,
                record.counters.read as i64,
                record.counters.comment as i64,
                record.counters.like as i64,
                record.counters.paid as i64,
                now,
            ],
        )?;

        tx.execute(
            "INSERT INTO contents (url, raw, text, fetched_at) VALUES (?1, ?2, ?3, ?4)",
            params![record.url, content.raw, content.text, now],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn update_counters(&mut self, url: &str, counters: &Counters) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE records SET read_count = ?1, comment_count = ?2, like_count = ?3,
             paid_count = ?4, updated_at = ?5 WHERE url = ?6",
            params![
                counters.read as i64,
                counters.comment as i64,
                counters.like as i64,
                counters.paid as i64,
                now,
                url
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(url.to_string()));
        }
        Ok(())
    }

    fn begin_run(&mut self, config_hash: &str) -> StorageResult<Option<i64>> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        totals: &RunTotals,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages = ?3, inserted = ?4,
             refreshed = ?5, content_missing = ?6 WHERE id = ?7",
            params![
                status.to_db_string(),
                now,
                totals.pages,
                totals.inserted as i64,
                totals.refreshed as i64,
                totals.content_missing as i64,
                run_id
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        url: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        author_url: row.get(3)?,
        counters: Counters {
            read: row.get::<_, i64>(4)? as u64,
            comment: row.get::<_, i64>(5)? as u64,
            like: row.get::<_, i64>(6)? as u64,
            paid: row.get::<_, i64>(7)? as u64,
        },
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        totals: RunTotals {
            pages: row.get(5)?,
            inserted: row.get::<_, i64>(6)? as u64,
            refreshed: row.get::<_, i64>(7)? as u64,
            content_missing: row.get::<_, i64>(8)? as u64,
        },
    })
}
