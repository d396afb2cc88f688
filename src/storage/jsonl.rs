//! Append-only JSON lines store
//!
//! Every inserted record becomes one JSON object on its own line. The log
//! never deduplicates and never rewrites earlier lines, so `has` always
//! answers false and every encounter of an article is appended.

use crate::record::{Content, Counters, Record};
use crate::storage::traits::{Store, StorageError, StorageResult};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One line of the log
#[derive(Serialize)]
struct LogLine<'a> {
    #[serde(flatten)]
    record: &'a Record,
    content: &'a Content,
    harvested_at: String,
}

/// JSON lines backend
pub struct JsonLinesStore {
    path: PathBuf,
    file: File,
}

impl JsonLinesStore {
    /// Opens the log for appending, creating it if needed
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonLinesStore {
    fn has(&self, _url: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn insert(&mut self, record: &Record, content: &Content) -> StorageResult<()> {
        let line = LogLine {
            record,
            content,
            harvested_at: Utc::now().to_rfc3339(),
        };

        // Serialize fully before writing so a failure never leaves half a line
        let mut buf = serde_json::to_vec(&line)?;
        buf.push(b'\n');

        self.file.write_all(&buf)?;
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }

    fn update_counters(&mut self, url: &str, _counters: &Counters) -> StorageResult<()> {
        Err(StorageError::NotFound(url.to_string()))
    }
}
