//! Output module for harvest reports
//!
//! This module handles:
//! - Loading statistics from the SQLite store
//! - Printing them for the `--stats` mode

pub mod stats;

pub use stats::{load_statistics, print_statistics, HarvestStatistics};
