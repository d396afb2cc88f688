//! Configuration module for Article-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: every key has a default, and the command
//! line overrides whatever the file provides.
//!
//! # Example
//!
//! ```no_run
//! use article_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvester will walk at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SelectorConfig, SinkKind, UserAgentConfig,
    DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY_MS, DEFAULT_START_CURSOR,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config};
pub use validation::{validate, validate_database_path};

pub(crate) use validation::compile_selector;
