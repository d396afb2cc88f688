//! URL handling module for Article-Harvest
//!
//! Listing cursors and article hrefs arrive as site-relative strings. This
//! module turns them into absolute URLs against the configured site root so
//! that record keys stay stable across runs.

mod resolve;

// Re-export main functions
pub use resolve::{resolve_cursor, resolve_href};
