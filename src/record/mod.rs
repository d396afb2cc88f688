//! Record module describing harvested articles
//!
//! This module holds the data that flows between the extractor, the traversal
//! engine and the stores.
//!
//! # Components
//!
//! - `RecordDraft`: a candidate found on a listing page, before the store is consulted
//! - `Record`: the persisted article metadata, keyed by its absolute URL
//! - `Counters`: the four engagement counters refreshed on every revisit
//! - `Content`: raw and plain-text article body, stored once per record
//! - `ListingPage`: everything one listing page yields

mod article;
mod content;

// Re-export main types
pub use article::{Counters, ListingPage, Record, RecordDraft};
pub use content::Content;
