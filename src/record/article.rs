//! Article metadata and the listing-page shapes it is extracted from
use serde::{Deserialize, Serialize};

/// Engagement counters shown in a listing footer
///
/// A counter whose marker is missing from the page is zero; there is no way
/// to tell a genuine zero from a layout change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub read: u64,
    pub comment: u64,
    pub like: u64,
    pub paid: u64,
}

/// A candidate article located on a listing page
///
/// The URL and title are mandatory: the extractor never produces a draft
/// without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    /// Absolute article URL (the record key)
    pub url: String,

    /// Article title
    pub title: String,

    /// Author display name, when the listing shows one
    pub author: Option<String>,

    /// Absolute author profile URL, when the listing links one
    pub author_url: Option<String>,

    /// Engagement counters as currently displayed
    pub counters: Counters,
}

impl RecordDraft {
    /// Creates a draft with no author and zeroed counters
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            author: None,
            author_url: None,
            counters: Counters::default(),
        }
    }

    /// Sets the author name and profile URL
    pub fn with_author(mut self, author: impl Into<String>, author_url: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self.author_url = Some(author_url.into());
        self
    }

    /// Sets the engagement counters
    pub fn with_counters(mut self, counters: Counters) -> Self {
        self.counters = counters;
        self
    }
}

/// A persisted article
///
/// The URL never changes once stored. Title and author are written once at
/// insert time; only `counters` is refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    pub title: String,
    pub author: String,
    pub author_url: String,
    #[serde(flatten)]
    pub counters: Counters,
}

impl From<RecordDraft> for Record {
    fn from(draft: RecordDraft) -> Self {
        Self {
            url: draft.url,
            title: draft.title,
            author: draft.author.unwrap_or_default(),
            author_url: draft.author_url.unwrap_or_default(),
            counters: draft.counters,
        }
    }
}

impl From<&RecordDraft> for Record {
    fn from(draft: &RecordDraft) -> Self {
        Self::from(draft.clone())
    }
}

/// What a single listing page yields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Complete drafts in page order
    pub candidates: Vec<RecordDraft>,

    /// Cursor of the following listing page; `None` ends the traversal
    pub next_cursor: Option<String>,
}
