use serde::{Deserialize, Serialize};

/// Full article body, stored 1:1 with its record
///
/// An article whose detail page could not be fetched or had no content
/// container is stored with both fields empty rather than without a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Inner HTML of the content container
    pub raw: String,

    /// Plain-text rendering, one text block per line
    pub text: String,
}

impl Content {
    /// Creates content from its raw and plain-text forms
    pub fn new(raw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            text: text.into(),
        }
    }

    /// Content for an article whose body could not be obtained
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if neither form carries any text
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.text.is_empty()
    }
}
