use serde::{Deserialize, Serialize};

/// Site the harvester targets when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "http://www.jianshu.com";

/// Recommendation listing the traversal starts from by default
pub const DEFAULT_START_CURSOR: &str = "/recommendations/notes";

/// Default page budget
pub const DEFAULT_MAX_PAGES: u32 = 15;

/// Default pause between listing pages (milliseconds)
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;

/// Main configuration structure for Article-Harvest
///
/// Every section has defaults, so an empty TOML file (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Traversal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Site root that cursors and article hrefs are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Cursor of the first listing page
    #[serde(rename = "start-cursor")]
    pub start_cursor: String,

    /// Maximum number of listing pages per run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Pause between consecutive listing fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_cursor: DEFAULT_START_CURSOR.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ArticleHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/article-harvest".to_string(),
            contact_email: "harvest@example.com".to_string(),
        }
    }
}

/// Where harvested records go
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Keyed SQLite store with dedup and counter refresh
    #[default]
    Sqlite,
    /// Append-only JSON lines log
    Jsonl,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the database (or log) file; usually supplied on the command line
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Which store implementation receives records
    pub sink: SinkKind,
}

/// CSS selectors used by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per article summary on a listing page
    pub article: String,

    /// Title link inside an article summary
    #[serde(rename = "title-link")]
    pub title_link: String,

    /// Author link inside an article summary
    #[serde(rename = "author-link")]
    pub author_link: String,

    /// Footer holding the engagement counters
    pub footer: String,

    /// Element whose attribute carries the next listing cursor
    #[serde(rename = "next-cursor")]
    pub next_cursor: String,

    /// Attribute of the next-cursor element
    #[serde(rename = "next-cursor-attr")]
    pub next_cursor_attr: String,

    /// Article body container on a detail page
    #[serde(rename = "detail-content")]
    pub detail_content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            article: ".article-list li div".to_string(),
            title_link: ".title a".to_string(),
            author_link: ".author-name".to_string(),
            footer: ".list-footer".to_string(),
            next_cursor: ".load-more button".to_string(),
            next_cursor_attr: "data-url".to_string(),
            detail_content: ".show-content".to_string(),
        }
    }
}
