//! Structured extraction from listing and detail pages
//!
//! This module turns fetched HTML into:
//! - Candidate records (title, URL, author, counters) from a listing page
//! - The cursor of the next listing page
//! - The article body from a detail page
//!
//! Extraction never fails: anything that cannot be located comes back as
//! `None`, an empty list, or a zero counter.

use crate::config::{compile_selector, SelectorConfig};
use crate::record::{Content, Counters, ListingPage, RecordDraft};
use crate::url::resolve_href;
use crate::ConfigError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Width the plain-text rendering is wrapped at
const TEXT_WIDTH: usize = 80;

/// Which counter a footer marker feeds
#[derive(Debug, Clone, Copy)]
enum CounterField {
    Read,
    Comment,
    Like,
    Paid,
}

/// Footer markers, e.g. `阅读 1203` for 1203 reads
const COUNTER_MARKERS: [(CounterField, &str); 4] = [
    (CounterField::Read, "阅读"),
    (CounterField::Comment, "评论"),
    (CounterField::Like, "喜欢"),
    (CounterField::Paid, "打赏"),
];

/// Selector-driven extractor, compiled once per run
#[derive(Debug)]
pub struct Extractor {
    article: Selector,
    title_link: Selector,
    author_link: Selector,
    footer: Selector,
    next_cursor: Selector,
    next_cursor_attr: String,
    detail_content: Selector,
    counters: Vec<(CounterField, Regex)>,
}

impl Extractor {
    /// Compiles the configured selectors
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidSelector` - a selector does not parse
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let counters = COUNTER_MARKERS
            .iter()
            .map(|(field, marker)| {
                Regex::new(&format!(r"{}\s*([0-9０-９]+)", marker))
                    .map(|re| (*field, re))
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            article: compile_selector(&config.article)?,
            title_link: compile_selector(&config.title_link)?,
            author_link: compile_selector(&config.author_link)?,
            footer: compile_selector(&config.footer)?,
            next_cursor: compile_selector(&config.next_cursor)?,
            next_cursor_attr: config.next_cursor_attr.clone(),
            detail_content: compile_selector(&config.detail_content)?,
            counters,
        })
    }

    /// Extracts candidates and the next cursor from a listing page
    ///
    /// Candidates come back in page order. Summaries without a title or a
    /// usable link are skipped. Hrefs are resolved against `base`.
    ///
    /// # Example
    ///
    /// ```
    /// use article_harvest::config::SelectorConfig;
    /// use article_harvest::crawler::Extractor;
    /// use url::Url;
    ///
    /// let html = r#"<ul class="article-list"><li><div>
    ///     <h4 class="title"><a href="/p/1">First</a></h4>
    ///     <div class="list-footer">阅读 12 · 喜欢 3</div>
    /// </div></li></ul>"#;
    /// let extractor = Extractor::new(&SelectorConfig::default()).unwrap();
    /// let base = Url::parse("http://www.jianshu.com").unwrap();
    /// let page = extractor.parse_listing(html, &base);
    ///
    /// assert_eq!(page.candidates[0].title, "First");
    /// assert_eq!(page.candidates[0].counters.read, 12);
    /// assert_eq!(page.candidates[0].counters.comment, 0);
    /// assert_eq!(page.next_cursor, None);
    /// ```
    pub fn parse_listing(&self, html: &str, base: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        // A summary nested inside another match is part of that article
        let summaries: Vec<ElementRef<'_>> = document.select(&self.article).collect();
        let matched: HashSet<_> = summaries.iter().map(|summary| summary.id()).collect();

        let candidates = summaries
            .into_iter()
            .filter(|summary| !summary.ancestors().any(|node| matched.contains(&node.id())))
            .filter_map(|summary| self.parse_candidate(summary, base))
            .collect();

        let next_cursor = document
            .select(&self.next_cursor)
            .next()
            .and_then(|element| element.value().attr(&self.next_cursor_attr))
            .map(str::trim)
            .filter(|cursor| !cursor.is_empty())
            .map(str::to_string);

        ListingPage {
            candidates,
            next_cursor,
        }
    }

    /// Extracts the article body from a detail page
    ///
    /// Returns None if the page has no content container.
    pub fn parse_detail(&self, html: &str) -> Option<Content> {
        let document = Html::parse_document(html);
        let container = document.select(&self.detail_content).next()?;

        let raw = container.inner_html();
        let text = render_text(&raw).unwrap_or_else(|| collect_text(container));

        Some(Content::new(raw.trim(), text))
    }

    /// Builds a draft from one article summary
    fn parse_candidate(&self, summary: ElementRef<'_>, base: &Url) -> Option<RecordDraft> {
        let link = summary.select(&self.title_link).next()?;

        let title = collect_text(link);
        if title.is_empty() {
            return None;
        }
        let url = resolve_href(link.value().attr("href")?, base)?;

        let mut draft = RecordDraft::new(url, title);

        if let Some(author) = summary.select(&self.author_link).next() {
            let name = collect_text(author);
            if !name.is_empty() {
                draft.author = Some(name);
            }
            draft.author_url = author
                .value()
                .attr("href")
                .and_then(|href| resolve_href(href, base))
                .map(String::from);
        }

        if let Some(footer) = summary.select(&self.footer).next() {
            draft.counters = self.parse_counters(&footer.text().collect::<String>());
        }

        Some(draft)
    }

    /// Reads the counters out of footer text; missing markers stay zero
    fn parse_counters(&self, text: &str) -> Counters {
        let mut counters = Counters::default();

        for (field, regex) in &self.counters {
            let Some(value) = regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_count(m.as_str()))
            else {
                continue;
            };

            match field {
                CounterField::Read => counters.read = value,
                CounterField::Comment => counters.comment = value,
                CounterField::Like => counters.like = value,
                CounterField::Paid => counters.paid = value,
            }
        }

        counters
    }
}

/// Parses a run of ASCII or full-width digits
fn parse_count(digits: &str) -> Option<u64> {
    digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32),
            _ => Some(c),
        })
        .collect::<Option<String>>()?
        .parse()
        .ok()
}

/// Renders an HTML fragment as wrapped plain text
fn render_text(html: &str) -> Option<String> {
    html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .ok()
        .map(|text| text.trim().to_string())
}

/// Joins an element's text nodes, collapsing whitespace
fn collect_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&SelectorConfig::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("http://www.jianshu.com").unwrap()
    }

    const LISTING: &str = r#"
        <html><body>
        <ul class="article-list">
          <li>
            <div class="content">
              <div class="author">
                <a class="author-name blue-link" href="/users/alice">alice</a>
              </div>
              <h4 class="title"><a href="/p/aaa">First post</a></h4>
              <div class="list-footer">
                <a href="/p/aaa">阅读 1203</a>
                <a href="/p/aaa#comments">· 评论 15</a>
                <span>· 喜欢 88</span>
                <span>· 打赏 2</span>
              </div>
            </div>
          </li>
          <li>
            <div class="content">
              <h4 class="title"><a href="/p/bbb">  Second
                 post </a></h4>
              <div class="list-footer"><a>阅读 7</a><span>· 喜欢 1</span></div>
            </div>
          </li>
        </ul>
        <div class="load-more"><button data-url="/recommendations/notes?max_id=99">more</button></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_candidates_in_order() {
        let page = extractor().parse_listing(LISTING, &base());

        let urls: Vec<&str> = page.candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["http://www.jianshu.com/p/aaa", "http://www.jianshu.com/p/bbb"]
        );
    }

    #[test]
    fn test_parse_listing_fields() {
        let page = extractor().parse_listing(LISTING, &base());
        let first = &page.candidates[0];

        assert_eq!(first.title, "First post");
        assert_eq!(first.author.as_deref(), Some("alice"));
        assert_eq!(
            first.author_url.as_deref(),
            Some("http://www.jianshu.com/users/alice")
        );
        assert_eq!(
            first.counters,
            Counters {
                read: 1203,
                comment: 15,
                like: 88,
                paid: 2,
            }
        );
    }

    #[test]
    fn test_missing_markers_default_to_zero() {
        let page = extractor().parse_listing(LISTING, &base());
        let second = &page.candidates[1];

        assert_eq!(second.title, "Second post");
        assert_eq!(second.author, None);
        assert_eq!(second.counters.read, 7);
        assert_eq!(second.counters.like, 1);
        assert_eq!(second.counters.comment, 0);
        assert_eq!(second.counters.paid, 0);
    }

    #[test]
    fn test_missing_footer_keeps_candidate() {
        let html = r#"<ul class="article-list"><li><div>
            <h4 class="title"><a href="/p/x">No footer</a></h4>
        </div></li></ul>"#;
        let page = extractor().parse_listing(html, &base());

        assert_eq!(page.candidates.len(), 1);
        assert_eq!(page.candidates[0].counters, Counters::default());
    }

    #[test]
    fn test_candidates_without_title_or_url_are_dropped() {
        let html = r#"<ul class="article-list">
            <li><div><h4 class="title"><a href="/p/1"></a></h4></div></li>
            <li><div><h4 class="title"><a>No href</a></h4></div></li>
            <li><div><h4 class="title"><a href="javascript:void(0)">Script</a></h4></div></li>
            <li><div><p>No title link at all</p></div></li>
            <li><div><h4 class="title"><a href="/p/ok">Kept</a></h4></div></li>
        </ul>"#;
        let page = extractor().parse_listing(html, &base());

        assert_eq!(page.candidates.len(), 1);
        assert_eq!(page.candidates[0].title, "Kept");
    }

    #[test]
    fn test_nested_summary_divs_yield_one_candidate() {
        let html = r#"<ul class="article-list"><li>
            <div class="content">
              <div class="title-wrap"><h4 class="title"><a href="/p/a">A</a></h4></div>
              <div class="list-footer">阅读 77 · 评论 5</div>
            </div>
        </li></ul>"#;
        let page = extractor().parse_listing(html, &base());

        assert_eq!(page.candidates.len(), 1);
        assert_eq!(page.candidates[0].counters.read, 77);
        assert_eq!(page.candidates[0].counters.comment, 5);
    }

    #[test]
    fn test_sibling_summaries_are_all_kept() {
        let html = r#"<ul class="article-list">
            <li><div><h4 class="title"><a href="/p/1">One</a></h4></div></li>
            <li><div><h4 class="title"><a href="/p/2">Two</a></h4></div></li>
        </ul>"#;
        let page = extractor().parse_listing(html, &base());
        assert_eq!(page.candidates.len(), 2);
    }

    #[test]
    fn test_full_width_counter_digits() {
        let html = r#"<ul class="article-list"><li><div>
            <h4 class="title"><a href="/p/w">Wide</a></h4>
            <div class="list-footer">阅读 １２ · 喜欢 3０</div>
        </div></li></ul>"#;
        let page = extractor().parse_listing(html, &base());

        assert_eq!(page.candidates[0].counters.read, 12);
        assert_eq!(page.candidates[0].counters.like, 30);
    }

    #[test]
    fn test_next_cursor() {
        let page = extractor().parse_listing(LISTING, &base());
        assert_eq!(
            page.next_cursor.as_deref(),
            Some("/recommendations/notes?max_id=99")
        );
    }

    #[test]
    fn test_blank_next_cursor_is_absent() {
        let html = r#"<div class="load-more"><button data-url="  ">more</button></div>"#;
        let page = extractor().parse_listing(html, &base());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_malformed_listing_yields_nothing() {
        let page = extractor().parse_listing("<<<not html at all", &base());
        assert!(page.candidates.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_parse_detail() {
        let html = r#"<html><body><div class="article">
            <div class="show-content"><p>hello</p></div>
        </div></body></html>"#;
        let content = extractor().parse_detail(html).unwrap();

        assert_eq!(content.raw, "<p>hello</p>");
        assert_eq!(content.text, "hello");
    }

    #[test]
    fn test_parse_detail_without_container() {
        let html = r#"<html><body><p>nothing here</p></body></html>"#;
        assert!(extractor().parse_detail(html).is_none());
    }

    #[test]
    fn test_custom_selectors() {
        let config = SelectorConfig {
            detail_content: "article.body".to_string(),
            ..SelectorConfig::default()
        };
        let extractor = Extractor::new(&config).unwrap();
        let content = extractor
            .parse_detail(r#"<article class="body">text</article>"#)
            .unwrap();
        assert_eq!(content.text, "text");
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let config = SelectorConfig {
            article: "li[".to_string(),
            ..SelectorConfig::default()
        };
        assert!(matches!(
            Extractor::new(&config),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }
}
