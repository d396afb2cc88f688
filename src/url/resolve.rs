use crate::HarvestError;
use url::Url;

/// Resolves an href found in a page to an absolute URL
///
/// Returns None if the link cannot serve as a record or author key:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - anything that is not HTTP(S) after resolution
///
/// The fragment is dropped so that `/p/1` and `/p/1#comments` share a key.
///
/// # Examples
///
/// ```
/// use article_harvest::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("http://www.jianshu.com").unwrap();
/// let url = resolve_href("/p/abc#comments", &base).unwrap();
/// assert_eq!(url.as_str(), "http://www.jianshu.com/p/abc");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute)
}

/// Resolves a listing cursor to the URL of the listing page
///
/// Cursors are usually site-relative paths with a query string
/// (`/recommendations/notes?max_id=123`); absolute cursors are accepted
/// unchanged. An empty cursor addresses the site root.
pub fn resolve_cursor(cursor: &str, base: &Url) -> Result<Url, HarvestError> {
    let cursor = cursor.trim();
    let url = base.join(cursor).map_err(|_| HarvestError::InvalidCursor {
        cursor: cursor.to_string(),
        base: base.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(HarvestError::InvalidCursor {
            cursor: cursor.to_string(),
            base: base.to_string(),
        });
    }

    Ok(url)
}
