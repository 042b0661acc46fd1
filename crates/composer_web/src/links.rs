use scraper::{Html, Selector};
use url::Url;

const DEFAULT_MAX_LINKS: usize = 5_000;

/// Returns the `href` of the first anchor that is an absolute `http`/`https` URL.
///
/// The reference is returned as written in the markup, minus surrounding
/// whitespace. Relative links, fragments, `mailto:` and `javascript:` references
/// are skipped.
pub fn extract_first_link(html: &str) -> Option<String> {
    scan(html, 1).pop()
}

/// Every absolute `http`/`https` anchor reference in document order, capped at
/// the first 5,000.
pub fn absolute_links(html: &str) -> Vec<String> {
    scan(html, DEFAULT_MAX_LINKS)
}

fn scan(html: &str, limit: usize) -> Vec<String> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&anchors)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(absolute_http_reference)
        .take(limit)
        .collect()
}

fn absolute_http_reference(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| trimmed.to_string())
}
