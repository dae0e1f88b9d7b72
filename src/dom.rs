//! DOM Helpers
//!
//! Thin wrappers over `scraper` that degrade to empty results instead of
//! failing: an invalid selector matches nothing, a missing element has no text.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parse a CSS selector, logging and returning `None` when it is invalid.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(selector = css, error = ?e, "invalid selector");
            None
        }
    }
}

/// All elements in the document matching `css`, in document order.
pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => document.select(&sel).collect(),
        None => vec![],
    }
}

/// All descendants of `scope` matching `css`, excluding `scope` itself.
pub fn select_within<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => scope
            .select(&sel)
            .filter(|el| el.id() != scope.id())
            .collect(),
        None => vec![],
    }
}

/// First descendant of `scope` matching `css`.
pub fn first_within<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    select_within(scope, css).into_iter().next()
}

/// Concatenated text content, untrimmed (keeps source newlines).
pub fn raw_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

/// Concatenated, trimmed text content.
pub fn text(el: ElementRef) -> String {
    raw_text(el).trim().to_string()
}

/// Text of the page body, falling back to the whole document.
pub fn body_text(document: &Html) -> String {
    select_all(document, "body")
        .into_iter()
        .next()
        .map(raw_text)
        .unwrap_or_else(|| raw_text(document.root_element()))
}

/// Text of the first element matching `css`, or empty.
pub fn first_text(document: &Html, css: &str) -> String {
    select_all(document, css)
        .into_iter()
        .next()
        .map(text)
        .unwrap_or_default()
}

/// Nearest ancestor whose tag is one of `tags`.
pub fn closest<'a>(el: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tags.contains(&ancestor.value().name()))
}

/// Parent element, if the parent node is an element.
pub fn parent_element(el: ElementRef) -> Option<ElementRef> {
    el.parent().and_then(ElementRef::wrap)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve an href found on `page_url` into an absolute URL.
///
/// Absolute `http(s)` hrefs pass through. Relative hrefs are joined against
/// the page URL, falling back to `base_url + href` when the page URL does
/// not parse.
pub fn absolutize(href: &str, page_url: &str, base_url: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    match Url::parse(page_url).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", base_url, href),
    }
}
