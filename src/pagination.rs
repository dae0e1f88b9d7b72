//! Pagination Policy
//!
//! Decides which links on a directory page lead to more directory pages.
//! A link is followed when:
//! - it matches the follow selector
//! - no exclude pattern matches it
//! - it looks like a directory root, an index page, a numbered page or a
//!   "next" link

use crate::config::PaginationConfig;
use crate::dom;
use crate::links;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::LazyLock;

static NUMBERED_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"page[=_-]?\d+|p[=_-]?\d+|\d+\.php$|/\d+/?$").unwrap()
});

#[derive(Debug, Clone)]
pub struct PaginationPolicy {
    follow_selector: String,
    exclude: Vec<Regex>,
}

impl PaginationPolicy {
    /// Compile the configured patterns. Invalid patterns are logged and skipped.
    pub fn from_config(config: &PaginationConfig) -> Self {
        let exclude = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self {
            follow_selector: config.follow_selector.clone(),
            exclude,
        }
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(url))
    }

    /// True when `url` should be handed back to the crawler.
    pub fn allows(&self, url: &str) -> bool {
        !self.is_excluded(url) && looks_like_listing(url)
    }

    /// Absolute, unique, allowed pagination links on a page, in document order.
    pub fn collect(&self, document: &Html, page_url: &str) -> Vec<String> {
        let base = links::base_url(page_url);
        let mut seen = HashSet::new();

        dom::select_all(document, &self.follow_selector)
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .map(|href| dom::absolutize(href, page_url, &base))
            .filter(|url| self.allows(url))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}

fn looks_like_listing(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with("/faculty/")
        || lower.contains("faculty/index")
        || NUMBERED_PAGE_RE.is_match(&lower)
        || (lower.contains("next") && !lower.contains("next-steps"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PaginationPolicy {
        PaginationPolicy::from_config(&PaginationConfig::default())
    }

    #[test]
    fn test_listing_pages_allowed() {
        let p = policy();
        assert!(p.allows("https://music.utah.edu/faculty/"));
        assert!(p.allows("https://music.utah.edu/faculty/?page=2"));
        assert!(p.allows("https://music.utah.edu/faculty/next"));
    }

    #[test]
    fn test_excluded_and_unrelated_pages_rejected() {
        let p = policy();
        assert!(!p.allows("https://music.utah.edu/faculty/smith-jane.php"));
        assert!(!p.allows("https://music.utah.edu/faculty/emeritus/"));
        assert!(!p.allows("https://music.utah.edu/students/next-steps"));
        assert!(!p.allows("https://music.utah.edu/faculty/strings/"));
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let config = PaginationConfig {
            follow_selector: "a".to_string(),
            exclude_patterns: vec!["(unclosed".to_string(), "emeritus".to_string()],
        };
        let p = PaginationPolicy::from_config(&config);
        assert!(p.is_excluded("https://x.edu/faculty/emeritus/"));
        assert!(!p.is_excluded("https://x.edu/faculty/"));
    }

    #[test]
    fn test_collect_dedupes_and_absolutizes() {
        let doc = Html::parse_document(r#"<html><body>
            <a href="/faculty/?page=2">2</a>
            <a href="/faculty/?page=2">Next</a>
            <a href="/faculty/smith-jane.php">Jane Smith</a>
            <a href="/about/">About</a>
        </body></html>"#);
        let links = policy().collect(&doc, "https://music.utah.edu/faculty/");
        assert_eq!(links, vec!["https://music.utah.edu/faculty/?page=2".to_string()]);
    }
}
