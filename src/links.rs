//! Profile Link Resolution
//!
//! Builds a page-wide index of anchor text -> absolute URL, then resolves a
//! person's profile link by fuzzy name matching against it:
//! 1. exact key
//! 2. case-insensitive key
//! 3. substring containment in either direction
//! 4. token overlap

use crate::dom;
use scraper::Html;
use std::collections::HashMap;
use url::Url;

/// Anchor texts containing any of these are navigation, not people.
const NAVIGATION_WORDS: &[&str] = &[
    "Home", "Contact", "About", "Search", "Login", "Menu", "Next", "Previous", "View all", "More",
];

/// Scheme + host (+ port) of a URL, e.g. `https://music.utah.edu`.
///
/// Malformed URLs fall back to the first three `/`-separated segments.
pub fn base_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => match parsed.port() {
                Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
                None => format!("{}://{}", parsed.scheme(), host),
            },
            None => naive_base_url(url),
        },
        Err(_) => naive_base_url(url),
    }
}

fn naive_base_url(url: &str) -> String {
    url.split('/').take(3).collect::<Vec<_>>().join("/")
}

/// Anchor text -> absolute URL for one page. Keys keep first-insertion order;
/// re-inserting a key overwrites its URL in place.
#[derive(Debug, Clone, Default)]
pub struct ProfileLinkIndex {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl ProfileLinkIndex {
    /// Index every non-navigation anchor on the page.
    pub fn build(document: &Html, page_url: &str) -> Self {
        let base = base_url(page_url);
        let mut index = Self::default();

        for anchor in dom::select_all(document, "a") {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text = dom::text(anchor);
            let len = text.chars().count();
            if href.is_empty() || len < 3 || len > 99 {
                continue;
            }
            if NAVIGATION_WORDS.iter().any(|w| text.contains(w)) {
                continue;
            }

            let url = dom::absolutize(href, page_url, &base);
            index.insert(&text, &url);

            // "Last, First" -> "First Last"
            if text.contains(',') {
                let parts: Vec<&str> = text.split(',').map(str::trim).collect();
                if parts.len() == 2 {
                    let full = format!("{} {}", parts[1], parts[0]).trim().to_string();
                    index.insert(&full, &url);
                }
            }

            // "First Last" -> "Last, First"
            let words: Vec<&str> = text
                .split(' ')
                .filter(|w| w.chars().count() > 1)
                .collect();
            if words.len() == 2 {
                index.insert(&format!("{}, {}", words[1], words[0]), &url);
            }
        }

        tracing::debug!(entries = index.len(), "built profile link index");
        index
    }

    pub fn insert(&mut self, key: &str, url: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.entries[pos].1 = url.to_string(),
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), url.to_string()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best profile link for `name`, or an empty string.
    pub fn resolve(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            return String::new();
        }

        if let Some(url) = self.get(name) {
            return url.to_string();
        }

        let lower_name = name.to_lowercase();

        for (key, url) in &self.entries {
            if key.to_lowercase() == lower_name {
                return url.clone();
            }
        }

        for (key, url) in &self.entries {
            let lower_key = key.to_lowercase();
            if lower_key.contains(&lower_name) || lower_name.contains(&lower_key) {
                return url.clone();
            }
        }

        let name_tokens: Vec<&str> = lower_name
            .split(' ')
            .filter(|w| w.chars().count() > 2)
            .collect();
        if name_tokens.is_empty() {
            return String::new();
        }
        let required = name_tokens.len().min(2);

        for (key, url) in &self.entries {
            let lower_key = key.to_lowercase();
            let key_tokens: Vec<&str> = lower_key
                .split([',', ' '])
                .filter(|w| w.chars().count() > 2)
                .collect();

            let matched = name_tokens
                .iter()
                .filter(|&&nt| {
                    key_tokens
                        .iter()
                        .any(|&kt| nt == kt || nt.contains(kt) || kt.contains(nt))
                })
                .count();

            if matched >= required {
                return url.clone();
            }
        }

        String::new()
    }
}
