//! Configuration
//!
//! Loaded from YAML. Every field has a default so an empty file (or no file
//! at all, via `ScraperConfig::default()`) is a working configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A seed page. `snapshot` points at an already-fetched copy of the page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Seed {
    pub url: String,
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub start_urls: Vec<Seed>,
    pub max_requests_per_crawl: usize,
    pub output: PathBuf,
    pub extraction: ExtractionConfig,
    pub pagination: PaginationConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            start_urls: vec![],
            max_requests_per_crawl: 100,
            output: PathBuf::from("tracking/faculty.jsonl"),
            extraction: ExtractionConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// Selectors and URL conventions the extraction strategies key on.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Repeating list rows (structured list strategy)
    pub list_row_selector: String,
    /// Person cards (card strategy)
    pub card_selector: String,
    /// Path fragment of profile links inside person cards
    pub card_profile_path: String,
    /// Path fragment of profile links in link-per-person directories
    pub directory_profile_path: String,
    /// File extension of those profile links
    pub directory_profile_extension: String,
    /// Table-row-like containers (tabular strategy)
    pub table_row_selector: String,
    /// Containers scanned by the regex fallback pass
    pub fallback_container_selector: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            list_row_selector: ".views-row".to_string(),
            card_selector: r#"div[class*="person"]"#.to_string(),
            card_profile_path: "/people/profiles/".to_string(),
            directory_profile_path: "/faculty/".to_string(),
            directory_profile_extension: ".php".to_string(),
            table_row_selector: "tr, .faculty-row, .faculty-member, .directory-row".to_string(),
            fallback_container_selector: "table, .directory, .faculty-list".to_string(),
        }
    }
}

/// Which links on a directory page get handed back to the crawler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub follow_selector: String,
    pub exclude_patterns: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        let exclude = [
            r"/faculty/[a-z]\.php$",
            r"/faculty/[A-Z]\.php$",
            r"/faculty/.*\.php$",
            r"/students/",
            r"/community/",
            r"/about/",
            r"/mckay-music-library/",
            r"/ensembles/",
            r"/forms/",
            r"/gala/",
            r"next-steps",
            r"admissions",
            r"programs-degrees",
            r"open-positions",
            r"emeritus",
            r"past_faculty",
        ];

        Self {
            follow_selector: r#"a[href*="/faculty/"]"#.to_string(),
            exclude_patterns: exclude.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Load configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<ScraperConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to parse config {:?}", path))
}

/// Parse configuration from YAML text. Blank text yields the defaults.
pub fn parse_config(content: &str) -> Result<ScraperConfig> {
    if content.trim().is_empty() {
        return Ok(ScraperConfig::default());
    }
    let config: ScraperConfig = serde_yaml::from_str(content)?;
    Ok(config)
}
