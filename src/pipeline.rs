//! Page Pipeline
//!
//! One directory page in, its faculty records out:
//! 1. build page context (metadata, socials, profile link index)
//! 2. run the strategy chain (ordered strategies, tabular step, arbiter)
//! 3. quality gate: replace the result with the regex fallback pass when
//!    most names are bogus
//! 4. final name cleanup, statistics and the page summary
//!
//! The pipeline never fails. A page that defeats every strategy yields no
//! records and no summary.

use crate::config::ExtractionConfig;
use crate::filter;
use crate::quality;
use crate::strategies::{PageContext, RegexFallback, Strategy, StrategyChain};
use crate::types::{EmailStats, FacultyRecord, PageSummary};
use chrono::{DateTime, Utc};
use scraper::Html;

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction {
    pub url: String,
    pub records: Vec<FacultyRecord>,
    /// Present only when at least one record was accepted.
    pub summary: Option<PageSummary>,
    pub stats: EmailStats,
    /// Strategy whose output was kept.
    pub strategy: Option<&'static str>,
    pub used_fallback: bool,
}

/// Extract faculty records from an HTML string.
pub fn extract_html(
    html: &str,
    url: &str,
    scraped_at: DateTime<Utc>,
    config: &ExtractionConfig,
) -> PageExtraction {
    let document = Html::parse_document(html);
    extract_page(&document, url, scraped_at, config)
}

/// Extract faculty records from a parsed page.
pub fn extract_page(
    document: &Html,
    url: &str,
    scraped_at: DateTime<Utc>,
    config: &ExtractionConfig,
) -> PageExtraction {
    let page = PageContext::new(document, url, scraped_at, config);
    tracing::debug!(
        url,
        university = %page.university,
        department = %page.department,
        links = page.links.len(),
        socials = page.socials.found(),
        "page context ready"
    );

    let outcome = StrategyChain::standard().run(&page);
    let mut records = outcome.records;
    let mut strategy = outcome.strategy;
    let mut used_fallback = false;

    if quality::needs_fallback(&records) {
        tracing::warn!(
            url,
            bad_names = quality::bad_name_count(&records),
            total = records.len(),
            "most names look like phone numbers or labels, running regex fallback"
        );
        records = RegexFallback.candidates(&page);
        strategy = Some(RegexFallback.name());
        used_fallback = true;
    }

    let records = filter::final_cleanup(records);
    let stats = EmailStats::from_records(&records);

    tracing::info!(
        url,
        strategy = strategy.unwrap_or("none"),
        faculty = stats.total,
        with_email = stats.with_email,
        high_confidence = stats.high_confidence,
        medium_confidence = stats.medium_confidence,
        success_rate = %format!("{:.1}%", stats.success_rate()),
        "page extracted"
    );

    let summary = (!records.is_empty()).then(|| PageSummary {
        url: url.to_string(),
        total_faculty: records.len(),
        university: page.university.clone(),
        department: page.department.clone(),
        scraped_at,
        is_summary: true,
    });

    PageExtraction {
        url: url.to_string(),
        records,
        summary,
        stats,
        strategy,
        used_fallback,
    }
}
