//! Extraction Strategies
//!
//! Each strategy scans the parsed page under a different structural
//! assumption and returns its own candidate list. The chain runs them as:
//! 1. ordered strategies, first non-empty result wins
//! 2. the tabular strategy, always evaluated, may replace the result via the arbiter
//!
//! The regex fallback pass is not part of the chain; the quality gate invokes it.

mod anchors;
mod cards;
mod fallback;
mod lines;
mod structured;
mod tabular;

pub use anchors::DirectoryAnchors;
pub use cards::PersonCards;
pub use fallback::RegexFallback;
pub use lines::LineProximity;
pub use structured::StructuredList;
pub use tabular::TabularRows;

use crate::arbiter::{self, QualityMetrics};
use crate::config::ExtractionConfig;
use crate::dedup::{self, IdentityKey};
use crate::fields;
use crate::links::{self, ProfileLinkIndex};
use crate::types::{EmailSource, FacultyRecord, Socials};
use chrono::{DateTime, Utc};
use scraper::Html;

/// Titles kept per record.
pub const MAX_TITLES: usize = 3;

/// Everything a strategy may read about the page being processed.
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub url: &'a str,
    pub base_url: String,
    pub links: ProfileLinkIndex,
    pub university: String,
    pub department: String,
    pub socials: Socials,
    pub scraped_at: DateTime<Utc>,
    pub config: &'a ExtractionConfig,
}

impl<'a> PageContext<'a> {
    pub fn new(
        document: &'a Html,
        url: &'a str,
        scraped_at: DateTime<Utc>,
        config: &'a ExtractionConfig,
    ) -> Self {
        Self {
            document,
            url,
            base_url: links::base_url(url),
            links: ProfileLinkIndex::build(document, url),
            university: fields::university_name(url),
            department: fields::department_name(url, document),
            socials: fields::extract_socials(document),
            scraped_at,
            config,
        }
    }

    /// Absolute form of an href found on this page.
    pub fn absolutize(&self, href: &str) -> String {
        crate::dom::absolutize(href, self.url, &self.base_url)
    }

    /// Stamp page metadata onto a candidate.
    pub fn record(&self, candidate: Candidate) -> FacultyRecord {
        let mut titles = candidate.titles;
        titles.truncate(MAX_TITLES);

        FacultyRecord {
            name: candidate.name,
            titles,
            profile_link: candidate.profile_link,
            email: candidate.email,
            email_confidence: candidate.email_confidence,
            email_source: candidate.email_source,
            phone: candidate.phone,
            bio: String::new(),
            socials: self.socials.clone(),
            university: self.university.clone(),
            department: self.department.clone(),
            source_url: self.url.to_string(),
            scraped_at: self.scraped_at,
        }
    }
}

/// Person-specific fields a strategy fills in.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub name: String,
    pub titles: Vec<String>,
    pub profile_link: String,
    pub email: String,
    pub email_confidence: f64,
    pub email_source: EmailSource,
    pub phone: String,
}

pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fields that identify a record within this strategy's candidates.
    fn identity(&self) -> IdentityKey;

    /// Raw candidates, possibly with duplicates.
    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord>;

    /// Candidates with duplicates removed by [`Strategy::identity`].
    fn candidates(&self, page: &PageContext) -> Vec<FacultyRecord> {
        dedup::dedupe(self.extract(page), self.identity())
    }
}

/// Result of running the chain on one page.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub records: Vec<FacultyRecord>,
    /// Strategy whose candidates were selected, if any produced records.
    pub strategy: Option<&'static str>,
}

pub struct StrategyChain {
    ordered: Vec<Box<dyn Strategy>>,
    terminal: Box<dyn Strategy>,
}

impl StrategyChain {
    pub fn new(ordered: Vec<Box<dyn Strategy>>, terminal: Box<dyn Strategy>) -> Self {
        Self { ordered, terminal }
    }

    /// Structured list, person cards, line proximity, directory anchors;
    /// tabular rows as the terminal step.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Box::new(StructuredList),
                Box::new(PersonCards),
                Box::new(LineProximity),
                Box::new(DirectoryAnchors),
            ],
            Box::new(TabularRows),
        )
    }

    pub fn run(&self, page: &PageContext) -> ChainOutcome {
        let mut outcome = ChainOutcome {
            records: vec![],
            strategy: None,
        };

        for strategy in &self.ordered {
            let candidates = strategy.candidates(page);
            tracing::debug!(
                strategy = strategy.name(),
                found = candidates.len(),
                "strategy finished"
            );
            if !candidates.is_empty() {
                outcome = ChainOutcome {
                    records: candidates,
                    strategy: Some(strategy.name()),
                };
                break;
            }
        }

        let tabular = self.terminal.candidates(page);
        if tabular.is_empty() {
            return outcome;
        }

        let existing = QualityMetrics::of(&outcome.records);
        let challenger = QualityMetrics::of(&tabular);
        tracing::debug!(
            existing_bad_rate = existing.bad_name_rate,
            existing_link_rate = existing.link_rate,
            existing_count = existing.count,
            tabular_bad_rate = challenger.bad_name_rate,
            tabular_link_rate = challenger.link_rate,
            tabular_count = challenger.count,
            "comparing tabular candidates"
        );

        if arbiter::should_replace(&existing, &challenger) {
            tracing::info!(
                replaced = outcome.strategy.unwrap_or("none"),
                "using tabular results"
            );
            ChainOutcome {
                records: tabular,
                strategy: Some(self.terminal.name()),
            }
        } else {
            outcome
        }
    }
}
