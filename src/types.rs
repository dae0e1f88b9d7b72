use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a record's email came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailSource {
    #[default]
    None,
    MailtoLink,
    ContactElement,
    TextPattern,
    NameMatched,
    SectionMatched,
    ProximityFallback,
}

/// Social profile links, one slot per platform. Empty string means not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Socials {
    pub youtube: String,
    pub facebook: String,
    pub instagram: String,
    pub reddit: String,
    pub linkedin: String,
    pub tiktok: String,
}

impl Socials {
    /// Number of platforms with a link.
    pub fn found(&self) -> usize {
        [
            &self.youtube,
            &self.facebook,
            &self.instagram,
            &self.reddit,
            &self.linkedin,
            &self.tiktok,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .count()
    }
}

/// One detected person on one directory page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRecord {
    pub name: String,
    pub titles: Vec<String>,
    pub profile_link: String,
    pub email: String,
    pub email_confidence: f64,
    pub email_source: EmailSource,
    pub phone: String,
    pub bio: String,
    pub socials: Socials,
    pub university: String,
    pub department: String,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
}

/// Per-page summary pushed after the page's records.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub url: String,
    pub total_faculty: usize,
    pub university: String,
    pub department: String,
    pub scraped_at: DateTime<Utc>,
    pub is_summary: bool,
}

/// Email extraction statistics for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total: usize,
    pub with_email: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
}

impl EmailStats {
    pub fn from_records(records: &[FacultyRecord]) -> Self {
        Self {
            total: records.len(),
            with_email: records.iter().filter(|r| !r.email.is_empty()).count(),
            high_confidence: records.iter().filter(|r| r.email_confidence > 0.7).count(),
            medium_confidence: records
                .iter()
                .filter(|r| r.email_confidence > 0.3 && r.email_confidence <= 0.7)
                .count(),
        }
    }

    /// Share of records with an email, as a percentage. Zero for an empty page.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.with_email as f64 / self.total as f64 * 100.0
    }
}
