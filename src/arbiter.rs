//! Strategy Arbiter
//!
//! Compares the tabular candidate set against the results already chosen by
//! the ordered strategies. The tabular set replaces them when:
//! - its bad-name rate is strictly lower, or
//! - its profile-link coverage is more than 0.2 higher

use crate::filter;
use crate::types::FacultyRecord;

/// Link-coverage margin the tabular set must beat.
const LINK_RATE_MARGIN: f64 = 0.2;

/// Quality of one candidate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    pub count: usize,
    pub bad_name_rate: f64,
    pub link_rate: f64,
}

impl QualityMetrics {
    /// Metrics for a candidate set. An empty set scores as all-bad with no links.
    pub fn of(records: &[FacultyRecord]) -> Self {
        if records.is_empty() {
            return Self {
                count: 0,
                bad_name_rate: 1.0,
                link_rate: 0.0,
            };
        }

        let total = records.len() as f64;
        let bad = records
            .iter()
            .filter(|r| filter::is_bad_name(&r.name) || r.name.chars().count() < 3)
            .count();
        let linked = records.iter().filter(|r| !r.profile_link.is_empty()).count();

        Self {
            count: records.len(),
            bad_name_rate: bad as f64 / total,
            link_rate: linked as f64 / total,
        }
    }
}

/// True when the tabular candidates should replace the existing results.
pub fn should_replace(existing: &QualityMetrics, tabular: &QualityMetrics) -> bool {
    tabular.bad_name_rate < existing.bad_name_rate
        || tabular.link_rate > existing.link_rate + LINK_RATE_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmailSource, Socials};
    use chrono::Utc;

    fn metrics(bad_name_rate: f64, link_rate: f64) -> QualityMetrics {
        QualityMetrics {
            count: 10,
            bad_name_rate,
            link_rate,
        }
    }

    fn make_record(name: &str, link: &str) -> FacultyRecord {
        FacultyRecord {
            name: name.to_string(),
            titles: vec![],
            profile_link: link.to_string(),
            email: String::new(),
            email_confidence: 0.0,
            email_source: EmailSource::None,
            phone: String::new(),
            bio: String::new(),
            socials: Socials::default(),
            university: String::new(),
            department: String::new(),
            source_url: String::new(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_lower_bad_rate_wins() {
        assert!(should_replace(&metrics(0.4, 0.5), &metrics(0.2, 0.5)));
    }

    #[test]
    fn test_link_rate_margin_wins() {
        assert!(should_replace(&metrics(0.1, 0.3), &metrics(0.1, 0.6)));
    }

    #[test]
    fn test_equal_quality_keeps_existing() {
        assert!(!should_replace(&metrics(0.1, 0.5), &metrics(0.1, 0.6)));
        assert!(!should_replace(&metrics(0.0, 1.0), &metrics(0.0, 1.0)));
    }

    #[test]
    fn test_metrics_of_records() {
        let records = vec![
            make_record("Jane Smith", "https://x.edu/jane"),
            make_record("(801) 581-6762", ""),
            make_record("Email", ""),
            make_record("Mark Jones", "https://x.edu/mark"),
        ];
        let m = QualityMetrics::of(&records);
        assert_eq!(m.count, 4);
        assert_eq!(m.bad_name_rate, 0.5);
        assert_eq!(m.link_rate, 0.5);
    }

    #[test]
    fn test_empty_set_is_worst() {
        let m = QualityMetrics::of(&[]);
        assert_eq!(m.bad_name_rate, 1.0);
        assert_eq!(m.link_rate, 0.0);
    }
}
