use crate::filter;
use crate::types::FacultyRecord;

/// Share of bad names above which a parse is considered systemically wrong.
pub const BAD_NAME_THRESHOLD: f64 = 0.5;

/// Number of records whose name is a phone number or a field label.
pub fn bad_name_count(records: &[FacultyRecord]) -> usize {
    records.iter().filter(|r| filter::is_bad_name(&r.name)).count()
}

/// True when more than half of the accepted records have bad names.
pub fn needs_fallback(records: &[FacultyRecord]) -> bool {
    if records.is_empty() {
        return false;
    }
    bad_name_count(records) as f64 > records.len() as f64 * BAD_NAME_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmailSource, Socials};
    use chrono::Utc;

    fn named(name: &str) -> FacultyRecord {
        FacultyRecord {
            name: name.to_string(),
            titles: vec![],
            profile_link: String::new(),
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
    fn test_majority_phone_names_trigger() {
        let records = vec![named("(801) 581-6762"), named("801.581.6763"), named("Jane Smith")];
        assert!(needs_fallback(&records));
    }

    #[test]
    fn test_exactly_half_does_not_trigger() {
        let records = vec![named("Phone"), named("Jane Smith")];
        assert!(!needs_fallback(&records));
    }

    #[test]
    fn test_empty_does_not_trigger() {
        assert!(!needs_fallback(&[]));
    }
}
