//! Regex fallback pass. Run once by the quality gate when the chosen
//! strategy produced mostly bogus names.

use super::tabular::strip_first;
use super::{Candidate, PageContext, Strategy};
use crate::confidence;
use crate::dedup::IdentityKey;
use crate::dom;
use crate::fields;
use crate::filter;
use crate::types::{EmailSource, FacultyRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Two or three capitalized words.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]*)?)").unwrap()
});

const EXCLUDED_NAME_FRAGMENTS: &[&str] = &["Email", "Phone", "Room", "Office"];

const ROW_SELECTOR: &str = "tr, div, p";

pub struct RegexFallback;

impl Strategy for RegexFallback {
    fn name(&self) -> &'static str {
        "regex-fallback"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameEmail
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let mut records = vec![];

        for container in dom::select_all(page.document, &page.config.fallback_container_selector) {
            for row in dom::select_within(container, ROW_SELECTOR) {
                let row_text = dom::text(row);
                let Some(found) = NAME_RE.find(&row_text) else {
                    continue;
                };
                let matched = found.as_str();
                let name = dom::collapse_whitespace(matched);
                if filter::word_count(&name) < 2
                    || name.chars().count() >= 50
                    || EXCLUDED_NAME_FRAGMENTS.iter().any(|f| name.contains(f))
                    || filter::is_group_name(&name)
                {
                    continue;
                }

                let (email, score) = confidence::best_email(&name, fields::find_emails(&row_text));
                let (email, email_source) = if !confidence::is_acceptable(score) {
                    (String::new(), EmailSource::None)
                } else if score > confidence::NAME_MATCH_CONFIDENCE {
                    (email, EmailSource::NameMatched)
                } else {
                    (email, EmailSource::ProximityFallback)
                };

                let phone = fields::extract_phone(&row_text);
                let title = strip_first(&row_text, &[matched, &email, &phone]);
                let titles = if title.is_empty() || title.chars().count() >= 100 {
                    vec![]
                } else {
                    vec![title]
                };

                let profile_link = page.links.resolve(&name);
                records.push(page.record(Candidate {
                    name,
                    titles,
                    profile_link,
                    email,
                    email_confidence: score,
                    email_source,
                    phone,
                }));
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use chrono::Utc;
    use scraper::Html;

    #[test]
    fn test_recovers_people_from_shuffled_rows() {
        let doc = Html::parse_document(concat!(
            "<html><body><table>\n",
            "<tr><td>(904) 620-2961</td> <td>Jane Smith</td> ",
            "<td>jane.smith@unf.edu</td> <td>Professor</td></tr>\n",
            "<tr><td>(904) 620-2962</td> <td>Mark Jones</td> ",
            "<td>mjones@unf.edu</td> <td>Lecturer</td></tr>\n",
            "<tr><td>(904) 620-2963</td> <td>Room 14</td></tr>\n",
            "</table></body></html>",
        ));
        let config = ExtractionConfig::default();
        let url = "https://www.unf.edu/coas/music/faculty.html";
        let page = PageContext::new(&doc, url, Utc::now(), &config);

        let records = RegexFallback.candidates(&page);
        assert_eq!(records.len(), 2);

        let jane = &records[0];
        assert_eq!(jane.name, "Jane Smith");
        assert_eq!(jane.email, "jane.smith@unf.edu");
        assert_eq!(jane.email_source, EmailSource::NameMatched);
        assert_eq!(jane.phone, "(904) 620-2961");
        assert_eq!(jane.titles, vec!["Professor".to_string()]);

        let mark = &records[1];
        assert_eq!(mark.email_source, EmailSource::ProximityFallback);
        assert_eq!(mark.titles, vec!["Lecturer".to_string()]);
    }
}
