//! Structured list rows (`.views-row` style CMS listings).

use super::{Candidate, PageContext, Strategy};
use crate::dedup::IdentityKey;
use crate::dom;
use crate::filter;
use crate::types::FacultyRecord;

const VIEW_PROFILE: &str = "View full profile";

pub struct StructuredList;

impl Strategy for StructuredList {
    fn name(&self) -> &'static str {
        "structured-list"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameLink
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let mut records = vec![];

        for row in dom::select_all(page.document, &page.config.list_row_selector) {
            let name = dom::first_within(row, "a").map(dom::text).unwrap_or_default();
            if name.contains(VIEW_PROFILE)
                || name.chars().count() < 3
                || filter::is_group_name(&name)
            {
                continue;
            }

            let titles: Vec<String> = dom::select_within(row, "li")
                .into_iter()
                .map(dom::text)
                .filter(|t| !t.is_empty() && !t.contains(VIEW_PROFILE))
                .collect();
            if filter::has_group_title(&titles) {
                continue;
            }

            let profile_link = page.links.resolve(&name);
            records.push(page.record(Candidate {
                name,
                titles,
                profile_link,
                ..Default::default()
            }));
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

    const PAGE: &str = r#"<html><body>
        <div class="views-row">
            <a href="/people/jane-smith">Jane Smith</a>
            <ul><li>Professor of Violin</li><li>View full profile</li></ul>
        </div>
        <div class="views-row">
            <a href="/people/mark-jones">Mark Jones</a>
            <ul><li>Lecturer</li></ul>
        </div>
        <div class="views-row">
            <a href="/people/fry">Fry Street String Quartet</a>
        </div>
        <div class="views-row">
            <a href="/people/xx">Ed</a>
        </div>
        <div class="views-row">
            <a href="/people/jupiter">Jupiter Players</a>
            <ul><li>Resident Group</li></ul>
        </div>
    </body></html>"#;

    #[test]
    fn test_extracts_rows_with_titles_and_links() {
        let doc = Html::parse_document(PAGE);
        let config = ExtractionConfig::default();
        let page = PageContext::new(&doc, "https://music.utah.edu/faculty/", Utc::now(), &config);

        let records = StructuredList.candidates(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Jane Smith");
        assert_eq!(records[0].titles, vec!["Professor of Violin".to_string()]);
        assert_eq!(records[0].profile_link, "https://music.utah.edu/people/jane-smith");
        assert!(records[0].email.is_empty());
        assert_eq!(records[1].name, "Mark Jones");
    }

    #[test]
    fn test_no_rows_yields_nothing() {
        let doc = Html::parse_document("<html><body><p>Jane Smith</p></body></html>");
        let config = ExtractionConfig::default();
        let page = PageContext::new(&doc, "https://music.utah.edu/faculty/", Utc::now(), &config);
        assert!(StructuredList.candidates(&page).is_empty());
    }
}
