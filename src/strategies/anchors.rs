//! Directory anchors: one profile link per person (`/faculty/jane-smith.php`),
//! with contact details in the surrounding block.

use super::{Candidate, PageContext, Strategy};
use crate::confidence;
use crate::dedup::IdentityKey;
use crate::dom;
use crate::fields;
use crate::filter;
use crate::types::{EmailSource, FacultyRecord};
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

const EXCLUDED_NAME_FRAGMENTS: &[&str] = &[
    "Email",
    "Office",
    "Next Steps",
    "View",
    "Faculty Directory",
    "Resources",
    "Open Positions",
    "Faculty by Area",
];

const EXCLUDED_HREF_FRAGMENTS: &[&str] = &["resources", "open-positions", "faculty-area"];

/// Contact labels and everything after them.
static CONTACT_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(Office:|Phone:|Email).*$").unwrap());

static LEADING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\W+").unwrap());

const BLOCK_TAGS: &[&str] = &["p", "div", "tr"];
const TITLE_SCOPE_TAGS: &[&str] = &["tr", "p", "div"];

pub struct DirectoryAnchors;

impl Strategy for DirectoryAnchors {
    fn name(&self) -> &'static str {
        "directory-anchors"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameLink
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let path = page.config.directory_profile_path.as_str();
        let extension = page.config.directory_profile_extension.as_str();
        let index_page = format!("index{}", extension);
        let selector = format!(r#"a[href*="{}"][href*="{}"]"#, path, extension);
        let mut records = vec![];

        for anchor in dom::select_all(page.document, &selector) {
            let href = anchor.value().attr("href").unwrap_or_default();
            let name = dom::text(anchor);
            let len = name.chars().count();
            if !(3..50).contains(&len)
                || EXCLUDED_NAME_FRAGMENTS.iter().any(|f| name.contains(f))
                || href.contains(&index_page)
                || EXCLUDED_HREF_FRAGMENTS.iter().any(|f| href.contains(f))
                || filter::is_group_name(&name)
            {
                continue;
            }

            let titles = anchor_titles(anchor, &name);
            if filter::has_group_title(&titles) {
                continue;
            }

            let (email, score) = section_email(anchor, &name);
            let (email, email_source) = if confidence::is_acceptable(score) {
                (email, confidence::provenance(score))
            } else {
                (String::new(), EmailSource::None)
            };

            let profile_link = page.links.resolve(&name);
            records.push(page.record(Candidate {
                name,
                titles,
                profile_link,
                email,
                email_confidence: score,
                email_source,
                phone: String::new(),
            }));
        }

        records
    }
}

/// Best `mailto:` address in the anchor's block, then one level up.
fn section_email(anchor: ElementRef, name: &str) -> (String, f64) {
    let Some(block) = dom::closest(anchor, BLOCK_TAGS) else {
        return (String::new(), 0.0);
    };

    let mut scopes = vec![block];
    scopes.extend(dom::parent_element(block));

    for scope in scopes {
        let addresses: Vec<String> = dom::select_within(scope, r#"a[href^="mailto:"]"#)
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .map(fields::clean_mailto)
            .filter(|e| !e.is_empty())
            .collect();

        let (email, score) = confidence::best_email(name, addresses.iter().map(String::as_str));
        if confidence::is_acceptable(score) {
            return (email, score);
        }
    }

    (String::new(), 0.0)
}

/// Text following the name in the anchor's row or paragraph.
fn anchor_titles(anchor: ElementRef, name: &str) -> Vec<String> {
    let Some(scope) = dom::closest(anchor, TITLE_SCOPE_TAGS) else {
        return vec![];
    };
    let text = dom::raw_text(scope);
    let Some((_, after)) = text.split_once(name) else {
        return vec![];
    };

    let title = clean_title(after);
    let len = title.chars().count();
    if (4..100).contains(&len) {
        vec![title]
    } else {
        vec![]
    }
}

fn clean_title(raw: &str) -> String {
    let without_tail = CONTACT_TAIL_RE.replace(raw, "");
    let trimmed = LEADING_PUNCT_RE.replace(&without_tail, "");
    dom::collapse_whitespace(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use chrono::Utc;
    use scraper::Html;

    fn run(html: &str) -> Vec<FacultyRecord> {
        let doc = Html::parse_document(html);
        let config = ExtractionConfig::default();
        let page = PageContext::new(&doc, "https://music.utah.edu/faculty/", Utc::now(), &config);
        DirectoryAnchors.candidates(&page)
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title(", Professor of Horn Office: DGH 204"), "Professor of Horn");
        assert_eq!(clean_title(" - Lecturer\n  Email me"), "Lecturer");
        assert_eq!(clean_title("  Associate Professor  "), "Associate Professor");
    }

    #[test]
    fn test_anchor_rows() {
        let records = run(r#"<html><body><table>
            <tr><td><a href="/faculty/smith-jane.php">Jane Smith</a>, Professor of Horn
                Office: DGH 204 <a href="mailto:jane.smith@utah.edu">Email</a></td></tr>
            <tr><td><a href="/faculty/jones-mark.php">Mark Jones</a> Lecturer
                <a href="mailto:office@utah.edu">Email</a></td></tr>
            <tr><td><a href="/faculty/index.php">Faculty Home</a></td></tr>
            <tr><td><a href="/faculty/resources.php">Teaching Resources</a></td></tr>
        </table></body></html>"#);

        assert_eq!(records.len(), 2);
        let jane = &records[0];
        assert_eq!(jane.name, "Jane Smith");
        assert_eq!(jane.email, "jane.smith@utah.edu");
        assert_eq!(jane.email_source, EmailSource::NameMatched);
        assert_eq!(jane.titles, vec!["Professor of Horn".to_string()]);
        assert_eq!(jane.profile_link, "https://music.utah.edu/faculty/smith-jane.php");

        let mark = &records[1];
        assert!(mark.email.is_empty());
        assert_eq!(mark.email_source, EmailSource::None);
        assert_eq!(mark.titles, vec!["Lecturer".to_string()]);
    }

    #[test]
    fn test_email_found_one_level_up() {
        let records = run(r#"<html><body>
            <div class="entry">
                <p><a href="/faculty/wong-alice.php">Alice Wong</a></p>
                <span><a href="mailto:alice.wong@utah.edu">alice.wong@utah.edu</a></span>
            </div>
        </body></html>"#);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "alice.wong@utah.edu");
        assert_eq!(records[0].email_confidence, 0.95);
    }
}
