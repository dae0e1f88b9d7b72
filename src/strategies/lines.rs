//! Line proximity: scan the page's visible text line by line and pair each
//! name-like line with an email found a few lines below it.

use super::{Candidate, PageContext, Strategy};
use crate::confidence;
use crate::dedup::IdentityKey;
use crate::dom;
use crate::fields;
use crate::filter;
use crate::types::FacultyRecord;

/// Lines searched below a candidate name.
const LOOKAHEAD: usize = 5;

/// Page chrome that is never a name.
const EXCLUDED_LINES: &[&str] = &[
    "Faculty",
    "Faculty Directory",
    "Search faculty by name, title, or position",
    "Clear input field",
    "Featured Alumni",
    "People",
];

const EXCLUDED_FRAGMENTS: &[&str] = &["Previous", "Next", "Cookie", "Settings"];

/// Department mailboxes, never a person's address.
const SHARED_MAILBOXES: &[&str] = &["music@", "info@", "admin@", "contact@"];

pub struct LineProximity;

impl Strategy for LineProximity {
    fn name(&self) -> &'static str {
        "line-proximity"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameEmail
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let text = dom::body_text(page.document);
        let lines: Vec<&str> = text
            .split('\n')
            .map(str::trim)
            .filter(|l| l.chars().count() > 1)
            .collect();

        let mut records = vec![];
        let mut i = 0;

        while i + 1 < lines.len() {
            let name = lines[i];
            if !is_name_line(name) {
                i += 1;
                continue;
            }

            let mut titles: Vec<String> = vec![];
            let mut search_text = String::new();
            let end = (i + 1 + LOOKAHEAD).min(lines.len());

            for &next in &lines[i + 1..end] {
                search_text.push(' ');
                search_text.push_str(next);

                if (next.contains('@') && next.contains(".edu")) || next == "Faculty" {
                    break;
                }
                if next.chars().count() > 5
                    && !next.contains("Faculty Directory")
                    && !next.contains("Search faculty")
                {
                    titles.push(next.to_string());
                }
            }

            let emails = fields::find_emails(&search_text)
                .into_iter()
                .filter(|e| {
                    let lower = e.to_lowercase();
                    !SHARED_MAILBOXES.iter().any(|m| lower.contains(m))
                });
            let (email, score) = confidence::best_email(name, emails);

            if !email.is_empty() && confidence::is_acceptable(score) {
                let consumed = titles.len();
                records.push(page.record(Candidate {
                    name: name.to_string(),
                    titles,
                    profile_link: page.links.resolve(name),
                    email,
                    email_confidence: score,
                    email_source: confidence::provenance(score),
                    phone: String::new(),
                }));
                i += consumed + 1;
            }

            i += 1;
        }

        records
    }
}

fn is_name_line(line: &str) -> bool {
    let len = line.chars().count();
    if EXCLUDED_LINES.contains(&line) || !(3..50).contains(&len) {
        return false;
    }
    if line.contains('@') || fields::PHONE_RE.is_match(line) {
        return false;
    }

    !EXCLUDED_FRAGMENTS.iter().any(|f| line.contains(f))
        && !filter::is_group_name(line)
        && !line.to_lowercase().contains("alumni")
}
