//! Tabular rows: one table row (or row-like div) per person, with email,
//! phone and title in separate cells.

use super::{Candidate, PageContext, Strategy};
use crate::confidence;
use crate::dedup::IdentityKey;
use crate::dom;
use crate::fields;
use crate::filter;
use crate::types::{EmailSource, FacultyRecord};
use scraper::ElementRef;

const EXCLUDED_NAME_FRAGMENTS: &[&str] =
    &["Email", "Phone", "Office", "Room", "Directory", "Faculty"];

const CELL_SELECTOR: &str = "td, .cell, .info";

pub struct TabularRows;

impl Strategy for TabularRows {
    fn name(&self) -> &'static str {
        "tabular-rows"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameEmailLink
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let mut records = vec![];

        for row in dom::select_all(page.document, &page.config.table_row_selector) {
            let Some(name) = row_name(row) else {
                continue;
            };

            let mut contact = cell_contact(row, &name);

            if contact.email.is_empty() || contact.titles.is_empty() {
                fill_from_row_text(&mut contact, &dom::raw_text(row), &name);
            }

            if filter::has_group_title(&contact.titles) || filter::word_count(&name) < 2 {
                continue;
            }

            let score = confidence::email_confidence(&name, &contact.email);
            let email_source = if contact.email.is_empty() {
                EmailSource::None
            } else {
                confidence::provenance(score)
            };

            let profile_link = page.links.resolve(&name);
            records.push(page.record(Candidate {
                name,
                titles: contact.titles,
                profile_link,
                email: contact.email,
                email_confidence: score,
                email_source,
                phone: contact.phone,
            }));
        }

        records
    }
}

#[derive(Debug, Default)]
struct RowContact {
    email: String,
    phone: String,
    titles: Vec<String>,
}

fn row_name(row: ElementRef) -> Option<String> {
    let name = dom::first_within(row, "a").map(dom::text)?;
    let len = name.chars().count();
    if !(3..=50).contains(&len)
        || EXCLUDED_NAME_FRAGMENTS.iter().any(|f| name.contains(f))
        || filter::is_group_name(&name)
    {
        return None;
    }
    Some(name)
}

/// Classify each cell as email, phone or title.
fn cell_contact(row: ElementRef, name: &str) -> RowContact {
    let mut contact = RowContact::default();
    let mut email_score = 0.0;

    for cell in dom::select_within(row, CELL_SELECTOR) {
        let text = dom::text(cell);

        if text.contains('@') && text.contains(".edu") {
            let address = fields::find_emails(&text)
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| text.clone());
            let score = confidence::email_confidence(name, &address);
            if confidence::is_acceptable(score) && score > email_score {
                contact.email = address;
                email_score = score;
            }
        }

        let phone = fields::extract_phone(&text);
        if !phone.is_empty() {
            contact.phone = phone.clone();
        }

        let len = text.chars().count();
        if !text.contains('@') && phone.is_empty() && text != name && (6..100).contains(&len) {
            contact.titles.push(text);
        }
    }

    contact
}

/// Fill missing email/phone/title from the whole row's text.
fn fill_from_row_text(contact: &mut RowContact, row_text: &str, name: &str) {
    if contact.email.is_empty() {
        let (email, score) = confidence::best_email(name, fields::find_emails(row_text));
        if confidence::is_acceptable(score) {
            contact.email = email;
        }
    }
    if contact.phone.is_empty() {
        contact.phone = fields::extract_phone(row_text);
    }

    if contact.titles.is_empty() {
        let residual = strip_first(row_text, &[name, &contact.email, &contact.phone]);
        let len = residual.chars().count();
        if (6..100).contains(&len) {
            contact.titles.push(residual);
        }
    }
}

/// Remove the first occurrence of each non-empty pattern, then collapse whitespace.
pub(crate) fn strip_first(text: &str, patterns: &[&str]) -> String {
    let mut residual = text.to_string();
    for pattern in patterns.iter().filter(|p| !p.is_empty()) {
        residual = residual.replacen(pattern, " ", 1);
    }
    dom::collapse_whitespace(&residual)
}
