//! Person cards: one `div` per person carrying a profile link, contact
//! details and titles.

use super::{Candidate, PageContext, Strategy};
use crate::confidence;
use crate::dedup::IdentityKey;
use crate::dom;
use crate::fields;
use crate::filter;
use crate::types::{EmailSource, FacultyRecord};
use scraper::ElementRef;

const CONTACT_EMAIL_SELECTOR: &str =
    ".profile-card__contact-email, .profile-card__contact-email-link";

const TITLE_SELECTOR: &str = r#".profile-card__title, .person-title, [class*="title"]"#;

/// Titles that keep a card even without a trusted email.
const ACADEMIC_KEYWORDS: &[&str] = &["professor", "instructor", "lecturer", "director", "chair"];

/// Lines of card text that read as a title.
const TITLE_LINE_KEYWORDS: &[&str] = &["professor", "director", "chair", "instructor"];

pub struct PersonCards;

impl Strategy for PersonCards {
    fn name(&self) -> &'static str {
        "person-cards"
    }

    fn identity(&self) -> IdentityKey {
        IdentityKey::NameEmailLink
    }

    fn extract(&self, page: &PageContext) -> Vec<FacultyRecord> {
        let card_selector = page.config.card_selector.as_str();
        let profile_selector = format!(r#"a[href*="{}"]"#, page.config.card_profile_path);
        let mut records = vec![];

        for card in dom::select_all(page.document, card_selector) {
            if is_wrapper(card, card_selector, &profile_selector) {
                continue;
            }

            // Photo links to the same profile carry no text.
            let Some(name_link) = dom::select_within(card, &profile_selector)
                .into_iter()
                .find(|a| !dom::text(*a).is_empty())
            else {
                continue;
            };
            let name = dom::text(name_link);
            let len = name.chars().count();
            if !(3..=50).contains(&len) || filter::is_group_name(&name) {
                continue;
            }

            let card_text = dom::raw_text(card);
            let (email, score, source) = card_email(card, &card_text, &name);
            let titles = card_titles(card, &card_text, &name);

            let has_academic_title = titles.iter().any(|t| {
                let lower = t.to_lowercase();
                ACADEMIC_KEYWORDS.iter().any(|k| lower.contains(k))
            });
            let trusted = confidence::is_acceptable(score);
            if !trusted && !has_academic_title {
                tracing::debug!(name = %name, confidence = score, "card skipped");
                continue;
            }

            let (email, email_source) = if trusted {
                (email, source)
            } else {
                (String::new(), EmailSource::None)
            };

            let profile_link = name_link
                .value()
                .attr("href")
                .map(|href| page.absolutize(href))
                .unwrap_or_default();

            records.push(page.record(Candidate {
                name,
                titles,
                profile_link,
                email,
                email_confidence: score,
                email_source,
                phone: fields::extract_phone(&card_text),
            }));
        }

        records
    }
}

/// A card that holds other people's cards rather than one person.
///
/// Nested matches without a profile link (a `person-title` line, say) do not
/// count; the inner cards are visited on their own.
fn is_wrapper(card: ElementRef, card_selector: &str, profile_selector: &str) -> bool {
    let nested_card = dom::select_within(card, card_selector)
        .into_iter()
        .any(|inner| dom::first_within(inner, profile_selector).is_some());
    if nested_card {
        return true;
    }

    let mut hrefs: Vec<&str> = dom::select_within(card, profile_selector)
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .collect();
    hrefs.sort_unstable();
    hrefs.dedup();
    hrefs.len() > 1
}

/// Email for a card: mailto link, then contact element, then text pattern.
fn card_email(card: ElementRef, card_text: &str, name: &str) -> (String, f64, EmailSource) {
    if let Some(href) = dom::first_within(card, r#"a[href^="mailto:"]"#)
        .and_then(|a| a.value().attr("href"))
    {
        let email = fields::clean_mailto(href);
        if !email.is_empty() {
            let score = confidence::email_confidence(name, &email);
            return (email, score, EmailSource::MailtoLink);
        }
    }

    if let Some(email) = dom::select_within(card, CONTACT_EMAIL_SELECTOR)
        .into_iter()
        .map(dom::text)
        .find(|t| t.contains('@'))
    {
        let score = confidence::email_confidence(name, &email);
        return (email, score, EmailSource::ContactElement);
    }

    let (email, score) = confidence::best_email(name, fields::find_emails(card_text));
    if email.is_empty() {
        (email, score, EmailSource::None)
    } else {
        (email, score, EmailSource::TextPattern)
    }
}

fn card_titles(card: ElementRef, card_text: &str, name: &str) -> Vec<String> {
    let mut titles: Vec<String> = vec![];

    for title in dom::select_within(card, TITLE_SELECTOR).into_iter().map(dom::text) {
        let len = title.chars().count();
        if title != name
            && (4..100).contains(&len)
            && !title.contains('@')
            && !fields::PHONE_RE.is_match(&title)
            && !titles.contains(&title)
        {
            titles.push(title);
        }
    }

    if !titles.is_empty() {
        return titles;
    }

    for line in card_text.lines().map(str::trim) {
        let len = line.chars().count();
        if line == name
            || !(6..100).contains(&len)
            || line.contains('@')
            || fields::PHONE_RE.is_match(line)
        {
            continue;
        }
        let lower = line.to_lowercase();
        if TITLE_LINE_KEYWORDS.iter().any(|k| lower.contains(k))
            && !titles.iter().any(|t| t == line)
        {
            titles.push(line.to_string());
        }
    }

    titles
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
        let url = "https://music.indiana.edu/faculty/";
        let page = PageContext::new(&doc, url, Utc::now(), &config);
        PersonCards.candidates(&page)
    }

    #[test]
    fn test_mailto_card() {
        let records = run(r#"<html><body><div class="people-grid">
            <div class="person-card">
                <a href="/people/profiles/smith-jane.html">Jane Smith</a>
                <div class="profile-card__title">Professor of Voice</div>
                <a href="mailto:jane.smith@indiana.edu?subject=Hello">Email</a>
                <span>(812) 855-1234</span>
            </div>
        </div></body></html>"#);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Jane Smith");
        assert_eq!(r.email, "jane.smith@indiana.edu");
        assert_eq!(r.email_confidence, 0.95);
        assert_eq!(r.email_source, EmailSource::MailtoLink);
        assert_eq!(r.titles, vec!["Professor of Voice".to_string()]);
        assert_eq!(r.phone, "(812) 855-1234");
        assert_eq!(
            r.profile_link,
            "https://music.indiana.edu/people/profiles/smith-jane.html"
        );
    }

    #[test]
    fn test_contact_element_and_text_pattern() {
        let records = run(r#"<html><body>
            <div class="person">
                <a href="/people/profiles/a">Mark Jones</a>
                <span class="profile-card__contact-email">mjones@iu.edu</span>
            </div>
            <div class="person">
                <a href="/people/profiles/b">Alice Wong</a>
                <p>Reach me at alice.wong@iu.edu</p>
            </div>
        </body></html>"#);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email_source, EmailSource::ContactElement);
        assert_eq!(records[0].email, "mjones@iu.edu");
        assert_eq!(records[1].email_source, EmailSource::TextPattern);
        assert_eq!(records[1].email_confidence, 0.95);
    }

    #[test]
    fn test_weak_email_dropped_but_academic_card_kept() {
        let records = run(r#"<html><body>
            <div class="person">
                <a href="/people/profiles/a">Jane Smith</a>
                <a href="mailto:office@iu.edu">Email</a>
                <p>Associate Professor
                </p>
            </div>
            <div class="person">
                <a href="/people/profiles/b">Mark Jones</a>
                <a href="mailto:office@iu.edu">Email</a>
            </div>
        </body></html>"#);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Jane Smith");
        assert!(r.email.is_empty());
        assert_eq!(r.email_source, EmailSource::None);
        assert_eq!(r.email_confidence, 0.1);
        assert_eq!(r.titles, vec!["Associate Professor".to_string()]);
    }

    #[test]
    fn test_cards_without_profile_link_are_skipped() {
        let records = run(r#"<html><body>
            <div class="person"><a href="/about">Jane Smith</a></div>
        </body></html>"#);
        assert!(records.is_empty());
    }

    #[test]
    fn test_cards_with_person_prefixed_children() {
        let card = |slug: &str, name: &str, title: &str, email: &str| {
            format!(
                r#"<div class="person-card">
                    <a href="/people/profiles/{slug}">{name}</a>
                    <div class="person-title">{title}</div>
                    <a href="mailto:{email}">Email</a>
                </div>"#
            )
        };
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            card("smith", "Jane Smith", "Professor of Voice", "jane.smith@indiana.edu"),
            card("jones", "Mark Jones", "Lecturer in Jazz", "mark.jones@indiana.edu"),
            card("wong", "Alice Wong", "Professor of Cello", "alice.wong@indiana.edu"),
        );

        let records = run(&html);
        assert_eq!(records.len(), 3);
        for r in &records {
            assert_eq!(r.email_confidence, 0.95);
            assert_eq!(r.email_source, EmailSource::MailtoLink);
        }
        assert_eq!(records[0].name, "Jane Smith");
        assert_eq!(records[0].titles, vec!["Professor of Voice".to_string()]);
        assert_eq!(records[2].email, "alice.wong@indiana.edu");
    }

    #[test]
    fn test_photo_and_name_links_to_same_profile() {
        let records = run(r#"<html><body>
            <div class="person-card">
                <a href="/people/profiles/smith"><img src="/img/smith.jpg"></a>
                <a href="/people/profiles/smith">Jane Smith</a>
                <a href="mailto:jane.smith@indiana.edu">Email</a>
            </div>
        </body></html>"#);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "jane.smith@indiana.edu");
    }
}
