//! Page Metadata Extractors
//!
//! Independent extractors for the fields shared by every record on a page:
//! - university name from the hostname
//! - department from URL path, then page content
//! - social links (first link per platform)
//! - North American phone numbers and email addresses

use crate::dom;
use crate::types::Socials;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use url::Url;

pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());

pub static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

pub const UNKNOWN_UNIVERSITY: &str = "Unknown University";
pub const DEFAULT_DEPARTMENT: &str = "School of Music";

// ============================================
// University
// ============================================

/// Known institution domains. Full hostnames take precedence over the
/// registrable domain.
const UNIVERSITY_DOMAINS: &[(&str, &str)] = &[
    ("utah.edu", "University of Utah"),
    ("indiana.edu", "Indiana University"),
    ("usf.edu", "University of South Florida"),
    ("umich.edu", "University of Michigan"),
    ("ku.edu", "University of Kansas"),
    ("illinois.edu", "University of Illinois"),
    ("miami.edu", "University of Miami"),
    ("northwestern.edu", "Northwestern University"),
    ("yale.edu", "Yale University"),
    ("berklee.edu", "Berklee College of Music"),
    ("unf.edu", "University of North Florida"),
    ("sc.edu", "University of South Carolina"),
    ("music.utah.edu", "University of Utah"),
    ("music.indiana.edu", "Indiana University"),
    ("music.illinois.edu", "University of Illinois"),
    ("music.ku.edu", "University of Kansas"),
];

fn lookup_university(domain: &str) -> Option<&'static str> {
    UNIVERSITY_DOMAINS
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, name)| *name)
}

/// University name for a page URL.
pub fn university_name(url: &str) -> String {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    else {
        return UNKNOWN_UNIVERSITY.to_string();
    };

    if let Some(name) = lookup_university(&host) {
        return name.to_string();
    }

    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() < 2 {
        return UNKNOWN_UNIVERSITY.to_string();
    }

    let domain = parts[parts.len() - 2..].join(".");
    if let Some(name) = lookup_university(&domain) {
        return name.to_string();
    }

    format!("{} University", capitalize(parts[parts.len() - 2]))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================
// Department
// ============================================

/// URL path fragments -> department, checked in order.
const URL_DEPARTMENTS: &[(&[&str], &str)] = &[
    (&["/music/"], "School of Music"),
    (&["/arts/"], "School of Arts"),
    (&["/theater/", "/theatre/"], "Department of Theater"),
    (&["/dance/"], "Department of Dance"),
    (&["/psychology/"], "Department of Psychology"),
    (&["/counseling/"], "Department of Counseling"),
    (&["/therapy/"], "Department of Therapy"),
];

/// Page-content phrases -> department, checked in order. The more specific
/// phrase of each pair comes first ("college of music" before "school of music").
const CONTENT_DEPARTMENTS: &[(&str, &str)] = &[
    ("college of music", "College of Music"),
    ("school of music", "School of Music"),
    ("conservatory", "Conservatory"),
    ("department of music", "Department of Music"),
    ("music faculty", "School of Music"),
    ("music department", "School of Music"),
    ("college of arts", "College of Arts"),
    ("school of arts", "School of Arts"),
    ("fine arts", "School of Fine Arts"),
    ("performing arts", "School of Performing Arts"),
    ("school of psychology", "School of Psychology"),
    ("department of psychology", "Department of Psychology"),
    ("counseling", "Department of Counseling"),
    ("therapy", "Department of Therapy"),
    ("theater", "Department of Theater"),
    ("theatre", "Department of Theater"),
    ("dance", "Department of Dance"),
];

/// Department for a page: URL path first, then body/title/h1 text.
pub fn department_name(url: &str, document: &Html) -> String {
    let url_lower = url.to_lowercase();
    for (fragments, department) in URL_DEPARTMENTS {
        if fragments.iter().any(|f| url_lower.contains(f)) {
            return department.to_string();
        }
    }

    let all_text = format!(
        "{} {} {}",
        dom::body_text(document),
        dom::first_text(document, "title"),
        dom::first_text(document, "h1"),
    )
    .to_lowercase();

    department_from_text(&all_text)
}

/// Department implied by already-lowercased page text.
pub fn department_from_text(text: &str) -> String {
    CONTENT_DEPARTMENTS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, department)| department.to_string())
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string())
}

// ============================================
// Socials / Phone
// ============================================

/// First link per social platform found on the page.
pub fn extract_socials(document: &Html) -> Socials {
    let mut socials = Socials::default();

    for anchor in dom::select_all(document, "a") {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = href.to_lowercase();

        let slot = if url.contains("youtube.com") || url.contains("youtu.be") {
            &mut socials.youtube
        } else if url.contains("facebook.com") || url.contains("fb.com") {
            &mut socials.facebook
        } else if url.contains("instagram.com") {
            &mut socials.instagram
        } else if url.contains("reddit.com") {
            &mut socials.reddit
        } else if url.contains("linkedin.com") {
            &mut socials.linkedin
        } else if url.contains("tiktok.com") {
            &mut socials.tiktok
        } else {
            continue;
        };

        if slot.is_empty() {
            *slot = href.to_string();
        }
    }

    socials
}

/// Every email address in `text`, in order of appearance.
pub fn find_emails(text: &str) -> Vec<&str> {
    EMAIL_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Address part of a `mailto:` href: scheme and `?query` removed.
pub fn clean_mailto(href: &str) -> String {
    let href = href.trim();
    let address = match href.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => &href[7..],
        _ => href,
    };
    address.split('?').next().unwrap_or_default().trim().to_string()
}

/// First phone number in `text`, or empty.
pub fn extract_phone(text: &str) -> String {
    PHONE_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_mailto() {
        assert_eq!(clean_mailto("mailto:jane.smith@utah.edu"), "jane.smith@utah.edu");
        assert_eq!(clean_mailto("MAILTO:jane@utah.edu?subject=Hi"), "jane@utah.edu");
        assert_eq!(clean_mailto("mailto:"), "");
    }

    #[test]
    fn test_find_emails() {
        let text = "Contact jane.smith@utah.edu or music@utah.edu (office)";
        assert_eq!(find_emails(text), vec!["jane.smith@utah.edu", "music@utah.edu"]);
        assert!(find_emails("no address here").is_empty());
    }

    #[test]
    fn test_university_exact_and_domain() {
        assert_eq!(university_name("https://music.utah.edu/faculty/"), "University of Utah");
        assert_eq!(
            university_name("https://www.unf.edu/coas/music/"),
            "University of North Florida"
        );
        assert_eq!(university_name("https://cs.stanford.edu/people"), "Stanford University");
    }

    #[test]
    fn test_university_fallbacks() {
        assert_eq!(university_name("not a url"), UNKNOWN_UNIVERSITY);
        assert_eq!(university_name("http://localhost/faculty"), UNKNOWN_UNIVERSITY);
    }

    #[test]
    fn test_department_from_url() {
        let doc = Html::parse_document("<body>Conservatory</body>");
        assert_eq!(department_name("https://x.edu/theatre/people/", &doc), "Department of Theater");
        assert_eq!(department_name("https://x.edu/music/faculty", &doc), "School of Music");
        assert_eq!(department_name("https://x.edu/people", &doc), "Conservatory");
    }

    #[test]
    fn test_department_from_content() {
        assert_eq!(department_from_text("welcome to the college of music"), "College of Music");
        assert_eq!(
            department_from_text("school of music and college of music"),
            "College of Music"
        );
        assert_eq!(department_from_text("the conservatory faculty"), "Conservatory");
        assert_eq!(department_from_text("department of psychology"), "Department of Psychology");
        assert_eq!(department_from_text("nothing relevant"), DEFAULT_DEPARTMENT);
    }

    #[test]
    fn test_department_uses_title_and_heading() {
        let doc = Html::parse_document(
            "<html><head><title>Fine Arts Faculty</title></head><body><p>People</p></body></html>",
        );
        assert_eq!(department_name("https://x.edu/people", &doc), "School of Fine Arts");
    }

    #[test]
    fn test_socials_all_platforms() {
        let doc = Html::parse_document(
            r#"<a href="https://youtube.com/c/music">yt</a>
               <a href="https://facebook.com/music">fb</a>
               <a href="https://instagram.com/music">ig</a>
               <a href="https://reddit.com/r/music">rd</a>
               <a href="https://linkedin.com/school/music">li</a>
               <a href="https://tiktok.com/@music">tt</a>"#,
        );
        let socials = extract_socials(&doc);
        assert_eq!(socials.found(), 6);
        assert_eq!(socials.tiktok, "https://tiktok.com/@music");
    }

    #[test]
    fn test_socials_first_link_wins() {
        let doc = Html::parse_document(
            r#"<a href="https://youtube.com/first">a</a><a href="https://youtu.be/second">b</a>"#,
        );
        let socials = extract_socials(&doc);
        assert_eq!(socials.youtube, "https://youtube.com/first");
        assert_eq!(socials.found(), 1);
    }

    #[test]
    fn test_extract_phone() {
        assert_eq!(extract_phone("Office: 204 Phone: (801) 581-6762"), "(801) 581-6762");
        assert_eq!(extract_phone("call 904.620.2960 today"), "904.620.2960");
        assert_eq!(extract_phone("no digits here"), "");
    }
}
