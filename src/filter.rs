use crate::types::FacultyRecord;
use regex::Regex;
use std::sync::LazyLock;

// ============================================
// Keyword Denylists
// ============================================

/// Names that are really a phone number.
static PHONE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}$").unwrap());

/// Group/ensemble names, matched case-sensitively.
const GROUP_NAME_KEYWORDS: &[&str] = &["String Quartet", "Affiliated faculty"];

/// Group/ensemble names, matched on the lowercased name.
const GROUP_NAME_KEYWORDS_LOWER: &[&str] = &["ensemble"];

/// Only rejected at final cleanup.
const CLEANUP_KEYWORDS_LOWER: &[&str] = &["jupiter"];

/// Titles that mark a group rather than a person.
const GROUP_TITLE_KEYWORDS: &[&str] = &["Group", "Quartet"];

/// Field labels that leak into names when a parse goes wrong.
const LABEL_NAMES: &[&str] = &["Email", "Phone"];

/// Placeholder names produced by broken markup.
const PLACEHOLDER_NAMES: &[&str] = &["undefined", "null"];

// ============================================
// Name Checks
// ============================================

/// True for ensembles, quartets and "Affiliated faculty" headings.
pub fn is_group_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    GROUP_NAME_KEYWORDS.iter().any(|k| name.contains(k))
        || GROUP_NAME_KEYWORDS_LOWER.iter().any(|k| lower.contains(k))
}

/// True when any title marks the entry as a group.
pub fn has_group_title(titles: &[String]) -> bool {
    titles
        .iter()
        .any(|t| GROUP_TITLE_KEYWORDS.iter().any(|k| t.contains(k)))
}

/// True when a "name" is really a phone number or a field label.
pub fn is_bad_name(name: &str) -> bool {
    let name = name.trim();
    PHONE_NAME_RE.is_match(name) || LABEL_NAMES.contains(&name)
}

/// Whitespace-separated word count.
pub fn word_count(name: &str) -> usize {
    name.split_whitespace().count()
}

/// Final acceptance test for a record name.
pub fn is_valid_person_name(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() || PLACEHOLDER_NAMES.contains(&name) {
        return false;
    }

    let lower = name.to_lowercase();
    if CLEANUP_KEYWORDS_LOWER.iter().any(|k| lower.contains(k)) || is_group_name(name) {
        return false;
    }

    word_count(name) >= 2 && !is_bad_name(name)
}

/// Drop every record whose name fails [`is_valid_person_name`].
pub fn final_cleanup(records: Vec<FacultyRecord>) -> Vec<FacultyRecord> {
    let before = records.len();
    let cleaned: Vec<FacultyRecord> = records
        .into_iter()
        .filter(|r| is_valid_person_name(&r.name))
        .collect();

    if cleaned.len() < before {
        tracing::debug!(removed = before - cleaned.len(), "final cleanup removed records");
    }
    cleaned
}
