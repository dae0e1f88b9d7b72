//! Email Confidence Module
//!
//! Scores how likely an email address belongs to a named person.
//! Rules apply in priority order, first match wins:
//! - 0.95: `first.last` or `last.first`
//! - 0.85: `first.<last initial>`
//! - 0.75: first name, longer than 5 chars
//! - 0.70: last name, longer than 5 chars
//! - 0.50: first or last name anywhere
//! - 0.10: no match

use crate::types::EmailSource;

/// Minimum confidence for an email to be attached to a record.
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Above this an email counts as name-matched.
pub const NAME_MATCH_CONFIDENCE: f64 = 0.7;

const EXACT_MATCH: f64 = 0.95;
const INITIAL_MATCH: f64 = 0.85;
const LONG_FIRST_MATCH: f64 = 0.75;
const LONG_LAST_MATCH: f64 = 0.7;
const PARTIAL_MATCH: f64 = 0.5;
const NO_MATCH: f64 = 0.1;

/// Score how likely `email` belongs to `name`. Returns 0 for empty input.
pub fn email_confidence(name: &str, email: &str) -> f64 {
    let email = email.trim().to_lowercase();
    let tokens: Vec<String> = name.split_whitespace().map(|t| t.to_lowercase()).collect();
    if email.is_empty() || tokens.is_empty() {
        return 0.0;
    }

    let first = tokens[0].as_str();
    let last = if tokens.len() > 1 {
        tokens[tokens.len() - 1].as_str()
    } else {
        ""
    };

    if !last.is_empty()
        && (email.contains(&format!("{}.{}", first, last))
            || email.contains(&format!("{}.{}", last, first)))
    {
        return EXACT_MATCH;
    }

    if let Some(initial) = last.chars().next() {
        if email.contains(&format!("{}.{}", first, initial)) {
            return INITIAL_MATCH;
        }
    }

    if email.contains(first) && first.chars().count() > 5 {
        return LONG_FIRST_MATCH;
    }

    if !last.is_empty() && email.contains(last) && last.chars().count() > 5 {
        return LONG_LAST_MATCH;
    }

    if email.contains(first) || (!last.is_empty() && email.contains(last)) {
        return PARTIAL_MATCH;
    }

    NO_MATCH
}

/// True when a confidence clears the acceptance threshold.
pub fn is_acceptable(confidence: f64) -> bool {
    confidence > MIN_CONFIDENCE
}

/// Provenance label for proximity-based strategies.
pub fn provenance(confidence: f64) -> EmailSource {
    if confidence > NAME_MATCH_CONFIDENCE {
        EmailSource::NameMatched
    } else {
        EmailSource::SectionMatched
    }
}

/// Pick the highest-scoring candidate email for `name`.
///
/// Ties keep the earlier candidate. Returns an empty email with score 0 when
/// there are no candidates.
pub fn best_email<'a, I>(name: &str, candidates: I) -> (String, f64)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best = (String::new(), 0.0);
    for candidate in candidates {
        let score = email_confidence(name, candidate);
        if score > best.1 {
            best = (candidate.to_string(), score);
        }
    }
    best
}
