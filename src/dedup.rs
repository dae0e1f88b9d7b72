//! Record Deduplication
//!
//! Candidate records are unique per page by a composite identity key. Each
//! strategy declares which fields make up its key; the first-seen record
//! for a key is kept and later ones are dropped.

use crate::types::FacultyRecord;
use std::collections::HashSet;

/// Fields that make up a record's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey {
    /// name + profile link
    NameLink,
    /// name + email
    NameEmail,
    /// name + email + profile link
    NameEmailLink,
}

impl IdentityKey {
    pub fn key_for(&self, record: &FacultyRecord) -> String {
        match self {
            IdentityKey::NameLink => format!("{}-{}", record.name, record.profile_link),
            IdentityKey::NameEmail => format!("{}-{}", record.name, record.email),
            IdentityKey::NameEmailLink => format!(
                "{}-{}-{}",
                record.name, record.email, record.profile_link
            ),
        }
    }
}

/// Keys seen so far for one candidate set.
#[derive(Debug)]
pub struct SeenRecords {
    identity: IdentityKey,
    seen: HashSet<String>,
}

impl SeenRecords {
    pub fn new(identity: IdentityKey) -> Self {
        Self {
            identity,
            seen: HashSet::new(),
        }
    }

    /// Record the key; true if it had not been seen.
    pub fn insert(&mut self, record: &FacultyRecord) -> bool {
        self.seen.insert(self.identity.key_for(record))
    }
}

/// Keep the first record for each identity key, preserving order.
pub fn dedupe(records: Vec<FacultyRecord>, identity: IdentityKey) -> Vec<FacultyRecord> {
    let mut seen = SeenRecords::new(identity);
    records.into_iter().filter(|r| seen.insert(r)).collect()
}
