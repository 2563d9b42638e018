//! WWN to alias lookup table.

use std::collections::HashMap;

use log::trace;

use super::extractor::AliasRecord;

/// Alias reported for WWNs with no zone alias.
pub const NO_ALIAS: &str = "no_alias";

/// Separator that terminates member tokens in the zone dump.
const MEMBER_SEPARATOR: char = ';';

/// Strip the trailing member separator from a zone dump token.
///
/// Idempotent: stripping an already stripped token returns it unchanged.
pub fn strip_separator(token: &str) -> &str {
    token.trim_end_matches(MEMBER_SEPARATOR)
}

/// Mapping from WWN to alias name for one fabric.
///
/// Keys are case-insensitive. Built once from the fabric's zone dump and
/// only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasDatabase {
    aliases: HashMap<String, String>,
}

impl AliasDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from extracted alias records, in order.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AliasRecord>) -> Self {
        let mut db = Self::new();
        for record in records {
            db.insert_record(record);
        }
        db
    }

    /// Map every member of `record` to the record's name.
    ///
    /// A WWN defined again later wins over the earlier definition.
    pub fn insert_record(&mut self, record: &AliasRecord) {
        for member in &record.members {
            self.insert(member, &record.name);
        }
    }

    /// Map a single (possibly separator-terminated) WWN token to `alias`.
    pub fn insert(&mut self, wwn: &str, alias: &str) {
        let key = Self::key(wwn);
        if key.is_empty() {
            return;
        }
        trace!("alias {} => {}", key, alias);
        self.aliases.insert(key, alias.to_string());
    }

    /// Look up the alias for a WWN.
    pub fn lookup(&self, wwn: &str) -> Option<&str> {
        self.aliases.get(&Self::key(wwn)).map(String::as_str)
    }

    /// Number of WWNs with an alias.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if no aliases are known.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn key(wwn: &str) -> String {
        strip_separator(wwn.trim()).to_ascii_lowercase()
    }
}
