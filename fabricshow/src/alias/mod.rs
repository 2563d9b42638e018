//! Zone alias handling.
//!
//! The zone dump is scanned once per fabric to build an [`AliasDatabase`]
//! mapping WWNs to the human-assigned alias names used in port reports.

mod database;
mod extractor;

pub use database::{AliasDatabase, NO_ALIAS, strip_separator};
pub use extractor::{ALIAS_INTRODUCER, AliasExtraction, AliasRecord, extract_aliases};
