//! Alias block extraction from the zone dump.
//!
//! The zone dump lists aliases as records that may span several lines:
//!
//! ```text
//!  alias: hostA_hba0
//!                 50:06:0e:80:03:a2:90:01; 50:06:0e:80:03:a2:90:02
//!  alias: array1  50:06:0e:80:03:a2:90:10
//!
//! Effective configuration:
//! ```
//!
//! The block starts at the first `alias:` line and ends at the first blank
//! line after it.

use std::fmt;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;

use super::database::AliasDatabase;
use crate::error::{ParseAnomaly, Region};

/// First token of every alias header line.
pub const ALIAS_INTRODUCER: &str = "alias:";

/// A zone member token: a WWN, optionally followed by the separator.
static MEMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9A-Fa-f]{2}:){7}[0-9A-Fa-f]{2};?$").unwrap());

/// One alias definition, reassembled from its header and continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRecord {
    /// Alias name.
    pub name: String,

    /// Member tokens as they appear in the dump (separator not stripped).
    pub members: Vec<String>,
}

impl fmt::Display for AliasRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ALIAS_INTRODUCER, self.name)?;
        for member in &self.members {
            write!(f, " {}", member)?;
        }
        Ok(())
    }
}

/// Result of scanning a zone dump.
#[derive(Debug, Clone, Default)]
pub struct AliasExtraction {
    /// Alias records in dump order.
    pub records: Vec<AliasRecord>,

    /// The whole zone dump, verbatim.
    pub raw: Vec<String>,

    /// Lines in the alias block that matched no known shape.
    pub anomalies: Vec<ParseAnomaly>,
}

impl AliasExtraction {
    /// Build the alias database from the extracted records.
    pub fn database(&self) -> AliasDatabase {
        AliasDatabase::from_records(&self.records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Skipping,
    InBlock,
    Done,
}

struct Extractor {
    state: State,
    pending: Option<AliasRecord>,
    out: AliasExtraction,
}

impl Extractor {
    fn new() -> Self {
        Self {
            state: State::Skipping,
            pending: None,
            out: AliasExtraction::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        self.out.raw.push(line.to_string());

        let words: Vec<&str> = line.split_whitespace().collect();

        if self.state == State::Skipping {
            if words.first() == Some(&ALIAS_INTRODUCER) {
                self.state = State::InBlock;
            } else {
                return;
            }
        }
        if self.state == State::Done {
            return;
        }

        if words.is_empty() {
            self.flush();
            self.state = State::Done;
        } else if words[0] == ALIAS_INTRODUCER {
            self.flush();
            match words.get(1) {
                Some(name) => {
                    self.pending = Some(AliasRecord {
                        name: name.to_string(),
                        members: words[2..].iter().map(|w| w.to_string()).collect(),
                    });
                }
                None => self.anomaly(line, "alias header without a name"),
            }
        } else if is_continuation(line, &words) {
            match self.pending.as_mut() {
                Some(record) => record.members.extend(words.iter().map(|w| w.to_string())),
                None => self.anomaly(line, "continuation line with no open alias"),
            }
        } else {
            self.anomaly(line, "unexpected line in alias block");
        }
    }

    fn flush(&mut self) {
        if let Some(record) = self.pending.take() {
            debug!("alias record: {}", record);
            self.out.records.push(record);
        }
    }

    fn anomaly(&mut self, line: &str, reason: &str) {
        debug!("alias block anomaly: {}: '{}'", reason, line.trim_end());
        self.out
            .anomalies
            .push(ParseAnomaly::new(Region::AliasBlock, line.trim_end(), reason));
    }

    fn finish(mut self) -> AliasExtraction {
        if self.state == State::InBlock {
            self.flush();
        }
        self.out
    }
}

/// Indented lines continue the open alias, as do bare member lists.
fn is_continuation(line: &str, words: &[&str]) -> bool {
    line.starts_with('\t')
        || line.starts_with("  ")
        || words.iter().all(|w| MEMBER_TOKEN.is_match(w))
}

/// Scan a zone dump and reassemble its alias records.
///
/// Lines that fit no known shape are collected as anomalies; the rest of
/// the block is still processed.
pub fn extract_aliases<S: AsRef<str>>(lines: &[S]) -> AliasExtraction {
    let mut extractor = Extractor::new();
    for line in lines {
        extractor.feed(line.as_ref().trim_end_matches(['\r', '\n']));
    }
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONESHOW: &str = "Defined configuration:
 cfg:\tPROD_CFG
\t\thostA_zone; hostB_zone
 zone:\thostA_zone
\t\thostA_hba0; array1
 alias:\thostA_hba0
\t\t50:06:0e:80:03:a2:90:01
 alias:\thostB_hba0
\t\t10:00:00:00:c9:aa:bb:01; 10:00:00:00:c9:aa:bb:02
 alias:\tarray1\t50:06:0e:80:03:a2:90:10

Effective configuration:
 cfg:\tPROD_CFG
 zone:\thostA_zone
\t\t50:06:0e:80:03:a2:90:01
";

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_scenario_unindented_members() {
        let dump = [
            "alias: hostA_hba0",
            "50:06:0e:80:03:a2:90:01;",
            "alias: hostA_hba1",
            "50:06:0e:80:03:a2:90:02;",
            "",
        ];
        let extraction = extract_aliases(&dump);
        assert!(extraction.anomalies.is_empty());

        let db = extraction.database();
        assert_eq!(db.len(), 2);
        assert_eq!(db.lookup("50:06:0e:80:03:a2:90:01"), Some("hostA_hba0"));
        assert_eq!(db.lookup("50:06:0e:80:03:a2:90:02"), Some("hostA_hba1"));
    }

    #[test]
    fn test_full_zoneshow() {
        let extraction = extract_aliases(&lines(ZONESHOW));
        assert!(extraction.anomalies.is_empty());
        assert_eq!(extraction.records.len(), 3);
        assert_eq!(
            extraction.records[1],
            AliasRecord {
                name: "hostB_hba0".to_string(),
                members: vec![
                    "10:00:00:00:c9:aa:bb:01;".to_string(),
                    "10:00:00:00:c9:aa:bb:02".to_string(),
                ],
            }
        );

        let db = extraction.database();
        assert_eq!(db.lookup("10:00:00:00:c9:aa:bb:01"), Some("hostB_hba0"));
        assert_eq!(db.lookup("10:00:00:00:c9:aa:bb:02"), Some("hostB_hba0"));
        assert_eq!(db.lookup("50:06:0e:80:03:a2:90:10"), Some("array1"));
    }

    #[test]
    fn test_raw_dump_kept_verbatim() {
        let input = lines(ZONESHOW);
        let extraction = extract_aliases(&input);
        assert_eq!(extraction.raw, input);
    }

    #[test]
    fn test_record_display() {
        let extraction = extract_aliases(&lines(ZONESHOW));
        assert_eq!(
            extraction
                .records
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "alias: hostA_hba0 50:06:0e:80:03:a2:90:01",
                "alias: hostB_hba0 10:00:00:00:c9:aa:bb:01; 10:00:00:00:c9:aa:bb:02",
                "alias: array1 50:06:0e:80:03:a2:90:10",
            ]
        );
    }

    #[test]
    fn test_block_ends_at_blank_line() {
        let dump = [
            " alias: first 10:00:00:00:c9:00:00:01",
            "",
            " alias: ignored 10:00:00:00:c9:00:00:02",
            "",
        ];
        let extraction = extract_aliases(&dump);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].name, "first");
    }

    #[test]
    fn test_end_of_input_flushes_pending() {
        let dump = [" alias: last", "\t\t10:00:00:00:c9:00:00:03"];
        let db = extract_aliases(&dump).database();
        assert_eq!(db.lookup("10:00:00:00:c9:00:00:03"), Some("last"));
    }

    #[test]
    fn test_unexpected_line_is_anomaly() {
        let dump = [
            " alias: hostA_hba0 50:06:0e:80:03:a2:90:01",
            "garbage here",
            "\t\t50:06:0e:80:03:a2:90:02",
            "",
        ];
        let extraction = extract_aliases(&dump);
        assert_eq!(extraction.anomalies.len(), 1);
        assert_eq!(extraction.anomalies[0].region, Region::AliasBlock);
        assert_eq!(extraction.anomalies[0].line, "garbage here");

        // The rest of the block is still processed.
        let db = extraction.database();
        assert_eq!(db.lookup("50:06:0e:80:03:a2:90:02"), Some("hostA_hba0"));
    }

    #[test]
    fn test_header_without_name_is_anomaly() {
        let dump = [" alias:", "\t\t50:06:0e:80:03:a2:90:02", ""];
        let extraction = extract_aliases(&dump);
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.anomalies.len(), 2);
    }

    #[test]
    fn test_no_alias_block() {
        let dump = ["Defined configuration:", " cfg: CFG zone1", ""];
        let extraction = extract_aliases(&dump);
        assert!(extraction.records.is_empty());
        assert!(extraction.anomalies.is_empty());
        assert_eq!(extraction.raw.len(), 3);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let input = lines(ZONESHOW);
        assert_eq!(
            extract_aliases(&input).database(),
            extract_aliases(&input).database()
        );
    }

    #[test]
    fn test_trailing_newlines_tolerated() {
        let dump = [
            " alias: hostA_hba0\n",
            "\t\t50:06:0e:80:03:a2:90:01\r\n",
            "\n",
            " alias: late 10:00:00:00:c9:00:00:09\n",
        ];
        let extraction = extract_aliases(&dump);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(
            extraction.database().lookup("50:06:0e:80:03:a2:90:01"),
            Some("hostA_hba0")
        );
    }
}
