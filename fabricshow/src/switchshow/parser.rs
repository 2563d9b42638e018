//! Port table extraction from the switchshow dump.

use log::debug;

use super::classifier::classify;
use super::header::HeaderContext;
use super::record::PortRecord;
use crate::error::{ParseAnomaly, Region, Result};
use crate::resolver::PortResolver;

/// Classified port table of one switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortTable {
    /// The column header the body was parsed with.
    pub header: Option<HeaderContext>,

    /// One record per body line, in dump order.
    pub records: Vec<PortRecord>,

    /// Lines that only produced best-effort records.
    pub anomalies: Vec<ParseAnomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Skipping,
    HeaderSeen,
    InTable,
}

/// Parse a switchshow dump into port records.
///
/// Everything up to the `=` rule after the column header is preamble; each
/// non-blank line after the rule is classified into exactly one record.
pub async fn parse_port_table<S, R>(lines: &[S], resolver: &mut R) -> Result<PortTable>
where
    S: AsRef<str> + Sync,
    R: PortResolver,
{
    let mut state = State::Skipping;
    let mut header: Option<HeaderContext> = None;
    let mut table = PortTable::default();

    for line in lines {
        let line = line.as_ref();
        match state {
            State::Skipping | State::HeaderSeen => {
                if HeaderContext::is_separator(line) {
                    if header.is_none() {
                        table.anomalies.push(ParseAnomaly::new(
                            Region::PortTable,
                            line.trim(),
                            "table rule before any column header",
                        ));
                    }
                    state = State::InTable;
                } else if HeaderContext::is_header(line) {
                    header = Some(HeaderContext::new(line));
                    state = State::HeaderSeen;
                }
            }
            State::InTable => {
                if line.trim().is_empty() {
                    continue;
                }
                let context = header.get_or_insert_with(HeaderContext::default);
                let classification = classify(context, line, resolver).await?;
                if let Some(reason) = classification.anomaly {
                    table
                        .anomalies
                        .push(ParseAnomaly::new(Region::PortTable, line.trim(), reason));
                }
                table.records.push(classification.record);
            }
        }
    }

    if state != State::InTable {
        debug!("switchshow output has no port table");
        table.anomalies.push(ParseAnomaly::new(
            Region::PortTable,
            "",
            "no port table found",
        ));
    }

    table.header = header;
    Ok(table)
}
