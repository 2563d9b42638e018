//! Classification of one switchshow port line.
//!
//! A body line is first reduced to `[port, speed, state, type, message...]`
//! using the column layout from the [`HeaderContext`]. The reduced line is
//! then matched against [`RULES`], an ordered decision table; the first rule
//! that applies decides the shape of the resulting [`PortRecord`]. Order
//! matters: literal fault states win over everything, and `No_Light` lines
//! must be caught before the generic field-count rules.

use log::trace;

use super::header::HeaderContext;
use super::record::{PortRecord, PortState, PortType};
use crate::alias::NO_ALIAS;
use crate::error::Result;
use crate::resolver::PortResolver;

/// Placeholder for fields a malformed line does not provide.
const MISSING: &str = "?";

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub record: PortRecord,

    /// Name of the rule that decided the record.
    pub rule: &'static str,

    /// Why the record is only a best-effort one, if it is.
    pub anomaly: Option<String>,
}

/// A body line reduced to its reportable tokens.
struct Line<'a> {
    raw: &'a str,
    tokens: Vec<&'a str>,
}

impl Line<'_> {
    fn token(&self, index: usize) -> &str {
        self.tokens.get(index).copied().unwrap_or(MISSING)
    }

    fn port_type(&self) -> Option<&str> {
        self.tokens.get(3).copied()
    }

    fn message(&self) -> String {
        self.tokens.get(4..).map(|m| m.join(" ")).unwrap_or_default()
    }
}

/// What to do with a line once a rule has matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Three fields with a fixed state name.
    Fixed(&'static str),
    /// The first three tokens as they are.
    Terse,
    /// Port type and message kept verbatim.
    Verbatim,
    /// Message replaced by every attached device's `WWN => alias`.
    FanOut,
    /// Message is a single WWN, rendered as `WWN => alias`.
    SingleDevice,
    /// Port type not known; kept verbatim and reported.
    Unclassified,
    /// Too few tokens for any shape.
    Malformed,
}

struct Rule {
    name: &'static str,
    applies: fn(&Line<'_>) -> bool,
    outcome: Outcome,
}

/// The decision table, evaluated top to bottom.
const RULES: &[Rule] = &[
    Rule {
        name: "disabled",
        applies: |l| l.raw.contains("Disabled"),
        outcome: Outcome::Fixed("Disabled"),
    },
    Rule {
        name: "no_card",
        applies: |l| l.raw.contains("No_Card"),
        outcome: Outcome::Fixed("No_Card"),
    },
    Rule {
        name: "laser_fault",
        applies: |l| l.raw.contains("Laser_Flt"),
        outcome: Outcome::Fixed("Laser_Fault"),
    },
    Rule {
        name: "diag_fault",
        applies: |l| l.raw.contains("Diag_Flt"),
        outcome: Outcome::Fixed("Port_Diag_Fault"),
    },
    Rule {
        name: "lock_ref",
        applies: |l| l.raw.contains("Lock_ref") || l.raw.contains("Lock_Ref"),
        outcome: Outcome::Fixed("Locking_Reference"),
    },
    Rule {
        name: "testing",
        applies: |l| l.raw.contains("Testing"),
        outcome: Outcome::Fixed("Testing"),
    },
    Rule {
        name: "no_light_or_sync",
        applies: |l| l.tokens.get(2) == Some(&"No_Light") || l.token(1).contains("Sync"),
        outcome: Outcome::Terse,
    },
    Rule {
        name: "terse",
        applies: |l| l.tokens.len() == 3,
        outcome: Outcome::Terse,
    },
    Rule {
        name: "short",
        applies: |l| l.tokens.len() < 4,
        outcome: Outcome::Malformed,
    },
    Rule {
        name: "no_module",
        applies: |l| l.port_type() == Some("No_Module") || l.token(2) == "No_Module",
        outcome: Outcome::Verbatim,
    },
    Rule {
        name: "e_port",
        applies: |l| l.port_type() == Some("E-Port"),
        outcome: Outcome::Verbatim,
    },
    Rule {
        name: "fan_out",
        applies: |l| l.port_type() == Some("L-Port") || l.message().contains("NPIV"),
        outcome: Outcome::FanOut,
    },
    Rule {
        name: "f_port",
        applies: |l| l.port_type() == Some("F-Port"),
        outcome: Outcome::SingleDevice,
    },
    Rule {
        name: "unclassified",
        applies: |_| true,
        outcome: Outcome::Unclassified,
    },
];

/// Drop the columns that are not reported, according to the header.
///
/// Returns the tokens reduced so far and, if the line ran out of columns,
/// the reason.
fn reduce(header: &HeaderContext, raw: &str) -> (Vec<String>, Option<&'static str>) {
    let mut tokens: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        return (tokens, Some("empty port line"));
    }

    // Area / Index
    tokens.remove(0);

    if header.has_slot() {
        if tokens.len() < 2 {
            return (tokens, Some("missing slot or port column"));
        }
        let port = tokens.remove(1);
        tokens[0] = format!("{}/{}", tokens[0], port);
    }

    if header.has_address() {
        if tokens.len() < 2 {
            return (tokens, Some("missing address column"));
        }
        tokens.remove(1);
    }

    // Media id
    if tokens.len() < 2 {
        return (tokens, Some("missing media column"));
    }
    tokens.remove(1);

    // Protocol qualifier of FC-tagged rows
    if raw.contains(" FC") && tokens.len() > 3 {
        tokens.remove(3);
    }

    (tokens, None)
}

fn render_pair(wwn: &str, alias: Option<&str>) -> String {
    format!("{} => {}", wwn, alias.unwrap_or(NO_ALIAS))
}

/// Classify one port table body line.
///
/// Never drops a line: shapes that fit no rule yield a best-effort record
/// with `anomaly` set. Only a failed device lookup is an error.
pub async fn classify<R: PortResolver>(
    header: &HeaderContext,
    raw_line: &str,
    resolver: &mut R,
) -> Result<Classification> {
    let raw = raw_line.trim();

    let (owned, reduce_anomaly) = reduce(header, raw);
    let line = Line {
        raw,
        tokens: owned.iter().map(String::as_str).collect(),
    };

    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(&line))
        .unwrap_or(&RULES[RULES.len() - 1]);

    // A line that could not be reduced only keeps its fixed-state verdict.
    let outcome = match (reduce_anomaly, rule.outcome) {
        (Some(_), Outcome::Fixed(state)) => Outcome::Fixed(state),
        (Some(_), _) => Outcome::Malformed,
        (None, outcome) => outcome,
    };
    trace!("port line '{}' matched rule '{}'", raw, rule.name);

    let mut anomaly = reduce_anomaly.map(str::to_string);
    let port = line.token(0).to_string();
    let speed = line.token(1).to_string();

    let record = match outcome {
        Outcome::Fixed(state) => PortRecord::terse(port, speed, PortState::from_token(state)),
        Outcome::Terse => {
            if line.tokens.len() < 3 {
                anomaly.get_or_insert_with(|| "too few columns".to_string());
            }
            PortRecord::terse(port, speed, PortState::from_token(line.token(2)))
        }
        Outcome::Malformed => {
            anomaly.get_or_insert_with(|| "too few columns".to_string());
            PortRecord::terse(port, speed, PortState::from_token(line.token(2)))
        }
        Outcome::Verbatim => PortRecord::detailed(
            port,
            speed,
            PortState::from_token(line.token(2)),
            PortType::from_token(line.token(3)),
            line.message(),
        ),
        Outcome::FanOut => {
            let wwns = resolver.port_devices(&port).await?;
            let message = wwns
                .iter()
                .map(|wwn| render_pair(wwn, resolver.alias(wwn)))
                .collect::<Vec<_>>()
                .join(" | ");
            PortRecord::detailed(
                port,
                speed,
                PortState::from_token(line.token(2)),
                PortType::from_token(line.token(3)),
                message,
            )
        }
        Outcome::SingleDevice => {
            let wwn = line.message();
            let message = if wwn.is_empty() {
                anomaly = Some("F-Port without attached WWN".to_string());
                String::new()
            } else {
                render_pair(&wwn, resolver.alias(&wwn))
            };
            PortRecord::detailed(
                port,
                speed,
                PortState::from_token(line.token(2)),
                PortType::FPort,
                message,
            )
        }
        Outcome::Unclassified => {
            anomaly = Some(format!("unrecognized port type '{}'", line.token(3)));
            PortRecord::detailed(
                port,
                speed,
                PortState::from_token(line.token(2)),
                PortType::from_token(line.token(3)),
                line.message(),
            )
        }
    };

    Ok(Classification {
        record,
        rule: rule.name,
        anomaly,
    })
}
