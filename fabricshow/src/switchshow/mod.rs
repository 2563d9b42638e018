//! Switchshow port table parsing.
//!
//! Turns the port table of a switchshow dump into [`PortRecord`]s, resolving
//! attached WWNs to zone aliases along the way.

mod classifier;
mod header;
mod parser;
mod record;

pub use classifier::{Classification, classify};
pub use header::HeaderContext;
pub use parser::{PortTable, parse_port_table};
pub use record::{PortDetail, PortRecord, PortState, PortType};
