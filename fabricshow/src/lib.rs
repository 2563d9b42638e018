//! # fabricshow
//!
//! Alias-enriched port reports for Brocade Fibre Channel fabrics.
//!
//! fabricshow logs into each switch of a fabric over SSH, reads the zone
//! dump (`zoneshow`) once to learn the fabric's WWN aliases, then parses
//! every switch's port table (`switchshow`) and replaces each attached WWN
//! with `WWN => alias`. Ports hosting several devices (L-Ports, NPIV
//! F-Ports) are expanded through the per-port detail dump (`portshow`).
//!
//! ## Features
//!
//! - Async SSH sessions via russh, one exec channel per command
//! - Zone dump alias extraction with multi-line records
//! - Header-aware port table parsing (Slot and Address columns)
//! - Ordered, table-driven port line classification
//! - Per-switch failure isolation and parse anomaly reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fabricshow::{SessionBuilder, SshConnector, collect_fabric, platform::brocade};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fabricshow::Error> {
//!     let connector = SshConnector::new(
//!         SessionBuilder::new("san-a1.example.com")
//!             .username("admin")
//!             .password("secret"),
//!     );
//!
//!     let hosts = vec!["san-a1.example.com".to_string()];
//!     let report = collect_fabric(&connector, "fabric_a", &hosts, &brocade::platform()).await;
//!
//!     fabricshow::report::write_fabric_report(".", &report).await?;
//!     Ok(())
//! }
//! ```

pub mod alias;
pub mod collector;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod switchshow;
pub mod transport;

// Re-export main types for convenience
pub use alias::{AliasDatabase, AliasRecord, extract_aliases};
pub use collector::{FabricReport, SwitchReport, collect_fabric};
pub use driver::{CommandRunner, Connector, Response, SessionBuilder, SshConnector, SwitchSession};
pub use error::{Error, ParseAnomaly, Result};
pub use inventory::Inventory;
pub use platform::PlatformDefinition;
pub use resolver::PortResolver;
pub use switchshow::{PortRecord, PortState, PortTable, PortType, parse_port_table};
pub use transport::{AuthMethod, SshConfig};
