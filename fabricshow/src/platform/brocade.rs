//! Brocade Fabric OS platform definition.
//!
//! Works with FOS switches from the 4100 class upward, including bladed
//! DCX chassis whose port table carries a `Slot` column.

use crate::platform::PlatformDefinition;

/// Platform name for Brocade Fabric OS.
pub const PLATFORM_NAME: &str = "brocade_fos";

/// Create the Brocade FOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME)
        .with_zone_dump_command("zoneshow")
        .with_port_table_command("switchshow")
        .with_port_detail_command("portshow")
        .with_failure_pattern("command not found")
        .with_failure_pattern("Permission denied")
        .with_failure_pattern("Invalid port")
        .with_failure_pattern("not permitted")
}
