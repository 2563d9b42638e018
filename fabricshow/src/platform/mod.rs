//! Platform definitions.
//!
//! A platform names the switch commands the collector runs and the output
//! patterns that mark a command as failed.

pub mod brocade;
mod definition;

pub use definition::PlatformDefinition;
