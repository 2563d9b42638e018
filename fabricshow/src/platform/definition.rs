//! Platform definition for switch-specific commands.

/// Commands and failure patterns for one switch operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "brocade_fos").
    pub name: String,

    /// Command dumping the zone database, including aliases.
    pub zone_dump_command: String,

    /// Command dumping the port table.
    pub port_table_command: String,

    /// Command showing one port's details; the port number is appended.
    pub port_detail_command: String,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,
}

impl PlatformDefinition {
    /// Create an empty platform definition named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone_dump_command: String::new(),
            port_table_command: String::new(),
            port_detail_command: String::new(),
            failed_when_contains: vec![],
        }
    }

    /// Set the zone dump command.
    pub fn with_zone_dump_command(mut self, command: impl Into<String>) -> Self {
        self.zone_dump_command = command.into();
        self
    }

    /// Set the port table command.
    pub fn with_port_table_command(mut self, command: impl Into<String>) -> Self {
        self.port_table_command = command.into();
        self
    }

    /// Set the per-port detail command.
    pub fn with_port_detail_command(mut self, command: impl Into<String>) -> Self {
        self.port_detail_command = command.into();
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// The detail command for one port.
    pub fn port_detail(&self, port: &str) -> String {
        format!("{} {}", self.port_detail_command, port)
    }

    /// The first failure pattern found in `output`, if any.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}
