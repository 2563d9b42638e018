//! Normalized port records.

use std::fmt;

use serde::Serialize;

/// Port or link state of a switchshow line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PortState {
    Disabled,
    NoCard,
    LaserFault,
    PortDiagFault,
    LockingReference,
    Testing,
    NoLight,
    NoModule,
    Online,
    /// `No_Sync`, `In_Sync` and similar.
    Sync(String),
    /// Any other state token, kept verbatim.
    Other(String),
}

impl PortState {
    /// Interpret a raw state token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "Disabled" => PortState::Disabled,
            "No_Card" => PortState::NoCard,
            "Laser_Flt" | "Laser_Fault" => PortState::LaserFault,
            "Diag_Flt" | "Port_Diag_Fault" => PortState::PortDiagFault,
            "Lock_Ref" | "Lock_ref" | "Locking_Reference" => PortState::LockingReference,
            "Testing" => PortState::Testing,
            "No_Light" => PortState::NoLight,
            "No_Module" => PortState::NoModule,
            "Online" => PortState::Online,
            t if t.contains("Sync") => PortState::Sync(t.to_string()),
            t => PortState::Other(t.to_string()),
        }
    }

    /// Name used in reports.
    pub fn as_str(&self) -> &str {
        match self {
            PortState::Disabled => "Disabled",
            PortState::NoCard => "No_Card",
            PortState::LaserFault => "Laser_Fault",
            PortState::PortDiagFault => "Port_Diag_Fault",
            PortState::LockingReference => "Locking_Reference",
            PortState::Testing => "Testing",
            PortState::NoLight => "No_Light",
            PortState::NoModule => "No_Module",
            PortState::Online => "Online",
            PortState::Sync(raw) | PortState::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an online port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PortType {
    /// No SFP module in the port.
    NoModule,
    /// Inter-switch link.
    EPort,
    /// Loop or shared port.
    LPort,
    /// Fabric-attached end device.
    FPort,
    /// Any other role token, kept verbatim.
    Other(String),
}

impl PortType {
    /// Interpret a raw port type token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "No_Module" => PortType::NoModule,
            "E-Port" => PortType::EPort,
            "L-Port" => PortType::LPort,
            "F-Port" => PortType::FPort,
            t => PortType::Other(t.to_string()),
        }
    }

    /// Name used in reports.
    pub fn as_str(&self) -> &str {
        match self {
            PortType::NoModule => "No_Module",
            PortType::EPort => "E-Port",
            PortType::LPort => "L-Port",
            PortType::FPort => "F-Port",
            PortType::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port type and message of a port-type-bearing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortDetail {
    pub port_type: PortType,

    /// Empty, diagnostic text, one `WWN => alias` pair, or several pairs
    /// joined by ` | `.
    pub message: String,
}

/// One classified switchshow line.
///
/// Has three fields (port, speed, state) for terse states, or five when
/// `detail` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecord {
    /// Port number, or `slot/port` on bladed chassis.
    pub port: String,
    pub speed: String,
    pub state: PortState,
    pub detail: Option<PortDetail>,
}

impl PortRecord {
    /// A record with only port, speed and state.
    pub fn terse(port: impl Into<String>, speed: impl Into<String>, state: PortState) -> Self {
        Self {
            port: port.into(),
            speed: speed.into(),
            state,
            detail: None,
        }
    }

    /// A record carrying a port type and message.
    pub fn detailed(
        port: impl Into<String>,
        speed: impl Into<String>,
        state: PortState,
        port_type: PortType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            port: port.into(),
            speed: speed.into(),
            state,
            detail: Some(PortDetail {
                port_type,
                message: message.into(),
            }),
        }
    }

    pub fn port_type(&self) -> Option<&PortType> {
        self.detail.as_ref().map(|d| &d.port_type)
    }

    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.message.as_str())
    }

    /// The record as 3 or 5 text fields.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.port.clone(),
            self.speed.clone(),
            self.state.to_string(),
        ];
        if let Some(detail) = &self.detail {
            fields.push(detail.port_type.to_string());
            fields.push(detail.message.clone());
        }
        fields
    }
}
