//! Error types for fabricshow.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Main error type for fabricshow operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A command could not be run on a switch, or its output was unusable
    #[error("Remote execution error: {0}")]
    Remote(#[from] RemoteError),

    /// Inventory / configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local I/O error (report writing)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts (strict checking)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors running a command on an open switch session.
///
/// Any of these is fatal for the current switch's pass: NPIV fan-out
/// cannot be resolved without the secondary lookup.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Session not open
    #[error("Session not connected - call open() first")]
    NotConnected,

    /// Session already open
    #[error("Session already connected")]
    AlreadyConnected,

    /// Command output matched a failure pattern or the command exited non-zero
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Command did not complete within the session timeout
    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Inventory file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Inventory file could not be read
    #[error("Cannot read inventory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Line is not of the form `<switch> => <fabric>`
    #[error("Cannot parse inventory line {line_no}: '{line}'")]
    InvalidLine { line_no: usize, line: String },

    /// Requested fabric is not defined
    #[error("Fabric '{name}' not found in inventory")]
    UnknownFabric { name: String },

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidSession { message: String },
}

/// Where in the switch output a [`ParseAnomaly`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    /// The alias block of the zone dump.
    AliasBlock,
    /// The port table of the switchshow dump.
    PortTable,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::AliasBlock => write!(f, "alias block"),
            Region::PortTable => write!(f, "port table"),
        }
    }
}

/// A line that did not match any recognized shape.
///
/// Not an error: parsing continues with a best-effort result and the
/// anomaly is collected next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseAnomaly {
    pub region: Region,
    pub line: String,
    pub reason: String,
}

impl ParseAnomaly {
    pub fn new(region: Region, line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            region,
            line: line.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} in line '{}'", self.region, self.reason, self.line)
    }
}

/// Result type alias using fabricshow's Error.
pub type Result<T> = std::result::Result<T, Error>;
