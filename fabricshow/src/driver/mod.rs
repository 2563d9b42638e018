//! Command execution against switches.
//!
//! The parsers never talk to a switch directly. They receive a
//! [`CommandRunner`] (one open session) and the fabric collector receives a
//! [`Connector`] that opens sessions per host. [`SwitchSession`] and
//! [`SshConnector`] are the SSH implementations.

mod builder;
mod response;
mod session;

pub use builder::{SessionBuilder, SshConnector};
pub use response::Response;
pub use session::SwitchSession;

use std::future::Future;

use crate::error::{RemoteError, Result};

/// Capability to run a command on one switch and collect its output.
pub trait CommandRunner: Send {
    /// Run a command and wait for its complete output.
    fn run(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Run a command and return its output lines, failing if the response
    /// was marked as failed.
    fn run_lines(&mut self, command: &str) -> impl Future<Output = Result<Vec<String>>> + Send {
        async move {
            let response = self.run(command).await?;
            if let Some(message) = response.failure_message {
                return Err(RemoteError::CommandFailed {
                    command: response.command,
                    message,
                }
                .into());
            }
            Ok(response.to_lines())
        }
    }

    /// Release the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Capability to open a [`CommandRunner`] for a switch host.
pub trait Connector: Sync {
    type Runner: CommandRunner;

    /// Open an authenticated session to `host`.
    fn connect(&self, host: &str) -> impl Future<Output = Result<Self::Runner>> + Send;
}
