//! SSH-backed switch session.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use log::debug;

use super::CommandRunner;
use super::response::Response;
use crate::error::{RemoteError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{ExecOutput, SshConfig, SshTransport};

/// One SSH session to a switch, running each command on its own exec
/// channel.
pub struct SwitchSession {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Platform definition.
    platform: PlatformDefinition,

    /// SSH transport (None when disconnected).
    transport: Option<SshTransport>,
}

impl SwitchSession {
    /// Create a new, unopened session.
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Self {
        Self {
            ssh_config,
            platform,
            transport: None,
        }
    }

    /// Connect and authenticate.
    pub async fn open(&mut self) -> Result<()> {
        if self.transport.is_some() {
            return Err(RemoteError::AlreadyConnected.into());
        }
        debug!("Connecting to {}", self.ssh_config.socket_addr());
        let transport = SshTransport::connect(self.ssh_config.clone()).await?;
        self.transport = Some(transport);
        Ok(())
    }

    /// Check if the session is connected.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Host this session targets.
    pub fn host(&self) -> &str {
        &self.ssh_config.host
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }
}

impl fmt::Debug for SwitchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchSession")
            .field("host", &self.ssh_config.host)
            .field("platform", &self.platform.name)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Await `exec`, giving up after `timeout`.
async fn bounded<T, F>(command: &str, timeout: Duration, exec: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, exec)
        .await
        .map_err(|_| RemoteError::Timeout {
            command: command.to_string(),
            timeout,
        })?
}

/// Turn the raw output of `command` into a [`Response`].
///
/// A failure pattern in the output wins over the exit status; a non-zero
/// exit status alone also marks the response as failed.
fn finish(
    platform: &PlatformDefinition,
    command: &str,
    exec: ExecOutput,
    elapsed: Duration,
) -> Response {
    let result = String::from_utf8_lossy(&exec.output).into_owned();
    let mut response = Response::new(command, result, elapsed);
    if let Some(status) = exec.exit_status {
        response = response.with_exit_status(status);
    }

    if let Some(pattern) = platform.detect_failure(&response.result) {
        let message = pattern.to_string();
        return response.with_failure(message);
    }
    match exec.exit_status {
        Some(status) if status != 0 => response.with_failure(format!("exit status {}", status)),
        _ => response,
    }
}

impl CommandRunner for SwitchSession {
    async fn run(&mut self, command: &str) -> Result<Response> {
        let transport = self.transport.as_ref().ok_or(RemoteError::NotConnected)?;

        let start = Instant::now();
        let exec = bounded(command, self.ssh_config.timeout, transport.exec(command)).await?;
        let elapsed = start.elapsed();

        debug!(
            "{}: '{}' returned {} bytes in {:?}",
            self.ssh_config.host,
            command,
            exec.output.len(),
            elapsed
        );
        Ok(finish(&self.platform, command, exec, elapsed))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            debug!("Closing session to {}", transport.host());
            transport.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::error::Error;
    use crate::platform::brocade;

    fn output(text: &str, exit_status: Option<u32>) -> ExecOutput {
        ExecOutput {
            output: Bytes::copy_from_slice(text.as_bytes()),
            exit_status,
        }
    }

    #[test]
    fn test_clean_run() {
        let response = finish(
            &brocade::platform(),
            "switchshow",
            output("switchName: san-a1\n", Some(0)),
            Duration::from_millis(40),
        );
        assert!(response.is_success());
        assert_eq!(response.exit_status, Some(0));
        assert_eq!(response.to_lines(), vec!["switchName: san-a1"]);
    }

    #[test]
    fn test_nonzero_exit_fails() {
        let response = finish(
            &brocade::platform(),
            "portshow 99",
            output("", Some(1)),
            Duration::ZERO,
        );
        assert_eq!(response.failure_message.as_deref(), Some("exit status 1"));
    }

    #[test]
    fn test_failure_pattern_with_zero_exit() {
        let response = finish(
            &brocade::platform(),
            "portshow 4",
            output("rbash: portshow: command not found\n", Some(0)),
            Duration::ZERO,
        );
        assert_eq!(response.failure_message.as_deref(), Some("command not found"));
    }

    #[test]
    fn test_missing_exit_status_is_success() {
        let response = finish(&brocade::platform(), "zoneshow", output("", None), Duration::ZERO);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_failed_response_maps_to_command_failed() {
        struct ExitOne;

        impl CommandRunner for ExitOne {
            async fn run(&mut self, command: &str) -> Result<Response> {
                Ok(finish(&brocade::platform(), command, output("", Some(1)), Duration::ZERO))
            }
        }

        let err = assert_err!(ExitOne.run_lines("portshow 3").await);
        assert!(matches!(
            err,
            Error::Remote(RemoteError::CommandFailed { ref command, .. }) if command == "portshow 3"
        ));
    }

    #[tokio::test]
    async fn test_command_timeout() {
        let err = assert_err!(
            bounded::<(), _>(
                "switchshow",
                Duration::from_millis(10),
                std::future::pending::<Result<()>>()
            )
            .await
        );
        assert!(matches!(
            err,
            Error::Remote(RemoteError::Timeout { ref command, .. }) if command == "switchshow"
        ));
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let value = assert_ok!(bounded("zoneshow", Duration::from_secs(1), async { Ok(7) }).await);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_debug_output() {
        let session = SwitchSession::new(
            SshConfig {
                host: "san-a1".to_string(),
                port: 22,
                username: "admin".to_string(),
                auth: crate::transport::AuthMethod::Password("hunter2".to_string().into()),
                timeout: Duration::from_secs(5),
                host_key_verification: Default::default(),
                known_hosts_path: None,
            },
            brocade::platform(),
        );
        let text = format!("{:?}", session);
        assert!(text.contains("san-a1"));
        assert!(text.contains("brocade_fos"));
        assert!(text.contains("open: false"));
        assert!(!text.contains("hunter2"));
    }
}
