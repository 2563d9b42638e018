//! Builders for switch sessions.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::Connector;
use super::session::SwitchSession;
use crate::error::{ConfigError, Result};
use crate::platform::{PlatformDefinition, brocade};
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing switch sessions.
///
/// # Example
///
/// ```rust,no_run
/// use fabricshow::driver::{CommandRunner, SessionBuilder};
///
/// # async fn example() -> Result<(), fabricshow::Error> {
/// let mut session = SessionBuilder::new("san-sw1.example.com")
///     .username("admin")
///     .password("secret")
///     .build()?;
///
/// session.open().await?;
/// let lines = session.run_lines("switchshow").await?;
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    platform: Option<PlatformDefinition>,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            platform: None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set a platform definition (default: Brocade FOS).
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the connection and per-command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Same settings, different host.
    pub fn with_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self.clone()
        }
    }

    /// Build the session.
    ///
    /// This does not connect. Call `open()` on the returned session.
    pub fn build(self) -> Result<SwitchSession> {
        let username = self.username.ok_or_else(|| ConfigError::InvalidSession {
            message: "Username is required".to_string(),
        })?;
        if self.host.is_empty() {
            return Err(ConfigError::InvalidSession {
                message: "Host is required".to_string(),
            }
            .into());
        }

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        let platform = self.platform.unwrap_or_else(brocade::platform);
        Ok(SwitchSession::new(ssh_config, platform))
    }
}

/// Opens [`SwitchSession`]s for the switches of a fabric, all sharing one
/// set of credentials.
#[derive(Debug, Clone)]
pub struct SshConnector {
    template: SessionBuilder,
}

impl SshConnector {
    /// Use `template` for every host; its own host is ignored.
    pub fn new(template: SessionBuilder) -> Self {
        Self { template }
    }
}

impl Connector for SshConnector {
    type Runner = SwitchSession;

    async fn connect(&self, host: &str) -> Result<SwitchSession> {
        let mut session = self.template.with_host(host).build()?;
        session.open().await?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::assert_err;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_username_required() {
        let err = SessionBuilder::new("sw1").password("pw").build().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidSession { .. })
        ));
    }

    #[test]
    fn test_defaults_to_brocade() {
        let session = SessionBuilder::new("sw1").username("admin").build().unwrap();
        assert_eq!(session.platform().name, brocade::PLATFORM_NAME);
        assert_eq!(session.host(), "sw1");
        assert!(!session.is_open());
    }

    #[test]
    fn test_with_host_keeps_settings() {
        let template = SessionBuilder::new("")
            .username("admin")
            .port(2022)
            .timeout(Duration::from_secs(5));
        let session = template.with_host("sw2").build().unwrap();
        assert_eq!(session.host(), "sw2");
        assert_err!(template.build());
    }

    #[tokio::test]
    async fn test_run_before_open() {
        use crate::driver::CommandRunner;

        let mut session = SessionBuilder::new("sw1").username("admin").build().unwrap();
        let err = session.run("switchshow").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Remote(crate::error::RemoteError::NotConnected)
        ));
    }
}
