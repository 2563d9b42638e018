//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output.
    pub result: String,

    /// Exit status reported by the switch, if any.
    pub exit_status: Option<u32>,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure message if the command failed (based on failure patterns).
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(command: impl Into<String>, result: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            exit_status: None,
            elapsed,
            failure_message: None,
        }
    }

    /// Set the exit status.
    pub fn with_exit_status(mut self, status: u32) -> Self {
        self.exit_status = Some(status);
        self
    }

    /// Mark the response as failed.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Collect the result lines, in output order.
    pub fn to_lines(&self) -> Vec<String> {
        self.lines().map(str::to_string).collect()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_order() {
        let response = Response::new("switchshow", "a\nb\r\nc\n", Duration::ZERO);
        assert_eq!(response.to_lines(), vec!["a", "b", "c"]);
        assert!(response.is_success());
    }

    #[test]
    fn test_failed_response() {
        let response = Response::new("portshow 99", "", Duration::ZERO)
            .with_exit_status(255)
            .with_failure("exit status 255");
        assert!(!response.is_success());
        assert_eq!(response.exit_status, Some(255));
    }
}
