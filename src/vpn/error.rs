//! Errors raised while talking to the external VPN tool.

use std::fmt;
use std::io;
use std::time::Duration;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Why a tool invocation produced no usable value.
///
/// The dashboard still falls back to empty defaults on any of these, but the
/// variant is logged so "the tool printed nothing" and "the tool never ran"
/// can be told apart.
#[derive(Debug)]
pub enum AdapterError {
    /// The process could not be spawned or waited on.
    Launch {
        /// Command line that was attempted.
        command: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// The process exited unsuccessfully.
    Exit {
        /// Command line that was run.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// First meaningful line of output, if any.
        message: String,
    },
    /// The process was still running when the deadline passed; it was killed.
    Timeout {
        /// Command line that was run.
        command: String,
        /// The bound that was exceeded.
        after: Duration,
    },
    /// Output was present but not in the expected shape.
    UnexpectedOutput {
        /// Command line that was run.
        command: String,
        /// What was wrong with it.
        detail: String,
    },
    /// Caller input rejected before any process was spawned.
    InvalidInput(String),
}

impl AdapterError {
    /// Short machine-friendly name of the failure kind, used as a log tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Launch { .. } => "launch",
            Self::Exit { .. } => "exit",
            Self::Timeout { .. } => "timeout",
            Self::UnexpectedOutput { .. } => "unexpected-output",
            Self::InvalidInput(_) => "invalid-input",
        }
    }

    /// True when the tool binary itself could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Launch { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch { command, source } => write!(f, "failed to run `{command}`: {source}"),
            Self::Exit {
                command,
                code,
                message,
            } => {
                match code {
                    Some(code) => write!(f, "`{command}` exited with status {code}")?,
                    None => write!(f, "`{command}` was terminated by a signal")?,
                }
                if message.is_empty() {
                    Ok(())
                } else {
                    write!(f, ": {message}")
                }
            }
            Self::Timeout { command, after } if after.as_secs() == 0 => {
                write!(f, "`{command}` timed out after {}ms", after.as_millis())
            }
            Self::Timeout { command, after } => {
                write!(f, "`{command}` timed out after {}s", after.as_secs())
            }
            Self::UnexpectedOutput { command, detail } => {
                write!(f, "unexpected output from `{command}`: {detail}")
            }
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_display_includes_message() {
        let err = AdapterError::Exit {
            command: "nordvpn cities Atlantis".to_string(),
            code: Some(1),
            message: "Country not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`nordvpn cities Atlantis` exited with status 1: Country not found"
        );
        assert_eq!(err.kind(), "exit");
    }

    #[test]
    fn test_exit_display_without_code() {
        let err = AdapterError::Exit {
            command: "nordvpn status".to_string(),
            code: None,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "`nordvpn status` was terminated by a signal");
    }

    #[test]
    fn test_timeout_display() {
        let err = AdapterError::Timeout {
            command: "nordvpn connect".to_string(),
            after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "`nordvpn connect` timed out after 60s");

        let err = AdapterError::Timeout {
            command: "nordvpn status".to_string(),
            after: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "`nordvpn status` timed out after 250ms");
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_launch_not_found() {
        let err = AdapterError::Launch {
            command: "nordvpn status".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert!(err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
