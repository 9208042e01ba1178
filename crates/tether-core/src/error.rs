//! Error type shared by every fallible operation in the crate.

use std::io;
use std::path::PathBuf;

/// Failure surfaced by a repository, command, or configuration call.
///
/// Errors are raised from the call that detects them and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The repository or its directory is in a state that forbids the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A required command parameter is missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `git` ran but exited non-zero.
    #[error("git {command} failed (exit code {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// `git` could not be started.
    #[error("failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_stderr() {
        let err = Error::CommandFailed {
            command: "commit".to_string(),
            exit_code: 1,
            stderr: "nothing to commit, working tree clean".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("git commit"));
        assert!(message.contains("exit code 1"));
        assert!(message.contains("nothing to commit"));
        assert!(err.is_command_failed());
        assert!(!err.is_invalid_state());
    }

    #[test]
    fn config_message_includes_path() {
        let err = Error::Config {
            path: PathBuf::from("/etc/tether/config.toml"),
            message: "binary must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration in /etc/tether/config.toml: binary must not be empty"
        );
    }
}
