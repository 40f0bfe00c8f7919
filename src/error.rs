//! Error types for disk usage collection.
//!
//! Every failure surfaces to the caller exactly once; nothing here is retried
//! or recovered internally.

use std::io;

use thiserror::Error;

/// Errors produced while collecting disk usage.
#[derive(Debug, Error)]
pub enum UsageError {
    /// The external tool wrote diagnostic text to standard error.
    ///
    /// The message is the captured text, verbatim.
    #[error("{message}")]
    Invocation { message: String },

    /// The external tool (or the shell wrapping it) could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading the output streams of the child process failed.
    #[error("failed to read output of the disk usage tool: {source}")]
    Stream {
        #[source]
        source: io::Error,
    },

    /// The working directory was needed to resolve a relative path and could not be read.
    #[error("failed to determine the current directory: {source}")]
    WorkingDir {
        #[source]
        source: io::Error,
    },
}

impl UsageError {
    /// Build an [`UsageError::Invocation`] from captured stderr text.
    #[must_use]
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation {
            message: message.into(),
        }
    }
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, UsageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_message_is_verbatim() {
        let text = "du: cannot read directory '/root': Permission denied\n";
        let err = UsageError::invocation(text);

        assert_eq!(err.to_string(), text);
    }

    #[test]
    fn test_spawn_error_names_program() {
        let err = UsageError::Spawn {
            program: "du".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.to_string().contains("`du`"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
