//! Error types for the patch engine.
//!
//! Malformed listings and I/O faults abort the whole run; a hunk that merely
//! cannot be located is not an error at this level (it becomes a reject).

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// The listing cannot be interpreted as the detected diff format.
    #[error("malformed patch at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The run stopped early: declined confirmation, unusable input, or a
    /// collaborator (ed) that could not do its part.
    #[error("{0}")]
    Aborted(String),
}

impl PatchError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PatchError::Malformed {
            line,
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        PatchError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn aborted(reason: impl Into<String>) -> Self {
        PatchError::Aborted(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
