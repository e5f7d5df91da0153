//! Error taxonomy for a planning run.
//!
//! Every variant is terminal: nothing is retried, and callers map each
//! variant to its own exit status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, validating or allocating a plan.
#[derive(Debug, Error)]
pub enum Error {
    /// The input document could not be read.
    #[error("cannot read input file {}", .path.display())]
    InputAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output document could not be written.
    #[error("cannot write output file {}", .path.display())]
    OutputAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not valid JSON or has the wrong shape.
    #[error("malformed input document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    /// The input is well formed but violates a planning rule.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A date string is not a valid `YYYY-MM-DD` date.
    #[error("invalid date {value:?}")]
    DateFormat {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
