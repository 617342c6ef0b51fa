//! Failure kinds shared across resolvers, storage, and workflows.
//!
//! Resolver boundaries return the typed [`Error`] so callers can tell "stop
//! everything" apart from expected skip cases; workflow code wraps it in
//! `anyhow` for context. Declining an interactive confirmation is not a
//! failure at all and travels as [`Outcome::Cancelled`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unparseable configuration (siteops.yml, .lando.yml).
    #[error("configuration error: {0}")]
    Config(String),

    /// URI resolution produced zero or more than one plausible candidate.
    #[error("{0}")]
    Ambiguous(String),

    /// A requested remote artifact does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Object storage listing or fetch failed.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// A delegated external command exited non-zero.
    #[error("`{command}` exited with status {code}")]
    Tool { command: String, code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Result of a step guarded by an operator confirmation.
///
/// Cancellation short-circuits the rest of a pipeline but the process still
/// exits zero; only [`Error`] values produce a non-zero exit.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Done(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}
