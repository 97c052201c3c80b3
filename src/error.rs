//! Store failures and what the caller does about them

use crate::article::ArticleId;
use std::fmt;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// A failed call against the article store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never got an answer (connection refused, reset, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("store answered {code}: {body}")]
    Status { code: u16, body: String },

    /// The store answered, but not with what we expected.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The query itself was rejected (GraphQL `errors`).
    #[error("query rejected: {0}")]
    Query(String),

    #[error("article '{0}' not found")]
    NotFound(ArticleId),
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    Decode,
    Query,
    NotFound,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Transport(_) => ErrorKind::Transport,
            StoreError::Status { .. } => ErrorKind::Status,
            StoreError::Decode(_) => ErrorKind::Decode,
            StoreError::Query(_) => ErrorKind::Query,
            StoreError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Transport(e.to_string())
        }
    }
}

/// The store operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    EnsureSchema,
    Insert,
    QueryAll,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::EnsureSchema => "creating schema",
            Operation::Insert => "adding data",
            Operation::QueryAll => "getting data",
            Operation::Update => "updating data",
            Operation::Delete => "deleting data",
        };
        f.write_str(name)
    }
}

/// One failure recorded while running a board operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub operation: Operation,
    pub error: StoreError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.operation, self.error)
    }
}

/// How the caller wants store failures handled.
///
/// The default is a single attempt per call with failures only logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Extra attempts after the first one fails.
    pub retries: u32,
    /// Show failures to the user instead of only logging them.
    pub surface: bool,
}

impl ErrorPolicy {
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}
