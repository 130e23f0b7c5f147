//! Search error types.

use thiserror::Error;

/// Errors produced by the search pipeline.
///
/// Only [`SearchError::InvalidQuery`] is ever returned to a caller of
/// `search`. The other variants describe conditions the pipeline recovers
/// from locally; they are logged and counted, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The query cannot be executed as given.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A raw record could not be normalized and was dropped.
    #[error("Malformed record from {source_name}: {reason}")]
    MalformedRecord { source_name: String, reason: String },

    /// An upstream source contributed no records.
    #[error("Upstream {source_name} unavailable: {reason}")]
    UpstreamUnavailable { source_name: String, reason: String },
}

impl SearchError {
    /// Create an invalid query error.
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery(reason.into())
    }

    /// Create a malformed record error.
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an upstream unavailable error.
    pub fn upstream(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the pipeline degrades past this error instead of failing.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidQuery(_))
    }

    /// The cause, without the source name.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidQuery(reason)
            | Self::MalformedRecord { reason, .. }
            | Self::UpstreamUnavailable { reason, .. } => reason,
        }
    }
}
