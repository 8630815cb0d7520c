//! Cross-cutting error types for Livepoll.
//!
//! Store-level failures are defined in `poll-db` as `StoreError` and are
//! converted into [`PollError::StoreUnavailable`] (or [`PollError::NotFound`])
//! at the service boundary. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors raised by poll lifecycle and tally operations.
#[derive(Debug, Error)]
pub enum PollError {
    /// Bad question, options, duration, or vote choice.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A poll (or other entity) lookup returned no result.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The requester is not allowed to perform the operation.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// The backing document store failed or could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PollError {
    /// Shorthand for a missing poll.
    pub fn poll_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Poll".to_string(),
            id: id.into(),
        }
    }

    /// Short machine-friendly kind name, used in CLI error payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Authorization(_) => "authorization",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Other(_) => "other",
        }
    }
}
