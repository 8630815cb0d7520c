//! Store error types for poll-db.

use poll_core::errors::PollError;
use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// `update_document` targeted a document that does not exist.
    #[error("Document not found: {path}")]
    NotFound { path: String },

    /// A collection or document path has the wrong shape.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Document fields could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A missing document surfaces as `NotFound`; any other store failure means
/// the store could not serve the request.
impl From<StoreError> for PollError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => {
                let (entity, id) = match path.rsplit_once('/') {
                    Some((collection, id)) if collection.ends_with("votes") => ("Vote", id),
                    Some((_, id)) => ("Poll", id),
                    None => ("Document", path.as_str()),
                };
                Self::NotFound {
                    entity: entity.to_string(),
                    id: id.to_string(),
                }
            }
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
