//! repository::error
//!
//! Errors from repository operations.

use thiserror::Error;

use crate::core::entity::LinkError;
use crate::core::types::TypeError;
use crate::transport::TransportError;

/// Errors from repository operations.
///
/// A resource that does not exist is never an error: operations return
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The transport failed, including stale-revision rejections.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An identifier could not be built or has the wrong shape.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] TypeError),

    /// A self-link could not be turned back into an identifier.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// The store answered with a document missing a required field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl RepositoryError {
    /// Whether the store rejected a write because the revision was stale.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RepositoryError::Transport(TransportError::ApiError { status: 409, .. })
        )
    }
}
