//! transport::traits
//!
//! Transport trait definition for talking to the store.
//!
//! # Design
//!
//! The `Transport` trait is async because every call is network I/O. Paths
//! are relative to the transport's configured base and arrive with their
//! query string already encoded.
//!
//! Absence is not an error: `get`, `put`, `patch` and `delete` return
//! `Ok(None)` when the store answers "not found", so the repository layer can
//! surface missing resources as `None`. `post` always targets a collection
//! and has no absent outcome; a missing collection is `TransportError::NotFound`.
//!
//! No retries happen at this layer. Stale-revision rejections (HTTP 409) and
//! every other failure come back unchanged as `TransportError`.
//!
//! # Example
//!
//! ```ignore
//! use nexus_repo::transport::{Transport, TransportError};
//!
//! async fn organization_exists(t: &dyn Transport, org: &str) -> Result<bool, TransportError> {
//!     Ok(t.get(&format!("/organizations/{}", org)).await?.is_some())
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from transport operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Authentication failed (missing, invalid, or insufficient token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// A collection targeted by `post` does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The store returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The base URL or a request path could not be turned into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// HTTP verbs used by the repository layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Put => write!(f, "PUT"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// The Transport trait for performing requests against the store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one transport can back several
/// repositories.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Get the transport name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Path component of the configured base URL, without a trailing slash.
    ///
    /// Self-links returned by the store are absolute, so the repository
    /// prefixes collection roots with this before stripping them. Empty when
    /// the base URL has no path.
    fn base_path(&self) -> &str {
        ""
    }

    /// Read a resource. `Ok(None)` if it does not exist.
    async fn get(&self, path: &str) -> Result<Option<Value>, TransportError>;

    /// Create or replace a resource at a client-chosen path.
    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError>;

    /// Create a resource in a collection; the store picks its id.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;

    /// Partially update a resource.
    async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>, TransportError>;

    /// Deprecate a resource.
    async fn delete(&self, path: &str) -> Result<Option<Value>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn transport_error_display() {
        assert_eq!(
            TransportError::AuthFailed("expired token".into()).to_string(),
            "authentication failed: expired token"
        );
        assert_eq!(
            TransportError::NotFound("/data/acme".into()).to_string(),
            "not found: /data/acme"
        );
        assert_eq!(TransportError::RateLimited.to_string(), "rate limited");
        assert_eq!(
            TransportError::ApiError {
                status: 409,
                message: "revision mismatch".into()
            }
            .to_string(),
            "API error: 409 - revision mismatch"
        );
        assert_eq!(
            TransportError::NetworkError("connection refused".into()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            TransportError::Decode("expected value".into()).to_string(),
            "failed to decode response: expected value"
        );
    }
}
