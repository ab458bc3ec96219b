//! core::types
//!
//! Strong types for identifiers and revisions.
//!
//! # Types
//!
//! - [`Identifier`] - Slash-joined resource identifier (`org/domain/...`)
//! - [`Revision`] - Server-assigned revision counter
//!
//! # Validation
//!
//! Identifiers are validated at construction time. Every segment must be
//! non-empty and free of `/`, so a composed identifier never carries a
//! leading, trailing, or doubled slash.
//!
//! # Examples
//!
//! ```
//! use nexus_repo::core::types::{Identifier, Revision};
//!
//! let id = Identifier::from_segments(["acme", "lab"]).unwrap();
//! assert_eq!(id.as_str(), "acme/lab");
//! assert_eq!(id.segment_count(), 2);
//!
//! assert!(Identifier::from_segments(["acme", ""]).is_err());
//! assert!(Identifier::parse("/acme").is_err());
//!
//! assert_eq!(Revision::new(3).to_string(), "3");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from identifier validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("invalid identifier '{0}': must contain at least one segment")]
    EmptyIdentifier(String),

    #[error("expected {expected} identifier segments, found {found} in '{id}'")]
    SegmentCount {
        id: String,
        expected: usize,
        found: usize,
    },
}

/// A validated, slash-delimited resource identifier.
///
/// Identifiers are opaque to the transport but structured to callers:
/// segment order is fixed per entity kind (see [`crate::core::entity`]).
///
/// # Example
///
/// ```
/// use nexus_repo::core::types::Identifier;
///
/// let schema = Identifier::parse("acme/lab/sensor/v1").unwrap();
/// let instance = schema.child("abc-123").unwrap();
/// assert_eq!(instance.as_str(), "acme/lab/sensor/v1/abc-123");
/// assert_eq!(instance.last_segment(), "abc-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Join ordered segments with a single `/`.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSegment` if any segment is empty or
    /// contains `/`, and `TypeError::EmptyIdentifier` if no segments are
    /// given.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            validate_segment(segment)?;
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
        }

        if joined.is_empty() {
            return Err(TypeError::EmptyIdentifier(joined));
        }

        Ok(Self(joined))
    }

    /// Parse an already-composed identifier such as `acme/lab/sensor/v1/abc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or any segment is invalid
    /// (which also rejects leading, trailing, and doubled slashes).
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        if raw.is_empty() {
            return Err(TypeError::EmptyIdentifier(raw.to_string()));
        }
        Self::from_segments(raw.split('/'))
    }

    /// Return a new identifier with one more trailing segment.
    pub fn child(&self, segment: &str) -> Result<Self, TypeError> {
        validate_segment(segment)?;
        Ok(Self(format!("{}/{}", self.0, segment)))
    }

    /// Iterate over the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// The final segment (the uuid for instances).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_segment(segment: &str) -> Result<(), TypeError> {
    let invalid = |reason: &str| TypeError::InvalidSegment {
        segment: segment.to_string(),
        reason: reason.to_string(),
    };

    if segment.is_empty() {
        return Err(invalid("segment cannot be empty"));
    }
    if segment.contains('/') {
        return Err(invalid("segment cannot contain '/'"));
    }
    Ok(())
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A server-assigned revision number.
///
/// Revisions increase monotonically per resource and are required for every
/// conditional write (update, delete, publish).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision reported for resources that have never been revisioned.
    pub const INITIAL: Revision = Revision(0);

    /// Wrap a raw revision number.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw revision number.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Read the `rev` field of a response body, if present and numeric.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        body.get("rev").and_then(serde_json::Value::as_u64).map(Self)
    }
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
