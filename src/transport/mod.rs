//! transport
//!
//! Abstraction over the store's HTTP API.
//!
//! # Architecture
//!
//! The `Transport` trait defines the verbs the repository layer needs.
//! Repositories hold an `Arc<dyn Transport>` and never construct HTTP
//! requests themselves, so the same CRUD protocol runs against the real
//! store and against the in-memory mock.
//!
//! - Not-found is a value (`Ok(None)`), not an error
//! - Failures are returned unchanged; nothing is retried
//! - Paths are relative to the transport's base URL
//!
//! # Modules
//!
//! - `traits`: Core `Transport` trait, `Method`, and `TransportError`
//! - [`http`]: reqwest implementation
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nexus_repo::transport::{HttpTransport, Transport};
//!
//! let transport: Arc<dyn Transport> = Arc::new(
//!     HttpTransport::new("https://store.example.com/v0")?.with_token(token),
//! );
//! let body = transport.get("/organizations/acme").await?;
//! ```

pub mod http;
pub mod mock;
mod traits;

pub use http::HttpTransport;
pub use traits::*;
