//! nexus-repo - Typed repositories over a revisioned resource store
//!
//! The store keeps a four-level hierarchy of JSON documents
//! (organizations → domains → schemas → instances), each carrying a
//! server-assigned revision. This crate turns create/read/update/deprecate,
//! publish and search operations into HTTP requests against it, and turns the
//! responses back into typed entities.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to repositories)
//! - [`repository`] - Generic CRUD/search protocol and per-kind operations
//! - [`core`] - Identifiers, revisions, entity kinds, queries, configuration
//! - [`transport`] - HTTP verbs against the store (reqwest and mock)
//! - [`ui`] - User-facing output
//!
//! # Invariants
//!
//! 1. Identifiers are validated on construction; no segment is empty or holds `/`
//! 2. Entities are never mutated in place; every write returns a fresh entity
//! 3. Writes are conditional on a revision, looked up when the caller has none
//! 4. A missing resource is `Ok(None)`; only faults are errors
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nexus_repo::core::entity::{Draft, Instance};
//! use nexus_repo::repository::InstanceRepository;
//! use nexus_repo::transport::mock::MockTransport;
//! use nexus_repo::transport::Method;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new().respond(
//!     Method::Post,
//!     "/data/acme/lab/sensor/v1",
//!     json!({"@id": "https://store.example.com/data/acme/lab/sensor/v1/abc-123", "rev": 1}),
//! );
//! let instances = InstanceRepository::new(Arc::new(transport));
//!
//! let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
//! let draft = Draft::new(collection, json!({"reading": 21.5})).unwrap();
//! let created = instances.create(&draft).await.unwrap().unwrap();
//! assert_eq!(created.path(), "/data/acme/lab/sensor/v1/abc-123");
//! # });
//! ```

pub mod cli;
pub mod core;
pub mod repository;
pub mod transport;
pub mod ui;
