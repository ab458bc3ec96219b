//! repository
//!
//! Typed repositories over the store's resource collections.
//!
//! # Architecture
//!
//! [`Repository<K>`](Repository) implements the create/update/delete/list/
//! resolve protocol once for any [`EntityKind`](crate::core::entity::EntityKind).
//! Each kind adds its own typed `read` (and schemas add `publish`) as inherent
//! methods on its instantiation:
//!
//! - `organization`: `Repository<Organization>::read`
//! - `domain`: `Repository<Domain>::read`
//! - `schema`: `Repository<Schema>::read`, `publish`
//! - `instance`: `Repository<Instance>::read`, `read_by_full_id`
//!
//! All operations are async and run their round-trips strictly in sequence.
//! Missing resources come back as `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nexus_repo::repository::Repositories;
//! use nexus_repo::transport::mock::MockTransport;
//! use nexus_repo::transport::Method;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new()
//!     .respond(Method::Get, "/domains/acme/lab", json!({"rev": 4}));
//! let repos = Repositories::new(Arc::new(transport));
//!
//! let lab = repos.domains.read("acme", "lab", None).await.unwrap().unwrap();
//! assert_eq!(lab.path(), "/domains/acme/lab");
//!
//! assert!(repos.organizations.read("acme", None).await.unwrap().is_none());
//! # });
//! ```

mod domain;
mod error;
mod generic;
mod instance;
mod organization;
mod schema;

pub use error::RepositoryError;
pub use generic::Repository;

use std::sync::Arc;

use crate::core::entity::{Domain, Instance, Organization, Schema};
use crate::core::query::QueryStyle;
use crate::transport::Transport;

/// Repository of organizations.
pub type OrganizationRepository = Repository<Organization>;
/// Repository of domains.
pub type DomainRepository = Repository<Domain>;
/// Repository of schemas.
pub type SchemaRepository = Repository<Schema>;
/// Repository of instances.
pub type InstanceRepository = Repository<Instance>;

/// One repository per collection, all sharing a transport.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub organizations: OrganizationRepository,
    pub domains: DomainRepository,
    pub schemas: SchemaRepository,
    pub instances: InstanceRepository,
}

impl Repositories {
    /// Build all four repositories over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            organizations: Repository::new(Arc::clone(&transport)),
            domains: Repository::new(Arc::clone(&transport)),
            schemas: Repository::new(Arc::clone(&transport)),
            instances: Repository::new(transport),
        }
    }

    /// Use `style` for every repository's listings.
    pub fn with_query_style(self, style: QueryStyle) -> Self {
        Self {
            organizations: self.organizations.with_query_style(style),
            domains: self.domains.with_query_style(style),
            schemas: self.schemas.with_query_style(style),
            instances: self.instances.with_query_style(style),
        }
    }
}
