//! repository::instance
//!
//! Typed reads for instances.
//!
//! Instances are created with a [`Draft`](crate::core::entity::Draft) whose
//! id is the schema collection `org/domain/schema/version`; the store assigns
//! the uuid and the generic `create` rebuilds the full id from the
//! response's `@id`.

use crate::core::entity::{Entity, EntityKind, Instance};
use crate::core::types::{Identifier, Revision};

use super::error::RepositoryError;
use super::generic::Repository;

impl Repository<Instance> {
    /// Read instance `organization/domain/schema/version/uuid`, optionally at
    /// `revision`.
    pub async fn read(
        &self,
        organization: &str,
        domain: &str,
        schema: &str,
        version: &str,
        uuid: &str,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Instance>>, RepositoryError> {
        let id = Instance::full_id(organization, domain, schema, version, uuid)?;
        self.read_entity(&id, revision).await
    }

    /// Read an instance by an already fully-qualified id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidIdentifier` unless `full_id` has
    /// all five segments.
    pub async fn read_by_full_id(
        &self,
        full_id: &Identifier,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Instance>>, RepositoryError> {
        Instance::check_id(full_id)?;
        self.read_entity(full_id, revision).await
    }
}
