//! repository::domain
//!
//! Typed reads for domains.

use crate::core::entity::{Domain, Entity};
use crate::core::types::Revision;

use super::error::RepositoryError;
use super::generic::Repository;

impl Repository<Domain> {
    /// Read domain `organization/domain`, optionally at `revision`.
    pub async fn read(
        &self,
        organization: &str,
        domain: &str,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Domain>>, RepositoryError> {
        let id = Domain::create_id(organization, domain)?;
        self.read_entity(&id, revision).await
    }
}
