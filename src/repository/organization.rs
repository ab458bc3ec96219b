//! repository::organization
//!
//! Typed reads for organizations.

use crate::core::entity::{Entity, Organization};
use crate::core::types::Revision;

use super::error::RepositoryError;
use super::generic::Repository;

impl Repository<Organization> {
    /// Read organization `organization`, optionally at `revision`.
    ///
    /// Returns `Ok(None)` if it does not exist.
    pub async fn read(
        &self,
        organization: &str,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Organization>>, RepositoryError> {
        let id = Organization::create_id(organization)?;
        self.read_entity(&id, revision).await
    }
}
