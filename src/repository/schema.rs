//! repository::schema
//!
//! Typed reads and publication for schemas.
//!
//! Publishing toggles whether instances may be created against a schema
//! version. It is a PATCH of the schema's `config` sub-resource and, like
//! every other write, produces a new revision.

use serde_json::json;
use tracing::debug;

use crate::core::entity::{Entity, Schema};
use crate::core::types::Revision;

use super::error::RepositoryError;
use super::generic::Repository;

impl Repository<Schema> {
    /// Read schema `organization/domain/schema/version`, optionally at
    /// `revision`.
    pub async fn read(
        &self,
        organization: &str,
        domain: &str,
        schema: &str,
        version: &str,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Schema>>, RepositoryError> {
        let id = Schema::create_id(organization, domain, schema, version)?;
        self.read_entity(&id, revision).await
    }

    /// Publish (`publish = true`) or unpublish a schema.
    ///
    /// Without an explicit `revision` the latest one is looked up first.
    /// Returns the schema re-read at the revision the PATCH produced.
    pub async fn publish(
        &self,
        entity: &Entity<Schema>,
        publish: bool,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<Schema>>, RepositoryError> {
        let revision = match revision {
            Some(rev) => rev,
            None => self.last_revision(entity.id()).await?,
        };

        let path = format!("{}/config?rev={}", entity.path(), revision);
        debug!(id = %entity.id(), rev = %revision, publish, "publishing schema");
        let response = self
            .transport()
            .patch(&path, &json!({ "published": publish }))
            .await?;
        self.confirm(entity.id(), response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockRequest, MockTransport};
    use crate::transport::Method;
    use std::sync::Arc;

    fn sensor() -> Entity<Schema> {
        let id = Schema::create_id("acme", "lab", "sensor", "v1").unwrap();
        Entity::from_response(id, json!({"rev": 1}))
    }

    #[tokio::test]
    async fn unpublish_at_explicit_revision() {
        let transport = MockTransport::new()
            .respond(
                Method::Patch,
                "/schemas/acme/lab/sensor/v1/config?rev=6",
                json!({"rev": 7}),
            )
            .respond(
                Method::Get,
                "/schemas/acme/lab/sensor/v1?rev=7",
                json!({"rev": 7, "published": false}),
            );
        let repo = Repository::<Schema>::new(Arc::new(transport.clone()));

        let schema = repo
            .publish(&sensor(), false, Some(Revision::new(6)))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(schema.get("published"), Some(&json!(false)));
        assert_eq!(
            transport.requests()[0],
            MockRequest::new(
                Method::Patch,
                "/schemas/acme/lab/sensor/v1/config?rev=6",
                Some(json!({"published": false})),
            )
        );
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn publish_missing_schema_is_none() {
        let transport = MockTransport::new();
        let repo = Repository::<Schema>::new(Arc::new(transport.clone()));

        assert!(repo.publish(&sensor(), true, None).await.unwrap().is_none());
        assert_eq!(
            transport.request_lines(),
            vec![
                "GET /schemas/acme/lab/sensor/v1",
                "PATCH /schemas/acme/lab/sensor/v1/config?rev=0",
            ]
        );
    }
}
