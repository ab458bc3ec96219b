//! cli::commands::get
//!
//! Read one resource and print it.
//!
//! # Example
//!
//! ```bash
//! nxr get organization acme
//! nxr get schema acme lab sensor v1.0.0 --rev 2
//! nxr get instance-id acme/lab/sensor/v1.0.0/0f9c2a
//! ```

use anyhow::Result;
use serde_json::json;

use super::not_found;
use crate::cli::args::GetTarget;
use crate::cli::Context;
use crate::core::entity::{Entity, EntityKind};
use crate::core::types::{Identifier, Revision};
use crate::ui::output;

/// Read a resource and print its document.
pub fn get(ctx: &Context, target: GetTarget) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(get_async(ctx, target))
}

async fn get_async(ctx: &Context, target: GetTarget) -> Result<()> {
    let repos = ctx.repositories()?;

    match target {
        GetTarget::Organization { organization, rev } => {
            let entity = repos
                .organizations
                .read(&organization, rev.map(Revision::new))
                .await?;
            show(ctx, entity, &organization)
        }
        GetTarget::Domain {
            organization,
            domain,
            rev,
        } => {
            let entity = repos
                .domains
                .read(&organization, &domain, rev.map(Revision::new))
                .await?;
            show(ctx, entity, format!("{}/{}", organization, domain))
        }
        GetTarget::Schema {
            organization,
            domain,
            schema,
            version,
            rev,
        } => {
            let entity = repos
                .schemas
                .read(&organization, &domain, &schema, &version, rev.map(Revision::new))
                .await?;
            show(
                ctx,
                entity,
                format!("{}/{}/{}/{}", organization, domain, schema, version),
            )
        }
        GetTarget::Instance {
            organization,
            domain,
            schema,
            version,
            uuid,
            rev,
        } => {
            let entity = repos
                .instances
                .read(
                    &organization,
                    &domain,
                    &schema,
                    &version,
                    &uuid,
                    rev.map(Revision::new),
                )
                .await?;
            show(
                ctx,
                entity,
                format!("{}/{}/{}/{}/{}", organization, domain, schema, version, uuid),
            )
        }
        GetTarget::InstanceId { full_id, rev } => {
            let id = Identifier::parse(&full_id)?;
            let entity = repos
                .instances
                .read_by_full_id(&id, rev.map(Revision::new))
                .await?;
            show(ctx, entity, full_id)
        }
    }
}

/// Print an entity, or fail if it was not found.
fn show<K: EntityKind>(
    ctx: &Context,
    entity: Option<Entity<K>>,
    requested: impl std::fmt::Display,
) -> Result<()> {
    let entity = entity.ok_or_else(|| not_found(K::NAME, requested))?;

    if ctx.json {
        output::json(&json!({
            "kind": K::NAME,
            "id": entity.id().as_str(),
            "path": entity.path(),
            "data": entity.data(),
        }));
    } else {
        output::print(
            format!(
                "{} {} (rev {})",
                K::NAME,
                entity.id(),
                output::format_revision(entity.revision())
            ),
            ctx.verbosity(),
        );
        output::json(entity.data());
    }
    Ok(())
}
