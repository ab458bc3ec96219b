//! cli::commands::publish
//!
//! Publish or unpublish a schema version.

use anyhow::Result;
use serde_json::json;

use super::not_found;
use crate::cli::Context;
use crate::core::entity::{EntityKind, Schema};
use crate::core::types::Revision;
use crate::ui::output;

/// Publish (`publish = true`) or unpublish the schema named by `segments`.
///
/// `segments` are organization, domain, schema name and version.
pub fn publish(
    ctx: &Context,
    segments: [&str; 4],
    publish: bool,
    revision: Option<Revision>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(publish_async(ctx, segments, publish, revision))
}

async fn publish_async(
    ctx: &Context,
    [organization, domain, schema, version]: [&str; 4],
    publish: bool,
    revision: Option<Revision>,
) -> Result<()> {
    let repos = ctx.repositories()?;
    let id = Schema::create_id(organization, domain, schema, version)?;

    let entity = repos
        .schemas
        .read_entity(&id, None)
        .await?
        .ok_or_else(|| not_found(Schema::NAME, &id))?;

    let updated = repos
        .schemas
        .publish(&entity, publish, revision)
        .await?
        .ok_or_else(|| not_found(Schema::NAME, &id))?;

    if ctx.json {
        output::json(&json!({
            "id": updated.id().as_str(),
            "published": publish,
            "rev": updated.revision(),
        }));
    } else {
        let verb = if publish { "Published" } else { "Unpublished" };
        output::success(
            format!(
                "{} schema {} (rev {})",
                verb,
                updated.id(),
                output::format_revision(updated.revision())
            ),
            ctx.verbosity(),
        );
    }
    Ok(())
}
