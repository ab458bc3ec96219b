//! cli::commands::deprecate
//!
//! Deprecate (soft-delete) a resource of any kind.

use anyhow::Result;
use serde_json::json;

use super::not_found;
use crate::cli::args::Kind;
use crate::cli::Context;
use crate::core::entity::EntityKind;
use crate::core::types::{Identifier, Revision};
use crate::repository::Repository;
use crate::ui::output;

/// Deprecate the resource `id` of `kind`.
///
/// Without `--rev` the revision of the freshly read resource is used.
pub fn deprecate(ctx: &Context, kind: Kind, id: &str, revision: Option<Revision>) -> Result<()> {
    let id = Identifier::parse(id)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(deprecate_async(ctx, kind, id, revision))
}

async fn deprecate_async(
    ctx: &Context,
    kind: Kind,
    id: Identifier,
    revision: Option<Revision>,
) -> Result<()> {
    let repos = ctx.repositories()?;

    match kind {
        Kind::Organization => deprecate_kind(ctx, &repos.organizations, &id, revision).await,
        Kind::Domain => deprecate_kind(ctx, &repos.domains, &id, revision).await,
        Kind::Schema => deprecate_kind(ctx, &repos.schemas, &id, revision).await,
        Kind::Instance => deprecate_kind(ctx, &repos.instances, &id, revision).await,
    }
}

async fn deprecate_kind<K: EntityKind>(
    ctx: &Context,
    repo: &Repository<K>,
    id: &Identifier,
    revision: Option<Revision>,
) -> Result<()> {
    let entity = repo
        .read_entity(id, None)
        .await?
        .ok_or_else(|| not_found(K::NAME, id))?;

    let revision = revision.or_else(|| entity.revision());
    let deprecated = repo
        .delete(&entity, revision)
        .await?
        .ok_or_else(|| not_found(K::NAME, id))?;

    if ctx.json {
        output::json(&json!({
            "kind": K::NAME,
            "id": deprecated.id().as_str(),
            "deprecated": deprecated.is_deprecated(),
            "rev": deprecated.revision(),
        }));
    } else {
        output::success(
            format!(
                "Deprecated {} {} (rev {})",
                K::NAME,
                deprecated.id(),
                output::format_revision(deprecated.revision())
            ),
            ctx.verbosity(),
        );
    }
    Ok(())
}
