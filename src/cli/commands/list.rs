//! cli::commands::list
//!
//! List a collection, optionally resolving every hit.

use anyhow::Result;
use serde_json::{json, Value};

use super::not_found;
use crate::cli::args::Kind;
use crate::cli::Context;
use crate::core::entity::EntityKind;
use crate::core::query::ListQuery;
use crate::repository::Repository;
use crate::ui::output;

/// Arguments of the list command.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub subpath: Option<String>,
    pub text: Option<String>,
    pub filter: Option<String>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    pub deprecated: bool,
    pub resolve: bool,
}

impl ListArgs {
    /// Build the listing query from the flags.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            subpath: self.subpath.clone(),
            full_text: self.text.clone(),
            filter: self.filter.clone(),
            from: self.from,
            size: self.size,
            deprecated: self.deprecated,
        }
    }
}

/// List a collection.
pub fn list(ctx: &Context, kind: Kind, args: ListArgs) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(list_async(ctx, kind, args))
}

async fn list_async(ctx: &Context, kind: Kind, args: ListArgs) -> Result<()> {
    let repos = ctx.repositories()?;

    match kind {
        Kind::Organization => list_kind(ctx, &repos.organizations, &args).await,
        Kind::Domain => list_kind(ctx, &repos.domains, &args).await,
        Kind::Schema => list_kind(ctx, &repos.schemas, &args).await,
        Kind::Instance => list_kind(ctx, &repos.instances, &args).await,
    }
}

async fn list_kind<K: EntityKind>(
    ctx: &Context,
    repo: &Repository<K>,
    args: &ListArgs,
) -> Result<()> {
    let query = args.query();
    let list = repo
        .list(&query)
        .await?
        .ok_or_else(|| not_found(K::NAME, query.path(K::PATH, repo.query_style())))?;

    if !args.resolve {
        let links: Vec<&str> = list.results().iter().map(|r| r.self_link()).collect();
        if ctx.json {
            output::json(&json!({ "total": list.total(), "results": links }));
        } else {
            output::print(
                format!("{} {}(s) in total", list.total(), K::NAME),
                ctx.verbosity(),
            );
            if !links.is_empty() {
                println!("{}", output::format_list(&links, ""));
            }
        }
        return Ok(());
    }

    let entities = repo.resolve_all(&list).await?;

    if ctx.json {
        let documents: Vec<Value> = entities
            .iter()
            .map(|e| e.as_ref().map_or(Value::Null, |e| e.data().clone()))
            .collect();
        output::json(&json!({ "total": list.total(), "results": documents }));
        return Ok(());
    }

    output::print(
        format!("{} {}(s) in total", list.total(), K::NAME),
        ctx.verbosity(),
    );
    for (hit, entity) in list.results().iter().zip(&entities) {
        match entity {
            Some(entity) => {
                println!(
                    "{} (rev {})",
                    entity.id(),
                    output::format_revision(entity.revision())
                );
                output::json(entity.data());
            }
            None => output::warn(
                format!("{} no longer resolves", hit.self_link()),
                ctx.verbosity(),
            ),
        }
    }
    Ok(())
}
