//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the repositories to talk to the store
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Repository operations are async because they involve network I/O. Each
//! network command builds a `tokio::runtime::Runtime` and blocks on its
//! async body, so the dispatcher itself stays synchronous.

mod completion;
mod config_cmd;
mod deprecate;
mod get;
mod list;
mod publish;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{
    get as config_get, list as config_list, path as config_path, set as config_set,
};
pub use deprecate::deprecate;
pub use get::get;
pub use list::{list, ListArgs};
pub use publish::publish;

use anyhow::{anyhow, Result};

use super::args::{Command, ConfigAction};
use super::Context;
use crate::core::types::Revision;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Get { target } => get::get(ctx, target),
        Command::List {
            kind,
            subpath,
            text,
            filter,
            from,
            size,
            deprecated,
            resolve,
        } => list::list(
            ctx,
            kind,
            ListArgs {
                subpath,
                text,
                filter,
                from,
                size,
                deprecated,
                resolve,
            },
        ),
        Command::Publish {
            organization,
            domain,
            schema,
            version,
            unpublish,
            rev,
        } => publish::publish(
            ctx,
            [
                organization.as_str(),
                domain.as_str(),
                schema.as_str(),
                version.as_str(),
            ],
            !unpublish,
            rev.map(Revision::new),
        ),
        Command::Deprecate { kind, id, rev } => {
            deprecate::deprecate(ctx, kind, &id, rev.map(Revision::new))
        }
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Error for a resource the store does not have.
pub(crate) fn not_found(kind: &str, id: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("{} '{}' not found", kind, id)
}
