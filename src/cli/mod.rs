//! cli
//!
//! Command-line interface for nxr.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds the
//! repositories from configuration, and dispatches to handlers in
//! [`commands`]. All store traffic flows through [`crate::repository`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::repository::Repositories;
use crate::transport::HttpTransport;
use crate::ui::output::Verbosity;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "NEXUS_LOG";

/// Settings shared by every command, taken from the global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// `--base-url` override
    pub base_url: Option<String>,
    /// `--token` override
    pub token: Option<String>,
    /// Debug logging enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Machine-readable output
    pub json: bool,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Load configuration and apply the command-line overrides.
    pub fn config(&self) -> Result<Config> {
        let config = Config::load().context("Failed to load config")?;
        config
            .with_overrides(self.base_url.clone(), self.token.clone())
            .context("Invalid command-line override")
    }

    /// Build the repositories for the configured store.
    pub fn repositories(&self) -> Result<Repositories> {
        let config = self.config()?;
        let transport =
            HttpTransport::from_config(&config).context("Failed to set up store connection")?;
        Ok(Repositories::new(Arc::new(transport)).with_query_style(config.query_style()))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        base_url: cli.base_url.clone(),
        token: cli.token.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `--debug` turns on this crate's debug events; otherwise the filter comes
/// from `$NEXUS_LOG`, defaulting to warnings only.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("warn,nexus_repo=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_follows_flags() {
        let ctx = Context {
            quiet: true,
            debug: true,
            ..Context::default()
        };
        assert_eq!(ctx.verbosity(), Verbosity::Quiet);
        assert_eq!(Context::default().verbosity(), Verbosity::Normal);
    }
}
